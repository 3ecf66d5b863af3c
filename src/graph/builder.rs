//! Incremental graph construction from an unordered triple sequence.
//!
//! Triples are applied in input order. Edge and attribute triples whose nodes do not
//! exist yet are parked in a deferred queue and replayed once the whole input has been
//! seen. Anything still unresolved after the configured number of replays is dropped
//! and logged; malformed or out-of-order input never produces an error.

use crate::config::BuilderConfig;
use crate::core::Triple;
use crate::graph::property_graph::{AttributeValue, Attributes, EdgeAttributes, Graph};
use crate::schema::{Schema, TripleClassifier, TripleRole};
use log::{debug, warn};
use uuid::Uuid;

/// Counters describing one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub nodes_created: usize,
    pub edges_added: usize,
    /// Values merged into already existing nodes, from node or attribute triples.
    pub attributes_merged: usize,
    pub unclassified: usize,
    /// Triples parked at least once during the first pass.
    pub deferred: usize,
    pub resolved_on_retry: usize,
    pub dropped: usize,
    pub retry_passes: usize,
}

enum Outcome {
    Applied,
    Deferred(Triple),
    Unclassified,
}

pub struct GraphBuilder<'a> {
    classifier: TripleClassifier<'a>,
    config: BuilderConfig,
    graph: Graph,
    deferred: Vec<Triple>,
    report: BuildReport,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self::extend(schema, Graph::new())
    }

    /// Continue building on top of an already populated graph.
    pub fn extend(schema: &'a Schema, graph: Graph) -> Self {
        let overlaps = schema.overlaps();
        if !overlaps.is_empty() {
            warn!(
                "Schema lists predicates in several sets, node > edge > attribute priority applies: {:?}",
                overlaps
            );
        }
        Self {
            classifier: TripleClassifier::new(schema),
            config: BuilderConfig::default(),
            graph,
            deferred: Vec::new(),
            report: BuildReport::default(),
        }
    }

    pub fn with_config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    /// Build a fresh graph from `triples` with the default configuration.
    pub fn build<I>(schema: &'a Schema, triples: I) -> Graph
    where
        I: IntoIterator<Item = Triple>,
    {
        let mut builder = Self::new(schema);
        builder.add_triples(triples);
        builder.finish().0
    }

    /// First pass over a batch of triples.
    pub fn add_triples<I>(&mut self, triples: I)
    where
        I: IntoIterator<Item = Triple>,
    {
        for triple in triples {
            self.add_triple(triple);
        }
    }

    pub fn add_triple(&mut self, triple: Triple) {
        match self.apply(triple) {
            Outcome::Applied => {}
            Outcome::Unclassified => self.report.unclassified += 1,
            Outcome::Deferred(triple) => {
                self.report.deferred += 1;
                self.deferred.push(triple);
            }
        }
    }

    /// Number of triples currently waiting for a missing node.
    pub fn pending(&self) -> usize {
        self.deferred.len()
    }

    /// Replay the deferred queue, drop whatever is still unresolved and hand out the
    /// graph.
    ///
    /// The queue is replayed up to `max_retry_passes` times and stops early once a pass
    /// resolves nothing.
    pub fn finish(mut self) -> (Graph, BuildReport) {
        while !self.deferred.is_empty() && self.report.retry_passes < self.config.max_retry_passes
        {
            self.report.retry_passes += 1;
            let queue = std::mem::take(&mut self.deferred);
            let queued = queue.len();

            for triple in queue {
                match self.apply(triple) {
                    Outcome::Applied => self.report.resolved_on_retry += 1,
                    Outcome::Deferred(triple) => self.deferred.push(triple),
                    Outcome::Unclassified => self.report.unclassified += 1,
                }
            }

            if self.deferred.len() == queued {
                break;
            }
        }

        if !self.deferred.is_empty() {
            for triple in &self.deferred {
                debug!("Dropping triple with unresolved node reference: {}", triple);
            }
            warn!(
                "Dropped {} triple(s) referencing nodes that were never defined after {} retry pass(es)",
                self.deferred.len(),
                self.report.retry_passes
            );
            self.report.dropped = self.deferred.len();
        }

        (self.graph, self.report)
    }

    fn apply(&mut self, triple: Triple) -> Outcome {
        match self.classifier.classify(&triple) {
            Some(TripleRole::Node) => {
                let (key, value) = self.classifier.to_attribute(&triple);
                if self.graph.merge_node_attribute(&triple.subject, key.clone(), value.clone()) {
                    self.report.attributes_merged += 1;
                } else {
                    let mut attributes = Attributes::new();
                    attributes.insert(key, AttributeValue::Single(value));
                    self.graph.add_node(triple.subject, attributes);
                    self.report.nodes_created += 1;
                }
                Outcome::Applied
            }
            Some(TripleRole::Edge) => {
                let target = triple.object_id();
                if !self.graph.has_node(&triple.subject) || !self.graph.has_node(&target) {
                    return Outcome::Deferred(triple);
                }
                let attributes = EdgeAttributes { predicate: triple.predicate.clone() };
                let key = Uuid::new_v4().to_string();
                if self.graph.add_edge_with_key(key, &triple.subject, &target, attributes) {
                    self.report.edges_added += 1;
                }
                Outcome::Applied
            }
            Some(TripleRole::NodeAttribute) => {
                if !self.graph.has_node(&triple.subject) {
                    return Outcome::Deferred(triple);
                }
                let (key, value) = self.classifier.to_attribute(&triple);
                self.graph.merge_node_attribute(&triple.subject, key, value);
                self.report.attributes_merged += 1;
                Outcome::Applied
            }
            None => {
                debug!("Dropping triple with unclassified predicate: {}", triple);
                Outcome::Unclassified
            }
        }
    }
}
