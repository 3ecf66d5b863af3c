//! Stateless triple classification against a [`Schema`].

use super::Schema;
use crate::core::Triple;

/// Role a triple plays in the graph.
///
/// Variants are declared in priority order: when a predicate is listed in several
/// schema sets, the first matching role wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TripleRole {
    Node,
    Edge,
    NodeAttribute,
}

#[derive(Debug, Clone, Copy)]
pub struct TripleClassifier<'a> {
    schema: &'a Schema,
}

impl<'a> TripleClassifier<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn is_node(&self, triple: &Triple) -> bool {
        self.schema.is_node_predicate(&triple.predicate)
    }

    pub fn is_edge(&self, triple: &Triple) -> bool {
        self.schema.is_edge_predicate(&triple.predicate)
    }

    pub fn is_node_attribute(&self, triple: &Triple) -> bool {
        self.schema.is_node_attribute_predicate(&triple.predicate)
    }

    /// `None` when the predicate is in none of the three sets.
    pub fn classify(&self, triple: &Triple) -> Option<TripleRole> {
        if self.is_node(triple) {
            Some(TripleRole::Node)
        } else if self.is_edge(triple) {
            Some(TripleRole::Edge)
        } else if self.is_node_attribute(triple) {
            Some(TripleRole::NodeAttribute)
        } else {
            None
        }
    }

    /// Attribute `(key, value)` stored on the subject node.
    ///
    /// Node-defining triples follow the same convention, so the type predicate ends
    /// up as an attribute holding the class identifier(s).
    pub fn to_attribute(&self, triple: &Triple) -> (String, String) {
        (triple.predicate.clone(), triple.object_id())
    }
}
