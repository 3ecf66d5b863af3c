//! Predicate classification table
//!
//! A [`Schema`] lists which predicates create nodes, which relate two nodes and
//! which attach attributes to an existing node. It is loaded once from a JSON
//! document of the form:
//!
//! ```json
//! {
//!   "nodePredicates": ["http://www.w3.org/1999/02/22-rdf-syntax-ns#type"],
//!   "edgePredicates": ["http://example.org/smarterThan"],
//!   "nodeAttributePredicates": ["http://www.w3.org/2000/01/rdf-schema#label"]
//! }
//! ```

pub mod classifier;

pub use classifier::{TripleClassifier, TripleRole};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(default)]
    pub node_predicates: BTreeSet<String>,
    #[serde(default)]
    pub edge_predicates: BTreeSet<String>,
    #[serde(default)]
    pub node_attribute_predicates: BTreeSet<String>,
}

impl Schema {
    pub fn new<N, E, A>(node_predicates: N, edge_predicates: E, node_attribute_predicates: A) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            node_predicates: node_predicates.into_iter().map(Into::into).collect(),
            edge_predicates: edge_predicates.into_iter().map(Into::into).collect(),
            node_attribute_predicates: node_attribute_predicates
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(format!("Invalid schema: {}", e)))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn is_node_predicate(&self, predicate: &str) -> bool {
        self.node_predicates.contains(predicate)
    }

    pub fn is_edge_predicate(&self, predicate: &str) -> bool {
        self.edge_predicates.contains(predicate)
    }

    pub fn is_node_attribute_predicate(&self, predicate: &str) -> bool {
        self.node_attribute_predicates.contains(predicate)
    }

    /// Predicates listed in more than one set.
    ///
    /// Overlap is legal; the classifier resolves it with the node > edge > attribute
    /// priority, so only the highest role of each listed predicate is ever applied.
    pub fn overlaps(&self) -> BTreeSet<&str> {
        let node_edge = self.node_predicates.intersection(&self.edge_predicates);
        let node_attr = self.node_predicates.intersection(&self.node_attribute_predicates);
        let edge_attr = self.edge_predicates.intersection(&self.node_attribute_predicates);
        node_edge.chain(node_attr).chain(edge_attr).map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.node_predicates.is_empty()
            && self.edge_predicates.is_empty()
            && self.node_attribute_predicates.is_empty()
    }
}
