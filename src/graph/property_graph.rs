//! Directed property multigraph backed by petgraph.
//!
//! Nodes are identified by their subject string and carry an attribute map keyed by
//! predicate. Edges are identified by an opaque key and carry the predicate that
//! relates their endpoints. Parallel edges, including exact duplicates, are allowed.

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef as _;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Value of a node attribute.
///
/// Stays a scalar until a second value arrives for the same key, then becomes a list
/// in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Single(String),
    List(Vec<String>),
}

impl AttributeValue {
    /// Append a value, promoting a scalar to a list.
    pub fn push(&mut self, value: String) {
        match self {
            AttributeValue::Single(existing) => {
                let first = std::mem::take(existing);
                *self = AttributeValue::List(vec![first, value]);
            }
            AttributeValue::List(values) => values.push(value),
        }
    }

    pub fn values(&self) -> Vec<&str> {
        match self {
            AttributeValue::Single(value) => vec![value.as_str()],
            AttributeValue::List(values) => values.iter().map(String::as_str).collect(),
        }
    }

    pub fn as_single(&self) -> Option<&str> {
        match self {
            AttributeValue::Single(value) => Some(value),
            AttributeValue::List(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AttributeValue::Single(_) => 1,
            AttributeValue::List(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub type Attributes = BTreeMap<String, AttributeValue>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeAttributes {
    pub predicate: String,
}

#[derive(Debug, Clone)]
pub struct NodeData {
    pub id: String,
    pub attributes: Attributes,
}

#[derive(Debug, Clone)]
struct EdgeData {
    key: String,
    attributes: EdgeAttributes,
}

/// Borrowed view of one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeView<'a> {
    pub key: &'a str,
    pub source: &'a str,
    pub target: &'a str,
    pub attributes: &'a EdgeAttributes,
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    inner: StableDiGraph<NodeData, EdgeData>,
    node_index: HashMap<String, NodeIndex>,
    edge_index: HashMap<String, EdgeIndex>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn has_edge(&self, key: &str) -> bool {
        self.edge_index.contains_key(key)
    }

    /// Add a node with the given attributes. Returns `false` and leaves the graph
    /// untouched if a node with this id already exists.
    pub fn add_node(&mut self, id: impl Into<String>, attributes: Attributes) -> bool {
        let id = id.into();
        if self.node_index.contains_key(&id) {
            return false;
        }
        let index = self.inner.add_node(NodeData { id: id.clone(), attributes });
        self.node_index.insert(id, index);
        true
    }

    /// Merge one attribute value into an existing node. Returns `false` if the node
    /// does not exist.
    pub fn merge_node_attribute(&mut self, id: &str, key: String, value: String) -> bool {
        let Some(index) = self.node_index.get(id).copied() else {
            return false;
        };
        let Some(node) = self.inner.node_weight_mut(index) else {
            return false;
        };
        match node.attributes.get_mut(&key) {
            Some(existing) => existing.push(value),
            None => {
                node.attributes.insert(key, AttributeValue::Single(value));
            }
        }
        true
    }

    /// Add a directed edge under `key`. Returns `false` if the key is already used or
    /// either endpoint is missing.
    pub fn add_edge_with_key(
        &mut self,
        key: impl Into<String>,
        source: &str,
        target: &str,
        attributes: EdgeAttributes,
    ) -> bool {
        let key = key.into();
        if self.edge_index.contains_key(&key) {
            return false;
        }
        let (Some(&from), Some(&to)) = (self.node_index.get(source), self.node_index.get(target))
        else {
            return false;
        };
        let index = self.inner.add_edge(from, to, EdgeData { key: key.clone(), attributes });
        self.edge_index.insert(key, index);
        true
    }

    pub fn node(&self, id: &str) -> Option<&NodeData> {
        self.node_index.get(id).and_then(|index| self.inner.node_weight(*index))
    }

    pub fn node_attribute(&self, id: &str, key: &str) -> Option<&AttributeValue> {
        self.node(id).and_then(|node| node.attributes.get(key))
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeData> + '_ {
        self.inner.node_indices().filter_map(move |index| self.inner.node_weight(index))
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> + '_ {
        self.inner.edge_indices().filter_map(move |index| self.edge_view(index))
    }

    pub fn edge(&self, key: &str) -> Option<EdgeView<'_>> {
        self.edge_index.get(key).and_then(|index| self.edge_view(*index))
    }

    pub fn out_edges(&self, id: &str) -> Vec<EdgeView<'_>> {
        self.directed_edges(id, Direction::Outgoing)
    }

    pub fn in_edges(&self, id: &str) -> Vec<EdgeView<'_>> {
        self.directed_edges(id, Direction::Incoming)
    }

    /// All edges from `source` to `target`, whatever their predicate.
    pub fn edges_between(&self, source: &str, target: &str) -> Vec<EdgeView<'_>> {
        self.out_edges(source).into_iter().filter(|edge| edge.target == target).collect()
    }

    /// `(source, predicate, target)` of every edge, sorted. Two graphs with the same
    /// edge multiset produce the same list whatever their edge keys.
    pub fn edge_signatures(&self) -> Vec<(String, String, String)> {
        let mut signatures: Vec<_> = self
            .edges()
            .map(|edge| {
                (
                    edge.source.to_string(),
                    edge.attributes.predicate.clone(),
                    edge.target.to_string(),
                )
            })
            .collect();
        signatures.sort();
        signatures
    }

    fn directed_edges(&self, id: &str, direction: Direction) -> Vec<EdgeView<'_>> {
        let Some(&index) = self.node_index.get(id) else {
            return Vec::new();
        };
        let mut edges: Vec<_> = self
            .inner
            .edges_directed(index, direction)
            .map(|edge| edge.id())
            .collect();
        edges.sort();
        edges.into_iter().filter_map(|edge| self.edge_view(edge)).collect()
    }

    fn edge_view(&self, index: EdgeIndex) -> Option<EdgeView<'_>> {
        let data = self.inner.edge_weight(index)?;
        let (from, to) = self.inner.edge_endpoints(index)?;
        Some(EdgeView {
            key: &data.key,
            source: &self.inner.node_weight(from)?.id,
            target: &self.inner.node_weight(to)?.id,
            attributes: &data.attributes,
        })
    }
}
