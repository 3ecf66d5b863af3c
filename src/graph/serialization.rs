//! Transfer-safe graph representation used across the worker boundary.

use crate::error::{Error, Result};
use crate::graph::property_graph::{Attributes, EdgeAttributes, Graph};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedNode {
    pub key: String,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedEdge {
    pub key: String,
    pub source: String,
    pub target: String,
    pub attributes: EdgeAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedGraph {
    pub nodes: Vec<SerializedNode>,
    pub edges: Vec<SerializedEdge>,
}

impl SerializedGraph {
    /// Rebuild a live graph, keeping node ids and edge keys.
    pub fn hydrate(self) -> Result<Graph> {
        let mut graph = Graph::new();
        for node in self.nodes {
            let key = node.key.clone();
            if !graph.add_node(node.key, node.attributes) {
                return Err(Error::Serialization(format!("Duplicate node '{}'", key)));
            }
        }
        for edge in self.edges {
            if !graph.add_edge_with_key(edge.key.clone(), &edge.source, &edge.target, edge.attributes)
            {
                return Err(Error::Serialization(format!(
                    "Edge '{}' from '{}' to '{}' has a duplicate key or a missing endpoint",
                    edge.key, edge.source, edge.target
                )));
            }
        }
        Ok(graph)
    }
}

impl From<&Graph> for SerializedGraph {
    fn from(graph: &Graph) -> Self {
        let nodes = graph
            .nodes()
            .map(|node| SerializedNode { key: node.id.clone(), attributes: node.attributes.clone() })
            .collect();
        let edges = graph
            .edges()
            .map(|edge| SerializedEdge {
                key: edge.key.to_string(),
                source: edge.source.to_string(),
                target: edge.target.to_string(),
                attributes: edge.attributes.clone(),
            })
            .collect();
        Self { nodes, edges }
    }
}

impl Graph {
    pub fn serialize(&self) -> SerializedGraph {
        SerializedGraph::from(self)
    }
}
