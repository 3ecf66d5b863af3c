//! Property graph, graph builder and the serialized form used across the worker boundary.

pub mod builder;
pub mod property_graph;
pub mod serialization;

pub use builder::{BuildReport, GraphBuilder};
pub use property_graph::{AttributeValue, Attributes, EdgeAttributes, EdgeView, Graph, NodeData};
pub use serialization::{SerializedEdge, SerializedGraph, SerializedNode};
