//! # sparql-graph
//!
//! sparql-graph turns the answers of a SPARQL endpoint into data that a visualization
//! can consume: CONSTRUCT and DESCRIBE queries become an in-memory directed property
//! graph, SELECT queries become a table.
//!
//! ## Features
//!
//! - Schema-driven classification of triples into nodes, edges and node attributes
//! - Graph construction that tolerates triples referencing nodes defined later
//! - SPARQL over HTTP with typed transport errors and request timeouts
//! - An optional background worker with progress notifications, per-request
//!   timeouts and cancellation
//!
//! ## Example
//!
//! ```rust
//! use sparql_graph::core::{RdfTerm, Triple};
//! use sparql_graph::graph::GraphBuilder;
//! use sparql_graph::schema::Schema;
//!
//! let schema = Schema::new(["rdf:type"], ["ex:smarterThan"], Vec::<String>::new());
//! let graph = GraphBuilder::build(
//!     &schema,
//!     vec![
//!         Triple::new("ex:Jerry", "ex:smarterThan", RdfTerm::uri("ex:Tom")),
//!         Triple::new("ex:Tom", "rdf:type", RdfTerm::uri("ex:Cat")),
//!         Triple::new("ex:Jerry", "rdf:type", RdfTerm::uri("ex:Mouse")),
//!     ],
//! );
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.edge_count(), 1);
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::cast_possible_truncation)]

/// Triples and RDF terms
pub mod core;

/// Configuration structures
pub mod config;

/// Error types and result definitions
pub mod error;

/// Predicate classification
pub mod schema;

/// Property graph and graph construction
pub mod graph;

/// Query form detection and RDF parsing
pub mod parsing;

/// SPARQL endpoint access
pub mod repository;

/// Query orchestration
pub mod datasource;

/// Background worker channel
pub mod worker;

pub use datasource::{DataSet, DataSource, LocalDataSource, QueryStatus, StatusCallback};
pub use error::{Error, HttpError, Result, WorkerError};
pub use graph::{Graph, GraphBuilder};
pub use schema::Schema;
pub use worker::WorkerDataSource;
