//! Background worker channel
//!
//! Graph construction and RDF parsing are CPU bound, so [`WorkerDataSource`] moves the
//! whole pipeline onto a dedicated thread with its own single-threaded tokio runtime.
//! Only JSON text crosses the boundary: requests and responses are encoded with the
//! [`protocol`] types and graphs travel as [`crate::graph::SerializedGraph`].
//!
//! # Example
//!
//! ```ignore
//! use sparql_graph::config::{SourceConfig, WorkerOptions};
//! use sparql_graph::datasource::DataSource;
//! use sparql_graph::worker::WorkerDataSource;
//!
//! let worker = WorkerDataSource::spawn(&SourceConfig::new(endpoint), schema, WorkerOptions::default())?;
//! let status = std::sync::Arc::new(|status| println!("{:?}", status));
//! let dataset = worker.get_for_sparql(query, Some(status)).await?;
//! ```

pub mod cancel;
pub mod channel;
pub mod protocol;
pub mod session;

pub use cancel::CancellationToken;
pub use channel::WorkerDataSource;
pub use protocol::{InitPayload, WorkerRequest, WorkerResponse};
pub use session::WorkerSession;
