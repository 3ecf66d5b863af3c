//! Query string to [`DataSet`] orchestration.
//!
//! Two interchangeable implementations of [`DataSource`] exist:
//!
//! - [`LocalDataSource`] runs the repository, the RDF parser and the graph builder on
//!   the caller's runtime.
//! - [`crate::worker::WorkerDataSource`] forwards each call to a background worker and
//!   relays its progress notifications.
//!
//! # Example
//!
//! ```ignore
//! use sparql_graph::{config::SourceConfig, datasource::{DataSource, LocalDataSource}, schema::Schema};
//!
//! let schema = Schema::from_path("schema.json")?;
//! let source = LocalDataSource::new(&SourceConfig::new("https://dbpedia.org/sparql"), schema)?;
//! let dataset = source.get_for_sparql("CONSTRUCT { ?s ?p ?o } WHERE { ?s ?p ?o } LIMIT 10", None).await?;
//! println!("{} nodes", dataset.graph.map(|g| g.node_count()).unwrap_or(0));
//! ```

pub mod local;

pub use local::LocalDataSource;

use crate::error::Result;
use crate::graph::{Graph, SerializedGraph};
use crate::repository::Row;
use crate::schema::Schema;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Progress of one query. The numeric codes are part of the worker protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryStatus {
    LoadingData = 0,
    ProcessingData = 1,
}

impl QueryStatus {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(QueryStatus::LoadingData),
            1 => Some(QueryStatus::ProcessingData),
            _ => None,
        }
    }
}

/// Observer of status transitions
pub type StatusCallback = Arc<dyn Fn(QueryStatus) + Send + Sync>;

pub(crate) fn notify(status: Option<&StatusCallback>, value: QueryStatus) {
    if let Some(callback) = status {
        callback(value);
    }
}

/// Rows of a SELECT (or ASK) query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabularResult {
    pub headers: Vec<String>,
    pub data: Vec<Row>,
}

/// Result of one query. Exactly one of `graph` and `tabular` is set.
#[derive(Debug, Clone)]
pub struct DataSet {
    pub schema: Schema,
    pub graph: Option<Graph>,
    pub tabular: Option<TabularResult>,
}

impl DataSet {
    pub fn from_graph(schema: Schema, graph: Graph) -> Self {
        Self { schema, graph: Some(graph), tabular: None }
    }

    pub fn from_tabular(schema: Schema, tabular: TabularResult) -> Self {
        Self { schema, graph: None, tabular: Some(tabular) }
    }

    pub fn serialize(&self) -> SerializedDataSet {
        SerializedDataSet {
            schema: self.schema.clone(),
            graph: self.graph.as_ref().map(Graph::serialize),
            tabular: self.tabular.clone(),
        }
    }
}

/// [`DataSet`] with the graph in transfer form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedDataSet {
    pub schema: Schema,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph: Option<SerializedGraph>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tabular: Option<TabularResult>,
}

impl SerializedDataSet {
    pub fn hydrate(self) -> Result<DataSet> {
        let graph = self.graph.map(SerializedGraph::hydrate).transpose()?;
        Ok(DataSet { schema: self.schema, graph, tabular: self.tabular })
    }
}

#[async_trait]
pub trait DataSource: Send + Sync {
    /// Run a query and build a fresh data set from its answer.
    ///
    /// SELECT and ASK produce `tabular`; CONSTRUCT and DESCRIBE produce `graph`.
    async fn get_for_sparql(
        &self,
        sparql: &str,
        status: Option<StatusCallback>,
    ) -> Result<DataSet>;

    /// Run a CONSTRUCT or DESCRIBE query and add its triples to `graph`.
    ///
    /// The graph is only modified once the answer has been fetched and parsed, so a
    /// failed call leaves it untouched.
    async fn add_information(
        &self,
        graph: &mut Graph,
        sparql: &str,
        status: Option<StatusCallback>,
    ) -> Result<()>;
}
