//! JSON messages exchanged between the foreground and the background worker.
//!
//! Requests:
//!
//! ```json
//! { "action": "init", "payload": { "sparqlEndpoint": "...", "schema": { ... } } }
//! { "action": "query", "id": 1, "payload": "CONSTRUCT ...", "oldGraph": { ... } }
//! { "action": "cancel", "id": 1 }
//! ```
//!
//! Responses:
//!
//! ```json
//! { "id": 1, "status": 0 }
//! { "id": 1, "dataset": { ... } }
//! { "id": 1, "error": "..." }
//! { "id": 1, "error": "...", "http": { "status": 500, "statusText": "...", "detail": "..." } }
//! ```
//!
//! Transport failures carry `http` so the foreground can rebuild the typed error.

use crate::config::{BuilderConfig, SourceConfig};
use crate::datasource::SerializedDataSet;
use crate::error::{Error, HttpError, WorkerError};
use crate::graph::SerializedGraph;
use crate::parsing::rdf_parser::RdfSerialization;
use crate::schema::Schema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitPayload {
    pub sparql_endpoint: String,
    pub schema: Schema,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rdf_format: Option<RdfSerialization>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retry_passes: Option<usize>,
}

impl InitPayload {
    pub fn new(config: &SourceConfig, schema: Schema) -> Self {
        Self {
            sparql_endpoint: config.endpoint.clone(),
            schema,
            timeout_ms: Some(config.timeout_ms),
            rdf_format: Some(config.rdf_format),
            max_retry_passes: Some(config.builder.max_retry_passes),
        }
    }

    /// Source configuration for the background side; absent fields keep their defaults.
    pub fn source_config(&self) -> SourceConfig {
        let defaults = SourceConfig::default();
        SourceConfig {
            endpoint: self.sparql_endpoint.clone(),
            timeout_ms: self.timeout_ms.unwrap_or(defaults.timeout_ms),
            rdf_format: self.rdf_format.unwrap_or(defaults.rdf_format),
            builder: BuilderConfig {
                max_retry_passes: self
                    .max_retry_passes
                    .unwrap_or(defaults.builder.max_retry_passes),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum WorkerRequest {
    Init {
        payload: InitPayload,
    },
    Query {
        id: u64,
        payload: String,
        #[serde(rename = "oldGraph", default, skip_serializing_if = "Option::is_none")]
        old_graph: Option<SerializedGraph>,
    },
    Cancel {
        id: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorkerResponse {
    Progress { id: u64, status: u8 },
    Result { id: u64, dataset: SerializedDataSet },
    Error {
        id: u64,
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        http: Option<HttpError>,
    },
}

impl WorkerResponse {
    pub fn id(&self) -> u64 {
        match self {
            WorkerResponse::Progress { id, .. }
            | WorkerResponse::Result { id, .. }
            | WorkerResponse::Error { id, .. } => *id,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, WorkerResponse::Progress { .. })
    }

    /// Terminal message for a failed query.
    pub fn failure(id: u64, err: &Error) -> Self {
        let http = match err {
            Error::Http(http) => Some(http.clone()),
            _ => None,
        };
        WorkerResponse::Error { id, error: err.to_string(), http }
    }

    /// Foreground error for a terminal `error` message.
    pub fn into_error(error: String, http: Option<HttpError>) -> Error {
        match http {
            Some(http) => Error::Http(http),
            None => Error::Worker(WorkerError::Remote(error)),
        }
    }
}

pub fn encode<T: Serialize>(message: &T) -> Result<String, WorkerError> {
    serde_json::to_string(message).map_err(|e| WorkerError::Protocol(e.to_string()))
}

pub fn decode_request(text: &str) -> Result<WorkerRequest, WorkerError> {
    serde_json::from_str(text).map_err(|e| WorkerError::Protocol(e.to_string()))
}

pub fn decode_response(text: &str) -> Result<WorkerResponse, WorkerError> {
    serde_json::from_str(text).map_err(|e| WorkerError::Protocol(e.to_string()))
}
