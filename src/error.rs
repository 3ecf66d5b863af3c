//! Error types for the query pipeline

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Transport failure reported by the SPARQL repository.
///
/// Network failures and timeouts use status `0`; `detail` then carries the
/// underlying error message. For HTTP statuses `detail` holds the response body.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("HTTP error {status} {status_text}: {detail}")]
pub struct HttpError {
    pub status: u16,
    pub status_text: String,
    pub detail: String,
}

impl HttpError {
    pub fn new(status: u16, status_text: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { status, status_text: status_text.into(), detail: detail.into() }
    }

    /// Failure that never produced an HTTP status (connection refused, DNS, abort).
    pub fn network(detail: impl Into<String>) -> Self {
        Self::new(0, "Network Error", detail)
    }

    pub fn timeout(detail: impl Into<String>) -> Self {
        Self::new(0, "Timeout", detail)
    }
}

/// Failures specific to the background worker channel
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    /// The background context rejected the query; the reason is its error message
    #[error("Worker query failed: {0}")]
    Remote(String),

    /// The request outlived its per-request timeout
    #[error("Worker query {0} timed out")]
    Timeout(u64),

    /// The request was cancelled through its token
    #[error("Worker query {0} was cancelled")]
    Cancelled(u64),

    /// The background context is gone
    #[error("Worker channel disconnected")]
    Disconnected,

    /// A message could not be encoded or decoded
    #[error("Malformed worker message: {0}")]
    Protocol(String),
}

/// Main error type for the pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP, network or timeout failure
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Malformed SPARQL results or RDF text
    #[error("Parse error: {0}")]
    Parse(String),

    /// Query shape that the requested operation cannot handle
    #[error("Unsupported query: {0}")]
    UnsupportedQuery(String),

    /// Worker channel failure
    #[error(transparent)]
    Worker(#[from] WorkerError),

    /// Invalid configuration or schema document
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the failure happened while talking to the endpoint
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_))
    }

    /// Whether the endpoint answered with something that could not be parsed
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse(_))
    }

    /// HTTP status for transport errors, `0` for network failures
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http(err) => Some(err.status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<oxigraph::io::RdfParseError> for Error {
    fn from(err: oxigraph::io::RdfParseError) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Error::Http(HttpError::timeout(err.to_string()));
        }
        match err.status() {
            Some(status) => Error::Http(HttpError::new(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
                err.to_string(),
            )),
            None => Error::Http(HttpError::network(err.to_string())),
        }
    }
}
