//! Configuration structures for data sources, the graph builder and the worker channel.

use crate::error::{Error, Result};
use crate::parsing::rdf_parser::RdfSerialization;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default bound on every HTTP request, in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Graph builder tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// How many times the deferred queue is replayed after the first pass.
    /// Replays stop early when a pass resolves nothing.
    pub max_retry_passes: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self { max_retry_passes: 1 }
    }
}

/// Configuration of one SPARQL-backed data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub endpoint: String,
    /// Bound on every HTTP request, in milliseconds
    pub timeout_ms: u64,
    /// Serialization requested for CONSTRUCT/DESCRIBE responses
    pub rdf_format: RdfSerialization,
    pub builder: BuilderConfig,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:7878/query".to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            rdf_format: RdfSerialization::NTriples,
            builder: BuilderConfig::default(),
        }
    }
}

impl SourceConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), ..Self::default() }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Invalid source configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(Error::Config("Endpoint must not be empty".to_string()));
        }
        if self.timeout_ms == 0 {
            return Err(Error::Config("Timeout must not be zero".to_string()));
        }
        Ok(())
    }
}

/// Foreground options of a worker channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerOptions {
    /// Bound on a whole worker round trip; `None` waits for the terminal message.
    pub query_timeout: Option<Duration>,
}
