//! SPARQL endpoint access over HTTP.
//!
//! Every query is sent as `GET {endpoint}?query={urlencoded}`; only the `Accept`
//! header differs between query forms.

pub mod results;

pub use results::{Row, TabularResponse};

use crate::config::SourceConfig;
use crate::error::{Error, HttpError, Result};
use crate::parsing::rdf_parser::RdfSerialization;
use async_trait::async_trait;
use log::debug;
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};

/// Media type requested for SELECT and ASK
pub const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// Executes query strings against one endpoint
#[async_trait]
pub trait Repository: Send + Sync {
    async fn select(&self, query: &str) -> Result<TabularResponse>;

    /// Raw RDF document, unparsed
    async fn construct(&self, query: &str) -> Result<String>;

    /// DESCRIBE and CONSTRUCT both answer with an RDF document
    async fn describe(&self, query: &str) -> Result<String> {
        self.construct(query).await
    }

    async fn ask(&self, query: &str) -> Result<bool>;

    /// Serialization of the documents returned by `construct`
    fn rdf_format(&self) -> RdfSerialization;
}

pub struct SparqlRepository {
    endpoint: Url,
    client: Client,
    rdf_format: RdfSerialization,
}

impl SparqlRepository {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        config.validate()?;
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| Error::Config(format!("Invalid endpoint '{}': {}", config.endpoint, e)))?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(SparqlRepository { endpoint, client, rdf_format: config.rdf_format })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    async fn get(&self, query: &str, accept: &str) -> Result<String> {
        debug!("GET {} (Accept: {})", self.endpoint, accept);

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("query", query)])
            .header(ACCEPT, accept)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() >= 300 {
            let detail = response.text().await.unwrap_or_default();
            return Err(HttpError::new(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
                detail,
            )
            .into());
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl Repository for SparqlRepository {
    async fn select(&self, query: &str) -> Result<TabularResponse> {
        let body = self.get(query, SPARQL_RESULTS_JSON).await?;
        results::parse_select(&body)
    }

    async fn construct(&self, query: &str) -> Result<String> {
        self.get(query, self.rdf_format.media_type()).await
    }

    async fn ask(&self, query: &str) -> Result<bool> {
        let body = self.get(query, SPARQL_RESULTS_JSON).await?;
        results::parse_ask(&body)
    }

    fn rdf_format(&self) -> RdfSerialization {
        self.rdf_format
    }
}
