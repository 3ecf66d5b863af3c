//! SPARQL 1.1 Query Results JSON format

use crate::core::RdfTerm;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One solution: variable name to bound term. Unbound variables are absent.
pub type Row = BTreeMap<String, RdfTerm>;

/// Normalized SELECT response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabularResponse {
    pub headers: Vec<String>,
    pub bindings: Vec<Row>,
}

#[derive(Debug, Deserialize)]
struct ResultsDocument {
    #[serde(default)]
    head: Head,
    results: Option<Bindings>,
    boolean: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct Head {
    #[serde(default)]
    vars: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Bindings {
    #[serde(default)]
    bindings: Vec<Row>,
}

/// Parse a SELECT response body
pub fn parse_select(body: &str) -> Result<TabularResponse> {
    let document = parse_document(body)?;
    let results = document.results.ok_or_else(|| {
        Error::Parse("SPARQL results document has no 'results' member".to_string())
    })?;
    Ok(TabularResponse { headers: document.head.vars, bindings: results.bindings })
}

/// Parse an ASK response body
pub fn parse_ask(body: &str) -> Result<bool> {
    parse_document(body)?.boolean.ok_or_else(|| {
        Error::Parse("SPARQL results document has no 'boolean' member".to_string())
    })
}

fn parse_document(body: &str) -> Result<ResultsDocument> {
    serde_json::from_str(body)
        .map_err(|e| Error::Parse(format!("Invalid SPARQL results JSON: {}", e)))
}
