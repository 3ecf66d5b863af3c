//! Detects the form of a SPARQL query once, before it is sent anywhere.
//!
//! Only the prologue (`PREFIX`, `BASE`, comments) is skipped; the query body is left to
//! the endpoint to validate.

use crate::error::{Error, Result};
use regex::Regex;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    Select,
    Construct,
    Describe,
    Ask,
}

impl QueryType {
    /// CONSTRUCT and DESCRIBE answer with an RDF document
    pub fn yields_graph(&self) -> bool {
        matches!(self, QueryType::Construct | QueryType::Describe)
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryType::Select => "SELECT",
            QueryType::Construct => "CONSTRUCT",
            QueryType::Describe => "DESCRIBE",
            QueryType::Ask => "ASK",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone)]
pub struct QueryTypeParser {
    prologue_regex: Regex,
    form_regex: Regex,
}

impl QueryTypeParser {
    pub fn new() -> std::result::Result<Self, regex::Error> {
        Ok(QueryTypeParser {
            prologue_regex: Regex::new(
                r"(?i)^\s*(?:#[^\n]*(?:\n|$)|PREFIX\s+[^\s:]*:\s*<[^>]*>|BASE\s+<[^>]*>)",
            )?,
            form_regex: Regex::new(r"(?i)^\s*(SELECT|CONSTRUCT|DESCRIBE|ASK)\b")?,
        })
    }

    pub fn parse(&self, query: &str) -> Result<QueryType> {
        let mut rest = query;
        while let Some(prologue) = self.prologue_regex.find(rest) {
            rest = &rest[prologue.end()..];
        }

        let form = self
            .form_regex
            .captures(rest)
            .and_then(|captures| captures.get(1))
            .map(|keyword| keyword.as_str().to_uppercase());

        match form.as_deref() {
            Some("SELECT") => Ok(QueryType::Select),
            Some("CONSTRUCT") => Ok(QueryType::Construct),
            Some("DESCRIBE") => Ok(QueryType::Describe),
            Some("ASK") => Ok(QueryType::Ask),
            _ => {
                let preview: String = rest.trim_start().chars().take(40).collect();
                Err(Error::UnsupportedQuery(format!("Unrecognized query form near '{}'", preview)))
            }
        }
    }
}
