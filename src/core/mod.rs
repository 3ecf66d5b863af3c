//! Core data structures shared by the classifier, the graph builder and the repository.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of an RDF term as reported by SPARQL JSON results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermType {
    Uri,
    #[serde(alias = "typed-literal")]
    Literal,
    Bnode,
}

/// An RDF term record: `{ "type": "uri" | "literal" | "bnode", "value": ... }`.
///
/// Datatype and language tag are kept when the endpoint sends them, but they play
/// no part in classification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RdfTerm {
    #[serde(rename = "type")]
    pub term_type: TermType,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(rename = "xml:lang", default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl RdfTerm {
    pub fn uri(value: impl Into<String>) -> Self {
        Self { term_type: TermType::Uri, value: value.into(), datatype: None, language: None }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self { term_type: TermType::Literal, value: value.into(), datatype: None, language: None }
    }

    /// Blank node term. The value is the bare label, without the `_:` prefix.
    pub fn bnode(value: impl Into<String>) -> Self {
        Self { term_type: TermType::Bnode, value: value.into(), datatype: None, language: None }
    }

    pub fn is_literal(&self) -> bool {
        self.term_type == TermType::Literal
    }

    /// Identifier used for graph node identity.
    ///
    /// Blank nodes get a `_:` prefix so they can never collide with an IRI.
    pub fn identifier(&self) -> String {
        match self.term_type {
            TermType::Bnode => format!("_:{}", self.value),
            TermType::Uri | TermType::Literal => self.value.clone(),
        }
    }
}

impl fmt::Display for RdfTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.term_type {
            TermType::Uri => write!(f, "<{}>", self.value),
            TermType::Bnode => write!(f, "_:{}", self.value),
            TermType::Literal => write!(f, "\"{}\"", self.value),
        }
    }
}

/// An immutable `(subject, predicate, object)` statement produced by the RDF parser.
///
/// Subject and predicate are opaque identifiers (IRIs, or `_:label` for blank nodes).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: RdfTerm,
}

impl Triple {
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: RdfTerm) -> Self {
        Self { subject: subject.into(), predicate: predicate.into(), object }
    }

    /// Identifier of the object when it is used as an edge target.
    pub fn object_id(&self) -> String {
        self.object.identifier()
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}
