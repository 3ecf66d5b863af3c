//! RDF text to [`Triple`] conversion, backed by the oxigraph parsers.
//!
//! Quads from named graphs are flattened into triples; the graph name plays no part in
//! graph construction.
//!
//! Blank node labels are only meaningful inside one document, so every call to
//! [`parse_triples`] rewrites them with a fresh per-document scope: `_:b0` in two
//! answers becomes two distinct nodes, while repeated `_:b0` in one answer stays one.

use crate::core::{RdfTerm, Triple};
use crate::error::Result;
use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::vocab::xsd;
use oxigraph::model::{NamedOrBlankNode, Term};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// RDF serializations accepted for CONSTRUCT/DESCRIBE responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RdfSerialization {
    NTriples,
    Turtle,
    RdfXml,
    NQuads,
    #[serde(rename = "trig")]
    TriG,
}

impl RdfSerialization {
    pub fn from_string(format: &str) -> Option<RdfSerialization> {
        match format.to_lowercase().as_str() {
            "ntriples" | "n-triples" | "nt" => Some(RdfSerialization::NTriples),
            "turtle" | "ttl" => Some(RdfSerialization::Turtle),
            "rdfxml" | "rdf-xml" | "rdf" | "xml" => Some(RdfSerialization::RdfXml),
            "nquads" | "n-quads" | "nq" => Some(RdfSerialization::NQuads),
            "trig" => Some(RdfSerialization::TriG),
            _ => None,
        }
    }

    /// Value sent in the `Accept` header
    pub fn media_type(&self) -> &'static str {
        match self {
            RdfSerialization::NTriples => "application/n-triples",
            RdfSerialization::Turtle => "text/turtle",
            RdfSerialization::RdfXml => "application/rdf+xml",
            RdfSerialization::NQuads => "application/n-quads",
            RdfSerialization::TriG => "application/trig",
        }
    }

    fn rdf_format(&self) -> RdfFormat {
        match self {
            RdfSerialization::NTriples => RdfFormat::NTriples,
            RdfSerialization::Turtle => RdfFormat::Turtle,
            RdfSerialization::RdfXml => RdfFormat::RdfXml,
            RdfSerialization::NQuads => RdfFormat::NQuads,
            RdfSerialization::TriG => RdfFormat::TriG,
        }
    }
}

/// Parse a whole RDF document. The first syntax error aborts parsing.
pub fn parse_triples(text: &str, format: RdfSerialization) -> Result<Vec<Triple>> {
    let parser = RdfParser::from_format(format.rdf_format()).for_reader(text.as_bytes());
    let scope = Uuid::new_v4().simple().to_string();
    let mut triples = Vec::new();
    for quad in parser {
        let quad = quad?;
        triples.push(Triple::new(
            subject_id(&quad.subject, &scope),
            quad.predicate.as_str(),
            object_term(quad.object, &scope),
        ));
    }
    Ok(triples)
}

fn scoped_label(scope: &str, label: &str) -> String {
    format!("{}_{}", scope, label)
}

fn subject_id(subject: &NamedOrBlankNode, scope: &str) -> String {
    match subject {
        NamedOrBlankNode::NamedNode(node) => node.as_str().to_string(),
        NamedOrBlankNode::BlankNode(node) => format!("_:{}", scoped_label(scope, node.as_str())),
    }
}

fn object_term(object: Term, scope: &str) -> RdfTerm {
    match object {
        Term::NamedNode(node) => RdfTerm::uri(node.into_string()),
        Term::BlankNode(node) => RdfTerm::bnode(scoped_label(scope, node.as_str())),
        Term::Literal(literal) => {
            let mut term = RdfTerm::literal(literal.value());
            term.language = literal.language().map(str::to_string);
            if term.language.is_none() && literal.datatype() != xsd::STRING {
                term.datatype = Some(literal.datatype().as_str().to_string());
            }
            term
        }
        #[allow(unreachable_patterns)]
        other => RdfTerm::literal(other.to_string()),
    }
}
