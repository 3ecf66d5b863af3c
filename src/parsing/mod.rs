//! Query form detection and RDF document parsing

pub mod query_type;
pub mod rdf_parser;

pub use query_type::{QueryType, QueryTypeParser};
pub use rdf_parser::{parse_triples, RdfSerialization};
