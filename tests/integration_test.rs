//! Integration tests for sparql-graph
//!
//! These tests exercise configuration loading, the RDF parser and the graph
//! builder together, and the serialized form that crosses the worker boundary.

mod common;

use common::*;
use sparql_graph::config::SourceConfig;
use sparql_graph::datasource::{DataSet, SerializedDataSet};
use sparql_graph::graph::{AttributeValue, GraphBuilder, SerializedGraph};
use sparql_graph::parsing::{parse_triples, RdfSerialization};
use sparql_graph::schema::Schema;
use sparql_graph::{Error, HttpError, WorkerError};

#[test]
fn test_error_types() {
    let http_error = Error::from(HttpError::new(404, "Not Found", ""));
    assert!(format!("{}", http_error).contains("HTTP error 404"));

    let parse_error = Error::Parse("test".to_string());
    assert!(format!("{}", parse_error).contains("Parse error"));

    let unsupported = Error::UnsupportedQuery("test".to_string());
    assert!(format!("{}", unsupported).contains("Unsupported query"));

    let worker_error = Error::from(WorkerError::Timeout(7));
    assert!(format!("{}", worker_error).contains("timed out"));
}

#[test]
fn test_schema_document_drives_the_build() {
    let schema = Schema::from_json_str(
        r#"{
            "nodePredicates": ["http://www.w3.org/1999/02/22-rdf-syntax-ns#type"],
            "edgePredicates": ["http://example.org/smarterThan"],
            "nodeAttributePredicates": ["http://www.w3.org/2000/01/rdf-schema#label"]
        }"#,
    )
    .unwrap();

    let triples = parse_triples(TOM_AND_JERRY_NT, RdfSerialization::NTriples).unwrap();
    let graph = GraphBuilder::build(&schema, triples);

    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(
        graph.node_attribute(&ex("Tom"), RDFS_LABEL).and_then(AttributeValue::as_single),
        Some("Tom")
    );
    assert!(graph.node_attribute(&ex("Tom"), &ex("unknown")).is_none());
}

#[test]
fn test_turtle_input() {
    let turtle = r#"
        @prefix ex: <http://example.org/> .
        @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
        ex:Jerry ex:smarterThan ex:Tom ; a ex:Mouse .
        ex:Tom a ex:Cat ; rdfs:label "Tom"@en .
    "#;
    let triples = parse_triples(turtle, RdfSerialization::Turtle).unwrap();
    let graph = GraphBuilder::build(&schema(), triples);

    assert_eq!(graph.edge_signatures(), vec![(ex("Jerry"), ex("smarterThan"), ex("Tom"))]);
    assert_eq!(
        graph.node_attribute(&ex("Tom"), RDFS_LABEL).and_then(AttributeValue::as_single),
        Some("Tom")
    );
}

#[test]
fn test_serialized_graph_survives_json() {
    let schema = schema();
    let mut triples = parse_triples(TOM_AND_JERRY_NT, RdfSerialization::NTriples).unwrap();
    triples.extend(parse_triples(MORE_NT, RdfSerialization::NTriples).unwrap());
    let graph = GraphBuilder::build(&schema, triples);

    let json = serde_json::to_string(&graph.serialize()).unwrap();
    let restored = serde_json::from_str::<SerializedGraph>(&json).unwrap().hydrate().unwrap();

    assert_eq!(restored.serialize(), graph.serialize());
    assert_eq!(restored.edge_signatures(), graph.edge_signatures());
    for edge in graph.edges() {
        assert_eq!(restored.edge(edge.key).map(|e| (e.source, e.target)), Some((edge.source, edge.target)));
    }
    let types = restored.node_attribute(&ex("Tom"), RDF_TYPE).unwrap();
    assert_eq!(types.values(), vec![ex("Cat").as_str(), ex("Pet").as_str()]);
}

#[test]
fn test_serialized_dataset_omits_missing_half() {
    let graph = GraphBuilder::build(&schema(), vec![node_triple("Tom", "Cat")]);
    let dataset = DataSet::from_graph(schema(), graph);

    let value = serde_json::to_value(dataset.serialize()).unwrap();
    assert!(value.get("graph").is_some());
    assert!(value.get("tabular").is_none());

    let restored: SerializedDataSet = serde_json::from_value(value).unwrap();
    let restored = restored.hydrate().unwrap();
    assert_eq!(restored.schema, schema());
    assert_eq!(restored.graph.unwrap().node_count(), 1);
}

#[test]
fn test_source_config_document() {
    let config = SourceConfig::from_json_str(
        r#"{"endpoint": "https://dbpedia.org/sparql", "timeout_ms": 5000, "rdf_format": "turtle", "builder": {"max_retry_passes": 3}}"#,
    )
    .unwrap();

    assert_eq!(config.endpoint, "https://dbpedia.org/sparql");
    assert_eq!(config.timeout(), std::time::Duration::from_secs(5));
    assert_eq!(config.rdf_format, RdfSerialization::Turtle);
    assert_eq!(config.builder.max_retry_passes, 3);

    let err = SourceConfig::from_json_str(r#"{"endpoint": ""}"#).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
