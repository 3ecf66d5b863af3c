//! Graph construction scenarios
//!
//! Covers classification priority, forward references, attribute promotion and the
//! behaviour for triples whose nodes never appear.

mod common;

use common::*;
use sparql_graph::config::BuilderConfig;
use sparql_graph::core::{RdfTerm, Triple};
use sparql_graph::graph::{AttributeValue, Graph, GraphBuilder};
use sparql_graph::schema::Schema;

fn tom_and_jerry() -> Vec<Triple> {
    vec![
        node_triple("Tom", "Cat"),
        node_triple("Jerry", "Mouse"),
        edge_triple("Jerry", "smarterThan", "Tom"),
    ]
}

fn permutations(items: &[Triple]) -> Vec<Vec<Triple>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut result = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let first = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, first.clone());
            result.push(tail);
        }
    }
    result
}

fn assert_tom_and_jerry(graph: &Graph) {
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(
        graph.node_attribute(&ex("Tom"), RDF_TYPE).and_then(AttributeValue::as_single),
        Some(ex("Cat").as_str())
    );
    assert_eq!(
        graph.node_attribute(&ex("Jerry"), RDF_TYPE).and_then(AttributeValue::as_single),
        Some(ex("Mouse").as_str())
    );

    let edges = graph.edges_between(&ex("Jerry"), &ex("Tom"));
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].attributes.predicate, ex("smarterThan"));
}

#[test]
fn test_nodes_before_edge() {
    let schema = schema();
    let graph = GraphBuilder::build(&schema, tom_and_jerry());
    assert_tom_and_jerry(&graph);
}

#[test]
fn test_edge_before_its_nodes() {
    let schema = schema();
    let mut builder = GraphBuilder::new(&schema);
    builder.add_triples(vec![
        edge_triple("Jerry", "smarterThan", "Tom"),
        node_triple("Tom", "Cat"),
        node_triple("Jerry", "Mouse"),
    ]);
    assert_eq!(builder.pending(), 1);

    let (graph, report) = builder.finish();
    assert_tom_and_jerry(&graph);
    assert_eq!(report.deferred, 1);
    assert_eq!(report.resolved_on_retry, 1);
    assert_eq!(report.dropped, 0);
    assert_eq!(report.retry_passes, 1);
}

#[test]
fn test_every_input_order_builds_the_same_graph() {
    let schema = schema();
    let mut input = tom_and_jerry();
    input.push(label_triple("Tom", "Tom"));

    let expected = GraphBuilder::build(&schema, input.clone());
    for order in permutations(&input) {
        let graph = GraphBuilder::build(&schema, order.clone());
        assert_eq!(graph.edge_signatures(), expected.edge_signatures(), "order: {:?}", order);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(
            graph.node_attribute(&ex("Tom"), RDFS_LABEL).and_then(AttributeValue::as_single),
            Some("Tom")
        );
    }
}

#[test]
fn test_second_type_promotes_to_list() {
    let schema = schema();
    let graph = GraphBuilder::build(&schema, vec![node_triple("Tom", "Cat"), node_triple("Tom", "Pet")]);

    assert_eq!(graph.node_count(), 1);
    let types = graph.node_attribute(&ex("Tom"), RDF_TYPE).unwrap();
    assert_eq!(types.values(), vec![ex("Cat").as_str(), ex("Pet").as_str()]);
    assert!(matches!(types, AttributeValue::List(_)));
}

#[test]
fn test_attribute_values_promote_in_arrival_order() {
    let schema = schema();
    let graph = GraphBuilder::build(
        &schema,
        vec![
            node_triple("Tom", "Cat"),
            label_triple("Tom", "Tom"),
            label_triple("Tom", "Thomas"),
            label_triple("Tom", "Tommy"),
        ],
    );

    let labels = graph.node_attribute(&ex("Tom"), RDFS_LABEL).unwrap();
    assert_eq!(labels.values(), vec!["Tom", "Thomas", "Tommy"]);
}

#[test]
fn test_attribute_before_node_is_kept() {
    let schema = schema();
    let graph = GraphBuilder::build(&schema, vec![label_triple("Tom", "Tom"), node_triple("Tom", "Cat")]);

    assert_eq!(
        graph.node_attribute(&ex("Tom"), RDFS_LABEL).and_then(AttributeValue::as_single),
        Some("Tom")
    );
}

#[test]
fn test_edge_to_unknown_node_is_dropped() {
    let schema = schema();
    let mut builder = GraphBuilder::new(&schema);
    builder.add_triples(vec![node_triple("Jerry", "Mouse"), edge_triple("Jerry", "smarterThan", "Spike")]);
    let (graph, report) = builder.finish();

    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.edge_count(), 0);
    assert!(!graph.has_node(&ex("Spike")));
    assert_eq!(report.dropped, 1);
}

#[test]
fn test_attribute_of_unknown_node_is_dropped() {
    let schema = schema();
    let mut builder = GraphBuilder::new(&schema);
    builder.add_triple(label_triple("Ghost", "Boo"));
    let (graph, report) = builder.finish();

    assert!(graph.is_empty());
    assert_eq!(report.dropped, 1);
}

#[test]
fn test_unclassified_predicates_are_ignored() {
    let schema = schema();
    let mut builder = GraphBuilder::new(&schema);
    builder.add_triples(vec![
        node_triple("Tom", "Cat"),
        Triple::new(ex("Tom"), ex("unknown"), RdfTerm::literal("x")),
    ]);
    let (graph, report) = builder.finish();

    assert_eq!(graph.node_count(), 1);
    assert!(graph.node_attribute(&ex("Tom"), &ex("unknown")).is_none());
    assert_eq!(report.unclassified, 1);
}

#[test]
fn test_node_predicate_wins_over_edge_predicate() {
    let schema = Schema::new([RDF_TYPE.to_string()], [RDF_TYPE.to_string()], Vec::<String>::new());
    let graph = GraphBuilder::build(&schema, vec![node_triple("Tom", "Cat")]);

    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.edge_count(), 0);
    assert!(!graph.has_node(&ex("Cat")));
}

#[test]
fn test_literal_node_value_keeps_lexical_form() {
    let schema = Schema::new([ex("name")], Vec::<String>::new(), Vec::<String>::new());
    let graph = GraphBuilder::build(&schema, vec![Triple::new(ex("Tom"), ex("name"), RdfTerm::literal("Tom"))]);

    assert_eq!(graph.node_attribute(&ex("Tom"), &ex("name")).and_then(AttributeValue::as_single), Some("Tom"));
}

#[test]
fn test_parallel_edges_get_distinct_keys() {
    let schema = schema();
    let mut input = tom_and_jerry();
    input.push(edge_triple("Jerry", "smarterThan", "Tom"));
    let graph = GraphBuilder::build(&schema, input);

    let edges = graph.edges_between(&ex("Jerry"), &ex("Tom"));
    assert_eq!(edges.len(), 2);
    assert_ne!(edges[0].key, edges[1].key);
}

#[test]
fn test_zero_retry_passes_drops_forward_references() {
    let schema = Schema::new([RDF_TYPE.to_string()], [ex("guards")], [RDFS_LABEL.to_string()]);
    let input = vec![
        edge_triple("Spike", "guards", "Tom"),
        label_triple("Spike", "Spike"),
        node_triple("Spike", "Dog"),
        node_triple("Tom", "Cat"),
    ];

    let mut builder = GraphBuilder::new(&schema).with_config(BuilderConfig { max_retry_passes: 1 });
    builder.add_triples(input.clone());
    let (graph, report) = builder.finish();
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(report.resolved_on_retry, 2);
    assert_eq!(report.dropped, 0);

    let mut builder = GraphBuilder::new(&schema).with_config(BuilderConfig { max_retry_passes: 0 });
    builder.add_triples(input);
    let (graph, report) = builder.finish();
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(report.dropped, 2);
    assert_eq!(report.retry_passes, 0);
}

#[test]
fn test_retry_stops_when_nothing_resolves() {
    let schema = schema();
    let mut builder = GraphBuilder::new(&schema).with_config(BuilderConfig { max_retry_passes: 10 });
    builder.add_triples(vec![
        edge_triple("Jerry", "smarterThan", "Tom"),
        label_triple("Ghost", "Boo"),
    ]);
    let (_, report) = builder.finish();

    assert_eq!(report.retry_passes, 1);
    assert_eq!(report.dropped, 2);
}

#[test]
fn test_extend_existing_graph() {
    let schema = schema();
    let graph = GraphBuilder::build(&schema, tom_and_jerry());

    let mut builder = GraphBuilder::extend(&schema, graph);
    builder.add_triples(vec![
        edge_triple("Spike", "guards", "Tom"),
        node_triple("Spike", "Dog"),
        node_triple("Tom", "Pet"),
    ]);
    let (graph, report) = builder.finish();

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(report.nodes_created, 1);
    assert_eq!(graph.node_attribute(&ex("Tom"), RDF_TYPE).unwrap().len(), 2);
    assert_eq!(graph.in_edges(&ex("Tom")).len(), 2);
}
