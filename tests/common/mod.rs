//! Shared fixtures: a schema and an in-process SPARQL endpoint served by axum.
//!
//! The endpoint decides what to answer from the query text:
//! - `FAIL500` anywhere: HTTP 500 with body `boom`
//! - `SLOW` anywhere: answers after three seconds
//! - `SELECT` with `ECHO`: one row whose `q` binding is the received query
//! - `SELECT`: two cats, the second without a name
//! - `ASK`: `true`
//! - `CONSTRUCT`/`DESCRIBE` with `MORE`: Spike the dog guarding Tom, Tom is also a Pet
//! - `CONSTRUCT`/`DESCRIBE`: Tom and Jerry, edge triple first
//!
//! SELECT/ASK require `Accept: application/sparql-results+json` and graph queries
//! require `Accept: application/n-triples`, otherwise the endpoint answers 406.

#![allow(dead_code)]

use axum::extract::Query;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::get;
use axum::Router;
use serde_json::json;
use sparql_graph::core::{RdfTerm, Triple};
use sparql_graph::schema::Schema;
use std::collections::HashMap;
use std::time::Duration;

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const EX: &str = "http://example.org/";

pub fn ex(local: &str) -> String {
    format!("{}{}", EX, local)
}

pub fn schema() -> Schema {
    Schema::new([RDF_TYPE.to_string()], [ex("smarterThan"), ex("guards")], [RDFS_LABEL.to_string()])
}

pub fn node_triple(subject: &str, class: &str) -> Triple {
    Triple::new(ex(subject), RDF_TYPE, RdfTerm::uri(ex(class)))
}

pub fn edge_triple(subject: &str, predicate: &str, object: &str) -> Triple {
    Triple::new(ex(subject), ex(predicate), RdfTerm::uri(ex(object)))
}

pub fn label_triple(subject: &str, label: &str) -> Triple {
    Triple::new(ex(subject), RDFS_LABEL, RdfTerm::literal(label))
}

pub const TOM_AND_JERRY_NT: &str = r#"<http://example.org/Jerry> <http://example.org/smarterThan> <http://example.org/Tom> .
<http://example.org/Tom> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://example.org/Cat> .
<http://example.org/Jerry> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://example.org/Mouse> .
<http://example.org/Tom> <http://www.w3.org/2000/01/rdf-schema#label> "Tom" .
<http://example.org/Tom> <http://example.org/unknown> "ignored" .
"#;

pub const MORE_NT: &str = r#"<http://example.org/Spike> <http://example.org/guards> <http://example.org/Tom> .
<http://example.org/Spike> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://example.org/Dog> .
<http://example.org/Tom> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://example.org/Pet> .
"#;

type Answer = (StatusCode, [(header::HeaderName, &'static str); 1], String);

fn answer(status: StatusCode, content_type: &'static str, body: String) -> Answer {
    (status, [(header::CONTENT_TYPE, content_type)], body)
}

async fn sparql(Query(params): Query<HashMap<String, String>>, headers: HeaderMap) -> Answer {
    let query = params.get("query").cloned().unwrap_or_default();
    let accept = headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    if query.contains("FAIL500") {
        return answer(StatusCode::INTERNAL_SERVER_ERROR, "text/plain", "boom".to_string());
    }
    if query.contains("SLOW") {
        tokio::time::sleep(Duration::from_secs(3)).await;
    }

    let upper = query.to_uppercase();
    if upper.contains("SELECT") || upper.contains("ASK") {
        if accept != "application/sparql-results+json" {
            return answer(StatusCode::NOT_ACCEPTABLE, "text/plain", accept);
        }
        let body = if upper.contains("ASK") {
            json!({"head": {}, "boolean": true})
        } else if query.contains("ECHO") {
            json!({
                "head": {"vars": ["q"]},
                "results": {"bindings": [{"q": {"type": "literal", "value": query}}]}
            })
        } else {
            json!({
                "head": {"vars": ["cat", "name"]},
                "results": {"bindings": [
                    {"cat": {"type": "uri", "value": ex("Tom")}, "name": {"type": "literal", "value": "Tom"}},
                    {"cat": {"type": "uri", "value": ex("Felix")}}
                ]}
            })
        };
        return answer(StatusCode::OK, "application/sparql-results+json", body.to_string());
    }

    if accept != "application/n-triples" {
        return answer(StatusCode::NOT_ACCEPTABLE, "text/plain", accept);
    }
    let body = if query.contains("MORE") { MORE_NT } else { TOM_AND_JERRY_NT };
    answer(StatusCode::OK, "application/n-triples", body.to_string())
}

/// Start the fake endpoint on an ephemeral port and return its URL.
pub async fn spawn_endpoint() -> String {
    let app = Router::new().route("/sparql", get(sparql));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/sparql", address)
}

/// URL of a port nothing listens on.
pub fn closed_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/sparql", address)
}
