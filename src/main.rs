//! sparql-graph command-line interface
//!
//! Runs one SPARQL query against an endpoint and prints what the pipeline built.
//!
//! Usage:
//!   cargo run -- --endpoint https://dbpedia.org/sparql --schema schema.json \
//!     --query "CONSTRUCT { ?s ?p ?o } WHERE { ?s ?p ?o } LIMIT 100" --worker

use clap::Parser;
use sparql_graph::config::{BuilderConfig, SourceConfig, WorkerOptions};
use sparql_graph::datasource::{DataSet, DataSource, LocalDataSource, QueryStatus, StatusCallback};
use sparql_graph::parsing::RdfSerialization;
use sparql_graph::schema::Schema;
use sparql_graph::worker::WorkerDataSource;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "sparql-graph")]
#[command(about = "Build a property graph or table from a SPARQL endpoint", long_about = None)]
struct Args {
    #[arg(short, long)]
    endpoint: String,

    /// JSON schema document with nodePredicates, edgePredicates and nodeAttributePredicates
    #[arg(short, long)]
    schema: String,

    #[arg(short, long, conflicts_with = "query_file")]
    query: Option<String>,

    #[arg(long)]
    query_file: Option<String>,

    #[arg(long, default_value = "60")]
    timeout_secs: u64,

    /// Serialization requested for CONSTRUCT/DESCRIBE answers
    #[arg(long, default_value = "ntriples")]
    rdf_format: String,

    #[arg(long, default_value = "1")]
    retry_passes: usize,

    /// Run the pipeline on the background worker
    #[arg(long)]
    worker: bool,

    /// Print the serialized data set instead of a summary
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let query = match (&args.query, &args.query_file) {
        (Some(query), _) => query.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => return Err("either --query or --query-file is required".into()),
    };
    let rdf_format = RdfSerialization::from_string(&args.rdf_format)
        .ok_or_else(|| format!("unsupported RDF format '{}'", args.rdf_format))?;

    let schema = Schema::from_path(&args.schema)?;
    let config = SourceConfig {
        endpoint: args.endpoint.clone(),
        rdf_format,
        builder: BuilderConfig { max_retry_passes: args.retry_passes },
        ..SourceConfig::default()
    }
    .with_timeout(Duration::from_secs(args.timeout_secs));
    config.validate()?;

    let source: Box<dyn DataSource> = if args.worker {
        Box::new(WorkerDataSource::spawn(&config, schema, WorkerOptions::default())?)
    } else {
        Box::new(LocalDataSource::new(&config, schema)?)
    };

    let started = Instant::now();
    let verbose = !args.json;
    let status: StatusCallback = Arc::new(move |status| {
        if verbose {
            match status {
                QueryStatus::LoadingData => println!("Loading data..."),
                QueryStatus::ProcessingData => println!("Processing data..."),
            }
        }
    });

    let dataset = match source.get_for_sparql(&query, Some(status)).await {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("Query failed: {}", e);
            std::process::exit(if e.is_transport() { 2 } else { 1 });
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&dataset.serialize())?);
    } else {
        print_summary(&dataset, started.elapsed());
    }

    Ok(())
}

fn print_summary(dataset: &DataSet, elapsed: Duration) {
    if let Some(graph) = &dataset.graph {
        println!("Graph: {} node(s), {} edge(s)", graph.node_count(), graph.edge_count());
    }
    if let Some(table) = &dataset.tabular {
        println!("Table: {} column(s), {} row(s)", table.headers.len(), table.data.len());
        println!("  Columns: {}", table.headers.join(", "));
    }
    println!("Done in {:.3} s", elapsed.as_secs_f64());
}
