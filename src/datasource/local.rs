//! In-process data source

use super::{notify, DataSet, DataSource, QueryStatus, StatusCallback, TabularResult};
use crate::config::{BuilderConfig, SourceConfig};
use crate::core::{RdfTerm, Triple};
use crate::error::{Error, Result};
use crate::graph::{BuildReport, Graph, GraphBuilder};
use crate::parsing::query_type::{QueryType, QueryTypeParser};
use crate::parsing::rdf_parser;
use crate::repository::{Repository, Row, SparqlRepository};
use crate::schema::Schema;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

pub struct LocalDataSource {
    repository: Arc<dyn Repository>,
    schema: Schema,
    builder: BuilderConfig,
    query_types: QueryTypeParser,
}

impl LocalDataSource {
    pub fn new(config: &SourceConfig, schema: Schema) -> Result<Self> {
        let repository = SparqlRepository::new(config)?;
        Self::with_repository(Arc::new(repository), schema, config.builder)
    }

    pub fn with_repository(
        repository: Arc<dyn Repository>,
        schema: Schema,
        builder: BuilderConfig,
    ) -> Result<Self> {
        let query_types =
            QueryTypeParser::new().map_err(|e| Error::Config(format!("Invalid pattern: {}", e)))?;
        Ok(LocalDataSource { repository, schema, builder, query_types })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn query_type(&self, sparql: &str) -> Result<QueryType> {
        self.query_types.parse(sparql)
    }

    /// Same as [`DataSource::add_information`], also returning the build counters.
    pub async fn add_information_with_report(
        &self,
        graph: &mut Graph,
        sparql: &str,
        status: Option<StatusCallback>,
    ) -> Result<BuildReport> {
        let query_type = self.query_type(sparql)?;
        if !query_type.yields_graph() {
            return Err(Error::UnsupportedQuery(format!(
                "{} queries cannot add information to a graph",
                query_type
            )));
        }

        let triples = self.fetch_triples(query_type, sparql, status.as_ref()).await?;
        let existing = std::mem::take(graph);
        let (extended, report) = self.build(existing, triples);
        *graph = extended;
        Ok(report)
    }

    async fn fetch_triples(
        &self,
        query_type: QueryType,
        sparql: &str,
        status: Option<&StatusCallback>,
    ) -> Result<Vec<Triple>> {
        notify(status, QueryStatus::LoadingData);
        let document = match query_type {
            QueryType::Describe => self.repository.describe(sparql).await?,
            _ => self.repository.construct(sparql).await?,
        };

        notify(status, QueryStatus::ProcessingData);
        rdf_parser::parse_triples(&document, self.repository.rdf_format())
    }

    fn build(&self, graph: Graph, triples: Vec<Triple>) -> (Graph, BuildReport) {
        let mut builder = GraphBuilder::extend(&self.schema, graph).with_config(self.builder);
        builder.add_triples(triples);
        let (graph, report) = builder.finish();
        info!(
            "Graph built: {} node(s), {} edge(s); {} unclassified, {} dropped",
            graph.node_count(),
            graph.edge_count(),
            report.unclassified,
            report.dropped
        );
        (graph, report)
    }
}

#[async_trait]
impl DataSource for LocalDataSource {
    async fn get_for_sparql(
        &self,
        sparql: &str,
        status: Option<StatusCallback>,
    ) -> Result<DataSet> {
        let query_type = self.query_type(sparql)?;

        match query_type {
            QueryType::Select => {
                notify(status.as_ref(), QueryStatus::LoadingData);
                let response = self.repository.select(sparql).await?;
                let tabular = TabularResult { headers: response.headers, data: response.bindings };
                Ok(DataSet::from_tabular(self.schema.clone(), tabular))
            }
            QueryType::Ask => {
                notify(status.as_ref(), QueryStatus::LoadingData);
                let answer = self.repository.ask(sparql).await?;
                let mut term = RdfTerm::literal(answer.to_string());
                term.datatype = Some(XSD_BOOLEAN.to_string());
                let mut row = Row::new();
                row.insert("boolean".to_string(), term);
                let tabular = TabularResult { headers: vec!["boolean".to_string()], data: vec![row] };
                Ok(DataSet::from_tabular(self.schema.clone(), tabular))
            }
            QueryType::Construct | QueryType::Describe => {
                let triples = self.fetch_triples(query_type, sparql, status.as_ref()).await?;
                let (graph, _) = self.build(Graph::new(), triples);
                Ok(DataSet::from_graph(self.schema.clone(), graph))
            }
        }
    }

    async fn add_information(
        &self,
        graph: &mut Graph,
        sparql: &str,
        status: Option<StatusCallback>,
    ) -> Result<()> {
        self.add_information_with_report(graph, sparql, status).await.map(|_| ())
    }
}
