//! Background side of the worker channel.
//!
//! The background context waits for exactly one `init` message, builds a
//! [`WorkerSession`] from it and then runs `query` messages one at a time in arrival
//! order. While a query runs, the inbox is still read so that a `cancel` for the
//! running query can abandon it and later messages are queued.

use super::protocol::{self, InitPayload, WorkerRequest, WorkerResponse};
use crate::datasource::{DataSet, DataSource, LocalDataSource, SerializedDataSet, StatusCallback};
use crate::error::Result;
use crate::graph::SerializedGraph;
use log::{debug, error, warn};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

struct QueryJob {
    id: u64,
    sparql: String,
    old_graph: Option<SerializedGraph>,
}

/// State created by `init`; owned by the background loop for the channel's lifetime.
pub struct WorkerSession {
    source: LocalDataSource,
}

impl WorkerSession {
    pub fn init(payload: &InitPayload) -> Result<Self> {
        let config = payload.source_config();
        let source = LocalDataSource::new(&config, payload.schema.clone())?;
        debug!("Worker session initialised for {}", config.endpoint);
        Ok(WorkerSession { source })
    }

    /// Process queries until the foreground hangs up.
    async fn serve(
        &self,
        requests: &mut UnboundedReceiver<String>,
        responses: &UnboundedSender<String>,
    ) {
        let mut queue: VecDeque<QueryJob> = VecDeque::new();
        let mut cancelled: HashSet<u64> = HashSet::new();

        loop {
            let Some(job) = queue.pop_front() else {
                match requests.recv().await {
                    Some(text) => accept(&text, &mut queue, &mut cancelled),
                    None => return,
                }
                continue;
            };

            if cancelled.remove(&job.id) {
                debug!("Skipping cancelled query {}", job.id);
                continue;
            }

            let id = job.id;
            let run = self.execute(job, responses);
            tokio::pin!(run);

            loop {
                tokio::select! {
                    outcome = &mut run => {
                        let message = match outcome {
                            Ok(dataset) => WorkerResponse::Result { id, dataset },
                            Err(e) => WorkerResponse::failure(id, &e),
                        };
                        send(responses, &message);
                        break;
                    }
                    incoming = requests.recv() => match incoming {
                        Some(text) => {
                            if is_cancel_for(&text, id) {
                                debug!("Abandoning running query {}", id);
                                break;
                            }
                            accept(&text, &mut queue, &mut cancelled);
                        }
                        // Nobody is listening for the result any more.
                        None => return,
                    },
                }
            }
        }
    }

    async fn execute(
        &self,
        job: QueryJob,
        responses: &UnboundedSender<String>,
    ) -> Result<SerializedDataSet> {
        let id = job.id;
        let progress = responses.clone();
        let status: StatusCallback = Arc::new(move |status| {
            send(&progress, &WorkerResponse::Progress { id, status: status.code() });
        });

        match job.old_graph {
            None => {
                let dataset = self.source.get_for_sparql(&job.sparql, Some(status)).await?;
                Ok(dataset.serialize())
            }
            Some(old_graph) => {
                let mut graph = old_graph.hydrate()?;
                self.source.add_information(&mut graph, &job.sparql, Some(status)).await?;
                Ok(DataSet::from_graph(self.source.schema().clone(), graph).serialize())
            }
        }
    }
}

/// Entry point of the background thread.
pub(crate) async fn run_worker(
    mut requests: UnboundedReceiver<String>,
    responses: UnboundedSender<String>,
) {
    let session = loop {
        let Some(text) = requests.recv().await else {
            return;
        };
        match protocol::decode_request(&text) {
            Ok(WorkerRequest::Init { payload }) => match WorkerSession::init(&payload) {
                Ok(session) => break session,
                Err(e) => {
                    error!("Worker initialisation failed: {}", e);
                    reject_all(&mut requests, &responses, &e.to_string()).await;
                    return;
                }
            },
            Ok(_) => warn!("Ignoring worker message received before init"),
            Err(e) => warn!("Ignoring malformed worker message: {}", e),
        }
    };

    session.serve(&mut requests, &responses).await;

    // The inbox goes first so that a foreground seeing the closed outbox can no
    // longer enqueue anything.
    drop(requests);
    drop(responses);
    debug!("Worker stopped");
}

/// Answer every query with the initialisation failure until the foreground hangs up.
async fn reject_all(
    requests: &mut UnboundedReceiver<String>,
    responses: &UnboundedSender<String>,
    reason: &str,
) {
    while let Some(text) = requests.recv().await {
        if let Ok(WorkerRequest::Query { id, .. }) = protocol::decode_request(&text) {
            let error = format!("Worker initialisation failed: {}", reason);
            send(responses, &WorkerResponse::Error { id, error, http: None });
        }
    }
}

fn accept(text: &str, queue: &mut VecDeque<QueryJob>, cancelled: &mut HashSet<u64>) {
    match protocol::decode_request(text) {
        Ok(WorkerRequest::Query { id, payload, old_graph }) => {
            queue.push_back(QueryJob { id, sparql: payload, old_graph });
        }
        Ok(WorkerRequest::Cancel { id }) => {
            if queue.iter().any(|job| job.id == id) {
                cancelled.insert(id);
            }
        }
        Ok(WorkerRequest::Init { .. }) => warn!("Ignoring repeated init message"),
        Err(e) => warn!("Ignoring malformed worker message: {}", e),
    }
}

fn is_cancel_for(text: &str, running: u64) -> bool {
    matches!(protocol::decode_request(text), Ok(WorkerRequest::Cancel { id }) if id == running)
}

fn send(responses: &UnboundedSender<String>, message: &WorkerResponse) {
    match protocol::encode(message) {
        Ok(text) => {
            if responses.send(text).is_err() {
                debug!("Foreground gone, dropping message for query {}", message.id());
            }
        }
        Err(e) => error!("Failed to encode worker response: {}", e),
    }
}
