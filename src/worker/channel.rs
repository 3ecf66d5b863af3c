//! Foreground side of the worker channel.
//!
//! Every call gets a fresh correlation id and an entry in the pending table. A router
//! task reads the worker's responses: `progress` messages invoke the entry's status
//! callback, `result` and `error` messages resolve it and remove it. Entries are also
//! removed when their caller times out, cancels or drops the call, and all of them are
//! rejected if the worker goes away.

use super::cancel::CancellationToken;
use super::protocol::{self, InitPayload, WorkerRequest, WorkerResponse};
use super::session;
use crate::config::{SourceConfig, WorkerOptions};
use crate::datasource::{DataSet, DataSource, QueryStatus, SerializedDataSet, StatusCallback};
use crate::error::{Error, Result, WorkerError};
use crate::graph::{Graph, SerializedGraph};
use crate::schema::Schema;
use async_trait::async_trait;
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;

type Reply = Result<SerializedDataSet>;

struct PendingEntry {
    reply: oneshot::Sender<Reply>,
    status: Option<StatusCallback>,
}

#[derive(Default)]
struct PendingTable {
    entries: HashMap<u64, PendingEntry>,
    closed: bool,
}

fn lock(table: &Mutex<PendingTable>) -> MutexGuard<'_, PendingTable> {
    table.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Data source whose work runs on a dedicated background thread
pub struct WorkerDataSource {
    requests: UnboundedSender<String>,
    pending: Arc<Mutex<PendingTable>>,
    next_id: AtomicU64,
    options: WorkerOptions,
    _thread: thread::JoinHandle<()>,
}

impl WorkerDataSource {
    /// Start the background worker and send it `init`.
    ///
    /// Must be called from within a tokio runtime: the response router is spawned on it.
    pub fn spawn(config: &SourceConfig, schema: Schema, options: WorkerOptions) -> Result<Self> {
        config.validate()?;
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::Config(format!("Worker channel needs a tokio runtime: {}", e)))?;

        let (request_tx, request_rx) = mpsc::unbounded_channel::<String>();
        let (response_tx, response_rx) = mpsc::unbounded_channel::<String>();

        let worker_thread = thread::Builder::new()
            .name("sparql-graph-worker".to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build()
                {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        log::error!("Failed to start worker runtime: {}", e);
                        return;
                    }
                };
                runtime.block_on(session::run_worker(request_rx, response_tx));
            })?;

        let init = protocol::encode(&WorkerRequest::Init { payload: InitPayload::new(config, schema) })?;
        request_tx.send(init).map_err(|_| WorkerError::Disconnected)?;

        let pending = Arc::new(Mutex::new(PendingTable::default()));
        runtime.spawn(route_responses(response_rx, Arc::clone(&pending)));

        Ok(WorkerDataSource {
            requests: request_tx,
            pending,
            next_id: AtomicU64::new(1),
            options,
            _thread: worker_thread,
        })
    }

    /// Number of calls still waiting for their terminal message
    pub fn pending_count(&self) -> usize {
        lock(&self.pending).entries.len()
    }

    /// [`DataSource::get_for_sparql`] that gives up when `cancel` fires.
    pub async fn get_for_sparql_cancellable(
        &self,
        sparql: &str,
        status: Option<StatusCallback>,
        cancel: &CancellationToken,
    ) -> Result<DataSet> {
        let dataset = self.round_trip(sparql, None, status, Some(cancel)).await?;
        dataset.hydrate()
    }

    /// [`DataSource::add_information`] that gives up when `cancel` fires.
    pub async fn add_information_cancellable(
        &self,
        graph: &mut Graph,
        sparql: &str,
        status: Option<StatusCallback>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.extend_graph(graph, sparql, status, Some(cancel)).await
    }

    async fn extend_graph(
        &self,
        graph: &mut Graph,
        sparql: &str,
        status: Option<StatusCallback>,
        cancel: Option<&CancellationToken>,
    ) -> Result<()> {
        let old_graph = graph.serialize();
        let dataset = self.round_trip(sparql, Some(old_graph), status, cancel).await?;
        let extended = dataset
            .graph
            .ok_or_else(|| WorkerError::Protocol("add_information answer has no graph".to_string()))?
            .hydrate()?;
        *graph = extended;
        Ok(())
    }

    async fn round_trip(
        &self,
        sparql: &str,
        old_graph: Option<SerializedGraph>,
        status: Option<StatusCallback>,
        cancel: Option<&CancellationToken>,
    ) -> Result<SerializedDataSet> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (reply_tx, reply_rx) = oneshot::channel();

        {
            let mut table = lock(&self.pending);
            if table.closed {
                return Err(WorkerError::Disconnected.into());
            }
            table.entries.insert(id, PendingEntry { reply: reply_tx, status });
        }
        let mut guard = PendingGuard { id, pending: &self.pending, requests: &self.requests, armed: true };

        let message = protocol::encode(&WorkerRequest::Query {
            id,
            payload: sparql.to_string(),
            old_graph,
        })?;
        self.requests.send(message).map_err(|_| WorkerError::Disconnected)?;
        debug!("Worker query {} sent", id);

        let timeout = async {
            match self.options.query_timeout {
                Some(duration) => tokio::time::sleep(duration).await,
                None => std::future::pending::<()>().await,
            }
        };
        let cancelled = async {
            match cancel {
                Some(token) => token.cancelled().await,
                None => std::future::pending::<()>().await,
            }
        };

        let reply = tokio::select! {
            reply = reply_rx => {
                guard.armed = false;
                reply.unwrap_or_else(|_| Err(WorkerError::Disconnected.into()))
            }
            _ = timeout => Err(WorkerError::Timeout(id).into()),
            _ = cancelled => Err(WorkerError::Cancelled(id).into()),
        };
        drop(guard);

        reply
    }
}

#[async_trait]
impl DataSource for WorkerDataSource {
    async fn get_for_sparql(
        &self,
        sparql: &str,
        status: Option<StatusCallback>,
    ) -> Result<DataSet> {
        let dataset = self.round_trip(sparql, None, status, None).await?;
        dataset.hydrate()
    }

    async fn add_information(
        &self,
        graph: &mut Graph,
        sparql: &str,
        status: Option<StatusCallback>,
    ) -> Result<()> {
        self.extend_graph(graph, sparql, status, None).await
    }
}

/// Removes a pending entry whose caller stopped waiting and tells the worker to
/// abandon the query.
struct PendingGuard<'a> {
    id: u64,
    pending: &'a Mutex<PendingTable>,
    requests: &'a UnboundedSender<String>,
    armed: bool,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let removed = lock(self.pending).entries.remove(&self.id).is_some();
        if removed {
            debug!("Worker query {} abandoned by caller", self.id);
            if let Ok(message) = protocol::encode(&WorkerRequest::Cancel { id: self.id }) {
                let _ = self.requests.send(message);
            }
        }
    }
}

async fn route_responses(mut responses: UnboundedReceiver<String>, pending: Arc<Mutex<PendingTable>>) {
    while let Some(text) = responses.recv().await {
        match protocol::decode_response(&text) {
            Ok(message) => dispatch(&pending, message),
            Err(e) => warn!("Ignoring malformed worker response: {}", e),
        }
    }

    let orphans: Vec<PendingEntry> = {
        let mut table = lock(&pending);
        table.closed = true;
        table.entries.drain().map(|(_, entry)| entry).collect()
    };
    if !orphans.is_empty() {
        warn!("Worker channel closed with {} query(ies) in flight", orphans.len());
    }
    for entry in orphans {
        let _ = entry.reply.send(Err(WorkerError::Disconnected.into()));
    }
}

fn dispatch(pending: &Mutex<PendingTable>, message: WorkerResponse) {
    match message {
        WorkerResponse::Progress { id, status } => {
            let callback = lock(pending).entries.get(&id).and_then(|entry| entry.status.clone());
            match (callback, QueryStatus::from_code(status)) {
                (Some(callback), Some(status)) => callback(status),
                (_, None) => warn!("Unknown status code {} for query {}", status, id),
                (None, Some(_)) => {}
            }
        }
        WorkerResponse::Result { id, dataset } => resolve(pending, id, Ok(dataset)),
        WorkerResponse::Error { id, error, http } => {
            resolve(pending, id, Err(WorkerResponse::into_error(error, http)));
        }
    }
}

fn resolve(pending: &Mutex<PendingTable>, id: u64, reply: Reply) {
    let entry = lock(pending).entries.remove(&id);
    match entry {
        Some(entry) => {
            let _ = entry.reply.send(reply);
        }
        None => debug!("No pending query {} for terminal message", id),
    }
}
