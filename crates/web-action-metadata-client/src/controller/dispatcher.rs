//! Last-trigger-wins dispatcher for the fetch operations.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::{AbortHandle, JoinHandle};

use crate::config::ClientConfig;
use crate::store::StateContainer;
use crate::transport::Fetcher;
use crate::types::{Event, Operation, SuccessData};

use super::process::run_operation;

/// Latest trigger of one operation.
#[derive(Default)]
struct InFlight {
    generation: u64,
    abort: Option<AbortHandle>,
}

impl InFlight {
    /// Mark the run `generation` as finished. Returns false when a newer
    /// trigger has replaced it, in which case the slot is left untouched.
    fn settle(&mut self, generation: u64) -> bool {
        if self.generation != generation {
            return false;
        }
        self.abort = None;
        true
    }
}

/// Runs operations against a fetcher and publishes their events to a store.
///
/// A new trigger for an operation supersedes any earlier run of that same
/// operation: the earlier task is aborted, and should it still finish, its
/// result is discarded because its generation is no longer current.
/// Different operations never affect each other.
pub struct FetchDispatchController {
    fetcher: Arc<dyn Fetcher>,
    store: Arc<StateContainer>,
    actions_path: String,
    metadata_path: String,
    inflight: Arc<Mutex<HashMap<Operation, InFlight>>>,
}

impl FetchDispatchController {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        store: Arc<StateContainer>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            fetcher,
            store,
            actions_path: config.actions_path.clone(),
            metadata_path: config.metadata_path.clone(),
            inflight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn store(&self) -> &Arc<StateContainer> {
        &self.store
    }

    fn path_for(&self, operation: Operation) -> &str {
        match operation {
            Operation::Actions => &self.actions_path,
            Operation::Metadata => &self.metadata_path,
        }
    }

    /// Accept an event from outside. Triggers start their operation; any
    /// other event is handed to the store as-is.
    pub async fn dispatch(&self, event: Event) -> Option<JoinHandle<()>> {
        match event {
            Event::Requested { operation } => Some(self.trigger(operation).await),
            other => {
                self.store.publish(other);
                None
            }
        }
    }

    /// Start a run of `operation`, cancelling any run already in flight.
    ///
    /// `Loading` is published before this returns. The returned handle
    /// completes once the run has published its outcome or been superseded.
    pub async fn trigger(&self, operation: Operation) -> JoinHandle<()> {
        let mut inflight = self.inflight.lock().await;
        let slot = inflight.entry(operation).or_default();

        slot.generation += 1;
        let generation = slot.generation;
        if let Some(previous) = slot.abort.take() {
            previous.abort();
            tracing::debug!("Cancelled {operation} run {}", generation - 1);
        }

        tracing::info!("Starting {operation} run {generation}");
        self.store.publish(Event::requested(operation));
        self.store.publish(Event::loading(operation));

        let fetcher = Arc::clone(&self.fetcher);
        let store = Arc::clone(&self.store);
        let registry = Arc::clone(&self.inflight);
        let path = self.path_for(operation).to_string();

        let handle = tokio::spawn(async move {
            let event = match run_operation(fetcher.as_ref(), operation, &path).await {
                Ok(result) => {
                    tracing::info!(
                        "{operation} run {generation} succeeded with {} entries",
                        entry_count(&result)
                    );
                    Event::succeeded(operation, result)
                }
                Err(e) => {
                    tracing::warn!("{operation} run {generation} failed: {e}");
                    Event::failed(operation, &e)
                }
            };

            // The abort in `trigger` normally cancels a superseded run before
            // it gets here. This check covers a run that finished anyway.
            let mut inflight = registry.lock().await;
            let current = inflight
                .get_mut(&operation)
                .is_some_and(|slot| slot.settle(generation));
            if current {
                store.publish(event);
            } else {
                tracing::debug!("Discarding stale {operation} run {generation}");
            }
        });

        slot.abort = Some(handle.abort_handle());
        handle
    }

    /// Generation of the most recent trigger of `operation` (0 if never run).
    pub async fn generation(&self, operation: Operation) -> u64 {
        self.inflight
            .lock()
            .await
            .get(&operation)
            .map(|slot| slot.generation)
            .unwrap_or(0)
    }
}

fn entry_count(result: &SuccessData) -> usize {
    match result {
        SuccessData::Metadata { metadata } => metadata.len(),
        SuccessData::Actions { data } => data.len(),
    }
}
