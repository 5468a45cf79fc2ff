//! Single-writer state container with snapshot and event subscriptions.

use tokio::sync::{broadcast, watch};

use crate::types::Event;

use super::reducer::{reduce, Snapshot};

const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Holds the current snapshot and fans published events out to observers.
///
/// Snapshot subscribers always see the latest state; event subscribers see
/// every published event, and events are dropped when nobody listens.
pub struct StateContainer {
    state: watch::Sender<Snapshot>,
    events: broadcast::Sender<Event>,
}

impl StateContainer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Create a container whose event channel buffers `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        let (state, _) = watch::channel(Snapshot::default());
        let (events, _) = broadcast::channel(capacity);
        Self { state, events }
    }

    /// Fold an event into the snapshot and notify subscribers.
    pub fn publish(&self, event: Event) {
        self.state.send_modify(|snapshot| {
            *snapshot = reduce(snapshot, &event);
        });
        let _ = self.events.send(event);
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.state.borrow().clone()
    }

    /// Watch the snapshot for changes.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.state.subscribe()
    }

    /// Receive every event published from now on.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }
}

impl Default for StateContainer {
    fn default() -> Self {
        Self::new()
    }
}
