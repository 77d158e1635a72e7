//! Watcher registry shared by the document-store backends.

use crate::core::documents::{LiveQuery, QueryEvent, SourceDocument};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

struct Watcher {
    id: u64,
    tx: tokio::sync::mpsc::UnboundedSender<QueryEvent>,
}

struct RegistryInner {
    next_id: u64,
    watchers: HashMap<String, Vec<Watcher>>,
}

/// Per-collection registry of live-query watchers.
///
/// Registration hands out a [`LiveQuery`] whose drop removes the watcher
/// from the registry, so a released query is deregistered explicitly and
/// can never be pushed to again.
pub(crate) struct WatcherRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl WatcherRegistry {
    pub fn new() -> Self {
        WatcherRegistry {
            inner: Arc::new(Mutex::new(RegistryInner {
                next_id: 0,
                watchers: HashMap::new(),
            })),
        }
    }

    /// Registers a watcher and delivers `initial` as its first event.
    pub fn register(&self, collection: &str, initial: Vec<SourceDocument>) -> LiveQuery {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let _ = tx.send(QueryEvent::Batch(initial));

        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        inner
            .watchers
            .entry(collection.to_string())
            .or_default()
            .push(Watcher { id, tx });
        debug!(collection = %collection, id, "Watcher registered");

        let guard = WatchGuard {
            registry: Arc::clone(&self.inner),
            collection: collection.to_string(),
            id,
        };
        LiveQuery::new(rx, guard)
    }

    /// Pushes the full result set to every watcher of `collection`.
    pub fn notify(&self, collection: &str, docs: Vec<SourceDocument>) {
        let inner = self.inner.lock().unwrap();
        if let Some(watchers) = inner.watchers.get(collection) {
            for watcher in watchers {
                let _ = watcher.tx.send(QueryEvent::Batch(docs.clone()));
            }
        }
    }
}

struct WatchGuard {
    registry: Arc<Mutex<RegistryInner>>,
    collection: String,
    id: u64,
}

impl Drop for WatchGuard {
    fn drop(&mut self) {
        let mut inner = self.registry.lock().unwrap();
        let drained = match inner.watchers.get_mut(&self.collection) {
            Some(watchers) => {
                watchers.retain(|w| w.id != self.id);
                watchers.is_empty()
            }
            None => false,
        };
        if drained {
            inner.watchers.remove(&self.collection);
        }
        debug!(collection = %self.collection, id = self.id, "Watcher deregistered");
    }
}
