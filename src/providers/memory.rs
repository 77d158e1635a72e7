//! In-process document store for tests and ephemeral runs.

use super::watchers::WatcherRegistry;
use crate::core::documents::{DocumentError, DocumentStore, LiveQuery, SourceDocument};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// A `DocumentStore` backed by process memory.
///
/// Collections are plain maps; every mutation notifies the collection's
/// watchers with the full result set, mirroring how a remote backend
/// pushes. Nothing survives the process.
pub struct MemoryDocumentStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Value>>>,
    watchers: WatcherRegistry,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        MemoryDocumentStore {
            collections: Mutex::new(HashMap::new()),
            watchers: WatcherRegistry::new(),
        }
    }

    fn snapshot(collection: &BTreeMap<String, Value>) -> Vec<SourceDocument> {
        collection
            .iter()
            .map(|(id, data)| SourceDocument {
                id: id.clone(),
                data: data.clone(),
            })
            .collect()
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, collection: &str, data: Value) -> Result<String, DocumentError> {
        let id = Uuid::new_v4().to_string();
        let docs = {
            let mut collections = self.collections.lock().await;
            let entries = collections.entry(collection.to_string()).or_default();
            entries.insert(id.clone(), data);
            Self::snapshot(entries)
        };
        debug!(collection = %collection, id = %id, "Document inserted");
        self.watchers.notify(collection, docs);
        Ok(id)
    }

    async fn put(&self, collection: &str, id: &str, data: Value) -> Result<(), DocumentError> {
        let docs = {
            let mut collections = self.collections.lock().await;
            let entries = collections.entry(collection.to_string()).or_default();
            entries.insert(id.to_string(), data);
            Self::snapshot(entries)
        };
        self.watchers.notify(collection, docs);
        Ok(())
    }

    async fn fetch(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<SourceDocument>, DocumentError> {
        let collections = self.collections.lock().await;
        Ok(collections.get(collection).and_then(|entries| {
            entries.get(id).map(|data| SourceDocument {
                id: id.to_string(),
                data: data.clone(),
            })
        }))
    }

    async fn list(&self, collection: &str) -> Result<Vec<SourceDocument>, DocumentError> {
        let collections = self.collections.lock().await;
        Ok(collections
            .get(collection)
            .map(Self::snapshot)
            .unwrap_or_default())
    }

    async fn remove(&self, collection: &str, id: &str) -> Result<(), DocumentError> {
        let docs = {
            let mut collections = self.collections.lock().await;
            match collections.get_mut(collection) {
                Some(entries) => {
                    if entries.remove(id).is_some() {
                        Some(Self::snapshot(entries))
                    } else {
                        None
                    }
                }
                _ => None,
            }
        };
        // Removing an absent document changes nothing, so nobody is told.
        if let Some(docs) = docs {
            debug!(collection = %collection, id = %id, "Document removed");
            self.watchers.notify(collection, docs);
        }
        Ok(())
    }

    async fn watch(&self, collection: &str) -> Result<LiveQuery, DocumentError> {
        let current = {
            let collections = self.collections.lock().await;
            collections
                .get(collection)
                .map(Self::snapshot)
                .unwrap_or_default()
        };
        Ok(self.watchers.register(collection, current))
    }
}
