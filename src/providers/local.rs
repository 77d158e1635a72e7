//! Durable document store over the embedded keyspace.

use super::watchers::WatcherRegistry;
use crate::core::documents::{DocumentError, DocumentStore, LiveQuery, SourceDocument};
use crate::store::local::LocalStore;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

const DOCUMENTS_PARTITION: &str = "documents";

/// A `DocumentStore` over the local keyspace, giving the CLI durable
/// single-machine persistence with the same push discipline as the
/// in-memory backend.
///
/// Documents live in one partition under `{collection}/{id}` keys; a
/// collection snapshot is a prefix scan. Keys with a further `/` after
/// the prefix belong to a nested collection and are excluded.
pub struct LocalDocumentStore {
    local: LocalStore,
    watchers: WatcherRegistry,
}

impl LocalDocumentStore {
    pub fn new(local: LocalStore) -> Self {
        LocalDocumentStore {
            local,
            watchers: WatcherRegistry::new(),
        }
    }

    fn document_key(collection: &str, id: &str) -> String {
        format!("{collection}/{id}")
    }

    fn snapshot(&self, collection: &str) -> Result<Vec<SourceDocument>, DocumentError> {
        let prefix = format!("{collection}/");
        let entries = self
            .local
            .list_prefix(DOCUMENTS_PARTITION, &prefix)
            .map_err(|e| DocumentError::Backend(e.to_string()))?;

        let mut docs = Vec::new();
        for (key, data) in entries {
            let id = &key[prefix.len()..];
            if id.contains('/') {
                continue;
            }
            docs.push(SourceDocument {
                id: id.to_string(),
                data,
            });
        }
        Ok(docs)
    }

    fn notify(&self, collection: &str) -> Result<(), DocumentError> {
        let docs = self.snapshot(collection)?;
        self.watchers.notify(collection, docs);
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn insert(&self, collection: &str, data: Value) -> Result<String, DocumentError> {
        let id = Uuid::new_v4().to_string();
        self.local
            .put_json(DOCUMENTS_PARTITION, &Self::document_key(collection, &id), &data)
            .map_err(|e| DocumentError::Backend(e.to_string()))?;
        debug!(collection = %collection, id = %id, "Document inserted");
        self.notify(collection)?;
        Ok(id)
    }

    async fn put(&self, collection: &str, id: &str, data: Value) -> Result<(), DocumentError> {
        self.local
            .put_json(DOCUMENTS_PARTITION, &Self::document_key(collection, id), &data)
            .map_err(|e| DocumentError::Backend(e.to_string()))?;
        self.notify(collection)
    }

    async fn fetch(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<SourceDocument>, DocumentError> {
        let data = self
            .local
            .get_json::<Value>(DOCUMENTS_PARTITION, &Self::document_key(collection, id))
            .map_err(|e| DocumentError::Backend(e.to_string()))?;
        Ok(data.map(|data| SourceDocument {
            id: id.to_string(),
            data,
        }))
    }

    async fn list(&self, collection: &str) -> Result<Vec<SourceDocument>, DocumentError> {
        self.snapshot(collection)
    }

    async fn remove(&self, collection: &str, id: &str) -> Result<(), DocumentError> {
        let key = Self::document_key(collection, id);
        let existing = self
            .local
            .get_json::<Value>(DOCUMENTS_PARTITION, &key)
            .map_err(|e| DocumentError::Backend(e.to_string()))?;
        if existing.is_none() {
            return Ok(());
        }
        self.local
            .delete(DOCUMENTS_PARTITION, &key)
            .map_err(|e| DocumentError::Backend(e.to_string()))?;
        debug!(collection = %collection, id = %id, "Document removed");
        self.notify(collection)
    }

    async fn watch(&self, collection: &str) -> Result<LiveQuery, DocumentError> {
        let current = self.snapshot(collection)?;
        Ok(self.watchers.register(collection, current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::documents::QueryEvent;
    use serde_json::json;
    use tempfile::tempdir;

    async fn expect_batch(query: &mut LiveQuery) -> Vec<SourceDocument> {
        match query.next_event().await {
            Some(QueryEvent::Batch(docs)) => docs,
            other => panic!("expected a batch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_insert_fetch_round_trip() {
        let dir = tempdir().unwrap();
        let store = LocalDocumentStore::new(LocalStore::open(dir.path()).unwrap());

        let id = store
            .insert("artifacts/t/users/u1/expenses", json!({"amount": 10.0}))
            .await
            .unwrap();
        let doc = store
            .fetch("artifacts/t/users/u1/expenses", &id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.data["amount"], 10.0);
    }

    #[tokio::test]
    async fn test_collections_do_not_leak_into_each_other() {
        let dir = tempdir().unwrap();
        let store = LocalDocumentStore::new(LocalStore::open(dir.path()).unwrap());

        store
            .insert("artifacts/t/users/u1/expenses", json!({"amount": 1.0}))
            .await
            .unwrap();
        store
            .insert("artifacts/t/users/u2/expenses", json!({"amount": 2.0}))
            .await
            .unwrap();
        store
            .put("artifacts/t/public/data/users", "u1", json!({"username": "ana"}))
            .await
            .unwrap();

        let u1 = store.list("artifacts/t/users/u1/expenses").await.unwrap();
        assert_eq!(u1.len(), 1);
        assert_eq!(u1[0].data["amount"], 1.0);

        let profiles = store.list("artifacts/t/public/data/users").await.unwrap();
        assert_eq!(profiles.len(), 1);

        // A parent path does not see documents of nested collections.
        assert!(store.list("artifacts/t/users").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_watch_sees_initial_and_later_changes() {
        let dir = tempdir().unwrap();
        let store = LocalDocumentStore::new(LocalStore::open(dir.path()).unwrap());
        let collection = "artifacts/t/users/u1/expenses";

        store.insert(collection, json!({"amount": 1.0})).await.unwrap();
        let mut query = store.watch(collection).await.unwrap();
        assert_eq!(expect_batch(&mut query).await.len(), 1);

        let id = store.insert(collection, json!({"amount": 2.0})).await.unwrap();
        assert_eq!(expect_batch(&mut query).await.len(), 2);

        store.remove(collection, &id).await.unwrap();
        assert_eq!(expect_batch(&mut query).await.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_absent_is_silent() {
        let dir = tempdir().unwrap();
        let store = LocalDocumentStore::new(LocalStore::open(dir.path()).unwrap());
        let collection = "artifacts/t/users/u1/expenses";

        let mut query = store.watch(collection).await.unwrap();
        expect_batch(&mut query).await;

        store.remove(collection, "ghost").await.unwrap();
        store.insert(collection, json!({"amount": 1.0})).await.unwrap();
        // Only the insert produced a push.
        assert_eq!(expect_batch(&mut query).await.len(), 1);
    }

    #[tokio::test]
    async fn test_documents_survive_reopen() {
        let dir = tempdir().unwrap();
        let id;
        {
            let store = LocalDocumentStore::new(LocalStore::open(dir.path()).unwrap());
            id = store
                .insert("artifacts/t/users/u1/expenses", json!({"amount": 7.0}))
                .await
                .unwrap();
        }
        let store = LocalDocumentStore::new(LocalStore::open(dir.path()).unwrap());
        let doc = store
            .fetch("artifacts/t/users/u1/expenses", &id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.data["amount"], 7.0);
    }
}
