//! Document-store abstractions shared by all persistence backends.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;

/// Failures surfaced by a document-store backend.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document backend failure: {0}")]
    Backend(String),
}

/// A raw stored document: backend-assigned id plus a loosely shaped payload.
///
/// Payloads cross into typed records through a single decode boundary; see
/// [`crate::core::record::ExpenseRecord::from_document`].
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub id: String,
    pub data: Value,
}

/// Events delivered by a live query.
#[derive(Debug)]
pub enum QueryEvent {
    /// The full current result set of the watched collection.
    Batch(Vec<SourceDocument>),
    /// The subscription failed and will deliver nothing further.
    Lost(String),
}

/// A live-query handle. Dropping it deregisters the watcher from the
/// backend; no event is delivered after the drop completes.
pub struct LiveQuery {
    events: mpsc::UnboundedReceiver<QueryEvent>,
    _guard: Box<dyn Send>,
}

impl LiveQuery {
    pub fn new(events: mpsc::UnboundedReceiver<QueryEvent>, guard: impl Send + 'static) -> Self {
        LiveQuery {
            events,
            _guard: Box::new(guard),
        }
    }

    /// Waits for the next push. `None` once the backend side is gone.
    pub async fn next_event(&mut self) -> Option<QueryEvent> {
        self.events.recv().await
    }
}

/// Path layout of the per-deployment document tree. Expenses live under a
/// per-owner collection; profiles live in a shared public directory.
#[derive(Debug, Clone)]
pub struct ExpensePaths {
    namespace: String,
}

impl ExpensePaths {
    pub fn new(namespace: impl Into<String>) -> Self {
        ExpensePaths {
            namespace: namespace.into(),
        }
    }

    pub fn expenses_for(&self, owner: &str) -> String {
        format!("artifacts/{}/users/{}/expenses", self.namespace, owner)
    }

    pub fn profiles(&self) -> String {
        format!("artifacts/{}/public/data/users", self.namespace)
    }
}

/// A collection-scoped document database.
///
/// Implementations assign ids on `insert` and deliver live result sets
/// through `watch`: the current contents arrive as the first event, and
/// every later change to the collection delivers the full updated set.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Creates a document with a backend-assigned id; returns the id.
    async fn insert(&self, collection: &str, data: Value) -> Result<String, DocumentError>;

    /// Creates or replaces a document under a caller-chosen id.
    async fn put(&self, collection: &str, id: &str, data: Value) -> Result<(), DocumentError>;

    /// Fetches a single document; `None` when absent.
    async fn fetch(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<SourceDocument>, DocumentError>;

    /// Lists the full current contents of a collection.
    async fn list(&self, collection: &str) -> Result<Vec<SourceDocument>, DocumentError>;

    /// Deletes by id. Removing an absent document is not an error.
    async fn remove(&self, collection: &str, id: &str) -> Result<(), DocumentError>;

    /// Opens a live query over a collection.
    async fn watch(&self, collection: &str) -> Result<LiveQuery, DocumentError>;
}
