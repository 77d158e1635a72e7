//! Reactive expense storage and the locally persisted side stores.

pub mod family;
pub mod local;
pub mod profiles;
pub mod session;

use crate::core::documents::{DocumentError, DocumentStore, ExpensePaths, QueryEvent};
use crate::core::record::{ExpenseRecord, MonthKey, NewExpense, ValidationError};
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub use local::LocalStore;

/// Failures surfaced by the expense store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no active owner; sign in before touching expenses")]
    NoActiveOwner,
    #[error("persistence failure: {0}")]
    Persistence(#[from] DocumentError),
}

/// An immutable view of the record list at a point in time.
///
/// `live` is false from the moment a subscription is requested until its
/// first push lands. A signed-out store is empty and live: the empty list
/// is the authoritative answer, not a pending one.
#[derive(Debug, Clone)]
pub struct ExpenseSnapshot {
    pub records: Arc<Vec<ExpenseRecord>>,
    pub live: bool,
}

impl ExpenseSnapshot {
    fn empty(live: bool) -> Self {
        ExpenseSnapshot {
            records: Arc::new(Vec::new()),
            live,
        }
    }
}

struct StoreInner {
    owner: Option<String>,
    task: Option<JoinHandle<()>>,
}

/// The authoritative in-memory set of expense records for the current
/// owner.
///
/// At most one live subscription is active at a time. Switching owners
/// releases the previous subscription before the new one is opened, and a
/// generation counter discards any push that a released subscription
/// managed to get in flight. Mutations go to the document backend only;
/// the list itself changes exclusively through subscription pushes, so a
/// completed `add` becomes visible one push later (see [`Self::add`]).
pub struct ExpenseStore {
    documents: Arc<dyn DocumentStore>,
    paths: ExpensePaths,
    inner: Mutex<StoreInner>,
    epoch: Arc<AtomicU64>,
    snapshots: watch::Sender<ExpenseSnapshot>,
}

impl ExpenseStore {
    pub fn new(documents: Arc<dyn DocumentStore>, paths: ExpensePaths) -> Self {
        let (snapshots, _) = watch::channel(ExpenseSnapshot::empty(true));
        ExpenseStore {
            documents,
            paths,
            inner: Mutex::new(StoreInner {
                owner: None,
                task: None,
            }),
            epoch: Arc::new(AtomicU64::new(0)),
            snapshots,
        }
    }

    pub async fn active_owner(&self) -> Option<String> {
        self.inner.lock().await.owner.clone()
    }

    /// Re-points the store at another owner's collection.
    ///
    /// Idempotent for the current owner. `None` clears the list
    /// immediately; `Some` publishes an empty non-live snapshot and goes
    /// live on the subscription's first push.
    pub async fn set_active_owner(&self, owner: Option<&str>) {
        let mut inner = self.inner.lock().await;
        if inner.owner.as_deref() == owner {
            debug!(?owner, "Owner unchanged, keeping current subscription");
            return;
        }

        // Invalidate the old generation first so a push from the released
        // subscription can never reach the list, then make sure the old
        // task is fully gone before anything new is published.
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(task) = inner.task.take() {
            task.abort();
            let _ = task.await;
        }
        inner.owner = owner.map(str::to_string);

        let Some(owner) = owner else {
            debug!("Signed out, clearing expense list");
            self.snapshots.send_replace(ExpenseSnapshot::empty(true));
            return;
        };

        self.snapshots.send_replace(ExpenseSnapshot::empty(false));

        let collection = self.paths.expenses_for(owner);
        let owner = owner.to_string();
        let documents = Arc::clone(&self.documents);
        let current_epoch = Arc::clone(&self.epoch);
        let snapshots = self.snapshots.clone();
        debug!(owner = %owner, "Subscribing to expense collection");
        inner.task = Some(tokio::spawn(async move {
            let mut query = match documents.watch(&collection).await {
                Ok(query) => query,
                Err(e) => {
                    warn!(error = %e, collection = %collection, "Live query could not be opened");
                    if current_epoch.load(Ordering::SeqCst) == epoch {
                        snapshots.send_replace(ExpenseSnapshot::empty(true));
                    }
                    return;
                }
            };
            while let Some(event) = query.next_event().await {
                if current_epoch.load(Ordering::SeqCst) != epoch {
                    debug!("Discarding push from a released subscription");
                    return;
                }
                match event {
                    QueryEvent::Batch(docs) => {
                        let records: Vec<ExpenseRecord> = docs
                            .iter()
                            .map(|doc| ExpenseRecord::from_document(&owner, &doc.id, &doc.data))
                            .collect();
                        debug!(count = records.len(), "Applying subscription push");
                        snapshots.send_replace(ExpenseSnapshot {
                            records: Arc::new(records),
                            live: true,
                        });
                    }
                    QueryEvent::Lost(reason) => {
                        // No retry; the next owner change re-subscribes.
                        warn!(reason = %reason, "Live query lost, clearing expense list");
                        snapshots.send_replace(ExpenseSnapshot::empty(true));
                        return;
                    }
                }
            }
        }));
    }

    /// Validates and persists a draft; returns the assigned record id.
    ///
    /// The local list is not touched here. The record becomes visible with
    /// the subscription's next push, so a successful return does not mean
    /// the record is in [`Self::snapshot`] yet.
    pub async fn add(&self, draft: NewExpense) -> Result<String, StoreError> {
        draft.validate()?;
        let owner = self
            .active_owner()
            .await
            .ok_or(StoreError::NoActiveOwner)?;

        let created_at = draft.created_at.unwrap_or_else(Utc::now);
        let document = serde_json::json!({
            "owner": owner,
            "description": draft.description,
            "amount": draft.amount,
            "category": draft.category,
            "created_at": created_at,
            "month_key": MonthKey::from_datetime(&created_at),
        });

        let collection = self.paths.expenses_for(&owner);
        let id = self.documents.insert(&collection, document).await?;
        debug!(id = %id, "Expense accepted, list updates on the next push");
        Ok(id)
    }

    /// Deletes a record by id. Removal reaches the list with the next
    /// push, like [`Self::add`].
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let owner = self
            .active_owner()
            .await
            .ok_or(StoreError::NoActiveOwner)?;
        let collection = self.paths.expenses_for(&owner);
        self.documents.remove(&collection, id).await?;
        debug!(id = %id, "Expense removal accepted");
        Ok(())
    }

    /// The current record list. Possibly stale by one subscription round
    /// trip; never partially updated.
    pub fn snapshot(&self) -> ExpenseSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Registers interest in list changes. Each received value is a full
    /// immutable snapshot.
    pub fn watch(&self) -> watch::Receiver<ExpenseSnapshot> {
        self.snapshots.subscribe()
    }

    /// Waits until the current snapshot is live; `false` on timeout.
    pub async fn wait_until_live(&self, timeout: Duration) -> bool {
        let mut rx = self.snapshots.subscribe();
        tokio::time::timeout(timeout, async move {
            loop {
                if rx.borrow_and_update().live {
                    return true;
                }
                if rx.changed().await.is_err() {
                    return false;
                }
            }
        })
        .await
        .unwrap_or(false)
    }
}

impl Drop for ExpenseStore {
    fn drop(&mut self) {
        if let Some(task) = self.inner.get_mut().task.take() {
            task.abort();
        }
    }
}
