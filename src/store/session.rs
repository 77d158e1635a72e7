//! Session tracking that re-points the expense store on identity changes.

use crate::core::auth::AuthGateway;
use crate::store::ExpenseStore;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Watches the auth gateway's identity stream and keeps the store's active
/// owner in sync.
///
/// Signed-out and anonymous identities both resolve to no owner. The
/// upstream stream may repeat itself, so transitions that resolve to the
/// current owner are suppressed. Dropping the gate stops the watcher.
pub struct SessionGate {
    task: JoinHandle<()>,
}

impl SessionGate {
    pub fn spawn(auth: Arc<dyn AuthGateway>, store: Arc<ExpenseStore>) -> Self {
        let mut identities = auth.identities();
        let task = tokio::spawn(async move {
            let mut current: Option<Option<String>> = None;
            loop {
                let resolved = identities
                    .borrow_and_update()
                    .as_ref()
                    .and_then(|identity| identity.as_owner().map(str::to_string));
                if current.as_ref() != Some(&resolved) {
                    debug!(owner = ?resolved, "Identity transition");
                    store.set_active_owner(resolved.as_deref()).await;
                    current = Some(resolved);
                }
                if identities.changed().await.is_err() {
                    debug!("Identity stream closed, session gate stopping");
                    return;
                }
            }
        });
        SessionGate { task }
    }

    /// Stops the watcher and waits for its task to be gone. Unlike a plain
    /// drop, nothing of the gate is still running when this returns.
    pub async fn shutdown(mut self) {
        self.task.abort();
        let _ = (&mut self.task).await;
    }
}

impl Drop for SessionGate {
    fn drop(&mut self) {
        self.task.abort();
    }
}
