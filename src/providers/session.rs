//! Local authentication with a persisted session.

use crate::core::auth::{AuthError, AuthGateway, Identity};
use crate::store::local::LocalStore;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, warn};

const SESSION_PARTITION: &str = "session";
const IDENTITY_KEY: &str = "identity";

/// An `AuthGateway` that keeps the session on the local keyspace, so a
/// sign-in survives until the next `famfin logout`.
///
/// There is no credential store behind it; any password signs in a uid
/// that exists in the profile directory. The CLI resolves the username
/// and rejects unknown users before ever calling `sign_in`.
pub struct LocalSession {
    local: LocalStore,
    identities: watch::Sender<Option<Identity>>,
}

impl LocalSession {
    /// Opens the session store, restoring the persisted identity or
    /// starting a fresh anonymous one.
    pub fn open(local: LocalStore) -> Result<Self> {
        let identity = match local.get_json::<Identity>(SESSION_PARTITION, IDENTITY_KEY)? {
            Some(identity) => {
                debug!(uid = %identity.uid, anonymous = identity.anonymous, "Restored session");
                identity
            }
            None => {
                let identity = Identity::anonymous();
                local.put_json(SESSION_PARTITION, IDENTITY_KEY, &identity)?;
                debug!(uid = %identity.uid, "Started anonymous session");
                identity
            }
        };
        let (identities, _) = watch::channel(Some(identity));
        Ok(LocalSession { local, identities })
    }

    fn persist_and_announce(&self, identity: Identity) -> Result<Identity, AuthError> {
        self.local
            .put_json(SESSION_PARTITION, IDENTITY_KEY, &identity)
            .map_err(|e| AuthError::Backend(e.to_string()))?;
        self.identities.send_replace(Some(identity.clone()));
        Ok(identity)
    }
}

#[async_trait]
impl AuthGateway for LocalSession {
    fn identities(&self) -> watch::Receiver<Option<Identity>> {
        self.identities.subscribe()
    }

    async fn sign_in(&self, uid: &str, _password: &str) -> Result<Identity, AuthError> {
        self.persist_and_announce(Identity::named(uid))
    }

    async fn sign_in_anonymous(&self) -> Result<Identity, AuthError> {
        self.persist_and_announce(Identity::anonymous())
    }

    /// Ends the current session. The gateway lands on a fresh anonymous
    /// identity rather than none, so a session never ends ownerless in a
    /// signed-out limbo.
    async fn sign_out(&self) -> Result<(), AuthError> {
        self.identities.send_replace(None);
        self.persist_and_announce(Identity::anonymous())?;
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        warn!(email = %email, "Password reset requires a remote gateway");
        Err(AuthError::Unsupported)
    }
}
