//! Authentication abstractions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unknown user: {0}")]
    UnknownUser(String),
    #[error("operation not supported by this gateway")]
    Unsupported,
    #[error("auth backend failure: {0}")]
    Backend(String),
}

/// An authenticated identity. Anonymous sessions carry a uid but no
/// account; for data ownership they count as signed out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub anonymous: bool,
}

impl Identity {
    pub fn named(uid: impl Into<String>) -> Self {
        Identity {
            uid: uid.into(),
            anonymous: false,
        }
    }

    pub fn anonymous() -> Self {
        Identity {
            uid: format!("anon-{}", Uuid::new_v4()),
            anonymous: true,
        }
    }

    /// The data-ownership view of this identity; anonymous maps to none.
    pub fn as_owner(&self) -> Option<&str> {
        if self.anonymous { None } else { Some(&self.uid) }
    }
}

/// An authentication backend.
///
/// Identity transitions are observed through `identities`; the mutation
/// methods drive the transitions. Credential storage belongs to the
/// backend, not to this crate.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Stream of identity transitions. The receiver's current value is the
    /// identity in effect now; `None` means signed out. The stream may
    /// repeat a value, so consumers must deduplicate.
    fn identities(&self) -> watch::Receiver<Option<Identity>>;

    /// Signs in a known uid with credentials.
    async fn sign_in(&self, uid: &str, password: &str) -> Result<Identity, AuthError>;

    /// Starts an anonymous session.
    async fn sign_in_anonymous(&self) -> Result<Identity, AuthError>;

    /// Ends the current session.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Dispatches a password-reset message for an e-mail address.
    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_identity_is_not_an_owner() {
        let identity = Identity::anonymous();
        assert!(identity.anonymous);
        assert_eq!(identity.as_owner(), None);
    }

    #[test]
    fn test_named_identity_owns_its_uid() {
        let identity = Identity::named("user-1");
        assert_eq!(identity.as_owner(), Some("user-1"));
    }

    #[test]
    fn test_anonymous_identities_are_distinct() {
        assert_ne!(Identity::anonymous().uid, Identity::anonymous().uid);
    }
}
