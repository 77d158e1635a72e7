//! User profile documents in the shared public directory.

use crate::core::documents::{DocumentError, DocumentStore, ExpensePaths};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// A per-user profile document. Goals start at zero on registration and
/// change through [`ProfileDirectory::update_goals`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub monthly_goal: f64,
    #[serde(default)]
    pub savings_goal: f64,
}

/// Reads and writes profile documents, keyed by uid, in the public
/// directory collection. Documents that do not decode as profiles are
/// skipped with a warning rather than failing the whole directory.
pub struct ProfileDirectory {
    documents: Arc<dyn DocumentStore>,
    collection: String,
}

impl ProfileDirectory {
    pub fn new(documents: Arc<dyn DocumentStore>, paths: &ExpensePaths) -> Self {
        ProfileDirectory {
            documents,
            collection: paths.profiles(),
        }
    }

    /// Creates or replaces the profile for `uid`, with both goals zeroed.
    pub async fn register(
        &self,
        uid: &str,
        name: &str,
        email: &str,
        username: &str,
        birth_date: Option<NaiveDate>,
    ) -> Result<UserProfile, DocumentError> {
        let profile = UserProfile {
            uid: uid.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            username: username.to_string(),
            birth_date,
            monthly_goal: 0.0,
            savings_goal: 0.0,
        };
        self.put_profile(&profile).await?;
        Ok(profile)
    }

    pub async fn get(&self, uid: &str) -> Result<Option<UserProfile>, DocumentError> {
        match self.documents.fetch(&self.collection, uid).await? {
            Some(doc) => Ok(decode_profile(&doc.id, doc.data)),
            None => Ok(None),
        }
    }

    /// First profile whose username matches; used to resolve logins.
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserProfile>, DocumentError> {
        let docs = self.documents.list(&self.collection).await?;
        Ok(docs
            .into_iter()
            .filter_map(|doc| decode_profile(&doc.id, doc.data))
            .find(|profile| profile.username == username))
    }

    /// Read-modify-write of the goal fields; an absent argument leaves the
    /// stored value untouched. `None` when no profile exists for `uid`.
    pub async fn update_goals(
        &self,
        uid: &str,
        monthly: Option<f64>,
        savings: Option<f64>,
    ) -> Result<Option<UserProfile>, DocumentError> {
        let Some(mut profile) = self.get(uid).await? else {
            return Ok(None);
        };
        if let Some(monthly) = monthly {
            profile.monthly_goal = monthly;
        }
        if let Some(savings) = savings {
            profile.savings_goal = savings;
        }
        self.put_profile(&profile).await?;
        Ok(Some(profile))
    }

    async fn put_profile(&self, profile: &UserProfile) -> Result<(), DocumentError> {
        let data = serde_json::to_value(profile)
            .map_err(|e| DocumentError::Backend(format!("encode profile: {e}")))?;
        self.documents.put(&self.collection, &profile.uid, data).await
    }
}

fn decode_profile(id: &str, data: serde_json::Value) -> Option<UserProfile> {
    match serde_json::from_value(data) {
        Ok(profile) => Some(profile),
        Err(e) => {
            warn!(id = %id, error = %e, "Skipping malformed profile document");
            None
        }
    }
}
