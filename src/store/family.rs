//! Locally persisted family members and saved snapshots.

use crate::core::family::{FamilyMember, RelationKind, SavedSnapshot};
use crate::store::local::LocalStore;
use chrono::Utc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

const FAMILY_PARTITION: &str = "family";
const MEMBERS_KEY: &str = "members";
const SNAPSHOTS_KEY: &str = "snapshots";

#[derive(Debug, Error)]
pub enum FamilyError {
    #[error("member name must not be empty")]
    EmptyName,
    #[error("self-reported spend must be zero or more, got {0}")]
    NegativeSpend(f64),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Family list and snapshot blobs over the local keyspace, independent of
/// the synced expense records.
pub struct FamilyStore {
    local: LocalStore,
}

impl FamilyStore {
    pub fn new(local: LocalStore) -> Self {
        FamilyStore { local }
    }

    pub fn members(&self) -> Result<Vec<FamilyMember>, FamilyError> {
        Ok(self
            .local
            .get_json(FAMILY_PARTITION, MEMBERS_KEY)?
            .unwrap_or_default())
    }

    pub fn add_member(
        &self,
        name: &str,
        relation: RelationKind,
        spend: f64,
    ) -> Result<FamilyMember, FamilyError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FamilyError::EmptyName);
        }
        if !(spend >= 0.0) {
            return Err(FamilyError::NegativeSpend(spend));
        }

        let member = FamilyMember {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            relation,
            self_reported_spend: spend,
        };
        let mut members = self.members()?;
        members.push(member.clone());
        self.local
            .put_json(FAMILY_PARTITION, MEMBERS_KEY, &members)?;
        debug!(id = %member.id, "Family member added");
        Ok(member)
    }

    /// Removes by id; `false` when no member matched.
    pub fn remove_member(&self, id: &str) -> Result<bool, FamilyError> {
        let mut members = self.members()?;
        let before = members.len();
        members.retain(|m| m.id != id);
        let removed = members.len() != before;
        if removed {
            self.local
                .put_json(FAMILY_PARTITION, MEMBERS_KEY, &members)?;
        }
        Ok(removed)
    }

    /// Saved captures, newest first.
    pub fn snapshots(&self) -> Result<Vec<SavedSnapshot>, FamilyError> {
        Ok(self
            .local
            .get_json(FAMILY_PARTITION, SNAPSHOTS_KEY)?
            .unwrap_or_default())
    }

    /// Captures the current standing and prepends it to the saved list.
    pub fn save_snapshot(
        &self,
        month_total: f64,
        monthly_goal: f64,
    ) -> Result<SavedSnapshot, FamilyError> {
        let snapshot = SavedSnapshot {
            id: Uuid::new_v4().to_string(),
            saved_at: Utc::now(),
            month_total,
            family: self.members()?,
            monthly_goal,
        };
        let mut snapshots = self.snapshots()?;
        snapshots.insert(0, snapshot.clone());
        self.local
            .put_json(FAMILY_PARTITION, SNAPSHOTS_KEY, &snapshots)?;
        debug!(id = %snapshot.id, "Snapshot saved");
        Ok(snapshot)
    }
}
