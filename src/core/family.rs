//! Family member and saved snapshot models, persisted locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::Display;
use std::str::FromStr;

/// Relationship of a family member to the account holder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RelationKind {
    Spouse,
    Child,
    Father,
    Mother,
    Other(String),
}

impl Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationKind::Spouse => write!(f, "Spouse"),
            RelationKind::Child => write!(f, "Child"),
            RelationKind::Father => write!(f, "Father"),
            RelationKind::Mother => write!(f, "Mother"),
            RelationKind::Other(kind) => write!(f, "{kind}"),
        }
    }
}

impl FromStr for RelationKind {
    type Err = Infallible;

    // Total: anything outside the fixed kinds is kept as free-form text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "spouse" => RelationKind::Spouse,
            "child" => RelationKind::Child,
            "father" => RelationKind::Father,
            "mother" => RelationKind::Mother,
            _ => RelationKind::Other(s.to_string()),
        })
    }
}

/// A family member with a self-reported monthly spend. Kept in local
/// storage, independent of the synced expense records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub id: String,
    pub name: String,
    pub relation: RelationKind,
    pub self_reported_spend: f64,
}

/// A point-in-time capture of the month's standing, kept newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSnapshot {
    pub id: String,
    pub saved_at: DateTime<Utc>,
    pub month_total: f64,
    pub family: Vec<FamilyMember>,
    pub monthly_goal: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_parse_keeps_free_form_kinds() {
        assert_eq!("spouse".parse::<RelationKind>().unwrap(), RelationKind::Spouse);
        assert_eq!("Mother".parse::<RelationKind>().unwrap(), RelationKind::Mother);
        assert_eq!(
            "Cousin".parse::<RelationKind>().unwrap(),
            RelationKind::Other("Cousin".to_string())
        );
    }

    #[test]
    fn test_relation_display_round_trip() {
        for kind in [
            RelationKind::Spouse,
            RelationKind::Child,
            RelationKind::Father,
            RelationKind::Mother,
        ] {
            let parsed: RelationKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }
}
