//! Expense record model and the decode boundary for stored documents.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Rejections for user-supplied expense input.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(f64),
    #[error("description must not be empty")]
    EmptyDescription,
}

/// The fixed set of expense categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Leisure,
    Housing,
    Health,
    Education,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Food,
        Category::Transport,
        Category::Leisure,
        Category::Housing,
        Category::Health,
        Category::Education,
        Category::Other,
    ];

    /// Display color for charts and terminal swatches, fixed per category.
    pub fn color(&self) -> &'static str {
        match self {
            Category::Food => "#FF6384",
            Category::Transport => "#36A2EB",
            Category::Leisure => "#FFCE56",
            Category::Housing => "#4BC0C0",
            Category::Health => "#9966FF",
            Category::Education => "#FF9F40",
            Category::Other => "#C9CBCF",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Category::Food => "Food",
                Category::Transport => "Transport",
                Category::Leisure => "Leisure",
                Category::Housing => "Housing",
                Category::Health => "Health",
                Category::Education => "Education",
                Category::Other => "Other",
            }
        )
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "food" => Ok(Category::Food),
            "transport" => Ok(Category::Transport),
            "leisure" => Ok(Category::Leisure),
            "housing" => Ok(Category::Housing),
            "health" => Ok(Category::Health),
            "education" => Ok(Category::Education),
            "other" => Ok(Category::Other),
            _ => Err(anyhow::anyhow!("Invalid category: {}", s)),
        }
    }
}

/// A `YYYY-MM` bucketing key derived from a record's creation timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    /// Derives the key from a UTC timestamp. Computed once at record
    /// creation; stored keys are never recomputed on read.
    pub fn from_datetime(at: &DateTime<Utc>) -> Self {
        MonthKey {
            year: at.year(),
            month: at.month(),
        }
    }

    pub fn current() -> Self {
        Self::from_datetime(&Utc::now())
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| anyhow::anyhow!("Invalid month key: {}", s))?;
        let year: i32 = year
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid year in month key: {}", s))?;
        let month: u32 = month
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid month in month key: {}", s))?;
        if !(1..=12).contains(&month) {
            return Err(anyhow::anyhow!("Month out of range in month key: {}", s));
        }
        Ok(MonthKey { year, month })
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A single persisted expense entry.
///
/// Records are never mutated in place; an amend is a delete plus a new add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: String,
    pub owner: String,
    pub description: String,
    pub amount: f64,
    pub category: Category,
    pub created_at: DateTime<Utc>,
    pub month_key: MonthKey,
}

impl ExpenseRecord {
    /// Converts a loosely shaped stored document into a typed record.
    ///
    /// Stored documents may come from older writers or other clients, so
    /// every field is read leniently: an unknown or missing category falls
    /// back to `Other`, a missing creation time falls back to now, and a
    /// missing month key is derived from the creation time. A stored month
    /// key is trusted as-is.
    pub fn from_document(owner: &str, id: &str, data: &serde_json::Value) -> Self {
        let description = data["description"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        let amount = data["amount"].as_f64().unwrap_or(0.0);
        let category = match data["category"].as_str() {
            Some(s) => s.parse().unwrap_or_else(|_| {
                debug!(category = %s, "Unknown category in stored document");
                Category::Other
            }),
            None => Category::Other,
        };
        let created_at = data["created_at"]
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|at| at.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);
        let month_key = data["month_key"]
            .as_str()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| MonthKey::from_datetime(&created_at));

        ExpenseRecord {
            id: id.to_string(),
            owner: data["owner"].as_str().unwrap_or(owner).to_string(),
            description,
            amount,
            category,
            created_at,
            month_key,
        }
    }
}

/// A draft expense before persistence. The store assigns the id and owner
/// and derives the month key when the draft is accepted.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub description: String,
    pub amount: f64,
    pub category: Category,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewExpense {
    pub fn new(description: impl Into<String>, amount: f64, category: Category) -> Self {
        NewExpense {
            description: description.into(),
            amount,
            category,
            created_at: None,
        }
    }

    /// One-tap entry with no details filled in.
    pub fn quick(amount: f64) -> Self {
        Self::new("Quick expense", amount, Category::Other)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.amount > 0.0) {
            return Err(ValidationError::NonPositiveAmount(self.amount));
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        Ok(())
    }
}
