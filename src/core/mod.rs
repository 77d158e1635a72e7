//! Core business logic abstractions

pub mod analytics;
pub mod auth;
pub mod config;
pub mod documents;
pub mod family;
pub mod log;
pub mod record;

// Re-export main types for cleaner imports
pub use auth::{AuthError, AuthGateway, Identity};
pub use documents::{
    DocumentError, DocumentStore, ExpensePaths, LiveQuery, QueryEvent, SourceDocument,
};
pub use family::{FamilyMember, RelationKind, SavedSnapshot};
pub use record::{Category, ExpenseRecord, MonthKey, NewExpense, ValidationError};
