pub mod expenses;
pub mod family;
pub mod goals;
pub mod session;
pub mod setup;
pub mod snapshots;
pub mod suggest;
pub mod summary;
pub mod ui;
