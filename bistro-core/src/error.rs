use thiserror::Error;

use crate::commit::CommitReport;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store backend failed: {0}")]
    Backend(String),

    #[error("Invalid stored data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Ingredient name is empty")]
    EmptyName,

    #[error("Quantity must not be negative: {0}")]
    NegativeQuantity(f64),
}

#[derive(Error, Debug)]
pub enum CommitError {
    #[error("{} of {} pantry changes failed", .0.failures.len(), .0.attempted())]
    Partial(CommitReport),

    #[error("Changes saved but reloading the pantry failed: {0}")]
    Refresh(#[source] StoreError),
}
