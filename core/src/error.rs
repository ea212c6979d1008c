//! Error types for todo storage.
//!
//! # Design
//! Everything the backing store can do wrong collapses into `StoreError`.
//! Callers never branch on the driver's own error kinds: every variant is a
//! server-side failure, so the HTTP layer maps them all to one status.

use thiserror::Error;

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors returned by `TodoStore` implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The MongoDB driver reported a failure (connection, query, write).
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// A stored document had no `_id`.
    #[error("stored document is missing its _id")]
    MissingId,

    /// An insert returned an id that is not an ObjectId.
    #[error("unexpected inserted id: {0}")]
    UnexpectedId(String),

    /// The store cannot serve requests at all.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
