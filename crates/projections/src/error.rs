//! Projection error types.

use common::EntityKind;
use store::StoreError;
use thiserror::Error;

/// Errors that can occur while building a view.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// The requested venue or artist does not exist.
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: i64 },

    /// The store failed while reading.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
