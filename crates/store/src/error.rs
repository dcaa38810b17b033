use common::{EntityKind, ShowOwner};
use thiserror::Error;

/// Errors that can occur when reading from or writing to the booking store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An update or delete targeted a row that does not exist.
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: i64 },

    /// A show referenced a venue or artist that does not exist.
    #[error("show references missing {kind} {id}")]
    MissingReference { kind: EntityKind, id: i64 },

    /// A venue or artist cannot be deleted while shows still reference it.
    #[error("{0} is still referenced by shows")]
    StillReferenced(ShowOwner),

    /// A commit was attempted with no writes.
    #[error("Cannot commit an empty write list")]
    EmptyCommit,

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
