//! Domain error types.

use common::EntityKind;
use store::StoreError;
use thiserror::Error;

use crate::validation::ValidationError;

/// A mutation the service performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during mutations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The targeted row does not exist.
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: i64 },

    /// The submitted form was rejected.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The store failed while committing; nothing was applied.
    #[error("could not {operation} {kind} '{target}': {source}")]
    Persistence {
        operation: Operation,
        kind: EntityKind,
        target: String,
        #[source]
        source: StoreError,
    },
}

impl DomainError {
    pub fn not_found(kind: EntityKind, id: impl Into<i64>) -> Self {
        DomainError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;
