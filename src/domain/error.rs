//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::path::Level;

/// Domain errors represent misuse of the tree-selection model.
/// Toggling itself is permissive, so most of these come from
/// taxonomy loading or from scoped access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{context} must be used within a Provider")]
    ProviderMissing { context: String },

    #[error("incomplete node path for {level} toggle")]
    IncompletePath { level: Level },

    #[error("duplicate key '{key}' under {parent}")]
    DuplicateKey { parent: String, key: String },

    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("invalid {source_name} taxonomy: {message}")]
    InvalidFormat {
        source_name: String,
        message: String,
    },

    #[error("taxonomy has no entries: {0}")]
    EmptyTaxonomy(String),

    #[error("node not in taxonomy: {0}")]
    UnknownNode(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
