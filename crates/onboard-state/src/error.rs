//! Error types for the onboarding collection store.

use thiserror::Error;

/// Result type alias for state store operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors that can occur while loading or saving a collection.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to open store: {0}")]
    Open(String),

    /// The backing collection does not exist yet.
    #[error("collection {0} not found")]
    NotFound(String),

    /// The stored content could not be parsed into the expected document.
    #[error("invalid data in {collection}: {reason}")]
    Corrupt { collection: String, reason: String },

    #[error("error reading {collection}: {reason}")]
    Read { collection: String, reason: String },

    /// Any write, permission, or serialization failure during save.
    #[error("error saving {collection}: {reason}")]
    Persist { collection: String, reason: String },
}
