//! Registry error types.

use std::fmt;

use onboard_state::StateError;
use thiserror::Error;

/// Errors surfaced by registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("application not found: {0}")]
    ApplicationNotFound(String),

    #[error("devops details not found: {0}")]
    DevOpsNotFound(String),

    #[error("infrastructure details not found for '{0}'")]
    InfrastructureNotFound(String),

    #[error("infrastructure details not found for '{identifier}' in '{environment}'")]
    InfrastructureNotFoundIn {
        identifier: String,
        environment: String,
    },

    #[error("environment not found: {0}")]
    EnvironmentNotFound(String),

    #[error("application '{0}' already exists")]
    ApplicationExists(String),

    #[error("devops details for '{0}' already exist")]
    DevOpsExists(String),

    #[error("infrastructure details for '{application}' in '{environment}' already exist")]
    InfrastructureExists {
        application: String,
        environment: String,
    },

    #[error("invalid environment '{environment}'. Valid environments: {}", .valid.join(", "))]
    InvalidEnvironment {
        environment: String,
        valid: Vec<String>,
    },

    #[error(transparent)]
    State(#[from] StateError),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Coarse classification used by callers that map errors to responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidEnvironment,
    CorruptData,
    PersistenceFailure,
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::ApplicationNotFound(_)
            | RegistryError::DevOpsNotFound(_)
            | RegistryError::InfrastructureNotFound(_)
            | RegistryError::InfrastructureNotFoundIn { .. }
            | RegistryError::EnvironmentNotFound(_)
            | RegistryError::State(StateError::NotFound(_)) => ErrorKind::NotFound,
            RegistryError::ApplicationExists(_)
            | RegistryError::DevOpsExists(_)
            | RegistryError::InfrastructureExists { .. } => ErrorKind::Conflict,
            RegistryError::InvalidEnvironment { .. } => ErrorKind::InvalidEnvironment,
            RegistryError::State(StateError::Corrupt { .. }) => ErrorKind::CorruptData,
            RegistryError::State(
                StateError::Open(_) | StateError::Read { .. } | StateError::Persist { .. },
            ) => ErrorKind::PersistenceFailure,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::InvalidEnvironment => "invalid_environment",
            ErrorKind::CorruptData => "corrupt_data",
            ErrorKind::PersistenceFailure => "persistence_failure",
        };
        f.write_str(name)
    }
}
