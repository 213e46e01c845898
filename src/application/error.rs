//! Application-level errors (wraps registry errors)

use thiserror::Error;

use crate::domain::{ErrorKind, RegistryError};

/// Application errors wrap registry errors and add configuration concerns.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Registry(#[from] RegistryError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    /// Registry error kind, if this wraps one.
    pub fn registry_kind(&self) -> Option<ErrorKind> {
        match self {
            ApplicationError::Registry(e) => Some(e.kind()),
            _ => None,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
