//! Domain-level errors (no external dependencies)

use std::fmt;

use thiserror::Error;

/// Registry errors represent resolution, construction and write-policy failures.
/// Every variant is a local failure of a single `get`/`make`/`invoke` call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("entry [{entry}] not found")]
    NotFound { entry: String },

    #[error("{}", frozen_message(.entry))]
    Frozen { entry: Option<String> },

    #[error("service factory for [{entry}] must be callable")]
    InvalidFactory { entry: String },

    #[error("service factory must return an instance of [{type_name}]")]
    FactoryContract { entry: String, type_name: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{}", unconstructible_message(.target, .path))]
    Unconstructible { target: String, path: Vec<String> },

    #[error("cyclic dependency detected for [{0}]")]
    CyclicDependency(String),

    #[error("{}", missing_parameter_message(.parameter, .owner))]
    MissingParameter {
        parameter: String,
        owner: Option<String>,
    },

    #[error("target [{target}] is not callable")]
    NotCallable { target: String },

    #[error("construction of [{target}] failed: {message}")]
    Construction { target: String, message: String },
}

/// Machine-readable error classification.
///
/// Adapter layers translate on this instead of matching messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Frozen,
    InvalidFactory,
    FactoryContract,
    InvalidArgument,
    Unconstructible,
    CyclicDependency,
    MissingParameter,
    NotCallable,
    Construction,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotFound => "not-found",
            Self::Frozen => "frozen",
            Self::InvalidFactory => "invalid-factory",
            Self::FactoryContract => "factory-contract",
            Self::InvalidArgument => "invalid-argument",
            Self::Unconstructible => "unconstructible",
            Self::CyclicDependency => "cyclic-dependency",
            Self::MissingParameter => "missing-parameter",
            Self::NotCallable => "not-callable",
            Self::Construction => "construction",
        };
        write!(f, "{name}")
    }
}

impl RegistryError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Frozen { .. } => ErrorKind::Frozen,
            Self::InvalidFactory { .. } => ErrorKind::InvalidFactory,
            Self::FactoryContract { .. } => ErrorKind::FactoryContract,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Unconstructible { .. } => ErrorKind::Unconstructible,
            Self::CyclicDependency(_) => ErrorKind::CyclicDependency,
            Self::MissingParameter { .. } => ErrorKind::MissingParameter,
            Self::NotCallable { .. } => ErrorKind::NotCallable,
            Self::Construction { .. } => ErrorKind::Construction,
        }
    }

    /// True when the requested entry simply does not exist.
    ///
    /// Container adapters map this to their own "not found" error and
    /// everything else to a generic container error.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn not_found(entry: impl Into<String>) -> Self {
        Self::NotFound {
            entry: entry.into(),
        }
    }

    pub fn frozen(entry: Option<&str>) -> Self {
        Self::Frozen {
            entry: entry.map(str::to_string),
        }
    }

    /// Create a construction failure from a constructor or function body.
    pub fn construction(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Construction {
            target: target.into(),
            message: message.into(),
        }
    }
}

fn frozen_message(entry: &Option<String>) -> String {
    match entry {
        Some(entry) => format!("entry [{entry}] is frozen"),
        None => "registry is frozen".to_string(),
    }
}

fn unconstructible_message(target: &str, path: &[String]) -> String {
    if path.is_empty() {
        format!("cannot construct [{target}]")
    } else {
        format!("cannot construct [{target}] while [{}]", path.join(", "))
    }
}

fn missing_parameter_message(parameter: &str, owner: &Option<String>) -> String {
    match owner {
        Some(owner) => format!("parameter [{parameter}] not found for [{owner}]"),
        None => format!("parameter [{parameter}] not found"),
    }
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
