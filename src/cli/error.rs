//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::ErrorKind;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Application(e) => match e {
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
                ApplicationError::Registry(r) => match r.kind() {
                    ErrorKind::NotFound => crate::exitcode::NOINPUT,
                    ErrorKind::InvalidArgument | ErrorKind::MissingParameter => {
                        crate::exitcode::DATAERR
                    }
                    _ => crate::exitcode::SOFTWARE,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RegistryError;

    #[test]
    fn given_config_error_when_mapping_then_config_exit_code() {
        let err = CliError::from(ApplicationError::Config {
            message: "bad".into(),
        });
        assert_eq!(err.exit_code(), crate::exitcode::CONFIG);
    }

    #[test]
    fn given_registry_error_when_mapping_then_by_kind() {
        let not_found = CliError::from(ApplicationError::from(RegistryError::not_found("x")));
        let cyclic = CliError::from(ApplicationError::from(RegistryError::CyclicDependency(
            "A".into(),
        )));

        assert_eq!(not_found.exit_code(), crate::exitcode::NOINPUT);
        assert_eq!(cyclic.exit_code(), crate::exitcode::SOFTWARE);
        assert_eq!(
            CliError::Usage("x".into()).exit_code(),
            crate::exitcode::USAGE
        );
    }
}
