//! CLI error type; every variant ends the process with exit code 1.

use solace_core::{
    CompanionError, ConfigError, LoggingError, PersistenceError, ValidationError,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

#[derive(Debug)]
pub enum CliError {
    Config(ConfigError),
    Logging(LoggingError),
    Storage(PersistenceError),
    Companion(CompanionError),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Input rejected before reaching the core.
    Usage(String),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "configuration: {err}"),
            Self::Logging(err) => write!(f, "logging: {err}"),
            Self::Storage(err) => write!(f, "storage: {err}"),
            Self::Companion(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Usage(message) => write!(f, "{message}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Companion(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Usage(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<PersistenceError> for CliError {
    fn from(value: PersistenceError) -> Self {
        Self::Storage(value)
    }
}

impl From<solace_core::DbError> for CliError {
    fn from(value: solace_core::DbError) -> Self {
        Self::Storage(PersistenceError::Db(value))
    }
}

impl From<CompanionError> for CliError {
    fn from(value: CompanionError) -> Self {
        Self::Companion(value)
    }
}

impl From<ValidationError> for CliError {
    fn from(value: ValidationError) -> Self {
        Self::Companion(CompanionError::from(value))
    }
}

pub type CliResult<T> = Result<T, CliError>;
