//! Runtime configuration for hosts (CLI and FFI).
//!
//! # Responsibility
//! - Resolve data directory, storage backend and log settings from the
//!   environment with stable defaults.
//! - Normalise and validate values before any store is opened.
//!
//! # Invariants
//! - `data_dir` and `log_dir` are absolute after resolution.
//! - `log_level` is always one of `trace|debug|info|warn|error`.

use crate::logging::{default_log_level, parse_level, LogSettings};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DATA_DIR_ENV: &str = "SOLACE_DATA_DIR";
pub const STORAGE_ENV: &str = "SOLACE_STORAGE";
pub const LOG_LEVEL_ENV: &str = "SOLACE_LOG_LEVEL";

const DEFAULT_DATA_DIR_NAME: &str = ".solace";
const DATABASE_FILE_NAME: &str = "solace.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Configuration failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownBackend(String),
    InvalidLogLevel(String),
    EmptyPath(&'static str),
    /// Current directory could not be read to resolve a relative path.
    CurrentDir(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownBackend(value) => {
                write!(f, "unknown storage backend `{value}`; expected sqlite|json")
            }
            Self::InvalidLogLevel(value) => write!(
                f,
                "unsupported log level `{value}`; expected trace|debug|info|warn|error"
            ),
            Self::EmptyPath(field) => write!(f, "{field} cannot be empty"),
            Self::CurrentDir(message) => {
                write!(f, "failed to read current directory: {message}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Where store documents live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Json,
}

impl StorageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Json => "json",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "db" => Ok(Self::Sqlite),
            "json" | "file" | "files" => Ok(Self::Json),
            _ => Err(ConfigError::UnknownBackend(value.trim().to_string())),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanionConfig {
    pub data_dir: PathBuf,
    pub backend: StorageBackend,
    pub log_level: &'static str,
    pub log_dir: PathBuf,
}

impl CompanionConfig {
    /// Defaults rooted at `base_dir`.
    pub fn with_base_dir(base_dir: &Path) -> Self {
        let data_dir = base_dir.join(DEFAULT_DATA_DIR_NAME);
        Self {
            log_dir: data_dir.join(LOG_DIR_NAME),
            data_dir,
            backend: StorageBackend::default(),
            log_level: default_log_level(),
        }
    }

    /// Resolves configuration from process environment and current directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        let cwd = current_dir()?;
        Self::from_lookup(|name| std::env::var(name).ok(), &cwd)
    }

    /// Resolves configuration from `lookup`, with relative paths joined to `cwd`.
    pub fn from_lookup<F>(lookup: F, cwd: &Path) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::with_base_dir(cwd);
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(dir) = non_empty(DATA_DIR_ENV) {
            config = config.with_data_dir(absolutize(Path::new(dir.trim()), cwd));
        }
        if let Some(backend) = non_empty(STORAGE_ENV) {
            config.backend = backend.parse()?;
        }
        if let Some(level) = non_empty(LOG_LEVEL_ENV) {
            config = config.with_log_level(&level)?;
        }
        Ok(config)
    }

    /// Moves data (and the default log directory) under `data_dir`.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        if self.log_dir == self.data_dir.join(LOG_DIR_NAME) {
            self.log_dir = data_dir.join(LOG_DIR_NAME);
        }
        self.data_dir = data_dir;
        self
    }

    pub fn with_backend(mut self, backend: StorageBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_log_level(mut self, level: &str) -> Result<Self, ConfigError> {
        self.log_level =
            parse_level(level).ok_or_else(|| ConfigError::InvalidLogLevel(level.trim().to_string()))?;
        Ok(self)
    }

    /// Applies a host-supplied data directory, resolving it against the current directory.
    pub fn override_data_dir(self, data_dir: &str) -> Result<Self, ConfigError> {
        let trimmed = data_dir.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyPath("data_dir"));
        }
        let cwd = current_dir()?;
        Ok(self.with_data_dir(absolutize(Path::new(trimmed), &cwd)))
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE_NAME)
    }

    pub fn log_settings(&self) -> LogSettings {
        LogSettings::new(self.log_level, self.log_dir.clone())
    }
}

fn current_dir() -> Result<PathBuf, ConfigError> {
    std::env::current_dir().map_err(|err| ConfigError::CurrentDir(err.to_string()))
}

fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::{CompanionConfig, ConfigError, StorageBackend};
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    fn resolve(vars: &[(&str, &str)]) -> Result<CompanionConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CompanionConfig::from_lookup(|name| vars.get(name).cloned(), Path::new("/home/user"))
    }

    #[test]
    fn defaults_live_under_working_directory() {
        let config = resolve(&[]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/home/user/.solace"));
        assert_eq!(config.log_dir, PathBuf::from("/home/user/.solace/logs"));
        assert_eq!(config.backend, StorageBackend::Sqlite);
        assert_eq!(
            config.database_path(),
            PathBuf::from("/home/user/.solace/solace.sqlite3")
        );
    }

    #[test]
    fn environment_values_are_normalised() {
        let config = resolve(&[
            ("SOLACE_DATA_DIR", "data"),
            ("SOLACE_STORAGE", " JSON "),
            ("SOLACE_LOG_LEVEL", "Warning"),
        ])
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/home/user/data"));
        assert_eq!(config.log_dir, PathBuf::from("/home/user/data/logs"));
        assert_eq!(config.backend, StorageBackend::Json);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn blank_environment_values_fall_back_to_defaults() {
        let config = resolve(&[("SOLACE_STORAGE", "  ")]).unwrap();
        assert_eq!(config.backend, StorageBackend::Sqlite);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(
            resolve(&[("SOLACE_STORAGE", "redis")]),
            Err(ConfigError::UnknownBackend("redis".to_string()))
        );
        assert_eq!(
            resolve(&[("SOLACE_LOG_LEVEL", "loud")]),
            Err(ConfigError::InvalidLogLevel("loud".to_string()))
        );
    }

    #[test]
    fn explicit_log_dir_survives_data_dir_override() {
        let mut config = resolve(&[]).unwrap();
        config.log_dir = PathBuf::from("/var/log/solace");
        let config = config.with_data_dir("/srv/solace");
        assert_eq!(config.log_dir, PathBuf::from("/var/log/solace"));
        assert_eq!(config.data_dir, PathBuf::from("/srv/solace"));
    }
}
