//! Store and logging configuration.
//!
//! # Responsibility
//! - Resolve the store location so tests and production use distinct files.
//! - Resolve optional file logging settings.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - Resolution never touches the filesystem.

use crate::logging::default_log_level;
use std::path::PathBuf;

/// Environment variable naming the SQLite store file.
pub const DB_PATH_ENV: &str = "PETCARE_DB";
/// Environment variable naming the log level (`trace|debug|info|warn|error`).
pub const LOG_LEVEL_ENV: &str = "PETCARE_LOG_LEVEL";
/// Environment variable naming an absolute log directory.
pub const LOG_DIR_ENV: &str = "PETCARE_LOG_DIR";
/// Store file used when `PETCARE_DB` is unset.
pub const DEFAULT_DB_FILE_NAME: &str = "petcare.sqlite3";

/// Where the store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
}

impl StoreConfig {
    /// Reads `PETCARE_DB`, falling back to `petcare.sqlite3` in the working
    /// directory.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let db_path = non_blank(lookup(DB_PATH_ENV))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE_NAME));
        Self { db_path }
    }
}

/// File logging settings. Logging stays off when `dir` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    pub dir: Option<PathBuf>,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            level: non_blank(lookup(LOG_LEVEL_ENV))
                .unwrap_or_else(|| default_log_level().to_string()),
            dir: non_blank(lookup(LOG_DIR_ENV)).map(PathBuf::from),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}
