//! Explicit configuration values for core components.
//!
//! # Responsibility
//! - Describe paging, copy and logging settings as plain values.
//! - Load settings from JSON and validate them before use.
//!
//! # Invariants
//! - Configuration is passed to components by value or reference; core keeps
//!   no process-wide settings holder.
//! - Every field has a default, so partial documents are accepted.

use crate::copy::{CopyStrategy, DEFAULT_MAX_DEPTH};
use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 20;

/// Configuration load/validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "failed to parse configuration: {err}"),
            Self::Invalid { field, reason } => {
                write!(f, "invalid configuration value `{field}`: {reason}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Resource-parameter defaults applied by services before paging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    /// Page size used when the caller does not ask for one.
    pub default_page_size: u32,
    /// Upper bound a requested page size is clamped to.
    pub max_page_size: u32,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyConfig {
    pub strategy: CopyStrategy,
    pub max_depth: usize,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            strategy: CopyStrategy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Rolling file log settings.
///
/// `log_dir = None` means the host does not want core to start a logger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub log_dir: Option<String>,
    pub max_file_size_bytes: u64,
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            log_dir: None,
            max_file_size_bytes: 10 * 1024 * 1024,
            max_files: 5,
        }
    }
}

/// Root configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub paging: PagingConfig,
    pub copy: CopyConfig,
    pub logging: LoggingConfig,
}

impl CoreConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.paging.default_page_size == 0 {
            return Err(invalid("paging.default_page_size", "must be at least 1"));
        }
        if self.paging.max_page_size < self.paging.default_page_size {
            return Err(invalid(
                "paging.max_page_size",
                format!(
                    "must not be smaller than default_page_size ({})",
                    self.paging.default_page_size
                ),
            ));
        }
        if self.copy.max_depth == 0 {
            return Err(invalid("copy.max_depth", "must be at least 1"));
        }
        if self.logging.max_files == 0 {
            return Err(invalid("logging.max_files", "must be at least 1"));
        }
        if self.logging.max_file_size_bytes == 0 {
            return Err(invalid("logging.max_file_size_bytes", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
