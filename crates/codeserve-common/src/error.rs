//! Configuration errors.
//!
//! Engine and lifecycle failures live in their own crates; this module only
//! covers what can go wrong before any of them run.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load or validate a [`LauncherConfig`](crate::config::LauncherConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Invalid {
        /// Description of the invalid value.
        message: String,
    },

    /// The configuration file could not be read.
    #[error("cannot read config file {path}: {source}")]
    Read {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for the model.
    #[error("cannot parse config file {path}: {source}")]
    Parse {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying deserialization error.
        source: serde_json::Error,
    },
}

/// Convenience alias for configuration results.
pub type Result<T> = std::result::Result<T, ConfigError>;
