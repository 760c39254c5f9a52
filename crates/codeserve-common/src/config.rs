//! Launcher configuration model.
//!
//! Values are layered: built-in defaults, then an optional JSON file named by
//! `CODESERVE_CONFIG`, then the `CODESERVE_PORT` / `CODESERVE_WORKSPACE`
//! environment variables. The image and container name are constants and are
//! not part of the model.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{CONFIG_FILE_ENV, DEFAULT_HOST_PORT, PORT_ENV, WORKSPACE_ENV};
use crate::error::{ConfigError, Result};

/// Root configuration for a launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LauncherConfig {
    /// Host port published for the editor server.
    pub host_port: u16,
    /// Directory, relative to the working directory, mounted at `/app`.
    pub workspace_dir: PathBuf,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            host_port: DEFAULT_HOST_PORT,
            workspace_dir: PathBuf::from("."),
        }
    }
}

impl LauncherConfig {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or a value is invalid.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration using `lookup` to read environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or a value is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match lookup(CONFIG_FILE_ENV) {
            Some(path) if !path.is_empty() => Self::load(Path::new(&path))?,
            _ => Self::default(),
        };

        if let Some(port) = lookup(PORT_ENV) {
            config.host_port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                message: format!("{PORT_ENV} is not a port number: {port:?}"),
            })?;
        }
        if let Some(dir) = lookup(WORKSPACE_ENV) {
            config.workspace_dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON configuration file. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Checks that the values can produce a valid container specification.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for a zero host port or an absolute
    /// workspace directory.
    pub fn validate(&self) -> Result<()> {
        if self.host_port == 0 {
            return Err(ConfigError::Invalid {
                message: "host port must be non-zero".into(),
            });
        }
        if self.workspace_dir.is_absolute() {
            return Err(ConfigError::Invalid {
                message: format!(
                    "workspace directory must be relative to the working directory: {}",
                    self.workspace_dir.display()
                ),
            });
        }
        Ok(())
    }
}
