//! Unified path management for Soul Passport configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/soul-passport/     # Config directory
//! ├── config.toml              # Application configuration
//! ├── secret.json              # API keys
//! └── consent                  # Present once the user accepted the disclaimer
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "soul-passport";
/// File name of the secrets file, also looked up beside an explicit config file.
pub const SECRET_FILE_NAME: &str = "secret.json";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

pub struct PassportPaths;

impl PassportPaths {
    /// Returns the configuration directory (e.g., `~/.config/soul-passport/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join(SECRET_FILE_NAME))
    }

    pub fn consent_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("consent"))
    }
}
