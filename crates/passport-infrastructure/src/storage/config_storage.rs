//! TOML storage for [`PassportConfig`].

use std::fs;
use std::path::{Path, PathBuf};

use passport_core::config::PassportConfig;
use passport_core::{PassportError, Result};

use crate::paths::PassportPaths;

/// Loads and saves config.toml.
///
/// A missing file is not an error: defaults are returned so the binary runs
/// without any setup.
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Uses the default location (`~/.config/soul-passport/config.toml`).
    pub fn new() -> Result<Self> {
        let path = PassportPaths::config_file().map_err(|e| PassportError::config(e.to_string()))?;
        Ok(Self { path })
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<PassportConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "config file not found, using defaults");
            return Ok(PassportConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let config: PassportConfig = toml::from_str(&content)?;
        tracing::debug!(path = %self.path.display(), "loaded config");
        Ok(config)
    }

    /// Writes the config, creating the parent directory when needed.
    pub fn save(&self, config: &PassportConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(config)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::with_path(temp_dir.path().join("config.toml"));
        assert_eq!(storage.load().unwrap(), PassportConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::with_path(temp_dir.path().join("nested/config.toml"));

        let mut config = PassportConfig::default();
        config.client.max_attempts = 4;
        config.server.bind = "0.0.0.0:8080".to_string();
        storage.save(&config).unwrap();

        assert_eq!(storage.load().unwrap(), config);
    }

    #[test]
    fn test_invalid_toml_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[client\nmax_attempts = ").unwrap();

        let err = ConfigStorage::with_path(path).load().unwrap_err();
        assert!(matches!(err, PassportError::Serialization { ref format, .. } if format == "TOML"));
    }
}
