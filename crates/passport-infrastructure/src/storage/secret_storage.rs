//! Secret configuration file storage.
//!
//! Provides loading of secret configuration from ~/.config/soul-passport/secret.json.

use crate::paths::{PassportPaths, SECRET_FILE_NAME};
use passport_core::config::SecretConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the key stored in secret.json.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Errors that can occur during secret storage operations.
#[derive(Debug)]
pub enum SecretStorageError {
    /// Configuration file not found.
    NotFound(PathBuf),
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON parsing error.
    ParseError(serde_json::Error),
    /// Config directory not found.
    ConfigDirNotFound,
}

impl std::fmt::Display for SecretStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretStorageError::NotFound(path) => {
                write!(f, "Secret file not found at: {}", path.display())
            }
            SecretStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            SecretStorageError::ParseError(e) => write!(f, "JSON parse error: {}", e),
            SecretStorageError::ConfigDirNotFound => {
                write!(f, "Could not determine home directory")
            }
        }
    }
}

impl std::error::Error for SecretStorageError {}

impl From<std::io::Error> for SecretStorageError {
    fn from(e: std::io::Error) -> Self {
        SecretStorageError::IoError(e)
    }
}

impl From<serde_json::Error> for SecretStorageError {
    fn from(e: serde_json::Error) -> Self {
        SecretStorageError::ParseError(e)
    }
}

/// Read-only storage for secret.json.
///
/// # Security Note
///
/// This storage reads plaintext JSON files. The secret.json file should have
/// appropriate file permissions (e.g., 600) to prevent unauthorized access.
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    /// Creates a new SecretStorage with the default path.
    pub fn new() -> Result<Self, SecretStorageError> {
        let path = PassportPaths::secret_file().map_err(|_| SecretStorageError::ConfigDirNotFound)?;
        Ok(Self { path })
    }

    /// Creates a new SecretStorage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Storage for the `secret.json` that sits next to `config_file`.
    pub fn beside(config_file: &Path) -> Self {
        Self {
            path: config_file.with_file_name(SECRET_FILE_NAME),
        }
    }

    /// Loads and parses the secret file.
    pub fn load(&self) -> Result<SecretConfig, SecretStorageError> {
        if !self.path.exists() {
            return Err(SecretStorageError::NotFound(self.path.clone()));
        }

        let content = fs::read_to_string(&self.path)?;
        let config = serde_json::from_str(&content)?;

        Ok(config)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

/// Finds the Gemini API key.
///
/// Priority:
/// 1. `GEMINI_API_KEY` environment variable (`env_value`)
/// 2. `gemini.api_key` in secret.json
///
/// Blank values count as missing. Secrets are never logged.
pub fn resolve_gemini_key(env_value: Option<String>, storage: &SecretStorage) -> Option<String> {
    if let Some(key) = env_value.filter(|key| !key.trim().is_empty()) {
        return Some(key);
    }

    match storage.load() {
        Ok(config) => config
            .gemini
            .map(|gemini| gemini.api_key)
            .filter(|key| !key.trim().is_empty()),
        Err(SecretStorageError::NotFound(_)) => None,
        Err(err) => {
            tracing::warn!(path = %storage.path().display(), error = %err, "could not read secret file");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        let storage = SecretStorage::with_path(file_path.clone());

        match storage.load() {
            Err(SecretStorageError::NotFound(path)) => assert_eq!(path, file_path),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_load_valid_json() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        fs::write(
            &file_path,
            r#"{ "gemini": { "api_key": "test-key-123", "model_name": "gemini-pro" } }"#,
        )
        .unwrap();

        let config = SecretStorage::with_path(file_path).load().unwrap();
        let gemini = config.gemini.unwrap();
        assert_eq!(gemini.api_key, "test-key-123");
        assert_eq!(gemini.model_name, Some("gemini-pro".to_string()));
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        fs::write(&file_path, "{ invalid json").unwrap();

        let result = SecretStorage::with_path(file_path).load();
        assert!(matches!(result, Err(SecretStorageError::ParseError(_))));
    }

    #[test]
    fn test_env_key_wins_over_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        fs::write(&file_path, r#"{ "gemini": { "api_key": "from-file" } }"#).unwrap();
        let storage = SecretStorage::with_path(file_path);

        assert_eq!(
            resolve_gemini_key(Some("from-env".into()), &storage),
            Some("from-env".to_string())
        );
        assert_eq!(
            resolve_gemini_key(Some("   ".into()), &storage),
            Some("from-file".to_string())
        );
        assert_eq!(resolve_gemini_key(None, &storage), Some("from-file".to_string()));
    }

    #[test]
    fn test_beside_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("deploy/config.toml");
        fs::create_dir_all(temp_dir.path().join("deploy")).unwrap();
        fs::write(
            temp_dir.path().join("deploy/secret.json"),
            r#"{ "gemini": { "api_key": "deploy-key" } }"#,
        )
        .unwrap();

        let storage = SecretStorage::beside(&config_file);

        assert_eq!(storage.path(), &temp_dir.path().join("deploy/secret.json"));
        assert_eq!(resolve_gemini_key(None, &storage), Some("deploy-key".to_string()));
    }

    #[test]
    fn test_missing_key_everywhere() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SecretStorage::with_path(temp_dir.path().join("secret.json"));
        assert_eq!(resolve_gemini_key(None, &storage), None);

        fs::write(storage.path(), r#"{ "gemini": { "api_key": "" } }"#).unwrap();
        assert_eq!(resolve_gemini_key(None, &storage), None);
    }
}
