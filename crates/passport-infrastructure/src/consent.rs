//! Consent flag persisted as a marker file.

use std::fs;
use std::path::{Path, PathBuf};

use passport_core::ports::ConsentStore;
use passport_core::{PassportError, Result};

use crate::paths::PassportPaths;

const AGREED: &str = "true";

pub struct FileConsentStore {
    path: PathBuf,
}

impl FileConsentStore {
    pub fn new() -> Result<Self> {
        let path =
            PassportPaths::consent_file().map_err(|e| PassportError::config(e.to_string()))?;
        Ok(Self { path })
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConsentStore for FileConsentStore {
    fn has_agreed(&self) -> Result<bool> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content.trim() == AGREED),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn record_agreement(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, AGREED)?;
        tracing::info!(path = %self.path.display(), "recorded consent");
        Ok(())
    }
}
