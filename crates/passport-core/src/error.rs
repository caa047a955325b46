//! Error types for the Soul Passport application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Soul Passport workspace.
///
/// Reading failures that the user should still see a reading for are not
/// represented here; those are classified as [`crate::reading::ReadingErrorKind`]
/// and carried inside a [`crate::reading::ReadingOutcome`].
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum PassportError {
    /// Required input was missing or malformed (surfaced as HTTP 400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The backend credential or another setting is missing
    #[error("Configuration error: {0}")]
    Config(String),

    /// A card has no entry in the reference data
    #[error("Missing reference data for card '{card}'")]
    MissingReferenceData { card: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Export rendering failed
    #[error("Export error: {0}")]
    Export(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PassportError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a MissingReferenceData error
    pub fn missing_reference(card: impl Into<String>) -> Self {
        Self::MissingReferenceData { card: card.into() }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a missing reference data error
    pub fn is_missing_reference(&self) -> bool {
        matches!(self, Self::MissingReferenceData { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for PassportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PassportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PassportError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for PassportError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<minijinja::Error> for PassportError {
    fn from(err: minijinja::Error) -> Self {
        Self::Internal(format!("template error: {err}"))
    }
}

/// A type alias for `Result<T, PassportError>`.
pub type Result<T> = std::result::Result<T, PassportError>;
