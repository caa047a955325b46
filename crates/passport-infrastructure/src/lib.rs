//! File-backed storage for configuration, secrets and the consent flag.

pub mod consent;
pub mod paths;
pub mod storage;

pub use consent::FileConsentStore;
pub use paths::{PassportPaths, PathError};
pub use storage::{ConfigStorage, SecretStorage, SecretStorageError, resolve_gemini_key};
