//! Storage for configuration and secret files.

mod config_storage;
mod secret_storage;

pub use config_storage::ConfigStorage;
pub use secret_storage::{GEMINI_API_KEY_ENV, SecretStorage, SecretStorageError, resolve_gemini_key};
