use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use passport_application::ReadingService;
use passport_core::config::PassportConfig;
use passport_infrastructure::storage::GEMINI_API_KEY_ENV;
use passport_infrastructure::{ConfigStorage, SecretStorage, resolve_gemini_key};
use passport_interaction::GeminiApiAgent;

pub mod ask;
pub mod health;
pub mod serve;

pub fn load_config(path: Option<&Path>) -> Result<PassportConfig> {
    let storage = match path {
        Some(path) => ConfigStorage::with_path(path),
        None => ConfigStorage::new().context("Failed to locate config directory")?,
    };
    storage
        .load()
        .with_context(|| format!("Failed to load {}", storage.path().display()))
}

/// `secret.json` beside an explicit config file, else the default location.
pub fn secret_storage(config_path: Option<&Path>) -> Result<SecretStorage> {
    match config_path {
        Some(path) => Ok(SecretStorage::beside(path)),
        None => SecretStorage::new().context("Failed to locate secret file"),
    }
}

/// Builds the server-side pipeline, with a Gemini backend when a key is configured.
pub fn reading_service(config: &PassportConfig, config_path: Option<&Path>) -> Result<ReadingService> {
    let secrets = secret_storage(config_path)?;
    Ok(build_reading_service(
        config,
        &secrets,
        std::env::var(GEMINI_API_KEY_ENV).ok(),
    ))
}

fn build_reading_service(
    config: &PassportConfig,
    secrets: &SecretStorage,
    env_key: Option<String>,
) -> ReadingService {
    let Some(api_key) = resolve_gemini_key(env_key, secrets) else {
        tracing::warn!(
            env = GEMINI_API_KEY_ENV,
            path = %secrets.path().display(),
            "no Gemini API key found, readings will report a credential error"
        );
        return ReadingService::without_backend();
    };

    let mut agent = GeminiApiAgent::new(api_key, config.backend.clone());
    if let Some(model) = secrets
        .load()
        .ok()
        .and_then(|secret| secret.gemini)
        .and_then(|gemini| gemini.model_name)
    {
        agent = agent.with_model(model);
    }
    tracing::info!(model = agent.model(), "Gemini backend ready");

    ReadingService::new(Arc::new(agent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_secret_beside_explicit_config_enables_backend() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[server]\nbind = \"0.0.0.0:8080\"\n").unwrap();
        fs::write(
            temp_dir.path().join("secret.json"),
            r#"{ "gemini": { "api_key": "k" } }"#,
        )
        .unwrap();

        let config = load_config(Some(&config_path)).unwrap();
        let secrets = secret_storage(Some(&config_path)).unwrap();
        let service = build_reading_service(&config, &secrets, None);

        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(secrets.path(), &temp_dir.path().join("secret.json"));
        assert!(service.has_backend());
    }

    #[test]
    fn test_missing_secret_beside_config_runs_without_backend() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let config = load_config(Some(&config_path)).unwrap();
        let secrets = secret_storage(Some(&config_path)).unwrap();

        assert!(!build_reading_service(&config, &secrets, None).has_backend());
        assert!(build_reading_service(&config, &secrets, Some("env-key".into())).has_backend());
    }
}
