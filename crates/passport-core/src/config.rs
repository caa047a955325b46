//! Application configuration model.
//!
//! Every section and field has a default, so an empty or partial
//! `config.toml` is valid.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::flow::FlowRules;
use crate::flow::state::{DECK_SIZE, INITIAL_COINS, MAX_QUESTION_CHARS};

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PassportConfig {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    pub client: ClientSettings,
    pub flow: FlowSettings,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Generation settings sent with every model call.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BackendSettings {
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.8,
            top_p: 0.9,
            top_k: 40,
            max_output_tokens: 8000,
        }
    }
}

/// Retry policy of the reading client.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClientSettings {
    /// Full URL of the chat endpoint
    pub endpoint: String,
    pub timeout_ms: u64,
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:3000/api/chat".to_string(),
            timeout_ms: 15_000,
            max_attempts: 3,
            backoff_base_ms: 1_000,
        }
    }
}

impl ClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FlowSettings {
    /// Minimum time the loading step stays visible before the reveal
    pub reveal_delay_ms: u64,
    pub max_question_chars: usize,
    pub deck_size: usize,
    pub initial_coins: u32,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            reveal_delay_ms: 1_500,
            max_question_chars: MAX_QUESTION_CHARS,
            deck_size: DECK_SIZE,
            initial_coins: INITIAL_COINS,
        }
    }
}

impl FlowSettings {
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn rules(&self) -> FlowRules {
        FlowRules {
            max_question_chars: self.max_question_chars,
            deck_size: self.deck_size,
            initial_coins: self.initial_coins,
        }
    }
}

/// API keys loaded from `secret.json`.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SecretConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini: Option<GeminiSecret>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GeminiSecret {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_retry_contract() {
        let config = PassportConfig::default();
        assert_eq!(config.client.timeout(), Duration::from_secs(15));
        assert_eq!(config.client.max_attempts, 3);
        assert_eq!(config.client.backoff_base(), Duration::from_secs(1));
        assert_eq!(config.flow.reveal_delay(), Duration::from_millis(1500));
        assert_eq!(config.backend.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: PassportConfig = toml::from_str(
            r#"
            [client]
            max_attempts = 5

            [backend]
            temperature = 0.2
            "#,
        )
        .unwrap();

        assert_eq!(config.client.max_attempts, 5);
        assert_eq!(config.client.timeout_ms, 15_000);
        assert_eq!(config.backend.temperature, 0.2);
        assert_eq!(config.backend.top_k, 40);
        assert_eq!(config.server, ServerSettings::default());
    }
}
