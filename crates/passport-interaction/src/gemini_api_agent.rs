//! GeminiApiAgent - Direct REST API implementation for Gemini.
//!
//! Calls the `generateContent` endpoint with the configured generation
//! settings and classifies failures into [`BackendError`] variants.

use async_trait::async_trait;
use passport_core::config::BackendSettings;
use passport_core::ports::{BackendError, GenerationBackend};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Backend implementation that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiApiAgent {
    client: Client,
    api_key: String,
    settings: BackendSettings,
    base_url: String,
}

impl GeminiApiAgent {
    /// Creates a new agent with the provided API key and generation settings.
    pub fn new(api_key: impl Into<String>, settings: BackendSettings) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            settings,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.settings.model = model.into();
        self
    }

    /// Points the agent at another API root (used against local stubs).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    fn build_request(&self, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.settings.temperature,
                top_p: self.settings.top_p,
                top_k: self.settings.top_k,
                max_output_tokens: self.settings.max_output_tokens,
            },
        }
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String, BackendError> {
        let url = format!(
            "{}/{model}:generateContent",
            self.base_url,
            model = self.settings.model,
        );

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| BackendError::Failed(format!("Gemini API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| BackendError::Failed(format!("Failed to parse Gemini response: {err}")))?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl GenerationBackend for GeminiApiAgent {
    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        tracing::debug!(model = %self.settings.model, prompt_chars = prompt.chars().count(), "calling Gemini");
        let request = self.build_request(prompt);
        self.send_request(&request).await
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String, BackendError> {
    let text: String = response
        .candidates
        .and_then(|mut candidates| candidates.pop())
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(BackendError::Failed(
            "Gemini API returned no text in the response candidates".into(),
        ));
    }
    Ok(text)
}

fn map_http_error(status: StatusCode, body: &str) -> BackendError {
    let (status_text, message) = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            (
                wrapper.error.status.unwrap_or_default(),
                wrapper.error.message.unwrap_or_else(|| body.to_string()),
            )
        })
        .unwrap_or_else(|_| (String::new(), body.to_string()));

    let detail = if status_text.is_empty() {
        message.clone()
    } else {
        format!("{status_text}: {message}")
    };

    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || message.contains("API key")
    {
        return BackendError::Credential(detail);
    }

    if status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::SERVICE_UNAVAILABLE
        || status_text == "RESOURCE_EXHAUSTED"
        || status_text == "UNAVAILABLE"
    {
        return BackendError::Busy(detail);
    }

    BackendError::Failed(format!("HTTP {}: {detail}", status.as_u16()))
}
