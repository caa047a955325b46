//! Wire types for the `/api/chat` endpoint.
//!
//! Shared by the server and the HTTP transport so both sides agree on field
//! names (`cardNameCh`, `isReversed`, ...).

use serde::{Deserialize, Serialize};

use crate::error::{PassportError, Result};
use crate::guardrail::SENTINEL;
use crate::reading::ReadingRequest;

pub const MISSING_PARAMETERS: &str = "missing required parameters";
pub const CREDENTIAL_ERROR: &str = "credential configuration error";
pub const SERVER_ERROR: &str = "server error, please try again later";
/// Error code the server uses for a backend capacity signal.
pub const CHANNEL_BUSY: &str = "CHANNEL_BUSY";

/// Incoming request body. Fields are optional so a missing field becomes
/// a validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub card_name: Option<String>,
    #[serde(default)]
    pub card_name_ch: Option<String>,
    #[serde(default)]
    pub is_reversed: Option<bool>,
}

impl ChatRequest {
    /// Validates required fields. Empty strings count as missing.
    pub fn into_reading_request(self) -> Result<ReadingRequest> {
        let question = self.question.filter(|q| !q.is_empty());
        let card_name = self.card_name.filter(|n| !n.is_empty());
        match (question, card_name) {
            (Some(question), Some(card_name)) => Ok(ReadingRequest {
                question,
                card_name,
                card_name_ch: self.card_name_ch.unwrap_or_default(),
                is_reversed: self.is_reversed.unwrap_or(false),
            }),
            _ => Err(PassportError::validation(MISSING_PARAMETERS)),
        }
    }
}

impl From<&ReadingRequest> for ChatRequest {
    fn from(request: &ReadingRequest) -> Self {
        Self {
            question: Some(request.question.clone()),
            card_name: Some(request.card_name.clone()),
            card_name_ch: Some(request.card_name_ch.clone()),
            is_reversed: Some(request.is_reversed),
        }
    }
}

/// Card echoed back with a successful reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSummary {
    pub name: String,
    pub name_ch: String,
    pub is_reversed: bool,
}

/// Body of a 200 reply, either a reading or a filtered sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub reading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtered: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<CardSummary>,
}

impl ChatResponse {
    pub fn reading(reading: impl Into<String>, request: &ReadingRequest) -> Self {
        Self {
            success: true,
            reading: Some(reading.into()),
            filtered: None,
            card: Some(CardSummary {
                name: request.card_name.clone(),
                name_ch: request.card_name_ch.clone(),
                is_reversed: request.is_reversed,
            }),
        }
    }

    pub fn filtered() -> Self {
        Self {
            success: true,
            reading: Some(SENTINEL.to_string()),
            filtered: Some(true),
            card: None,
        }
    }

    pub fn is_filtered(&self) -> bool {
        self.filtered.unwrap_or(false)
    }
}

/// Body of a non-2xx reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }
}

/// Static health payload for `GET /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
    pub features: Vec<String>,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            message: "心靈護照 API 運作中".to_string(),
            version: "2.0".to_string(),
            features: vec![
                "敏感話題過濾".to_string(),
                "深度牌面解讀".to_string(),
                "專業占卜師語氣".to_string(),
            ],
        }
    }
}
