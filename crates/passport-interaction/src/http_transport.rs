//! Reading transport over HTTP to a `/api/chat` endpoint.

use async_trait::async_trait;
use passport_core::api::{CHANNEL_BUSY, ChatRequest, ChatResponse, ErrorResponse};
use passport_core::reading::ReadingRequest;
use reqwest::Client;

use crate::transport::{AttemptError, ReadingTransport};

#[derive(Clone)]
pub struct HttpReadingTransport {
    client: Client,
    endpoint: String,
}

impl HttpReadingTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ReadingTransport for HttpReadingTransport {
    async fn send(&self, request: &ReadingRequest) -> Result<ChatResponse, AttemptError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest::from(request))
            .send()
            .await
            .map_err(|err| AttemptError::Transient(format!("reading request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error_body(status.as_u16(), &body));
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|err| AttemptError::Malformed(err.to_string()))
    }
}

fn classify_error_body(status: u16, body: &str) -> AttemptError {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(error) if error.error == CHANNEL_BUSY => AttemptError::ChannelBusy,
        Ok(error) => AttemptError::Transient(format!(
            "HTTP {status}: {}",
            error.message.unwrap_or(error.error)
        )),
        Err(_) => AttemptError::Transient(format!("HTTP {status}: {body}")),
    }
}
