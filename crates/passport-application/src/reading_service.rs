//! Server-side reading pipeline behind `POST /api/chat`.
//!
//! validate → guardrail → credential → prompt → backend → sentinel check → sanitize

use std::sync::Arc;

use async_trait::async_trait;
use passport_core::api::{
    CHANNEL_BUSY, CREDENTIAL_ERROR, ChatRequest, ChatResponse, ErrorResponse, MISSING_PARAMETERS,
    SERVER_ERROR,
};
use passport_core::ports::{BackendError, GenerationBackend};
use passport_core::reading::{ReadingOutcome, ReadingRequest};
use passport_core::{PassportError, guardrail, prompt, sanitizer};
use passport_interaction::{AttemptError, ReadingTransport};

/// Failure of one chat request, mapped 1:1 onto an HTTP reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    Validation,
    Credential,
    ChannelBusy,
    Server(String),
}

impl ChatError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::ChannelBusy => 503,
            Self::Credential | Self::Server(_) => 500,
        }
    }

    pub fn body(&self) -> ErrorResponse {
        match self {
            Self::Validation => ErrorResponse::new(MISSING_PARAMETERS),
            Self::Credential => ErrorResponse::new(CREDENTIAL_ERROR),
            Self::ChannelBusy => ErrorResponse::new(CHANNEL_BUSY),
            Self::Server(_) => ErrorResponse::new(SERVER_ERROR),
        }
    }
}

impl From<PassportError> for ChatError {
    fn from(err: PassportError) -> Self {
        match err {
            PassportError::Validation(_) => Self::Validation,
            PassportError::Config(_) => Self::Credential,
            other => Self::Server(other.to_string()),
        }
    }
}

impl From<BackendError> for ChatError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Credential(_) => Self::Credential,
            BackendError::Busy(_) => Self::ChannelBusy,
            BackendError::Failed(message) => Self::Server(message),
        }
    }
}

/// Answers chat requests with a generation backend.
///
/// The backend is optional: without a credential the service still serves
/// validation errors and filtered replies, and reports a credential error for
/// everything else.
#[derive(Clone)]
pub struct ReadingService {
    backend: Option<Arc<dyn GenerationBackend>>,
}

impl ReadingService {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    pub fn without_backend() -> Self {
        Self { backend: None }
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Handles a raw request body.
    pub async fn answer(&self, body: ChatRequest) -> Result<ChatResponse, ChatError> {
        let request = body.into_reading_request()?;
        self.answer_request(&request).await
    }

    pub async fn answer_request(&self, request: &ReadingRequest) -> Result<ChatResponse, ChatError> {
        if let guardrail::Verdict::Sensitive { category, .. } = guardrail::classify(&request.question)
        {
            tracing::info!(category = %category, "question filtered by keyword guardrail");
            return Ok(ChatResponse::filtered());
        }

        let backend = self.backend.as_ref().ok_or_else(|| {
            tracing::error!("no Gemini API key configured");
            ChatError::Credential
        })?;

        let prompt = prompt::build_prompt(
            &request.question,
            &request.card_name,
            &request.card_name_ch,
            request.is_reversed,
        )?;

        let raw = backend.generate(&prompt).await.map_err(|err| {
            tracing::error!(error = %err, "generation backend failed");
            ChatError::from(err)
        })?;

        match sanitizer::finalize_reading(&raw) {
            ReadingOutcome::Success { text } => {
                tracing::info!(card = %request.card_name, reversed = request.is_reversed, "reading generated");
                Ok(ChatResponse::reading(text, request))
            }
            _ => {
                tracing::info!("backend answered with the sentinel");
                Ok(ChatResponse::filtered())
            }
        }
    }
}

/// Lets the flow controller run against the service without a network hop.
#[async_trait]
impl ReadingTransport for ReadingService {
    async fn send(&self, request: &ReadingRequest) -> Result<ChatResponse, AttemptError> {
        self.answer_request(request).await.map_err(|err| match err {
            ChatError::ChannelBusy => AttemptError::ChannelBusy,
            other => AttemptError::Transient(format!("{other:?}")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use passport_core::guardrail::SENTINEL;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend that returns a fixed reply and records prompts.
    struct FixedBackend {
        reply: Result<String, BackendError>,
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl FixedBackend {
        fn new(reply: Result<String, BackendError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl GenerationBackend for FixedBackend {
        async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone()
        }
    }

    fn body(question: &str, card_name: &str) -> ChatRequest {
        ChatRequest {
            question: Some(question.into()),
            card_name: Some(card_name.into()),
            card_name_ch: Some("月亮".into()),
            is_reversed: Some(true),
        }
    }

    #[tokio::test]
    async fn test_reading_is_sanitized_and_echoes_card() {
        let backend = FixedBackend::new(Ok("池中的龍蝦正慢慢爬上岸喵～".into()));
        let service = ReadingService::new(backend.clone());

        let reply = service.answer(body("我該相信直覺嗎", "The Moon")).await.unwrap();

        assert_eq!(reply.reading.as_deref(), Some("池中的龍蝦正慢慢爬上岸"));
        let card = reply.card.unwrap();
        assert_eq!(card.name, "The Moon");
        assert!(card.is_reversed);

        let prompts = backend.prompts.lock().unwrap();
        assert!(prompts[0].contains("月光下的道路"));
    }

    #[tokio::test]
    async fn test_sensitive_question_skips_backend() {
        let backend = FixedBackend::new(Ok("unused".into()));
        let service = ReadingService::new(backend.clone());

        let reply = service.answer(body("比特幣會漲嗎", "The Moon")).await.unwrap();

        assert_eq!(reply, ChatResponse::filtered());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_backend_sentinel_becomes_filtered() {
        let backend = FixedBackend::new(Ok(format!("{SENTINEL}\n")));
        let service = ReadingService::new(backend);

        let reply = service.answer(body("隔壁的人", "The Moon")).await.unwrap();
        assert!(reply.is_filtered());
        assert_eq!(reply.reading.as_deref(), Some(SENTINEL));
    }

    #[tokio::test]
    async fn test_missing_parameters() {
        let service = ReadingService::without_backend();
        let err = service.answer(ChatRequest::default()).await.unwrap_err();
        assert_eq!(err, ChatError::Validation);
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.body().error, MISSING_PARAMETERS);
    }

    #[tokio::test]
    async fn test_missing_credential_after_guardrail() {
        let service = ReadingService::without_backend();

        let filtered = service.answer(body("股市走勢", "The Moon")).await.unwrap();
        assert!(filtered.is_filtered());

        let err = service.answer(body("感情", "The Moon")).await.unwrap_err();
        assert_eq!(err, ChatError::Credential);
        assert_eq!(err.body().error, CREDENTIAL_ERROR);
    }

    #[tokio::test]
    async fn test_unknown_card_never_calls_backend() {
        let backend = FixedBackend::new(Ok("unused".into()));
        let service = ReadingService::new(backend.clone());

        let err = service.answer(body("感情", "The Jester")).await.unwrap_err();

        assert!(matches!(err, ChatError::Server(_)));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_backend_errors_are_classified() {
        let busy = ReadingService::new(FixedBackend::new(Err(BackendError::Busy("quota".into()))));
        let err = busy.answer(body("感情", "The Moon")).await.unwrap_err();
        assert_eq!(err, ChatError::ChannelBusy);
        assert_eq!(err.status_code(), 503);

        let transport_err = busy.send(&body("感情", "The Moon").into_reading_request().unwrap()).await;
        assert_eq!(transport_err, Err(AttemptError::ChannelBusy));

        let bad_key = ReadingService::new(FixedBackend::new(Err(BackendError::Credential(
            "API key not valid".into(),
        ))));
        let err = bad_key.answer(body("感情", "The Moon")).await.unwrap_err();
        assert_eq!(err, ChatError::Credential);
    }
}
