//! Single-attempt delivery of a reading request.

use async_trait::async_trait;
use passport_core::api::ChatResponse;
use passport_core::reading::{ReadingErrorKind, ReadingRequest};
use thiserror::Error;

/// Why one attempt failed. Timeouts are imposed by the caller, not reported here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttemptError {
    #[error("channel busy")]
    ChannelBusy,

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("{0}")]
    Transient(String),
}

impl AttemptError {
    pub fn kind(&self) -> ReadingErrorKind {
        match self {
            Self::ChannelBusy => ReadingErrorKind::ChannelBusy,
            Self::Malformed(_) => ReadingErrorKind::MalformedResponse,
            Self::Transient(_) => ReadingErrorKind::TransientBackend,
        }
    }
}

/// Sends one reading request and returns the raw reply.
///
/// Implementations must be cancel-safe: the client drops the returned future
/// when an attempt times out.
#[async_trait]
pub trait ReadingTransport: Send + Sync {
    async fn send(&self, request: &ReadingRequest) -> Result<ChatResponse, AttemptError>;
}
