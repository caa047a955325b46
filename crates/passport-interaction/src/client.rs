//! Retrying reading client.
//!
//! `send` never fails: every path ends in a [`ReadingOutcome`] with text the
//! user can read, falling back to a templated reading when the backend gives up.

use std::time::Duration;

use passport_core::api::ChatResponse;
use passport_core::config::ClientSettings;
use passport_core::reading::{ReadingErrorKind, ReadingOutcome, ReadingRequest};
use passport_core::{guardrail, prompt, sanitizer};

use crate::transport::ReadingTransport;

/// Attempt budget, per-attempt deadline and backoff base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub timeout: Duration,
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&ClientSettings::default())
    }
}

impl From<&ClientSettings> for RetryPolicy {
    fn from(settings: &ClientSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            timeout: settings.timeout(),
            backoff_base: settings.backoff_base(),
        }
    }
}

impl RetryPolicy {
    /// Wait before the attempt following `attempt` (0-based): `base * 2^attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(2u32.saturating_pow(attempt))
    }
}

pub struct ResilientReadingClient<T> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: ReadingTransport> ResilientReadingClient<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Runs the guarded, retrying pipeline for one request.
    pub async fn send(&self, request: &ReadingRequest) -> ReadingOutcome {
        if let guardrail::Verdict::Sensitive { category, .. } = guardrail::classify(&request.question)
        {
            tracing::info!(category = %category, "question filtered before sending");
            return ReadingOutcome::filtered();
        }

        if let Err(err) = prompt::resolve_card(&request.card_name) {
            tracing::error!(error = %err, "refusing to send reading request");
            return ReadingOutcome::failure(ReadingErrorKind::MissingReferenceData, request);
        }

        let mut last_kind = ReadingErrorKind::TransientBackend;
        for attempt in 0..self.policy.max_attempts {
            // Dropping the attempt future on expiry cancels the in-flight call,
            // so a late reply can never be observed.
            let result = tokio::time::timeout(self.policy.timeout, self.transport.send(request)).await;

            let kind = match result {
                Ok(Ok(reply)) => match accept_reply(reply) {
                    Ok(outcome) => {
                        tracing::debug!(attempt = attempt + 1, "reading received");
                        return outcome;
                    }
                    Err(kind) => kind,
                },
                Ok(Err(err)) => {
                    tracing::warn!(attempt = attempt + 1, error = %err, "reading attempt failed");
                    err.kind()
                }
                Err(_) => {
                    tracing::warn!(attempt = attempt + 1, timeout_ms = self.policy.timeout.as_millis() as u64, "reading attempt timed out");
                    ReadingErrorKind::Timeout
                }
            };

            let is_last = attempt + 1 >= self.policy.max_attempts;
            if !kind.is_retryable() || is_last {
                last_kind = kind;
                break;
            }

            let wait = self.policy.backoff(attempt);
            tracing::debug!(attempt = attempt + 1, wait_ms = wait.as_millis() as u64, kind = %kind, "backing off");
            last_kind = kind;
            tokio::time::sleep(wait).await;
        }

        tracing::warn!(kind = %last_kind, "reading failed, using fallback");
        ReadingOutcome::failure(last_kind, request)
    }
}

/// Validates the reply shape and applies the post-response guardrail and sanitizer.
fn accept_reply(reply: ChatResponse) -> Result<ReadingOutcome, ReadingErrorKind> {
    let reading = match reply.reading {
        Some(reading) if reply.success && !reading.trim().is_empty() => reading,
        _ => {
            tracing::warn!("reply is missing a reading under a success flag");
            return Err(ReadingErrorKind::MalformedResponse);
        }
    };

    if reply.filtered.unwrap_or(false) {
        return Ok(ReadingOutcome::filtered());
    }
    Ok(sanitizer::finalize_reading(&reading))
}
