//! Reading requests and their classified outcomes.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::card::{DrawnCard, Orientation};
use crate::guardrail::SENTINEL;

/// Transient request built for one draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingRequest {
    pub question: String,
    pub card_name: String,
    pub card_name_ch: String,
    pub is_reversed: bool,
}

impl ReadingRequest {
    pub fn new(question: impl Into<String>, drawn: &DrawnCard) -> Self {
        Self {
            question: question.into(),
            card_name: drawn.card.name.to_string(),
            card_name_ch: drawn.card.name_ch.to_string(),
            is_reversed: drawn.is_reversed(),
        }
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::from_reversed(self.is_reversed)
    }
}

/// Classification of a failed reading attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadingErrorKind {
    /// The attempt exceeded its deadline and was aborted
    Timeout,
    /// The backend reported it is at capacity
    ChannelBusy,
    /// The reply did not carry a non-empty reading under a success flag
    MalformedResponse,
    /// The card has no reference entry; raised before any network attempt
    MissingReferenceData,
    /// Any other transport or backend failure
    TransientBackend,
}

impl ReadingErrorKind {
    /// Whether another attempt may help within the retry budget.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::MalformedResponse | Self::TransientBackend)
    }

    /// Short user-facing notice shown next to the fallback reading.
    pub fn advisory(&self) -> &'static str {
        match self {
            Self::Timeout => "奧莉貓現在有點累了，請稍後再試 😴",
            Self::ChannelBusy => "通道繁忙，請稍後再試 🌟",
            _ => "奧莉貓現在去抓蝴蝶了，請稍後再試喵～ 🦋",
        }
    }
}

/// Final result of the reading pipeline. Every variant has displayable text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReadingOutcome {
    Success {
        text: String,
    },
    Filtered {
        text: String,
    },
    Failure {
        kind: ReadingErrorKind,
        fallback: String,
    },
}

impl ReadingOutcome {
    pub fn filtered() -> Self {
        Self::Filtered {
            text: SENTINEL.to_string(),
        }
    }

    pub fn failure(kind: ReadingErrorKind, request: &ReadingRequest) -> Self {
        Self::Failure {
            kind,
            fallback: fallback_reading(&request.card_name_ch, request.orientation()),
        }
    }

    /// Text to display for this outcome.
    pub fn text(&self) -> &str {
        match self {
            Self::Success { text } | Self::Filtered { text } => text,
            Self::Failure { fallback, .. } => fallback,
        }
    }

    pub fn advisory(&self) -> Option<&'static str> {
        match self {
            Self::Failure { kind, .. } => Some(kind.advisory()),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_filtered(&self) -> bool {
        matches!(self, Self::Filtered { .. })
    }

    pub fn error_kind(&self) -> Option<&ReadingErrorKind> {
        match self {
            Self::Failure { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

/// Templated reading shown when the backend could not produce one.
pub fn fallback_reading(card_name_ch: &str, orientation: Orientation) -> String {
    match orientation {
        Orientation::Reversed => {
            format!("{card_name_ch}提醒你需要重新審視某些事情喵～雖然看似困難，但這是成長的機會！")
        }
        Orientation::Upright => {
            format!("{card_name_ch}帶來了正向的能量喵～相信自己的直覺，美好的事情即將發生！")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::card_by_id;

    #[test]
    fn test_request_from_drawn_card() {
        let drawn = DrawnCard::new(card_by_id(9).unwrap(), Orientation::Reversed);
        let request = ReadingRequest::new("該換工作嗎", &drawn);

        assert_eq!(request.card_name, "The Hermit");
        assert_eq!(request.card_name_ch, "隱者");
        assert!(request.is_reversed);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["cardNameCh"], "隱者");
        assert_eq!(json["isReversed"], true);
    }

    #[test]
    fn test_fallback_depends_on_orientation() {
        let upright = fallback_reading("星星", Orientation::Upright);
        let reversed = fallback_reading("星星", Orientation::Reversed);
        assert!(upright.starts_with("星星帶來了正向的能量"));
        assert!(reversed.starts_with("星星提醒你需要重新審視某些事情"));
    }

    #[test]
    fn test_only_transient_kinds_retry() {
        assert!(ReadingErrorKind::TransientBackend.is_retryable());
        assert!(ReadingErrorKind::MalformedResponse.is_retryable());
        assert!(!ReadingErrorKind::Timeout.is_retryable());
        assert!(!ReadingErrorKind::ChannelBusy.is_retryable());
        assert!(!ReadingErrorKind::MissingReferenceData.is_retryable());
    }

    #[test]
    fn test_advisory_distinguishes_failures() {
        let timeout = ReadingErrorKind::Timeout.advisory();
        let busy = ReadingErrorKind::ChannelBusy.advisory();
        let generic = ReadingErrorKind::TransientBackend.advisory();
        assert_ne!(timeout, busy);
        assert_ne!(busy, generic);
        assert_eq!(generic, ReadingErrorKind::MalformedResponse.advisory());
    }

    #[test]
    fn test_outcome_text() {
        assert_eq!(ReadingOutcome::filtered().text(), SENTINEL);
        let request = ReadingRequest {
            question: "q".into(),
            card_name: "The Sun".into(),
            card_name_ch: "太陽".into(),
            is_reversed: false,
        };
        let failure = ReadingOutcome::failure(ReadingErrorKind::ChannelBusy, &request);
        assert_eq!(failure.text(), fallback_reading("太陽", Orientation::Upright));
        assert_eq!(failure.advisory(), Some("通道繁忙，請稍後再試 🌟"));
        assert_eq!(failure.error_kind(), Some(&ReadingErrorKind::ChannelBusy));
    }
}
