//! Interfaces to collaborators outside the reading core.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::card::DrawnCard;
use crate::error::Result;
use crate::flow::{Mood, core_message, mood_for};

/// Failure reported by a generation backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend credential is missing or was rejected
    #[error("credential error: {0}")]
    Credential(String),

    /// The backend signalled it is over capacity
    #[error("backend busy: {0}")]
    Busy(String),

    #[error("backend request failed: {0}")]
    Failed(String),
}

/// Opaque text generator: prompt in, reading text out.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, BackendError>;
}

/// What the export rasterizer needs to draw a result card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportCard {
    pub question: String,
    pub card_name: String,
    pub card_name_ch: String,
    pub image_path: String,
    pub is_reversed: bool,
    pub core_message: String,
    pub mood: Mood,
    /// Suggested download name for the rendered image
    pub file_name: String,
}

impl ExportCard {
    pub fn new(question: &str, drawn: &DrawnCard, reading: &str) -> Self {
        Self {
            question: question.to_string(),
            card_name: drawn.display_name.clone(),
            card_name_ch: drawn.display_name_ch.clone(),
            image_path: drawn.card.image_path(),
            is_reversed: drawn.is_reversed(),
            core_message: core_message(reading),
            mood: mood_for(reading),
            file_name: format!("soul-passport-{}.png", drawn.card.name_ch),
        }
    }
}

/// Rasterizes a result card to PNG bytes.
#[async_trait]
pub trait ExportRenderer: Send + Sync {
    async fn render(&self, card: &ExportCard) -> Result<Vec<u8>>;
}

/// Persisted "user agreed to the disclaimer" flag, read once at startup.
pub trait ConsentStore: Send + Sync {
    fn has_agreed(&self) -> Result<bool>;
    fn record_agreement(&self) -> Result<()>;
}

/// Consent flag that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryConsentStore {
    agreed: AtomicBool,
}

impl MemoryConsentStore {
    pub fn new(agreed: bool) -> Self {
        Self {
            agreed: AtomicBool::new(agreed),
        }
    }
}

impl ConsentStore for MemoryConsentStore {
    fn has_agreed(&self) -> Result<bool> {
        Ok(self.agreed.load(Ordering::SeqCst))
    }

    fn record_agreement(&self) -> Result<()> {
        self.agreed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Orientation, card_by_id};

    #[test]
    fn test_export_card_uses_display_names() {
        let drawn = DrawnCard::new(card_by_id(16).unwrap(), Orientation::Reversed);
        let card = ExportCard::new("工作", &drawn, "舊的結構需要被放下。");

        assert_eq!(card.card_name_ch, "高塔 (逆位)");
        assert_eq!(card.image_path, "/tarot/card-16.png");
        assert_eq!(card.mood, Mood::Pet);
        assert_eq!(card.file_name, "soul-passport-高塔.png");
    }

    #[test]
    fn test_memory_consent() {
        let store = MemoryConsentStore::default();
        assert!(!store.has_agreed().unwrap());
        store.record_agreement().unwrap();
        assert!(store.has_agreed().unwrap());
    }
}
