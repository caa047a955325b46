//! Async driver around the pure flow state machine.
//!
//! The controller owns one session: it samples cards, runs the resilient
//! client while holding the loading step for the reveal delay, and turns
//! rendered export bytes into a preview artifact.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use passport_core::card::DrawnCard;
use passport_core::config::FlowSettings;
use passport_core::flow::{
    FlowEvent, FlowState, FlowStep, Mood, PreviewArtifact, guide_line, mood_for, transition,
};
use passport_core::ports::{ExportCard, ExportRenderer};
use passport_core::reading::{ReadingOutcome, ReadingRequest};
use passport_interaction::{ReadingTransport, ResilientReadingClient};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::Instrument;
use uuid::Uuid;

pub struct FlowController<T> {
    session_id: Uuid,
    state: FlowState,
    client: ResilientReadingClient<T>,
    rng: StdRng,
    reveal_delay: Duration,
    renderer: Option<Arc<dyn ExportRenderer>>,
}

impl<T: ReadingTransport> FlowController<T> {
    pub fn new(client: ResilientReadingClient<T>, settings: &FlowSettings) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            state: FlowState::new(settings.rules()),
            client,
            rng: StdRng::from_entropy(),
            reveal_delay: settings.reveal_delay(),
            renderer: None,
        }
    }

    /// Replaces the card RNG with a seeded one.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn ExportRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Mascot line for the current step.
    pub fn guide_line(&self) -> &str {
        let advisory = self.state.outcome().and_then(ReadingOutcome::advisory);
        guide_line(self.state.step(), advisory)
    }

    pub fn mood(&self) -> Mood {
        mood_for(self.state.reading().unwrap_or_default())
    }

    /// Applies `event`; returns whether it was accepted.
    pub fn dispatch(&mut self, event: FlowEvent) -> bool {
        if !self.state.accepts(&event) {
            tracing::debug!(session = %self.session_id, step = %self.state.step(), ?event, "event ignored");
            return false;
        }
        let current = std::mem::take(&mut self.state);
        self.state = transition(current, event);
        tracing::debug!(session = %self.session_id, step = %self.state.step(), "flow advanced");
        true
    }

    pub fn open_input(&mut self) -> bool {
        self.dispatch(FlowEvent::OpenInput)
    }

    pub fn submit_question(&mut self, question: &str) -> bool {
        self.dispatch(FlowEvent::SubmitQuestion(question.to_string()))
    }

    /// Draws a card for slot `index` and enters loading.
    ///
    /// Returns the request to send, or `None` when selection is refused
    /// (not drawing, already selected, or index out of the deck).
    pub fn begin_draw(&mut self, index: usize) -> Option<ReadingRequest> {
        let drawn = DrawnCard::draw(&mut self.rng);
        let request = ReadingRequest::new(self.state.question(), &drawn);
        self.dispatch(FlowEvent::SelectCard { index, drawn })
            .then_some(request)
    }

    pub fn complete_draw(&mut self, outcome: ReadingOutcome) -> bool {
        self.dispatch(FlowEvent::FinishReading(outcome))
    }

    /// Selects a card, fetches the reading and reveals it.
    ///
    /// The loading step lasts at least the reveal delay even when the
    /// reading resolves immediately.
    pub async fn draw(&mut self, index: usize) -> Option<&ReadingOutcome> {
        let request = self.begin_draw(index)?;
        let span = tracing::info_span!("reading", session = %self.session_id, card = %request.card_name);

        let (outcome, _) = tokio::join!(
            self.client.send(&request).instrument(span),
            tokio::time::sleep(self.reveal_delay),
        );

        tracing::info!(
            session = %self.session_id,
            success = outcome.is_success(),
            filtered = outcome.is_filtered(),
            "reading revealed"
        );
        self.complete_draw(outcome);
        self.state.outcome()
    }

    /// Renders the result card and stores the preview.
    ///
    /// Returns the stored preview; a render failure leaves none.
    pub async fn export(&mut self) -> Option<&PreviewArtifact> {
        if !self.dispatch(FlowEvent::StartExport) {
            return None;
        }

        let card = self
            .state
            .drawn_card()
            .zip(self.state.reading())
            .map(|(drawn, reading)| ExportCard::new(self.state.question(), drawn, reading));
        let Some(card) = card else {
            self.dispatch(FlowEvent::FinishExport(None));
            return None;
        };

        let preview = match &self.renderer {
            Some(renderer) => match renderer.render(&card).await {
                Ok(bytes) => Some(PreviewArtifact {
                    data_url: format!("data:image/png;base64,{}", STANDARD.encode(bytes)),
                    file_name: card.file_name.clone(),
                }),
                Err(err) => {
                    tracing::warn!(session = %self.session_id, error = %err, "export rendering failed");
                    None
                }
            },
            None => {
                tracing::warn!(session = %self.session_id, "no export renderer configured");
                None
            }
        };

        self.dispatch(FlowEvent::FinishExport(preview));
        self.state.preview()
    }

    pub fn close_preview(&mut self) -> bool {
        self.dispatch(FlowEvent::ClosePreview)
    }

    /// Back to welcome; coins are kept.
    pub fn reset(&mut self) -> bool {
        self.dispatch(FlowEvent::Reset)
    }

    pub fn step(&self) -> FlowStep {
        self.state.step()
    }
}
