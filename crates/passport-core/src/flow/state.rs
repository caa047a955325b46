//! Flow state and its pure transition function.
//!
//! Each [`Phase`] variant carries exactly the data valid in that step, so a
//! drawing flag outside `Loading` or a reading without a card cannot exist.

use serde::Serialize;
use strum::Display;

use crate::card::DrawnCard;
use crate::reading::ReadingOutcome;

/// Maximum question length accepted at the input boundary, in characters.
pub const MAX_QUESTION_CHARS: usize = 100;
/// Number of face-down cards fanned out for selection.
pub const DECK_SIZE: usize = 15;
/// Coins a fresh session starts with.
pub const INITIAL_COINS: u32 = 100;

/// User-visible step of the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowStep {
    Welcome,
    Input,
    Draw,
    Loading,
    Result,
}

/// Limits fixed for the lifetime of a flow instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowRules {
    pub max_question_chars: usize,
    pub deck_size: usize,
    pub initial_coins: u32,
}

impl Default for FlowRules {
    fn default() -> Self {
        Self {
            max_question_chars: MAX_QUESTION_CHARS,
            deck_size: DECK_SIZE,
            initial_coins: INITIAL_COINS,
        }
    }
}

/// Rasterized result card kept for preview and download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewArtifact {
    /// `data:image/png;base64,...` URL
    pub data_url: String,
    pub file_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportState {
    pub exporting: bool,
    pub preview: Option<PreviewArtifact>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Welcome,
    Input,
    Draw {
        question: String,
    },
    Loading {
        question: String,
        selected: usize,
        drawn: DrawnCard,
    },
    Result {
        question: String,
        selected: usize,
        drawn: DrawnCard,
        outcome: ReadingOutcome,
        export: ExportState,
    },
}

/// Input to [`transition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    OpenInput,
    SubmitQuestion(String),
    /// The drawn card is sampled by the caller so the transition stays pure.
    SelectCard {
        index: usize,
        drawn: DrawnCard,
    },
    FinishReading(ReadingOutcome),
    StartExport,
    /// `None` when rendering failed
    FinishExport(Option<PreviewArtifact>),
    ClosePreview,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowState {
    phase: Phase,
    coins: u32,
    rules: FlowRules,
}

impl Default for FlowState {
    fn default() -> Self {
        Self::new(FlowRules::default())
    }
}

impl FlowState {
    pub fn new(rules: FlowRules) -> Self {
        Self {
            phase: Phase::Welcome,
            coins: rules.initial_coins,
            rules,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn rules(&self) -> &FlowRules {
        &self.rules
    }

    pub fn step(&self) -> FlowStep {
        match self.phase {
            Phase::Welcome => FlowStep::Welcome,
            Phase::Input => FlowStep::Input,
            Phase::Draw { .. } => FlowStep::Draw,
            Phase::Loading { .. } => FlowStep::Loading,
            Phase::Result { .. } => FlowStep::Result,
        }
    }

    /// The stored question, empty before one is submitted.
    pub fn question(&self) -> &str {
        match &self.phase {
            Phase::Draw { question }
            | Phase::Loading { question, .. }
            | Phase::Result { question, .. } => question,
            Phase::Welcome | Phase::Input => "",
        }
    }

    pub fn selected_card(&self) -> Option<usize> {
        match &self.phase {
            Phase::Loading { selected, .. } | Phase::Result { selected, .. } => Some(*selected),
            _ => None,
        }
    }

    pub fn drawn_card(&self) -> Option<&DrawnCard> {
        match &self.phase {
            Phase::Loading { drawn, .. } | Phase::Result { drawn, .. } => Some(drawn),
            _ => None,
        }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.phase, Phase::Loading { .. })
    }

    pub fn outcome(&self) -> Option<&ReadingOutcome> {
        match &self.phase {
            Phase::Result { outcome, .. } => Some(outcome),
            _ => None,
        }
    }

    /// Reading text shown in the result step.
    pub fn reading(&self) -> Option<&str> {
        self.outcome().map(ReadingOutcome::text)
    }

    pub fn is_exporting(&self) -> bool {
        matches!(&self.phase, Phase::Result { export, .. } if export.exporting)
    }

    pub fn preview(&self) -> Option<&PreviewArtifact> {
        match &self.phase {
            Phase::Result { export, .. } => export.preview.as_ref(),
            _ => None,
        }
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    /// Whether `event` would change the state.
    pub fn accepts(&self, event: &FlowEvent) -> bool {
        match (&self.phase, event) {
            (Phase::Welcome, FlowEvent::OpenInput) => true,
            (Phase::Welcome | Phase::Input, FlowEvent::SubmitQuestion(question)) => {
                is_valid_question(question, self.rules.max_question_chars)
            }
            (Phase::Draw { .. }, FlowEvent::SelectCard { index, .. }) => {
                *index < self.rules.deck_size
            }
            (Phase::Loading { .. }, FlowEvent::FinishReading(_)) => true,
            (Phase::Result { export, .. }, FlowEvent::StartExport) => !export.exporting,
            (Phase::Result { export, .. }, FlowEvent::FinishExport(_)) => export.exporting,
            (Phase::Result { export, .. }, FlowEvent::ClosePreview) => export.preview.is_some(),
            (Phase::Result { .. }, FlowEvent::Reset) => true,
            _ => false,
        }
    }
}

fn is_valid_question(question: &str, max_chars: usize) -> bool {
    let trimmed = question.trim();
    !trimmed.is_empty() && trimmed.chars().count() <= max_chars
}

/// Pure transition function. Rejected events return the state unchanged.
pub fn transition(state: FlowState, event: FlowEvent) -> FlowState {
    if !state.accepts(&event) {
        return state;
    }

    let FlowState {
        phase,
        coins,
        rules,
    } = state;

    let phase = match (phase, event) {
        (Phase::Welcome, FlowEvent::OpenInput) => Phase::Input,
        (_, FlowEvent::SubmitQuestion(question)) => Phase::Draw {
            question: question.trim().to_string(),
        },
        (Phase::Draw { question }, FlowEvent::SelectCard { index, drawn }) => Phase::Loading {
            question,
            selected: index,
            drawn,
        },
        (
            Phase::Loading {
                question,
                selected,
                drawn,
            },
            FlowEvent::FinishReading(outcome),
        ) => Phase::Result {
            question,
            selected,
            drawn,
            outcome,
            export: ExportState::default(),
        },
        (
            Phase::Result {
                question,
                selected,
                drawn,
                outcome,
                export,
            },
            event @ (FlowEvent::StartExport
            | FlowEvent::FinishExport(_)
            | FlowEvent::ClosePreview),
        ) => Phase::Result {
            question,
            selected,
            drawn,
            outcome,
            export: apply_export(export, event),
        },
        (_, FlowEvent::Reset) => Phase::Welcome,
        (phase, _) => phase,
    };

    FlowState {
        phase,
        coins,
        rules,
    }
}

fn apply_export(export: ExportState, event: FlowEvent) -> ExportState {
    match event {
        FlowEvent::StartExport => ExportState {
            exporting: true,
            ..export
        },
        FlowEvent::FinishExport(preview) => ExportState {
            exporting: false,
            preview,
        },
        FlowEvent::ClosePreview => ExportState {
            preview: None,
            ..export
        },
        _ => export,
    }
}
