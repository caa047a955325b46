//! The user-visible reading flow.

pub mod guide;
pub mod state;

pub use guide::{Mood, core_message, guide_line, mood_for};
pub use state::{
    ExportState, FlowEvent, FlowRules, FlowState, FlowStep, Phase, PreviewArtifact, transition,
};
