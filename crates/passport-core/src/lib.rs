//! Domain core of Soul Passport: reference cards, the guardrail, prompt
//! composition, reading outcomes and the flow state machine.

pub mod api;
pub mod card;
pub mod config;
pub mod error;
pub mod flow;
pub mod guardrail;
pub mod ports;
pub mod prompt;
pub mod reading;
pub mod sanitizer;

// Re-export common error type
pub use error::{PassportError, Result};
