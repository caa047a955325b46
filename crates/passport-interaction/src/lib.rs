//! Network-facing adapters: the Gemini generation backend, the HTTP reading
//! transport and the retrying reading client built on top of it.

pub mod client;
pub mod gemini_api_agent;
pub mod http_transport;
pub mod transport;

pub use client::{ResilientReadingClient, RetryPolicy};
pub use gemini_api_agent::GeminiApiAgent;
pub use http_transport::HttpReadingTransport;
pub use transport::{AttemptError, ReadingTransport};
