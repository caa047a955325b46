//! Use cases: the server-side reading service, its HTTP surface, and the
//! per-session flow controller that drives a reading from question to result.

pub mod flow_controller;
pub mod reading_service;
pub mod server;

pub use flow_controller::FlowController;
pub use reading_service::{ChatError, ReadingService};
pub use server::{build_router, serve};
