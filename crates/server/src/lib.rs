//! Server crate for the restaurant search core.
//!
//! This crate contains the orchestrator that coordinates the intent
//! parser, query builder and summarizer, and a thin handler that runs a
//! whole request against an execution surface.

pub mod handler;
pub mod orchestrator;

pub use handler::{ExecutionSurface, SearchHandler, SearchRequest, SearchResponse, status_for};
pub use orchestrator::SearchOrchestrator;
