//! Result Summarizer: short natural-language summaries of search results.
//!
//! This crate provides:
//! - Summarizer, which describes a result set in terms of the facets
//!   that produced it
//! - DisplayRow, the few row fields a summary ever looks at
//!
//! Summaries are plain text, never empty, and never longer than the
//! configured character limit.

pub mod display;
pub mod summarizer;

pub use display::DisplayRow;
pub use summarizer::Summarizer;
