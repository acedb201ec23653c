//! Intent parsing for restaurant search queries.
//!
//! This crate provides:
//! - FacetExtractor trait and the built-in lexicon extractors
//! - ExtractorPipeline for composing extractors
//! - IntentParser, which runs the pipeline and optionally merges facets
//!   proposed by the understanding service
//!
//! ## Architecture
//! A query is processed in stages:
//! 1. The text is normalized into lowercase tokens
//! 2. Extractors recognize cuisines, prices, ratings, places, ...
//! 3. Confident service candidates fill whatever the lexicon missed
//! 4. The trimmed text is kept as `keywords`
//!
//! ## Example Usage
//! ```ignore
//! use intent::IntentParser;
//! use search_types::SearchConfig;
//!
//! let parser = IntentParser::new(&SearchConfig::default());
//! let facets = parser.parse("cheap italian food open now").await?;
//! assert_eq!(facets.text("cuisine"), Some("italian"));
//! ```

pub mod extractor_pipeline;
pub mod extractors;
pub mod lexicon;
pub mod normalize;
pub mod parser;
pub mod traits;

// Re-export main types
pub use extractor_pipeline::ExtractorPipeline;
pub use normalize::NormalizedQuery;
pub use parser::IntentParser;
pub use traits::FacetExtractor;
