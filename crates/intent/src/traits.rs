//! Core traits for facet extraction.
//!
//! This module defines the FacetExtractor trait that lets small,
//! independent recognizers be composed into an ExtractorPipeline.

use search_types::Facets;

use crate::normalize::NormalizedQuery;

/// Core trait for recognizing facets in query text.
///
/// All extractors must implement this trait to be used in the ExtractorPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows one pipeline to serve concurrent requests
/// - Extractors take ownership of the Facets and return them, adding
///   whatever they recognized
/// - Extraction never fails: text an extractor cannot interpret is left
///   alone, so the facet stays absent
pub trait FacetExtractor: Send + Sync {
    /// Returns the name of this extractor (for logging/debugging)
    fn name(&self) -> &str;

    /// Add the facets this extractor recognizes in `query`.
    ///
    /// # Arguments
    /// * `query` - The normalized query text
    /// * `facets` - Facets recognized so far (takes ownership)
    fn extract(&self, query: &NormalizedQuery, facets: Facets) -> Facets;
}
