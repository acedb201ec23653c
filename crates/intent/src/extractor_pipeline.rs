//! The ExtractorPipeline runs multiple extractors.
//!
//! This module provides the main ExtractorPipeline struct that chains
//! extractors together using the builder pattern.

use search_types::Facets;

use crate::extractors::{
    CuisineExtractor, DietaryExtractor, ExcludedCuisineExtractor, LocationExtractor,
    MealTimeExtractor, MinRatingExtractor, OpenNowExtractor, PriceLevelExtractor,
    PriceRangeExtractor, VisitDayExtractor, VisitTimeExtractor,
};
use crate::normalize::NormalizedQuery;
use crate::traits::FacetExtractor;

/// Chains multiple extractors together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = ExtractorPipeline::new()
///     .add_extractor(CuisineExtractor)
///     .add_extractor(OpenNowExtractor);
///
/// let facets = pipeline.apply(&NormalizedQuery::new("thai open now"));
/// ```
pub struct ExtractorPipeline {
    extractors: Vec<Box<dyn FacetExtractor>>,
}

impl ExtractorPipeline {
    /// Create a new empty ExtractorPipeline.
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Pipeline with every built-in extractor registered
    pub fn standard() -> Self {
        Self::new()
            .add_extractor(CuisineExtractor)
            .add_extractor(ExcludedCuisineExtractor)
            .add_extractor(PriceLevelExtractor)
            .add_extractor(PriceRangeExtractor)
            .add_extractor(OpenNowExtractor)
            .add_extractor(MinRatingExtractor)
            .add_extractor(LocationExtractor)
            .add_extractor(DietaryExtractor)
            .add_extractor(MealTimeExtractor)
            .add_extractor(VisitDayExtractor)
            .add_extractor(VisitTimeExtractor)
    }

    /// Add an extractor to the pipeline (builder pattern).
    pub fn add_extractor(mut self, extractor: impl FacetExtractor + 'static) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// Run all extractors in order, starting from empty Facets.
    pub fn apply(&self, query: &NormalizedQuery) -> Facets {
        let mut facets = Facets::new();
        for extractor in &self.extractors {
            let before = facets.len();
            facets = extractor.extract(query, facets);
            tracing::debug!(
                "Extractor applied: {} (facets: {} -> {})",
                extractor.name(),
                before,
                facets.len()
            );
        }
        facets
    }
}

impl Default for ExtractorPipeline {
    fn default() -> Self {
        Self::standard()
    }
}
