//! Extractor for explicit price limits ("under £20", "between 15 and 30").
//!
//! This is the explicit counterpart of PriceLevelExtractor. When both
//! are present the query builder prefers the explicit range.

use search_types::{FacetValue, Facets, facets::names};

use crate::extractors::numeric::find_comparisons;
use crate::normalize::NormalizedQuery;
use crate::traits::FacetExtractor;

/// Adds `price_range` from the first comparison that is not about
/// ratings, distance or time.
pub struct PriceRangeExtractor;

impl FacetExtractor for PriceRangeExtractor {
    fn name(&self) -> &str {
        "PriceRangeExtractor"
    }

    fn extract(&self, query: &NormalizedQuery, mut facets: Facets) -> Facets {
        let price = find_comparisons(query)
            .into_iter()
            .find(|c| !c.is_rating(query) && !c.has_other_unit(query) && !c.range.is_empty());

        if let Some(comparison) = price {
            facets.insert(names::PRICE_RANGE, FacetValue::Range(comparison.range));
        }
        facets
    }
}
