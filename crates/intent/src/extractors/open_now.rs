//! Extractor for "open now" style requests.

use search_types::{FacetValue, Facets, facets::names};

use crate::normalize::NormalizedQuery;
use crate::traits::FacetExtractor;

const OPEN_NOW_PHRASES: &[&str] = &[
    "open now",
    "open right now",
    "currently open",
    "still open",
    "open at the moment",
];

pub struct OpenNowExtractor;

impl FacetExtractor for OpenNowExtractor {
    fn name(&self) -> &str {
        "OpenNowExtractor"
    }

    fn extract(&self, query: &NormalizedQuery, mut facets: Facets) -> Facets {
        if OPEN_NOW_PHRASES.iter().any(|phrase| query.contains_phrase(phrase)) {
            facets.insert(names::OPEN_NOW, FacetValue::Flag(true));
        }
        facets
    }
}
