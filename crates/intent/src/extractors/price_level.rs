//! Extractor for coarse price words ("cheap", "upscale", "fine dining").

use search_types::{FacetValue, Facets, PriceLevel, facets::names};

use crate::normalize::NormalizedQuery;
use crate::traits::FacetExtractor;

/// Checked in order at every position, so longer phrases come first.
const PRICE_PHRASES: &[(&str, PriceLevel)] = &[
    ("not too expensive", PriceLevel::Low),
    ("not expensive", PriceLevel::Low),
    ("fine dining", PriceLevel::Luxury),
    ("high end", PriceLevel::High),
    ("mid range", PriceLevel::Moderate),
    ("moderately priced", PriceLevel::Moderate),
    ("reasonably priced", PriceLevel::Moderate),
    ("good value", PriceLevel::Low),
    ("cheap", PriceLevel::Low),
    ("cheapest", PriceLevel::Low),
    ("inexpensive", PriceLevel::Low),
    ("budget", PriceLevel::Low),
    ("affordable", PriceLevel::Low),
    ("moderate", PriceLevel::Moderate),
    ("upscale", PriceLevel::High),
    ("expensive", PriceLevel::High),
    ("pricey", PriceLevel::High),
    ("posh", PriceLevel::High),
    ("fancy", PriceLevel::High),
    ("luxury", PriceLevel::Luxury),
    ("luxurious", PriceLevel::Luxury),
    ("michelin", PriceLevel::Luxury),
];

/// Adds `price_level` from the first price word in the query
pub struct PriceLevelExtractor;

impl FacetExtractor for PriceLevelExtractor {
    fn name(&self) -> &str {
        "PriceLevelExtractor"
    }

    fn extract(&self, query: &NormalizedQuery, mut facets: Facets) -> Facets {
        let level = (0..query.len()).find_map(|i| {
            PRICE_PHRASES
                .iter()
                .find(|(phrase, _)| query.matches_at(i, phrase))
                .map(|(_, level)| *level)
        });

        if let Some(level) = level {
            facets.insert(names::PRICE_LEVEL, FacetValue::PriceLevel(level));
        }
        facets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(text: &str) -> Option<PriceLevel> {
        PriceLevelExtractor
            .extract(&NormalizedQuery::new(text), Facets::new())
            .price_level()
    }

    #[test]
    fn test_price_words() {
        assert_eq!(level("cheap italian food open now"), Some(PriceLevel::Low));
        assert_eq!(level("a mid-range bistro"), Some(PriceLevel::Moderate));
        assert_eq!(level("somewhere posh"), Some(PriceLevel::High));
        assert_eq!(level("fine dining for an anniversary"), Some(PriceLevel::Luxury));
    }

    #[test]
    fn test_negated_expensive_means_low() {
        assert_eq!(level("something not too expensive"), Some(PriceLevel::Low));
    }

    #[test]
    fn test_no_price_words() {
        assert_eq!(level("ramen near kings cross"), None);
    }
}
