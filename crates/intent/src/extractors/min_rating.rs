//! Extractor for rating thresholds.
//!
//! Explicit thresholds ("4+ stars", "rated at least 4.5", "rating above 4")
//! win over inferred ones ("highly rated", "best"), which map to 4.0.

use search_types::{FacetValue, Facets, NumericRange, facets::names};

use crate::extractors::numeric::{amount_at, find_comparisons};
use crate::normalize::NormalizedQuery;
use crate::traits::FacetExtractor;

/// Ratings are on a five star scale
const MAX_RATING: f64 = 5.0;

/// Threshold assumed for phrases like "highly rated"
const INFERRED_MIN_RATING: f64 = 4.0;

const INFERRED_PHRASES: &[&str] = &[
    "highly rated",
    "top rated",
    "well rated",
    "well reviewed",
    "good reviews",
    "great reviews",
    "best",
];

pub struct MinRatingExtractor;

impl MinRatingExtractor {
    fn explicit(query: &NormalizedQuery) -> Option<NumericRange> {
        let from_comparison = find_comparisons(query)
            .into_iter()
            .filter(|c| c.is_rating(query))
            .map(|c| c.range)
            .find(|range| range.min.is_some_and(|min| (0.0..=MAX_RATING).contains(&min)));

        from_comparison.or_else(|| Self::bare_threshold(query))
    }

    /// "4 stars", "4+ stars", "rated 4", "rating of 4.5"
    fn bare_threshold(query: &NormalizedQuery) -> Option<NumericRange> {
        (0..query.len()).find_map(|i| {
            let amount = match query.token(i)? {
                "rated" | "rating" => {
                    let next = if query.token(i + 1) == Some("of") { i + 2 } else { i + 1 };
                    amount_at(query, next).map(|(amount, _)| amount)
                }
                _ => match query.token(i + 1)? {
                    "star" | "stars" => amount_at(query, i).map(|(amount, _)| amount),
                    _ => None,
                },
            }?;
            (0.0..=MAX_RATING)
                .contains(&amount)
                .then(|| NumericRange::at_least(amount))
        })
    }

    fn inferred(query: &NormalizedQuery) -> Option<NumericRange> {
        INFERRED_PHRASES
            .iter()
            .any(|phrase| query.contains_phrase(phrase))
            .then(|| NumericRange::at_least(INFERRED_MIN_RATING))
    }
}

impl FacetExtractor for MinRatingExtractor {
    fn name(&self) -> &str {
        "MinRatingExtractor"
    }

    fn extract(&self, query: &NormalizedQuery, mut facets: Facets) -> Facets {
        if let Some(range) = Self::explicit(query).or_else(|| Self::inferred(query)) {
            facets.insert(names::MIN_RATING, FacetValue::Range(range));
        }
        facets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(text: &str) -> Option<NumericRange> {
        MinRatingExtractor
            .extract(&NormalizedQuery::new(text), Facets::new())
            .range(names::MIN_RATING)
            .copied()
    }

    #[test]
    fn test_star_thresholds() {
        assert_eq!(rating("4 stars or better"), Some(NumericRange::at_least(4.0)));
        assert_eq!(rating("4+ star sushi"), Some(NumericRange::at_least(4.0)));
        assert_eq!(rating("rated 4.5"), Some(NumericRange::at_least(4.5)));
        assert_eq!(rating("a rating of 3"), Some(NumericRange::at_least(3.0)));
    }

    #[test]
    fn test_comparisons_keep_exclusivity() {
        assert_eq!(rating("rating above 4"), Some(NumericRange::above(4.0)));
        assert_eq!(rating("at least 4.2 stars"), Some(NumericRange::at_least(4.2)));
    }

    #[test]
    fn test_rating_word_after_the_number() {
        assert_eq!(rating("sushi with at least 4.5 rating"), Some(NumericRange::at_least(4.5)));
        assert_eq!(rating("ramen over 4 rating"), Some(NumericRange::above(4.0)));
    }

    #[test]
    fn test_inferred_threshold() {
        assert_eq!(rating("highly rated ramen"), Some(NumericRange::at_least(4.0)));
        assert_eq!(rating("best tacos in town"), Some(NumericRange::at_least(4.0)));
    }

    #[test]
    fn test_explicit_beats_inferred() {
        assert_eq!(rating("best pho, 4.5 stars"), Some(NumericRange::at_least(4.5)));
    }

    #[test]
    fn test_out_of_scale_and_prices_are_ignored() {
        assert_eq!(rating("rated 9"), None);
        assert_eq!(rating("under £20"), None);
    }
}
