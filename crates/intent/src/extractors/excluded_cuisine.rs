//! Extractor for cuisines the user wants to avoid ("no indian",
//! "anything except sushi").

use search_types::{FacetValue, Facets, facets::names};

use crate::extractors::location::find_location;
use crate::lexicon::cuisine_mentions;
use crate::normalize::NormalizedQuery;
use crate::traits::FacetExtractor;

pub struct ExcludedCuisineExtractor;

impl FacetExtractor for ExcludedCuisineExtractor {
    fn name(&self) -> &str {
        "ExcludedCuisineExtractor"
    }

    fn extract(&self, query: &NormalizedQuery, mut facets: Facets) -> Facets {
        let place = find_location(query).map(|location| location.tokens);

        let mut excluded: Vec<String> = Vec::new();
        for mention in cuisine_mentions(query, place.as_ref()) {
            if mention.negated && !excluded.iter().any(|c| c == mention.canonical) {
                excluded.push(mention.canonical.to_string());
            }
        }

        if !excluded.is_empty() {
            facets.insert(names::EXCLUDED_CUISINES, FacetValue::TextList(excluded));
        }
        facets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_negated_cuisines() {
        let query = NormalizedQuery::new("dinner in soho, no indian and not sushi");
        let facets = ExcludedCuisineExtractor.extract(&query, Facets::new());
        assert_eq!(
            facets.get(names::EXCLUDED_CUISINES),
            Some(&FacetValue::TextList(vec!["indian".into(), "japanese".into()]))
        );
    }

    #[test]
    fn test_plain_mentions_are_not_excluded() {
        let query = NormalizedQuery::new("thai food");
        let facets = ExcludedCuisineExtractor.extract(&query, Facets::new());
        assert!(facets.is_empty());
    }
}
