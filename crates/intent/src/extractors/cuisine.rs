//! Extractor for requested cuisines.
//!
//! Recognizes cuisine words and dishes that imply one ("sushi" ->
//! japanese). Negated mentions ("no indian") are left to the
//! ExcludedCuisineExtractor, and words inside a place name
//! ("near the british museum") are ignored.

use search_types::{FacetValue, Facets, facets::names};

use crate::extractors::location::find_location;
use crate::lexicon::cuisine_mentions;
use crate::normalize::NormalizedQuery;
use crate::traits::FacetExtractor;

/// Adds `cuisine`: a single text value, or a list when several cuisines
/// are asked for.
pub struct CuisineExtractor;

impl FacetExtractor for CuisineExtractor {
    fn name(&self) -> &str {
        "CuisineExtractor"
    }

    fn extract(&self, query: &NormalizedQuery, mut facets: Facets) -> Facets {
        let place = find_location(query).map(|location| location.tokens);

        let mut cuisines: Vec<String> = Vec::new();
        for mention in cuisine_mentions(query, place.as_ref()) {
            if mention.negated || cuisines.iter().any(|c| c == mention.canonical) {
                continue;
            }
            cuisines.push(mention.canonical.to_string());
        }

        match cuisines.len() {
            0 => {}
            1 => {
                facets.insert(names::CUISINE, FacetValue::Text(cuisines.remove(0)));
            }
            _ => {
                facets.insert(names::CUISINE, FacetValue::TextList(cuisines));
            }
        }
        facets
    }
}
