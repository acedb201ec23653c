//! Extractor for dietary requirements (vegan, halal, gluten-free, ...).

use search_types::{FacetValue, Facets, facets::names};

use crate::lexicon::DIETARY;
use crate::normalize::NormalizedQuery;
use crate::traits::FacetExtractor;

pub struct DietaryExtractor;

impl FacetExtractor for DietaryExtractor {
    fn name(&self) -> &str {
        "DietaryExtractor"
    }

    fn extract(&self, query: &NormalizedQuery, mut facets: Facets) -> Facets {
        let mut found: Vec<String> = Vec::new();
        for i in 0..query.len() {
            let hit = DIETARY
                .iter()
                .find(|(phrase, _)| query.matches_at(i, phrase))
                .map(|(_, canonical)| *canonical);
            if let Some(canonical) = hit {
                if !found.iter().any(|f| f == canonical) {
                    found.push(canonical.to_string());
                }
            }
        }

        if !found.is_empty() {
            facets.insert(names::DIETARY, FacetValue::TextList(found));
        }
        facets
    }
}
