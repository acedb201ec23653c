//! Extractor for the day of the visit ("tonight", "tomorrow", "on friday").

use search_types::{FacetValue, Facets, VisitDay, facets::names};

use crate::lexicon::DAYS;
use crate::normalize::NormalizedQuery;
use crate::traits::FacetExtractor;

/// Phrases that mean today without naming it
const TODAY_PHRASES: &[&str] = &["this evening", "this afternoon", "this morning"];

/// Adds `visit_day` from the first day mentioned
pub struct VisitDayExtractor;

impl FacetExtractor for VisitDayExtractor {
    fn name(&self) -> &str {
        "VisitDayExtractor"
    }

    fn extract(&self, query: &NormalizedQuery, mut facets: Facets) -> Facets {
        let day = (0..query.len()).find_map(|i| {
            if TODAY_PHRASES.iter().any(|phrase| query.matches_at(i, phrase)) {
                return Some(VisitDay::Today);
            }
            DAYS.iter()
                .find(|(word, _)| query.matches_at(i, word))
                .map(|(_, day)| *day)
        });

        if let Some(day) = day {
            facets.insert(names::VISIT_DAY, FacetValue::VisitDay(day));
        }
        facets
    }
}
