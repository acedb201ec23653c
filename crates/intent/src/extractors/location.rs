//! Extractor for the place a search is about ("in soho", "near the
//! british museum").
//!
//! The span is also used by the cuisine extractors so that words inside
//! a place name are not read as cuisines.

use std::ops::Range;

use search_types::{FacetValue, Facets, facets::names};

use crate::lexicon::is_facet_word;
use crate::normalize::NormalizedQuery;
use crate::traits::FacetExtractor;

/// Multi-word cues first
const CUES: &[&str] = &["close to", "next to", "near", "around", "in", "by"];

/// Words that cannot start a place name ("near me", "in a hurry")
const NOT_A_PLACE: &[&str] = &[
    "me", "here", "mood", "hurry", "rush", "group", "evening", "morning", "afternoon", "town",
    "a", "an", "my", "your",
];

/// Words that end a place name
const STOP_WORDS: &[&str] = &[
    "open", "now", "with", "that", "which", "who", "where", "for", "under", "below", "over",
    "above", "less", "more", "between", "at", "and", "or", "but", "rated", "rating", "cheap",
    "cheapest", "budget", "affordable", "expensive", "pricey", "posh", "fancy", "upscale",
    "serving", "tonight", "today", "tomorrow", "please", "food", "restaurant", "restaurants",
    "place", "places", "spot", "spots", "stars", "up", "max", "no", "not", "without", "except",
    "is", "are", "has", "have", "good", "best", "highly", "top", "near", "around", "in", "by",
    "close", "next", "late", "anything", "anywhere", "something", "somewhere", "ideally",
    "preferably", "on", "this", "after", "before", "until", "till", "from", "noon", "midnight",
];

/// Longest place name kept
const MAX_PLACE_TOKENS: usize = 6;

/// A place found in the query.
///
/// `tokens` covers everything after the cue, including a leading "the";
/// `text` is the place name itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub tokens: Range<usize>,
    pub text: String,
}

fn place_at(query: &NormalizedQuery, start: usize) -> Option<Location> {
    let head = if query.token(start) == Some("the") { start + 1 } else { start };
    let first = query.token(head)?;
    if NOT_A_PLACE.contains(&first)
        || STOP_WORDS.contains(&first)
        || first.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '£' | '$' | '€'))
    {
        return None;
    }

    let mut end = head + 1;
    while end < query.len() && end - head < MAX_PLACE_TOKENS {
        let Some(token) = query.token(end) else { break };
        if STOP_WORDS.contains(&token) || is_facet_word(query, end) {
            break;
        }
        end += 1;
    }

    Some(Location {
        tokens: start..end,
        text: query.tokens()[head..end].join(" "),
    })
}

/// First place mentioned after a location cue
pub fn find_location(query: &NormalizedQuery) -> Option<Location> {
    (0..query.len()).find_map(|i| {
        let cue = CUES.iter().find(|cue| query.matches_at(i, cue))?;
        place_at(query, i + NormalizedQuery::phrase_len(cue))
    })
}

/// Adds `location` as lowercase text
pub struct LocationExtractor;

impl FacetExtractor for LocationExtractor {
    fn name(&self) -> &str {
        "LocationExtractor"
    }

    fn extract(&self, query: &NormalizedQuery, mut facets: Facets) -> Facets {
        if let Some(location) = find_location(query) {
            facets.insert(names::LOCATION, FacetValue::Text(location.text));
        }
        facets
    }
}
