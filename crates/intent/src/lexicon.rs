//! Vocabulary shared by several extractors.
//!
//! Cuisine words are needed by the cuisine, exclusion and location
//! extractors, so the lookup lives here rather than in any one of them.

use search_types::{MealTime, VisitDay};
use std::ops::Range;

use crate::normalize::NormalizedQuery;

/// Surface phrase -> canonical cuisine. Multi-word phrases come first so
/// they win over their single-word prefixes.
pub const CUISINES: &[(&str, &str)] = &[
    ("middle eastern", "middle eastern"),
    ("dim sum", "chinese"),
    ("fish and chips", "british"),
    ("italian", "italian"),
    ("pizza", "italian"),
    ("pasta", "italian"),
    ("chinese", "chinese"),
    ("cantonese", "chinese"),
    ("sichuan", "chinese"),
    ("japanese", "japanese"),
    ("sushi", "japanese"),
    ("ramen", "japanese"),
    ("indian", "indian"),
    ("curry", "indian"),
    ("thai", "thai"),
    ("mexican", "mexican"),
    ("taco", "mexican"),
    ("tacos", "mexican"),
    ("french", "french"),
    ("greek", "greek"),
    ("spanish", "spanish"),
    ("tapas", "spanish"),
    ("korean", "korean"),
    ("vietnamese", "vietnamese"),
    ("pho", "vietnamese"),
    ("turkish", "turkish"),
    ("lebanese", "lebanese"),
    ("american", "american"),
    ("burger", "american"),
    ("burgers", "american"),
    ("british", "british"),
    ("seafood", "seafood"),
    ("steak", "steakhouse"),
    ("steakhouse", "steakhouse"),
    ("ethiopian", "ethiopian"),
    ("caribbean", "caribbean"),
    ("peruvian", "peruvian"),
    ("mediterranean", "mediterranean"),
];

/// Surface phrase -> canonical dietary requirement
pub const DIETARY: &[(&str, &str)] = &[
    ("gluten free", "gluten-free"),
    ("dairy free", "dairy-free"),
    ("nut free", "nut-free"),
    ("plant based", "vegan"),
    ("vegan", "vegan"),
    ("vegetarian", "vegetarian"),
    ("veggie", "vegetarian"),
    ("halal", "halal"),
    ("kosher", "kosher"),
    ("coeliac", "gluten-free"),
    ("celiac", "gluten-free"),
];

/// Meal words, mapped to the meal they ask for
pub const MEALS: &[(&str, MealTime)] = &[
    ("breakfast", MealTime::Breakfast),
    ("brunch", MealTime::Brunch),
    ("lunch", MealTime::Lunch),
    ("dinner", MealTime::Dinner),
    ("supper", MealTime::Dinner),
];

/// Day words. Abbreviations are left out: "sun" and "sat" are too
/// often ordinary words.
pub const DAYS: &[(&str, VisitDay)] = &[
    ("today", VisitDay::Today),
    ("tonight", VisitDay::Today),
    ("tomorrow", VisitDay::Tomorrow),
    ("monday", VisitDay::Monday),
    ("tuesday", VisitDay::Tuesday),
    ("wednesday", VisitDay::Wednesday),
    ("thursday", VisitDay::Thursday),
    ("friday", VisitDay::Friday),
    ("saturday", VisitDay::Saturday),
    ("sunday", VisitDay::Sunday),
];

/// Words that negate the cuisine right after them
const NEGATIONS: &[&str] = &["no", "not", "except", "without", "avoid", "excluding", "non"];

/// Words allowed between a negation and the cuisine ("no more pizza")
const NEGATION_FILLERS: &[&str] = &["more", "any", "really", "too"];

/// A cuisine word found in the query.
#[derive(Debug, Clone, PartialEq)]
pub struct CuisineMention {
    pub canonical: &'static str,
    pub tokens: Range<usize>,
    pub negated: bool,
}

/// Match a cuisine phrase starting at `index`
pub fn cuisine_at(query: &NormalizedQuery, index: usize) -> Option<(&'static str, usize)> {
    CUISINES
        .iter()
        .find(|(phrase, _)| query.matches_at(index, phrase))
        .map(|(phrase, canonical)| (*canonical, NormalizedQuery::phrase_len(phrase)))
}

/// Is the token at `index` the start of a cuisine, dietary, meal or day word?
pub fn is_facet_word(query: &NormalizedQuery, index: usize) -> bool {
    cuisine_at(query, index).is_some()
        || DIETARY.iter().any(|(phrase, _)| query.matches_at(index, phrase))
        || MEALS.iter().any(|(phrase, _)| query.matches_at(index, phrase))
        || DAYS.iter().any(|(phrase, _)| query.matches_at(index, phrase))
}

/// All cuisine mentions in token order, skipping any inside `skip`
pub fn cuisine_mentions(query: &NormalizedQuery, skip: Option<&Range<usize>>) -> Vec<CuisineMention> {
    let mut mentions = Vec::new();
    let mut i = 0;
    while i < query.len() {
        if skip.is_some_and(|span| span.contains(&i)) {
            i += 1;
            continue;
        }
        match cuisine_at(query, i) {
            Some((canonical, len)) => {
                mentions.push(CuisineMention {
                    canonical,
                    tokens: i..i + len,
                    negated: is_negated(query, i),
                });
                i += len;
            }
            None => i += 1,
        }
    }
    mentions
}

fn is_negated(query: &NormalizedQuery, index: usize) -> bool {
    let before = |offset: usize| index.checked_sub(offset).and_then(|i| query.token(i));
    match (before(2), before(1)) {
        (_, Some(prev)) if NEGATIONS.contains(&prev) => true,
        (Some(cue), Some(filler)) => NEGATIONS.contains(&cue) && NEGATION_FILLERS.contains(&filler),
        _ => false,
    }
}
