//! Numeric comparisons shared by the price and rating extractors.
//!
//! Finds "under 20", "at least 4", "between 15 and 30" and similar, and
//! leaves deciding what the number measures to the caller.

use search_types::NumericRange;

use crate::normalize::{NormalizedQuery, parse_amount};

#[derive(Debug, Clone, Copy)]
enum Bound {
    Below,
    AtMost,
    Above,
    AtLeast,
}

impl Bound {
    fn range(self, amount: f64) -> NumericRange {
        match self {
            Bound::Below => NumericRange::below(amount),
            Bound::AtMost => NumericRange::at_most(amount),
            Bound::Above => NumericRange::above(amount),
            Bound::AtLeast => NumericRange::at_least(amount),
        }
    }
}

/// Longer phrases first: "no more than" must not be read as "more than".
const COMPARATORS: &[(&str, Bound)] = &[
    ("no more than", Bound::AtMost),
    ("less than", Bound::Below),
    ("cheaper than", Bound::Below),
    ("more than", Bound::Above),
    ("up to", Bound::AtMost),
    ("at most", Bound::AtMost),
    ("at least", Bound::AtLeast),
    ("under", Bound::Below),
    ("below", Bound::Below),
    ("over", Bound::Above),
    ("above", Bound::Above),
    ("max", Bound::AtMost),
    ("maximum", Bound::AtMost),
    ("minimum", Bound::AtLeast),
];

const CURRENCY_SYMBOLS: &[&str] = &["£", "$", "€"];

/// Units that mean the number is neither a price nor a rating
const OTHER_UNITS: &[&str] = &[
    "minutes", "minute", "mins", "min", "hours", "hour", "hrs", "people", "guests", "persons",
    "km", "miles", "mile", "mi", "m", "meters", "metres", "pm", "am", "reviews",
];

const RATING_UNITS: &[&str] = &["star", "stars"];
const RATING_CUES: &[&str] = &["rating", "rated", "ratings", "score"];

/// A comparison found in the query, spanning tokens `start..end`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Comparison {
    pub range: NumericRange,
    pub start: usize,
    pub end: usize,
}

impl Comparison {
    /// "4 stars", "rating above 4", "rated at least 4.5", "at least 4.5 rating"
    pub fn is_rating(&self, query: &NormalizedQuery) -> bool {
        let unit_after = query
            .token(self.end)
            .is_some_and(|unit| RATING_UNITS.contains(&unit) || RATING_CUES.contains(&unit));
        // a cue right after another number belongs to that number
        let cue_before = (self.start.saturating_sub(2)..self.start)
            .filter(|&i| query.token(i).is_some_and(|token| RATING_CUES.contains(&token)))
            .any(|i| i == 0 || query.token(i - 1).and_then(parse_amount).is_none());
        unit_after || cue_before
    }

    /// "under 10 minutes", "more than 6 people"
    pub fn has_other_unit(&self, query: &NormalizedQuery) -> bool {
        query
            .token(self.end)
            .is_some_and(|unit| OTHER_UNITS.contains(&unit))
    }
}

/// Amount at `index`, allowing a lone currency symbol before it.
/// Returns the amount and the index of the token it came from.
pub(crate) fn amount_at(query: &NormalizedQuery, index: usize) -> Option<(f64, usize)> {
    let token = query.token(index)?;
    if CURRENCY_SYMBOLS.contains(&token) {
        let amount = parse_amount(query.token(index + 1)?)?;
        return Some((amount, index + 1));
    }
    parse_amount(token).map(|amount| (amount, index))
}

/// "between 15 and 30", "from 15 to 30"
fn range_at(query: &NormalizedQuery, index: usize) -> Option<Comparison> {
    let connector = match query.token(index)? {
        "between" => "and",
        "from" => "to",
        _ => return None,
    };
    let (low, low_index) = amount_at(query, index + 1)?;
    if query.token(low_index + 1)? != connector {
        return None;
    }
    let (high, high_index) = amount_at(query, low_index + 2)?;
    // "between 30 and 10" names the same span as "between 10 and 30"
    Some(Comparison {
        range: NumericRange::between(low.min(high), low.max(high)),
        start: index,
        end: high_index + 1,
    })
}

/// All comparisons in token order
pub(crate) fn find_comparisons(query: &NormalizedQuery) -> Vec<Comparison> {
    let mut found = Vec::new();
    let mut i = 0;
    while i < query.len() {
        if let Some(comparison) = range_at(query, i) {
            i = comparison.end;
            found.push(comparison);
            continue;
        }

        let comparator = COMPARATORS
            .iter()
            .find(|(phrase, _)| query.matches_at(i, phrase))
            .map(|(phrase, bound)| (*bound, NormalizedQuery::phrase_len(phrase)));

        if let Some((bound, len)) = comparator {
            if let Some((amount, amount_index)) = amount_at(query, i + len) {
                found.push(Comparison {
                    range: bound.range(amount),
                    start: i,
                    end: amount_index + 1,
                });
                i = amount_index + 1;
                continue;
            }
        }
        i += 1;
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comparisons(text: &str) -> (NormalizedQuery, Vec<Comparison>) {
        let query = NormalizedQuery::new(text);
        let found = find_comparisons(&query);
        (query, found)
    }

    #[test]
    fn test_comparators() {
        let (_, found) = comparisons("under £20 and at least 4 stars");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].range, NumericRange::below(20.0));
        assert_eq!(found[1].range, NumericRange::at_least(4.0));
    }

    #[test]
    fn test_no_more_than_is_inclusive() {
        let (_, found) = comparisons("no more than 30 pounds");
        assert_eq!(found[0].range, NumericRange::at_most(30.0));
    }

    #[test]
    fn test_between_and_from_to() {
        let (_, found) = comparisons("between 15 and 30");
        assert_eq!(found[0].range, NumericRange::between(15.0, 30.0));

        let (_, found) = comparisons("from £ 10 to £ 25");
        assert_eq!(found[0].range, NumericRange::between(10.0, 25.0));
    }

    #[test]
    fn test_rating_and_unit_detection() {
        let (query, found) = comparisons("rating above 4 within under 10 minutes");
        assert!(found[0].is_rating(&query));
        assert!(!found[1].is_rating(&query));
        assert!(found[1].has_other_unit(&query));
    }

    #[test]
    fn test_rating_cue_after_amount() {
        let (query, found) = comparisons("sushi with at least 4.5 rating");
        assert_eq!(found[0].range, NumericRange::at_least(4.5));
        assert!(found[0].is_rating(&query));

        let (query, found) = comparisons("ramen over 4 rating");
        assert!(found[0].is_rating(&query));
    }

    #[test]
    fn test_reversed_bounds_are_ordered() {
        let (_, found) = comparisons("between 30 and 10 pounds");
        assert_eq!(found[0].range, NumericRange::between(10.0, 30.0));
    }

    #[test]
    fn test_comparator_without_amount_is_ignored() {
        let (_, found) = comparisons("over the river, under the bridge");
        assert!(found.is_empty());
    }
}
