//! # Summarizer
//!
//! Builds summaries such as:
//!
//! ```text
//! Found 2 budget-friendly italian restaurants open now: Luigi's (italian, 4.5),
//! Mario's (italian, 4.1). Top rated: Luigi's (4.5).
//! ```
//!
//! or, for an empty result set, a "No matches found for ..." line with a
//! hint on which constraint to relax.

use tracing::debug;

use search_types::{Facets, NumericRange, Row, SearchConfig, VisitDay, facets::names};

use crate::display::DisplayRow;

/// Rows named in a summary
const NOTABLE_MATCHES: usize = 3;

const ELLIPSIS: char = '…';

/// Produces bounded-length summaries of result sets.
#[derive(Debug, Clone)]
pub struct Summarizer {
    max_chars: usize,
}

impl Summarizer {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            max_chars: config.summary_max_chars,
        }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Summarize `rows` found for `facets`. Never empty, never fails.
    pub fn summarize(&self, rows: &[Row], facets: &Facets) -> String {
        let subject = describe_facets(facets);
        let summary = if rows.is_empty() {
            format!("No matches found for {subject}. {}", broadening_hint(facets))
        } else {
            describe_results(rows, &subject)
        };

        let summary = truncate(&summary, self.max_chars);
        debug!(rows = rows.len(), chars = summary.chars().count(), "Summarized results");
        summary
    }
}

/// "budget-friendly vegan thai restaurants in soho open now rated 4+ for lunch"
///
/// An explicit price range replaces the price word, as in the builder.
fn describe_facets(facets: &Facets) -> String {
    let mut words: Vec<String> = Vec::new();

    if !facets.contains(names::PRICE_RANGE) {
        if let Some(level) = facets.price_level() {
            words.push(level.describe().to_string());
        }
    }
    if let Some(dietary) = facets.texts(names::DIETARY) {
        words.push(dietary.join(" "));
    }
    if let Some(cuisines) = facets.texts(names::CUISINE) {
        words.push(cuisines.join(" or "));
    }
    words.push("restaurants".to_string());

    if let Some(range) = facets.range(names::PRICE_RANGE) {
        words.push(format!("priced {range}"));
    }
    if let Some(excluded) = facets.texts(names::EXCLUDED_CUISINES) {
        words.push(format!("excluding {}", excluded.join(" and ")));
    }
    if let Some(location) = facets.text(names::LOCATION) {
        words.push(format!("in {location}"));
    }
    if facets.flag(names::OPEN_NOW) == Some(true) {
        words.push("open now".to_string());
    }
    if let Some(range) = facets.range(names::MIN_RATING) {
        words.push(format!("rated {range}"));
    }
    if let Some(meal) = facets.meal_time() {
        words.push(format!("for {meal}"));
    }
    if let Some(day) = facets.visit_day() {
        words.push(match day {
            VisitDay::Today | VisitDay::Tomorrow => day.to_string(),
            weekday => format!("on {weekday}"),
        });
    }
    if let Some(window) = facets.range(names::VISIT_TIME) {
        words.push(describe_window(window));
    }

    if !facets.has_structured() {
        if let Some(keywords) = facets.keywords() {
            words.push(format!("matching \"{keywords}\""));
        }
    }
    words.join(" ")
}

/// "at 7pm", "between 6pm and 8:30pm", "after 10pm"
fn describe_window(window: &NumericRange) -> String {
    match (window.min, window.max) {
        (Some(start), Some(end)) if start == end => format!("at {}", clock(start)),
        (Some(start), Some(end)) => format!("between {} and {}", clock(start), clock(end)),
        (Some(start), None) => format!("after {}", clock(start)),
        (None, Some(end)) if window.max_exclusive => format!("before {}", clock(end)),
        (None, Some(end)) => format!("by {}", clock(end)),
        (None, None) => "at any time".to_string(),
    }
}

/// 19.5 -> "7:30pm", 12 -> "noon", 0 and 24 -> "midnight"
fn clock(hours: f64) -> String {
    let minutes = (hours * 60.0).round() as i64;
    let (hour, minute) = (minutes / 60 % 24, minutes % 60);
    let suffix = if hour < 12 { "am" } else { "pm" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    match (hour, minute) {
        (0, 0) => "midnight".to_string(),
        (12, 0) => "noon".to_string(),
        (_, 0) => format!("{display_hour}{suffix}"),
        _ => format!("{display_hour}:{minute:02}{suffix}"),
    }
}

fn broadening_hint(facets: &Facets) -> &'static str {
    if facets.contains(names::PRICE_RANGE) || facets.contains(names::PRICE_LEVEL) {
        "Try widening your budget."
    } else if facets.contains(names::MIN_RATING) {
        "Try a lower rating threshold."
    } else if facets.contains(names::LOCATION) {
        "Try a nearby area."
    } else if facets.contains(names::OPEN_NOW) {
        "Try including places that are closed right now."
    } else if facets.contains(names::VISIT_DAY) || facets.contains(names::VISIT_TIME) {
        "Try another day or time."
    } else if facets.has_structured() {
        "Try removing a filter."
    } else {
        "Try fewer or broader words."
    }
}

fn describe_results(rows: &[Row], subject: &str) -> String {
    let count = rows.len();
    let subject = if count == 1 {
        subject.replacen("restaurants", "restaurant", 1)
    } else {
        subject.to_string()
    };

    let displayed: Vec<DisplayRow> = rows.iter().filter_map(DisplayRow::from_row).collect();
    let notable: Vec<String> = displayed
        .iter()
        .filter_map(DisplayRow::describe)
        .take(NOTABLE_MATCHES)
        .collect();

    let mut summary = format!("Found {count} {subject}");
    if notable.is_empty() {
        summary.push('.');
    } else {
        summary.push_str(&format!(": {}.", notable.join(", ")));
    }

    let top = displayed
        .iter()
        .filter_map(|row| Some((row.name.as_deref()?, row.rating?)))
        .max_by(|a, b| a.1.total_cmp(&b.1));
    if let Some((name, rating)) = top {
        summary.push_str(&format!(" Top rated: {name} ({rating:.1})."));
    }
    summary
}

/// Cut `text` to at most `max_chars` characters, preferring a word boundary.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }

    // leave room for the ellipsis
    let kept: String = text.chars().take(max_chars - 1).collect();
    let cut = match kept.rfind(char::is_whitespace) {
        Some(boundary) if boundary > 0 => kept[..boundary].trim_end_matches([',', ':', ';', ' ']),
        _ => kept.as_str(),
    };
    format!("{cut}{ELLIPSIS}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_types::{FacetValue, NumericRange, PriceLevel};
    use serde_json::json;

    fn summarizer() -> Summarizer {
        Summarizer::new(&SearchConfig::default())
    }

    fn italian_facets() -> Facets {
        Facets::new()
            .with(names::CUISINE, FacetValue::Text("italian".into()))
            .with(names::PRICE_LEVEL, FacetValue::PriceLevel(PriceLevel::Low))
            .with(names::OPEN_NOW, FacetValue::Flag(true))
            .with(names::KEYWORDS, FacetValue::Text("cheap italian food open now".into()))
    }

    #[test]
    fn test_two_italian_rows() {
        let rows = vec![
            json!({"Name": "Luigi's", "CuisineType": "Italian", "Rating": 4.5}),
            json!({"Name": "Mario's", "CuisineType": "Italian", "Rating": 4.1}),
        ];
        let summary = summarizer().summarize(&rows, &italian_facets());
        assert_eq!(
            summary,
            "Found 2 budget-friendly italian restaurants open now: Luigi's (italian, 4.5), \
             Mario's (italian, 4.1). Top rated: Luigi's (4.5)."
        );
    }

    #[test]
    fn test_no_rows() {
        let summary = summarizer().summarize(&[], &italian_facets());
        assert!(summary.to_lowercase().contains("no matches"));
        assert!(summary.contains("budget-friendly italian restaurants open now"));
        assert!(summary.ends_with("Try widening your budget."));
    }

    #[test]
    fn test_no_rows_and_no_facets_is_not_empty() {
        let summary = summarizer().summarize(&[], &Facets::new());
        assert_eq!(summary, "No matches found for restaurants. Try fewer or broader words.");
    }

    #[test]
    fn test_keywords_only() {
        let facets = Facets::new().with(names::KEYWORDS, FacetValue::Text("somewhere quiet".into()));
        let summary = summarizer().summarize(&[json!({"name": "Hush"})], &facets);
        assert_eq!(summary, "Found 1 restaurant matching \"somewhere quiet\": Hush.");
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let rows = vec![
            json!("not an object"),
            json!({"Rating": "five"}),
            json!(null),
            json!({"name": "Dishoom", "rating": 4.7}),
        ];
        let summary = summarizer().summarize(&rows, &Facets::new());
        assert_eq!(
            summary,
            "Found 4 restaurants: Dishoom (4.7). Top rated: Dishoom (4.7)."
        );
    }

    #[test]
    fn test_at_most_three_notable_matches() {
        let rows: Vec<Row> = (1..=5)
            .map(|i| json!({"name": format!("Place {i}"), "rating": 3.0 + i as f64 / 10.0}))
            .collect();
        let summary = summarizer().summarize(&rows, &Facets::new());
        assert!(summary.contains("Place 3"));
        assert!(!summary.contains("Place 4 ("));
        // top rated comes from all rows, not just the named ones
        assert!(summary.ends_with("Top rated: Place 5 (3.5)."));
    }

    #[test]
    fn test_price_range_and_rating_description() {
        let facets = Facets::new()
            .with(names::PRICE_RANGE, FacetValue::Range(NumericRange::below(20.0)))
            .with(names::MIN_RATING, FacetValue::Range(NumericRange::at_least(4.0)))
            .with(names::LOCATION, FacetValue::Text("soho".into()));
        let summary = summarizer().summarize(&[], &facets);
        assert_eq!(
            summary,
            "No matches found for restaurants priced under 20 in soho rated 4+. Try widening your budget."
        );
    }

    #[test]
    fn test_day_and_time_description() {
        let facets = Facets::new()
            .with(names::CUISINE, FacetValue::Text("italian".into()))
            .with(names::LOCATION, FacetValue::Text("soho".into()))
            .with(names::VISIT_DAY, FacetValue::VisitDay(VisitDay::Tomorrow))
            .with(names::VISIT_TIME, FacetValue::Range(NumericRange::between(19.0, 19.0)));
        assert_eq!(
            summarizer().summarize(&[], &facets),
            "No matches found for italian restaurants in soho tomorrow at 7pm. Try a nearby area."
        );

        let facets = Facets::new()
            .with(names::VISIT_DAY, FacetValue::VisitDay(VisitDay::Friday))
            .with(names::VISIT_TIME, FacetValue::Range(NumericRange::between(18.0, 20.5)));
        assert_eq!(
            summarizer().summarize(&[], &facets),
            "No matches found for restaurants on friday between 6pm and 8:30pm. Try another day or time."
        );
    }

    #[test]
    fn test_clock_phrases() {
        assert_eq!(clock(19.0), "7pm");
        assert_eq!(clock(9.25), "9:15am");
        assert_eq!(clock(12.0), "noon");
        assert_eq!(clock(24.0), "midnight");
        assert_eq!(clock(0.5), "12:30am");
        assert_eq!(describe_window(&NumericRange::at_least(22.0)), "after 10pm");
        assert_eq!(describe_window(&NumericRange::below(11.0)), "before 11am");
        assert_eq!(describe_window(&NumericRange::at_most(22.0)), "by 10pm");
    }

    #[test]
    fn test_summary_respects_max_chars() {
        let config = SearchConfig { summary_max_chars: 40, ..SearchConfig::default() };
        let rows = vec![
            json!({"Name": "Luigi's", "CuisineType": "Italian", "Rating": 4.5}),
            json!({"Name": "Mario's", "CuisineType": "Italian", "Rating": 4.1}),
        ];
        let summary = Summarizer::new(&config).summarize(&rows, &italian_facets());
        assert!(summary.chars().count() <= 40);
        assert!(summary.ends_with('…'));
        assert_eq!(summary, "Found 2 budget-friendly italian…");
    }

    #[test]
    fn test_truncate_without_boundary_is_hard_cut() {
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
        assert_eq!(truncate("short", 5), "short");
        assert_eq!(truncate("ab cd", 1), "…");
    }
}
