//! Extractor for the time of the visit ("at 7pm", "between 6 and 8pm", "tonight").
//!
//! Clock times need an am/pm marker or one of the words noon, midday and
//! midnight. A bare number is left alone since it is as likely to be a price
//! or a party size. Named windows ("tonight", "late night") only apply when
//! no clock time was found.

use search_types::{FacetValue, Facets, NumericRange, facets::{HOURS_PER_DAY, names}};

use crate::normalize::NormalizedQuery;
use crate::traits::FacetExtractor;

/// Day parts, longest phrase first
const WINDOWS: &[(&str, Window)] = &[
    ("late night", Window::From(22.0)),
    ("tonight", Window::Span(17.0, 23.0)),
    ("evening", Window::Span(17.0, 23.0)),
    ("night", Window::Span(17.0, 23.0)),
    ("afternoon", Window::Span(12.0, 17.0)),
    ("morning", Window::Span(7.0, 12.0)),
];

/// Words that introduce a time or join the two ends of a span
const CUES: &[&str] = &[
    "between", "from", "after", "before", "by", "at", "around", "about", "until", "till", "and", "to",
];

#[derive(Debug, Clone, Copy)]
enum Window {
    From(f64),
    Span(f64, f64),
}

impl Window {
    fn range(self) -> NumericRange {
        match self {
            Window::From(start) => NumericRange::at_least(start),
            Window::Span(start, end) => NumericRange::between(start, end),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

/// A clock reading before am/pm is settled
#[derive(Debug, Clone, Copy)]
struct Clock {
    hour: u32,
    minute: u32,
    meridiem: Option<Meridiem>,
    /// Token index just past the reading
    next: usize,
}

impl Clock {
    /// Hours since midnight, or `None` when am/pm is still unknown.
    /// Midnight resolves to the end of the day.
    fn resolve(&self, fallback: Option<Meridiem>) -> Option<f64> {
        let hour = match self.meridiem.or(fallback)? {
            Meridiem::Am if self.hour == 12 && self.minute == 0 => return Some(HOURS_PER_DAY),
            Meridiem::Am => self.hour % 12,
            Meridiem::Pm => self.hour % 12 + 12,
        };
        Some(f64::from(hour) + f64::from(self.minute) / 60.0)
    }

    fn hours(&self) -> Option<f64> {
        self.resolve(None)
    }
}

/// Splits "7pm" into ("7", pm)
fn split_meridiem(token: &str) -> (&str, Option<Meridiem>) {
    for (suffix, meridiem) in [("a.m", Meridiem::Am), ("p.m", Meridiem::Pm), ("am", Meridiem::Am), ("pm", Meridiem::Pm)] {
        if let Some(body) = token.strip_suffix(suffix) {
            return (body, Some(meridiem));
        }
    }
    (token, None)
}

/// Parses "7" or "7.30" on the 12 hour clock
fn hour_and_minute(text: &str) -> Option<(u32, u32)> {
    let (hour, minute) = match text.split_once('.') {
        Some((hour, minute)) => (hour, Some(minute)),
        None => (text, None),
    };
    let hour: u32 = hour.parse().ok().filter(|h| (1..=12).contains(h))?;
    let minute = match minute {
        Some(minute) => minutes(minute)?,
        None => 0,
    };
    Some((hour, minute))
}

fn minutes(text: &str) -> Option<u32> {
    if text.len() != 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok().filter(|m| *m < 60)
}

/// Reads a clock time starting at token `i`
fn clock_at(query: &NormalizedQuery, i: usize) -> Option<Clock> {
    let token = query.token(i)?;
    let named = |hour, meridiem| Clock { hour, minute: 0, meridiem: Some(meridiem), next: i + 1 };
    match token {
        "noon" | "midday" => return Some(named(12, Meridiem::Pm)),
        "midnight" => return Some(named(12, Meridiem::Am)),
        _ => {}
    }

    let (body, meridiem) = split_meridiem(token);
    let (hour, minute) = hour_and_minute(body)?;
    if meridiem.is_some() {
        return Some(Clock { hour, minute, meridiem, next: i + 1 });
    }

    let bare = Clock { hour, minute, meridiem: None, next: i + 1 };
    let Some(following) = query.token(i + 1) else {
        return Some(bare);
    };
    match split_meridiem(following) {
        ("", Some(meridiem)) => Some(Clock { meridiem: Some(meridiem), next: i + 2, ..bare }),
        // "7:30pm" arrives as "7" then "30pm"
        (tail, Some(meridiem)) if minute == 0 => match minutes(tail) {
            Some(minute) => Some(Clock { hour, minute, meridiem: Some(meridiem), next: i + 2 }),
            None => Some(bare),
        },
        _ => Some(bare),
    }
}

/// "between X and Y", "from X to Y". The first time borrows the
/// second's am/pm when it has none of its own.
fn span(query: &NormalizedQuery, i: usize, joiners: &[&str]) -> Option<NumericRange> {
    let start = clock_at(query, i)?;
    if !query.token(start.next).is_some_and(|t| joiners.contains(&t)) {
        return None;
    }
    let end = clock_at(query, start.next + 1)?;
    let from = start.resolve(end.meridiem)?;
    let until = end.resolve(start.meridiem)?;
    // spans past midnight are not supported
    (from <= until).then(|| NumericRange::between(from, until))
}

/// A time window read from the cue word at token `i`
fn window_at(query: &NormalizedQuery, i: usize) -> Option<NumericRange> {
    let cue = query.token(i)?;
    let point = |clock: Clock| clock.hours().map(|h| NumericRange::between(h, h));
    match cue {
        "between" => span(query, i + 1, &["and"]),
        "from" => span(query, i + 1, &["to", "until", "till"])
            .or_else(|| clock_at(query, i + 1)?.hours().map(NumericRange::at_least)),
        "after" => clock_at(query, i + 1)?.hours().map(NumericRange::at_least),
        "before" => clock_at(query, i + 1)?.hours().map(NumericRange::below),
        "by" => clock_at(query, i + 1)?.hours().map(NumericRange::at_most),
        "at" | "around" | "about" | "until" | "till" => clock_at(query, i + 1).and_then(point),
        // a time after a cue was already read from the cue, successfully or not
        _ if i > 0 && query.token(i - 1).is_some_and(|prev| CUES.contains(&prev)) => None,
        _ => clock_at(query, i).and_then(point),
    }
}

/// Adds `visit_time` as a range of hours since midnight
pub struct VisitTimeExtractor;

impl FacetExtractor for VisitTimeExtractor {
    fn name(&self) -> &str {
        "VisitTimeExtractor"
    }

    fn extract(&self, query: &NormalizedQuery, mut facets: Facets) -> Facets {
        let window = (0..query.len())
            .find_map(|i| window_at(query, i))
            .or_else(|| {
                (0..query.len()).find_map(|i| {
                    WINDOWS
                        .iter()
                        .find(|(phrase, _)| query.matches_at(i, phrase))
                        .map(|(_, window)| window.range())
                })
            });

        if let Some(window) = window {
            facets.insert(names::VISIT_TIME, FacetValue::Range(window));
        }
        facets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(text: &str) -> Option<NumericRange> {
        VisitTimeExtractor
            .extract(&NormalizedQuery::new(text), Facets::new())
            .range(names::VISIT_TIME)
            .copied()
    }

    fn at(hours: f64) -> Option<NumericRange> {
        Some(NumericRange::between(hours, hours))
    }

    // ============================================================================
    // Clock times
    // ============================================================================

    #[test]
    fn test_clock_forms() {
        assert_eq!(time("italian tomorrow at 7pm in soho"), at(19.0));
        assert_eq!(time("table at 7 pm"), at(19.0));
        assert_eq!(time("dinner 8.30pm"), at(20.5));
        assert_eq!(time("lunch at 12:45pm"), at(12.75));
        assert_eq!(time("breakfast around 9 a.m."), at(9.0));
        assert_eq!(time("somewhere at noon"), at(12.0));
        assert_eq!(time("open until midnight"), at(24.0));
        assert_eq!(time("coffee 12.30am"), at(0.5));
    }

    #[test]
    fn test_cues_shape_the_window() {
        assert_eq!(time("curry after 8pm"), Some(NumericRange::at_least(20.0)));
        assert_eq!(time("brunch before 11am"), Some(NumericRange::below(11.0)));
        assert_eq!(time("back by 10pm"), Some(NumericRange::at_most(22.0)));
        assert_eq!(time("pizza from 9pm"), Some(NumericRange::at_least(21.0)));
    }

    #[test]
    fn test_spans() {
        assert_eq!(time("tapas between 6 and 8pm"), Some(NumericRange::between(18.0, 20.0)));
        assert_eq!(time("lunch from 11am to 2pm"), Some(NumericRange::between(11.0, 14.0)));
        assert_eq!(time("from 6pm until 9"), Some(NumericRange::between(18.0, 21.0)));
        // crossing midnight is left out
        assert_eq!(time("drinks between 10pm and 1am"), None);
    }

    // ============================================================================
    // Named windows and bare numbers
    // ============================================================================

    #[test]
    fn test_named_windows() {
        assert_eq!(time("sushi tonight"), Some(NumericRange::between(17.0, 23.0)));
        assert_eq!(time("late night ramen"), Some(NumericRange::at_least(22.0)));
        assert_eq!(time("cafe this morning"), Some(NumericRange::between(7.0, 12.0)));
        // a clock time beats the named window
        assert_eq!(time("tonight at 9pm"), at(21.0));
    }

    #[test]
    fn test_numbers_without_meridiem_are_ignored() {
        assert_eq!(time("tapas between 15 and 30 near the river"), None);
        assert_eq!(time("table at 7 for 4 people"), None);
        assert_eq!(time("thai under £20"), None);
        assert_eq!(time("spam fritters at 13pm"), None);
        assert_eq!(time("dinner at 7.75pm"), None);
    }
}
