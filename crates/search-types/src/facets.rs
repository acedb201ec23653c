//! Search facets extracted from free-text queries.
//!
//! A facet is a named search constraint ("cuisine", "open_now", ...).
//! `Facets` keeps them in a `BTreeMap` so iteration and serialization
//! order never depend on insertion order.
//!
//! Invariant: a facet that could not be recognized or parsed is simply
//! absent. Nothing here fills in default values.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// Facet names
// =============================================================================

/// Canonical facet names shared by the parser, builder and summarizer.
pub mod names {
    pub const CUISINE: &str = "cuisine";
    pub const EXCLUDED_CUISINES: &str = "excluded_cuisines";
    pub const PRICE_LEVEL: &str = "price_level";
    pub const PRICE_RANGE: &str = "price_range";
    pub const OPEN_NOW: &str = "open_now";
    pub const MIN_RATING: &str = "min_rating";
    pub const LOCATION: &str = "location";
    pub const DIETARY: &str = "dietary";
    pub const MEAL_TIME: &str = "meal_time";
    pub const VISIT_DAY: &str = "visit_day";
    /// Hours of the day (0-24) the diner wants to be seated within
    pub const VISIT_TIME: &str = "visit_time";
    pub const KEYWORDS: &str = "keywords";

    /// Every facet the system knows how to express
    pub const ALL: [&str; 12] = [
        CUISINE,
        EXCLUDED_CUISINES,
        PRICE_LEVEL,
        PRICE_RANGE,
        OPEN_NOW,
        MIN_RATING,
        LOCATION,
        DIETARY,
        MEAL_TIME,
        VISIT_DAY,
        VISIT_TIME,
        KEYWORDS,
    ];
}

/// `visit_time` bounds are hours of the day; midnight closing is 24.0
pub const HOURS_PER_DAY: f64 = 24.0;

/// The value shape a known facet accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetKind {
    Text,
    /// A single text value or a list of them (e.g. one or several cuisines)
    TextOrList,
    TextList,
    Range,
    Flag,
    PriceLevel,
    MealTime,
    VisitDay,
}

impl FacetKind {
    /// Look up the kind expected for a facet name. Unknown names yield `None`.
    pub fn for_name(name: &str) -> Option<FacetKind> {
        let kind = match name {
            names::CUISINE => FacetKind::TextOrList,
            names::EXCLUDED_CUISINES | names::DIETARY => FacetKind::TextList,
            names::PRICE_LEVEL => FacetKind::PriceLevel,
            names::PRICE_RANGE | names::MIN_RATING | names::VISIT_TIME => FacetKind::Range,
            names::OPEN_NOW => FacetKind::Flag,
            names::LOCATION | names::KEYWORDS => FacetKind::Text,
            names::MEAL_TIME => FacetKind::MealTime,
            names::VISIT_DAY => FacetKind::VisitDay,
            _ => return None,
        };
        Some(kind)
    }

    /// Whether `value` has a shape this kind accepts
    pub fn accepts(&self, value: &FacetValue) -> bool {
        matches!(
            (self, value),
            (FacetKind::Text, FacetValue::Text(_))
                | (FacetKind::TextOrList, FacetValue::Text(_))
                | (FacetKind::TextOrList, FacetValue::TextList(_))
                | (FacetKind::TextList, FacetValue::TextList(_))
                | (FacetKind::Range, FacetValue::Range(_))
                | (FacetKind::Flag, FacetValue::Flag(_))
                | (FacetKind::PriceLevel, FacetValue::PriceLevel(_))
                | (FacetKind::MealTime, FacetValue::MealTime(_))
                | (FacetKind::VisitDay, FacetValue::VisitDay(_))
        )
    }
}

// =============================================================================
// Facet values
// =============================================================================

/// Typed value of a single facet.
///
/// Serialized untagged so `{"cuisine": "italian", "open_now": true}` reads
/// naturally in outcomes and CLI output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FacetValue {
    Text(String),
    TextList(Vec<String>),
    Range(NumericRange),
    Flag(bool),
    PriceLevel(PriceLevel),
    MealTime(MealTime),
    VisitDay(VisitDay),
}

impl FacetValue {
    /// Short name of the value's shape, used in diagnostics
    pub fn shape(&self) -> &'static str {
        match self {
            FacetValue::Text(_) => "text",
            FacetValue::TextList(_) => "text list",
            FacetValue::Range(_) => "range",
            FacetValue::Flag(_) => "flag",
            FacetValue::PriceLevel(_) => "price level",
            FacetValue::MealTime(_) => "meal time",
            FacetValue::VisitDay(_) => "visit day",
        }
    }
}

/// A numeric range with optional bounds.
///
/// Bounds are inclusive unless the matching `*_exclusive` flag is set,
/// so "up to 25" and "under 25" stay distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NumericRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub min_exclusive: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub max_exclusive: bool,
}

impl NumericRange {
    /// `value >= min`
    pub fn at_least(min: f64) -> Self {
        Self { min: Some(min), ..Self::default() }
    }

    /// `value > min`
    pub fn above(min: f64) -> Self {
        Self { min: Some(min), min_exclusive: true, ..Self::default() }
    }

    /// `value <= max`
    pub fn at_most(max: f64) -> Self {
        Self { max: Some(max), ..Self::default() }
    }

    /// `value < max`
    pub fn below(max: f64) -> Self {
        Self { max: Some(max), max_exclusive: true, ..Self::default() }
    }

    /// `min <= value <= max`
    pub fn between(min: f64, max: f64) -> Self {
        Self { min: Some(min), max: Some(max), ..Self::default() }
    }

    /// True when no value can satisfy the range, or it has no bounds at all.
    pub fn is_empty(&self) -> bool {
        match (self.min, self.max) {
            (None, None) => true,
            (Some(min), Some(max)) => {
                min > max || (min == max && (self.min_exclusive || self.max_exclusive))
            }
            _ => false,
        }
    }

    /// True when every present bound lies in `low..=high`
    pub fn is_within(&self, low: f64, high: f64) -> bool {
        let inside = |bound: f64| (low..=high).contains(&bound);
        self.min.is_none_or(inside) && self.max.is_none_or(inside)
    }

    /// True when every present bound is a finite number
    pub fn is_finite(&self) -> bool {
        self.min.is_none_or(f64::is_finite) && self.max.is_none_or(f64::is_finite)
    }

    pub fn contains(&self, value: f64) -> bool {
        let above_min = match self.min {
            Some(min) if self.min_exclusive => value > min,
            Some(min) => value >= min,
            None => true,
        };
        let below_max = match self.max {
            Some(max) if self.max_exclusive => value < max,
            Some(max) => value <= max,
            None => true,
        };
        above_min && below_max
    }
}

impl fmt::Display for NumericRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => write!(f, "{min}-{max}"),
            (Some(min), None) if self.min_exclusive => write!(f, "above {min}"),
            (Some(min), None) => write!(f, "{min}+"),
            (None, Some(max)) if self.max_exclusive => write!(f, "under {max}"),
            (None, Some(max)) => write!(f, "up to {max}"),
            (None, None) => write!(f, "any"),
        }
    }
}

/// Coarse price tier inferred from words like "cheap" or "upscale".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceLevel {
    Low,
    Moderate,
    High,
    Luxury,
}

impl PriceLevel {
    /// Parse a label such as "low" or "Luxury"
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "low" | "cheap" | "budget" => Some(PriceLevel::Low),
            "moderate" | "medium" | "mid" => Some(PriceLevel::Moderate),
            "high" | "expensive" => Some(PriceLevel::High),
            "luxury" | "fine dining" => Some(PriceLevel::Luxury),
            _ => None,
        }
    }

    /// Numeric tier stored in the `PriceLevel` column (1 = cheapest)
    pub fn tier(&self) -> i64 {
        match self {
            PriceLevel::Low => 1,
            PriceLevel::Moderate => 2,
            PriceLevel::High => 3,
            PriceLevel::Luxury => 4,
        }
    }

    /// Phrase used when describing results
    pub fn describe(&self) -> &'static str {
        match self {
            PriceLevel::Low => "budget-friendly",
            PriceLevel::Moderate => "mid-range",
            PriceLevel::High => "upscale",
            PriceLevel::Luxury => "fine dining",
        }
    }
}

impl fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PriceLevel::Low => "low",
            PriceLevel::Moderate => "moderate",
            PriceLevel::High => "high",
            PriceLevel::Luxury => "luxury",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MealTime {
    Breakfast,
    Brunch,
    Lunch,
    Dinner,
}

impl MealTime {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "breakfast" => Some(MealTime::Breakfast),
            "brunch" => Some(MealTime::Brunch),
            "lunch" => Some(MealTime::Lunch),
            "dinner" | "supper" => Some(MealTime::Dinner),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MealTime::Breakfast => "breakfast",
            MealTime::Brunch => "brunch",
            MealTime::Lunch => "lunch",
            MealTime::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day the diner wants to go out. Relative days stay relative; the
/// store resolves them against its own clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitDay {
    Today,
    Tomorrow,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl VisitDay {
    pub fn from_label(label: &str) -> Option<Self> {
        let day = match label.trim().to_lowercase().as_str() {
            "today" | "tonight" => VisitDay::Today,
            "tomorrow" => VisitDay::Tomorrow,
            "monday" | "mon" => VisitDay::Monday,
            "tuesday" | "tue" | "tues" => VisitDay::Tuesday,
            "wednesday" | "wed" => VisitDay::Wednesday,
            "thursday" | "thu" | "thurs" => VisitDay::Thursday,
            "friday" | "fri" => VisitDay::Friday,
            "saturday" | "sat" => VisitDay::Saturday,
            "sunday" | "sun" => VisitDay::Sunday,
            _ => return None,
        };
        Some(day)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VisitDay::Today => "today",
            VisitDay::Tomorrow => "tomorrow",
            VisitDay::Monday => "monday",
            VisitDay::Tuesday => "tuesday",
            VisitDay::Wednesday => "wednesday",
            VisitDay::Thursday => "thursday",
            VisitDay::Friday => "friday",
            VisitDay::Saturday => "saturday",
            VisitDay::Sunday => "sunday",
        }
    }

    /// Days from the current date for relative days, `None` for weekdays
    pub fn day_offset(&self) -> Option<i64> {
        match self {
            VisitDay::Today => Some(0),
            VisitDay::Tomorrow => Some(1),
            _ => None,
        }
    }
}

impl fmt::Display for VisitDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Facets collection
// =============================================================================

/// All facets extracted for one query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Facets {
    entries: BTreeMap<String, FacetValue>,
}

impl Facets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a facet, returning the previous value
    pub fn insert(&mut self, name: impl Into<String>, value: FacetValue) -> Option<FacetValue> {
        self.entries.insert(name.into(), value)
    }

    /// Insert only when the facet is not present yet.
    ///
    /// Returns `true` if the value was stored.
    pub fn insert_if_absent(&mut self, name: impl Into<String>, value: FacetValue) -> bool {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return false;
        }
        self.entries.insert(name, value);
        true
    }

    /// Builder-style insert, handy in tests and fixtures
    pub fn with(mut self, name: impl Into<String>, value: FacetValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FacetValue> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<FacetValue> {
        self.entries.remove(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FacetValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Names of all facets other than the free-text keywords
    pub fn structured_names(&self) -> Vec<&str> {
        self.entries
            .keys()
            .map(String::as_str)
            .filter(|name| *name != names::KEYWORDS)
            .collect()
    }

    /// True if anything beyond the keyword facet was recognized
    pub fn has_structured(&self) -> bool {
        self.entries.keys().any(|name| name != names::KEYWORDS)
    }

    // Typed accessors - each returns None when the facet is missing or
    // holds a different shape.

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            FacetValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Text values of a facet, treating a single text as a one-item list
    pub fn texts(&self, name: &str) -> Option<Vec<&str>> {
        match self.get(name)? {
            FacetValue::Text(text) => Some(vec![text.as_str()]),
            FacetValue::TextList(items) => Some(items.iter().map(String::as_str).collect()),
            _ => None,
        }
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            FacetValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn range(&self, name: &str) -> Option<&NumericRange> {
        match self.get(name)? {
            FacetValue::Range(range) => Some(range),
            _ => None,
        }
    }

    pub fn price_level(&self) -> Option<PriceLevel> {
        match self.get(names::PRICE_LEVEL)? {
            FacetValue::PriceLevel(level) => Some(*level),
            _ => None,
        }
    }

    pub fn meal_time(&self) -> Option<MealTime> {
        match self.get(names::MEAL_TIME)? {
            FacetValue::MealTime(meal) => Some(*meal),
            _ => None,
        }
    }

    pub fn visit_day(&self) -> Option<VisitDay> {
        match self.get(names::VISIT_DAY)? {
            FacetValue::VisitDay(day) => Some(*day),
            _ => None,
        }
    }

    pub fn keywords(&self) -> Option<&str> {
        self.text(names::KEYWORDS)
    }
}
