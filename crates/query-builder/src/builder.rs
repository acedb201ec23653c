//! # Query Builder
//!
//! Maps each facet to one WHERE clause over the `restaurants` table:
//!
//! | facet | clause |
//! |---|---|
//! | cuisine | `LOWER("CuisineType") = $n` or `IN ($n, ...)` |
//! | excluded_cuisines | `("CuisineType" IS NULL OR LOWER("CuisineType") NOT IN (...))` |
//! | price_range | `"AveragePrice"` compared against each bound |
//! | price_level | `"PriceLevel" = $n` (tier 1-4), only without a price_range |
//! | open_now | `"IsOpenNow" = $n` |
//! | min_rating | `"Rating"` compared against each bound |
//! | location | `"Address" ILIKE $n` |
//! | dietary | `"DietaryOptions" @> ARRAY[...]::text[]` |
//! | meal_time | `$n = ANY("MealTimes")` |
//! | visit_day | `$n = ANY("OpenDays")`, or the weekday `$n` days from today for today/tomorrow |
//! | visit_time | `"ClosesAt"` after the window opens, `"OpensAt"` before it ends |
//! | keywords | `("Name" ILIKE $n OR "CuisineType" ILIKE $n)`, only without other filters |
//!
//! Clauses always appear in the order above (price first from either
//! facet), so identical facets produce identical queries.

use tracing::debug;

use search_types::{
    FacetKind, FacetValue, Facets, NumericRange, Result, SearchConfig, SearchError,
    StructuredQuery, facets::{HOURS_PER_DAY, names},
};

use crate::binder::ParamBinder;

/// Table every structured query reads from
pub const TABLE: &str = "restaurants";

const ORDER_BY: &str = r#"ORDER BY "Rating" DESC NULLS LAST"#;

/// Builds parameterized queries within the configured limits.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    max_parameters: usize,
    max_filters: usize,
    result_limit: usize,
}

impl QueryBuilder {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            max_parameters: config.max_parameters,
            max_filters: config.max_filters,
            result_limit: config.result_limit,
        }
    }

    /// Build the structured query for `facets`.
    ///
    /// # Errors
    /// - `UnsupportedFacet` for unknown facets or values that cannot be bound
    /// - `QueryTooComplex` when the parameter or filter cap is exceeded
    pub fn build(&self, facets: &Facets) -> Result<StructuredQuery> {
        validate(facets)?;

        let mut binder = ParamBinder::new();
        let mut filters: Vec<String> = Vec::new();

        if let Some(cuisines) = facets.texts(names::CUISINE) {
            let cuisines: Vec<String> = cuisines.iter().map(|c| normalize(c)).collect();
            let clause = match cuisines.as_slice() {
                [one] => format!(r#"LOWER("CuisineType") = {}"#, binder.bind(one.as_str())),
                many => format!(r#"LOWER("CuisineType") IN ({})"#, binder.bind_all(many.to_vec())),
            };
            filters.push(clause);
        }

        if let Some(excluded) = facets.texts(names::EXCLUDED_CUISINES) {
            let excluded: Vec<String> = excluded.iter().map(|c| normalize(c)).collect();
            filters.push(format!(
                r#"("CuisineType" IS NULL OR LOWER("CuisineType") NOT IN ({}))"#,
                binder.bind_all(excluded)
            ));
        }

        // An explicit budget beats a price word
        if let Some(range) = facets.range(names::PRICE_RANGE) {
            if facets.contains(names::PRICE_LEVEL) {
                debug!("price_range present, ignoring price_level");
            }
            filters.push(range_clause(r#""AveragePrice""#, range, &mut binder));
        } else if let Some(level) = facets.price_level() {
            filters.push(format!(r#""PriceLevel" = {}"#, binder.bind(level.tier())));
        }

        if let Some(open) = facets.flag(names::OPEN_NOW) {
            filters.push(format!(r#""IsOpenNow" = {}"#, binder.bind(open)));
        }

        if let Some(range) = facets.range(names::MIN_RATING) {
            filters.push(range_clause(r#""Rating""#, range, &mut binder));
        }

        if let Some(location) = facets.text(names::LOCATION) {
            let pattern = contains_pattern(location.trim());
            filters.push(format!(r#""Address" ILIKE {}"#, binder.bind(pattern)));
        }

        if let Some(dietary) = facets.texts(names::DIETARY) {
            let dietary: Vec<String> = dietary.iter().map(|d| normalize(d)).collect();
            filters.push(format!(
                r#""DietaryOptions" @> ARRAY[{}]::text[]"#,
                binder.bind_all(dietary)
            ));
        }

        if let Some(meal) = facets.meal_time() {
            filters.push(format!(r#"{} = ANY("MealTimes")"#, binder.bind(meal.as_str())));
        }

        if let Some(day) = facets.visit_day() {
            let clause = match day.day_offset() {
                Some(offset) => format!(
                    r#"LOWER(TRIM(TO_CHAR(CURRENT_DATE + {}::int, 'Day'))) = ANY("OpenDays")"#,
                    binder.bind(offset)
                ),
                None => format!(r#"{} = ANY("OpenDays")"#, binder.bind(day.as_str())),
            };
            filters.push(clause);
        }

        if let Some(window) = facets.range(names::VISIT_TIME) {
            filters.push(opening_hours_clause(window, &mut binder));
        }

        if filters.is_empty() {
            if let Some(keywords) = facets.keywords() {
                let pattern = binder.bind(contains_pattern(keywords.trim()));
                filters.push(format!(r#"("Name" ILIKE {pattern} OR "CuisineType" ILIKE {pattern})"#));
            }
        }

        self.check_limits(binder.len(), filters.len())?;

        let mut template = format!("SELECT * FROM {TABLE}");
        if !filters.is_empty() {
            template.push_str(" WHERE ");
            template.push_str(&filters.join(" AND "));
        }
        template.push_str(&format!(" {ORDER_BY} LIMIT {}", self.result_limit));

        let query = StructuredQuery {
            template,
            parameters: binder.into_params(),
        };
        debug_assert!(query.is_consistent(), "placeholders out of step with parameters");

        debug!(
            parameters = query.parameter_count(),
            filters = filters.len(),
            "Built structured query"
        );
        Ok(query)
    }

    fn check_limits(&self, parameters: usize, filters: usize) -> Result<()> {
        if parameters > self.max_parameters {
            return Err(SearchError::QueryTooComplex {
                what: "parameters",
                count: parameters,
                limit: self.max_parameters,
            });
        }
        if filters > self.max_filters {
            return Err(SearchError::QueryTooComplex {
                what: "filters",
                count: filters,
                limit: self.max_filters,
            });
        }
        Ok(())
    }
}

/// Reject anything that cannot be bound safely.
fn validate(facets: &Facets) -> Result<()> {
    for (name, value) in facets.iter() {
        let kind = FacetKind::for_name(name)
            .ok_or_else(|| SearchError::unsupported(name, "unknown facet"))?;
        if !kind.accepts(value) {
            return Err(SearchError::unsupported(
                name,
                format!("{} value not accepted", value.shape()),
            ));
        }

        match value {
            FacetValue::Text(text) if text.trim().is_empty() => {
                return Err(SearchError::unsupported(name, "empty text"));
            }
            FacetValue::TextList(items) if items.is_empty() => {
                return Err(SearchError::unsupported(name, "empty list"));
            }
            FacetValue::TextList(items) if items.iter().any(|item| item.trim().is_empty()) => {
                return Err(SearchError::unsupported(name, "empty list item"));
            }
            FacetValue::Range(range) if !range.is_finite() => {
                return Err(SearchError::unsupported(name, "non-finite bound"));
            }
            FacetValue::Range(range) if range.is_empty() => {
                return Err(SearchError::unsupported(name, format!("empty range {range}")));
            }
            FacetValue::Range(range) if name == names::VISIT_TIME && !range.is_within(0.0, HOURS_PER_DAY) => {
                return Err(SearchError::unsupported(name, format!("hours {range} outside the day")));
            }
            _ => {}
        }
    }
    Ok(())
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// `%text%` with LIKE wildcards in `text` escaped
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// One comparison per present bound; both bounds are grouped.
fn range_clause(column: &str, range: &NumericRange, binder: &mut ParamBinder) -> String {
    let mut parts = Vec::with_capacity(2);
    if let Some(min) = range.min {
        let op = if range.min_exclusive { ">" } else { ">=" };
        parts.push(format!("{column} {op} {}", binder.bind(min)));
    }
    if let Some(max) = range.max {
        let op = if range.max_exclusive { "<" } else { "<=" };
        parts.push(format!("{column} {op} {}", binder.bind(max)));
    }
    match parts.as_slice() {
        [single] => single.clone(),
        _ => format!("({})", parts.join(" AND ")),
    }
}

/// Restaurants open at some point in `window`: still open when it
/// starts and already open before it ends. Hours are since midnight.
fn opening_hours_clause(window: &NumericRange, binder: &mut ParamBinder) -> String {
    let mut parts = Vec::with_capacity(2);
    if let Some(start) = window.min {
        let op = if window.min_exclusive { ">" } else { ">=" };
        parts.push(format!(r#""ClosesAt" {op} {}"#, binder.bind(start)));
    }
    if let Some(end) = window.max {
        let op = if window.max_exclusive { "<" } else { "<=" };
        parts.push(format!(r#""OpensAt" {op} {}"#, binder.bind(end)));
    }
    match parts.as_slice() {
        [single] => single.clone(),
        _ => format!("({})", parts.join(" AND ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_types::{MealTime, PriceLevel, QueryParam, VisitDay};

    fn builder() -> QueryBuilder {
        QueryBuilder::new(&SearchConfig::default())
    }

    fn text(value: &str) -> FacetValue {
        FacetValue::Text(value.to_string())
    }

    fn list(values: &[&str]) -> FacetValue {
        FacetValue::TextList(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn test_cheap_italian_open_now() {
        let facets = Facets::new()
            .with(names::CUISINE, text("italian"))
            .with(names::PRICE_LEVEL, FacetValue::PriceLevel(PriceLevel::Low))
            .with(names::OPEN_NOW, FacetValue::Flag(true))
            .with(names::KEYWORDS, text("cheap italian food open now"));

        let query = builder().build(&facets).unwrap();
        assert_eq!(
            query.template,
            r#"SELECT * FROM restaurants WHERE LOWER("CuisineType") = $1 AND "PriceLevel" = $2 AND "IsOpenNow" = $3 ORDER BY "Rating" DESC NULLS LAST LIMIT 20"#
        );
        assert_eq!(
            query.parameters,
            vec![QueryParam::Text("italian".into()), QueryParam::Int(1), QueryParam::Bool(true)]
        );
    }

    #[test]
    fn test_no_facets_has_no_where_clause() {
        let query = builder().build(&Facets::new()).unwrap();
        assert_eq!(
            query.template,
            r#"SELECT * FROM restaurants ORDER BY "Rating" DESC NULLS LAST LIMIT 20"#
        );
        assert!(query.parameters.is_empty());
    }

    #[test]
    fn test_keywords_only_without_structured_filters() {
        let facets = Facets::new().with(names::KEYWORDS, text("50% off_peak"));
        let query = builder().build(&facets).unwrap();
        assert!(query.template.contains(r#"("Name" ILIKE $1 OR "CuisineType" ILIKE $1)"#));
        assert_eq!(query.parameters, vec![QueryParam::Text(r"%50\% off\_peak%".into())]);
        assert!(query.is_consistent());
    }

    #[test]
    fn test_price_range_suppresses_price_level() {
        let facets = Facets::new()
            .with(names::PRICE_LEVEL, FacetValue::PriceLevel(PriceLevel::High))
            .with(names::PRICE_RANGE, FacetValue::Range(NumericRange::below(25.0)));

        let query = builder().build(&facets).unwrap();
        assert!(query.template.contains(r#""AveragePrice" < $1"#));
        assert!(!query.template.contains("PriceLevel"));
        assert_eq!(query.parameters, vec![QueryParam::Float(25.0)]);
    }

    #[test]
    fn test_range_operators() {
        let facets = Facets::new()
            .with(names::PRICE_RANGE, FacetValue::Range(NumericRange::between(15.0, 30.0)))
            .with(names::MIN_RATING, FacetValue::Range(NumericRange::above(4.0)));

        let query = builder().build(&facets).unwrap();
        assert!(query.template.contains(r#"("AveragePrice" >= $1 AND "AveragePrice" <= $2)"#));
        assert!(query.template.contains(r#""Rating" > $3"#));
    }

    #[test]
    fn test_every_facet_kind() {
        let facets = Facets::new()
            .with(names::CUISINE, list(&["Thai", "vietnamese"]))
            .with(names::EXCLUDED_CUISINES, list(&["indian"]))
            .with(names::OPEN_NOW, FacetValue::Flag(true))
            .with(names::MIN_RATING, FacetValue::Range(NumericRange::at_least(4.0)))
            .with(names::LOCATION, text("soho"))
            .with(names::DIETARY, list(&["vegan", "halal"]))
            .with(names::MEAL_TIME, FacetValue::MealTime(MealTime::Lunch));

        let query = builder().build(&facets).unwrap();
        assert_eq!(
            query.template,
            concat!(
                r#"SELECT * FROM restaurants WHERE LOWER("CuisineType") IN ($1, $2)"#,
                r#" AND ("CuisineType" IS NULL OR LOWER("CuisineType") NOT IN ($3))"#,
                r#" AND "IsOpenNow" = $4 AND "Rating" >= $5 AND "Address" ILIKE $6"#,
                r#" AND "DietaryOptions" @> ARRAY[$7, $8]::text[] AND $9 = ANY("MealTimes")"#,
                r#" ORDER BY "Rating" DESC NULLS LAST LIMIT 20"#
            )
        );
        assert_eq!(query.parameters[0], QueryParam::Text("thai".into()));
        assert_eq!(query.parameters[5], QueryParam::Text("%soho%".into()));
        assert_eq!(query.parameters[8], QueryParam::Text("lunch".into()));
        assert!(query.is_consistent());
    }

    #[test]
    fn test_visit_day_and_time() {
        let facets = Facets::new()
            .with(names::MEAL_TIME, FacetValue::MealTime(MealTime::Dinner))
            .with(names::VISIT_DAY, FacetValue::VisitDay(VisitDay::Friday))
            .with(names::VISIT_TIME, FacetValue::Range(NumericRange::between(18.0, 20.5)));

        let query = builder().build(&facets).unwrap();
        assert!(query.template.contains(concat!(
            r#"$1 = ANY("MealTimes") AND $2 = ANY("OpenDays")"#,
            r#" AND ("ClosesAt" >= $3 AND "OpensAt" <= $4)"#
        )));
        assert_eq!(
            query.parameters,
            vec![
                QueryParam::Text("dinner".into()),
                QueryParam::Text("friday".into()),
                QueryParam::Float(18.0),
                QueryParam::Float(20.5),
            ]
        );
    }

    #[test]
    fn test_relative_day_binds_an_offset() {
        let facets = Facets::new()
            .with(names::VISIT_DAY, FacetValue::VisitDay(VisitDay::Tomorrow))
            .with(names::VISIT_TIME, FacetValue::Range(NumericRange::below(11.0)));

        let query = builder().build(&facets).unwrap();
        assert!(query.template.contains(
            r#"LOWER(TRIM(TO_CHAR(CURRENT_DATE + $1::int, 'Day'))) = ANY("OpenDays") AND "OpensAt" < $2"#
        ));
        assert_eq!(query.parameters, vec![QueryParam::Int(1), QueryParam::Float(11.0)]);
        assert!(query.is_consistent());
    }

    #[test]
    fn test_unsupported_facets() {
        let cases = [
            Facets::new().with("parking", FacetValue::Flag(true)),
            Facets::new().with(names::OPEN_NOW, text("yes")),
            Facets::new().with(names::LOCATION, text("   ")),
            Facets::new().with(names::DIETARY, list(&[])),
            Facets::new().with(names::DIETARY, list(&["vegan", ""])),
            Facets::new().with(names::PRICE_RANGE, FacetValue::Range(NumericRange::between(30.0, 10.0))),
            Facets::new().with(names::MIN_RATING, FacetValue::Range(NumericRange::at_least(f64::NAN))),
            Facets::new().with(names::PRICE_RANGE, FacetValue::Range(NumericRange::default())),
            Facets::new().with(names::VISIT_TIME, FacetValue::Range(NumericRange::at_least(25.0))),
            Facets::new().with(names::VISIT_TIME, FacetValue::Range(NumericRange::between(-2.0, 3.0))),
            Facets::new().with(names::VISIT_DAY, text("friday")),
        ];
        for facets in cases {
            let err = builder().build(&facets).unwrap_err();
            assert!(
                matches!(err, SearchError::UnsupportedFacet { .. }),
                "expected unsupported facet for {facets:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_parameter_cap() {
        let many: Vec<String> = (0..13).map(|i| format!("cuisine{i}")).collect();
        let facets = Facets::new().with(names::CUISINE, FacetValue::TextList(many));

        let err = builder().build(&facets).unwrap_err();
        assert_eq!(
            err,
            SearchError::QueryTooComplex { what: "parameters", count: 13, limit: 12 }
        );
    }

    #[test]
    fn test_filter_cap() {
        let config = SearchConfig { max_filters: 2, ..SearchConfig::default() };
        let facets = Facets::new()
            .with(names::CUISINE, text("thai"))
            .with(names::OPEN_NOW, FacetValue::Flag(true))
            .with(names::LOCATION, text("soho"));

        let err = QueryBuilder::new(&config).build(&facets).unwrap_err();
        assert_eq!(err, SearchError::QueryTooComplex { what: "filters", count: 3, limit: 2 });
    }

    #[test]
    fn test_result_limit_from_config() {
        let config = SearchConfig { result_limit: 5, ..SearchConfig::default() };
        let query = QueryBuilder::new(&config).build(&Facets::new()).unwrap();
        assert!(query.template.ends_with("LIMIT 5"));
    }
}
