//! Display fields of a result row.
//!
//! Rows are opaque JSON. Only the name, cuisine and rating are read, with
//! keys matched case-insensitively so both store columns (`Name`,
//! `CuisineType`, `Rating`) and plain keys (`name`, `cuisine`, `rating`)
//! work. Anything missing or of the wrong type is treated as absent.

use search_types::Row;
use serde_json::{Map, Value};

const NAME_KEYS: &[&str] = &["name"];
const CUISINE_KEYS: &[&str] = &["cuisinetype", "cuisine"];
const RATING_KEYS: &[&str] = &["rating"];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DisplayRow {
    pub name: Option<String>,
    pub cuisine: Option<String>,
    pub rating: Option<f64>,
}

impl DisplayRow {
    /// Read the display fields of `row`. Returns `None` for non-object rows.
    pub fn from_row(row: &Row) -> Option<Self> {
        let object = row.as_object()?;
        Some(Self {
            name: text_field(object, NAME_KEYS),
            cuisine: text_field(object, CUISINE_KEYS),
            rating: field(object, RATING_KEYS)
                .and_then(Value::as_f64)
                .filter(|rating| rating.is_finite()),
        })
    }

    /// "Luigi's (italian, 4.5)"
    pub fn describe(&self) -> Option<String> {
        let name = self.name.as_deref()?;
        let details: Vec<String> = self
            .cuisine
            .iter()
            .map(|cuisine| cuisine.to_lowercase())
            .chain(self.rating.map(|rating| format!("{rating:.1}")))
            .collect();
        if details.is_empty() {
            Some(name.to_string())
        } else {
            Some(format!("{name} ({})", details.join(", ")))
        }
    }
}

fn field<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    object
        .iter()
        .find(|(key, value)| !value.is_null() && keys.contains(&key.to_lowercase().as_str()))
        .map(|(_, value)| value)
}

fn text_field(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    field(object, keys)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_store_columns() {
        let row = json!({"Name": "Luigi's", "CuisineType": "Italian", "Rating": 4.5, "Address": "1 Dean St"});
        let display = DisplayRow::from_row(&row).unwrap();
        assert_eq!(display.name.as_deref(), Some("Luigi's"));
        assert_eq!(display.cuisine.as_deref(), Some("Italian"));
        assert_eq!(display.rating, Some(4.5));
        assert_eq!(display.describe().as_deref(), Some("Luigi's (italian, 4.5)"));
    }

    #[test]
    fn test_plain_keys_and_integer_rating() {
        let row = json!({"name": "Bao", "cuisine": "taiwanese", "rating": 4});
        let display = DisplayRow::from_row(&row).unwrap();
        assert_eq!(display.describe().as_deref(), Some("Bao (taiwanese, 4.0)"));
    }

    #[test]
    fn test_malformed_fields_are_absent() {
        let row = json!({"Name": 42, "CuisineType": null, "Rating": "4.5"});
        let display = DisplayRow::from_row(&row).unwrap();
        assert_eq!(display, DisplayRow::default());
        assert_eq!(display.describe(), None);

        assert_eq!(DisplayRow::from_row(&json!("just a string")), None);
        assert_eq!(DisplayRow::from_row(&json!([1, 2, 3])), None);
    }
}
