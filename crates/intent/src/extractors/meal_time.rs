//! Extractor for the meal being planned (breakfast, brunch, lunch, dinner).

use search_types::{FacetValue, Facets, facets::names};

use crate::lexicon::MEALS;
use crate::normalize::NormalizedQuery;
use crate::traits::FacetExtractor;

/// Adds `meal_time` from the first meal word in the query
pub struct MealTimeExtractor;

impl FacetExtractor for MealTimeExtractor {
    fn name(&self) -> &str {
        "MealTimeExtractor"
    }

    fn extract(&self, query: &NormalizedQuery, mut facets: Facets) -> Facets {
        let meal = query.tokens().iter().find_map(|token| {
            MEALS
                .iter()
                .find(|(word, _)| *word == token.as_str())
                .map(|(_, meal)| *meal)
        });

        if let Some(meal) = meal {
            facets.insert(names::MEAL_TIME, FacetValue::MealTime(meal));
        }
        facets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_types::MealTime;

    #[test]
    fn test_first_meal_wins() {
        let query = NormalizedQuery::new("supper or a late lunch");
        let facets = MealTimeExtractor.extract(&query, Facets::new());
        assert_eq!(facets.meal_time(), Some(MealTime::Dinner));
    }

    #[test]
    fn test_no_meal() {
        let query = NormalizedQuery::new("sushi open now");
        assert!(MealTimeExtractor.extract(&query, Facets::new()).meal_time().is_none());
    }
}
