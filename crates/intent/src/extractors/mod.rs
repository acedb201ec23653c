//! Extractor implementations for the intent pipeline.
//!
//! This module contains all the concrete extractors that can be
//! composed into an ExtractorPipeline.

pub mod cuisine;
pub mod dietary;
pub mod excluded_cuisine;
pub mod location;
pub mod meal_time;
pub mod min_rating;
mod numeric;
pub mod open_now;
pub mod price_level;
pub mod price_range;
pub mod visit_day;
pub mod visit_time;

// Re-export for convenience
pub use cuisine::CuisineExtractor;
pub use dietary::DietaryExtractor;
pub use excluded_cuisine::ExcludedCuisineExtractor;
pub use location::LocationExtractor;
pub use meal_time::MealTimeExtractor;
pub use min_rating::MinRatingExtractor;
pub use open_now::OpenNowExtractor;
pub use price_level::PriceLevelExtractor;
pub use price_range::PriceRangeExtractor;
pub use visit_day::VisitDayExtractor;
pub use visit_time::VisitTimeExtractor;
