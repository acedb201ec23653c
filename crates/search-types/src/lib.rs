//! # Search Types Crate
//!
//! Shared vocabulary of the restaurant search core.
//!
//! ## Main Components
//!
//! - **types**: SearchQuery, StructuredQuery, ResultSet, Outcome
//! - **facets**: typed search facets and the facet catalogue
//! - **error**: the error taxonomy and its stable codes
//! - **config**: limits and service settings loaded with Figment
//!
//! ## Example Usage
//!
//! ```ignore
//! use search_types::{Facets, FacetValue, SearchQuery, facets::names};
//!
//! let query = SearchQuery::new("cheap italian food open now", "u1");
//! query.validate()?;
//!
//! let facets = Facets::new()
//!     .with(names::CUISINE, FacetValue::Text("italian".into()))
//!     .with(names::OPEN_NOW, FacetValue::Flag(true));
//! ```

// Public modules
pub mod config;
pub mod error;
pub mod facets;
pub mod types;

// Re-export commonly used types for convenience
pub use config::SearchConfig;
pub use error::{ConfigError, ErrorCode, ExecutionError, Result, SearchError};
pub use facets::{FacetKind, FacetValue, Facets, MealTime, NumericRange, PriceLevel, VisitDay};
pub use types::{
    ErrorDetail, Outcome, QueryParam, RequesterId, ResultSet, Row, SearchQuery, StructuredQuery,
};
