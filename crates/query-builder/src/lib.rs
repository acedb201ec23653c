//! Query Builder: turns `Facets` into a parameterized `StructuredQuery`.
//!
//! User values are only ever bound as parameters; the template is built
//! from fixed fragments and `$n` placeholders.
//!
//! ## Example Usage
//! ```ignore
//! use query_builder::QueryBuilder;
//! use search_types::SearchConfig;
//!
//! let builder = QueryBuilder::new(&SearchConfig::default());
//! let query = builder.build(&facets)?;
//! assert!(query.is_consistent());
//! ```

mod binder;
pub mod builder;

pub use builder::{QueryBuilder, TABLE};
