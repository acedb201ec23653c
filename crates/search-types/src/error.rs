//! Error types for the search core.
//!
//! Every failure the orchestrator can report maps to one `SearchError`
//! variant, and every variant maps to one stable `ErrorCode`. Callers
//! match on the code; the display text is for diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors produced while turning a query into a structured query,
/// or reported back after executing it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// Empty or malformed request
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The understanding service failed or returned unusable facets
    #[error("failed to parse query: {0}")]
    Parse(String),

    /// A facet cannot be expressed as a parameterized filter
    #[error("unsupported facet '{facet}': {reason}")]
    UnsupportedFacet { facet: String, reason: String },

    /// The generated query would exceed a configured limit
    #[error("query needs {count} {what}, limit is {limit}")]
    QueryTooComplex {
        what: &'static str,
        count: usize,
        limit: usize,
    },

    /// An external call exceeded its time budget
    #[error("query understanding timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The data store rejected or failed the query (reported by the caller)
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl SearchError {
    pub fn unsupported(facet: impl Into<String>, reason: impl Into<String>) -> Self {
        SearchError::UnsupportedFacet {
            facet: facet.into(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            SearchError::InvalidInput(_) => ErrorCode::InvalidInput,
            SearchError::Parse(_) => ErrorCode::ParseError,
            SearchError::UnsupportedFacet { .. } => ErrorCode::UnsupportedFacet,
            SearchError::QueryTooComplex { .. } => ErrorCode::QueryTooComplex,
            SearchError::Timeout { .. } => ErrorCode::Timeout,
            SearchError::Execution(_) => ErrorCode::ExecutionError,
        }
    }
}

/// Failure reported by the data-store execution surface.
///
/// The orchestrator passes it through unchanged.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{message}")]
pub struct ExecutionError {
    pub message: String,
    /// Store-specific code (e.g. a SQLSTATE), if the store supplied one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_code: Option<String>,
}

impl ExecutionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            store_code: None,
        }
    }

    pub fn with_store_code(mut self, code: impl Into<String>) -> Self {
        self.store_code = Some(code.into());
        self
    }
}

/// Caller-visible error codes. The serialized form never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidInput,
    ParseError,
    UnsupportedFacet,
    QueryTooComplex,
    Timeout,
    ExecutionError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::ParseError => "PARSE_ERROR",
            ErrorCode::UnsupportedFacet => "UNSUPPORTED_FACET",
            ErrorCode::QueryTooComplex => "QUERY_TOO_COMPLEX",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::ExecutionError => "EXECUTION_ERROR",
        }
    }

    /// Short human-readable message placed in `Outcome::error`
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "invalid input",
            ErrorCode::ParseError => "could not understand query",
            ErrorCode::UnsupportedFacet => "unsupported facet",
            ErrorCode::QueryTooComplex => "query too complex",
            ErrorCode::Timeout => "timed out",
            ErrorCode::ExecutionError => "execution error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] figment::Error),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Convenience type alias for Results in the search core
pub type Result<T> = std::result::Result<T, SearchError>;
