//! Core request/response types for the search core.
//!
//! - `SearchQuery`: what a caller asks for
//! - `StructuredQuery`: parameterized template handed to the data store
//! - `ResultSet`: rows the data store sent back
//! - `Outcome`: the single value the orchestrator returns per stage

use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, SearchError};
use crate::facets::Facets;

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier of the user making a request (opaque to the core)
pub type RequesterId = String;

/// One row returned by the execution surface.
///
/// Rows are opaque JSON; only a few display fields are ever inspected.
pub type Row = serde_json::Value;

/// Ordered rows returned by the execution surface
pub type ResultSet = Vec<Row>;

// =============================================================================
// SearchQuery
// =============================================================================

/// A free-text search request.
///
/// Fields are private so a query cannot change after it is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    text: String,
    requester_id: RequesterId,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, requester_id: impl Into<RequesterId>) -> Self {
        Self {
            text: text.into(),
            requester_id: requester_id.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn requester_id(&self) -> &str {
        &self.requester_id
    }

    /// Reject blank text or a blank requester id
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.text.trim().is_empty() {
            return Err(SearchError::InvalidInput("query text is empty".into()));
        }
        if self.requester_id.trim().is_empty() {
            return Err(SearchError::InvalidInput("requester id is empty".into()));
        }
        Ok(())
    }
}

// =============================================================================
// StructuredQuery
// =============================================================================

/// A value bound to one placeholder of a structured query.
///
/// Untagged so the parameter list serializes as a plain JSON array,
/// which is what the `execute_search_query` RPC accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryParam {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<&str> for QueryParam {
    fn from(value: &str) -> Self {
        QueryParam::Text(value.to_string())
    }
}

impl From<String> for QueryParam {
    fn from(value: String) -> Self {
        QueryParam::Text(value)
    }
}

impl From<bool> for QueryParam {
    fn from(value: bool) -> Self {
        QueryParam::Bool(value)
    }
}

impl From<i64> for QueryParam {
    fn from(value: i64) -> Self {
        QueryParam::Int(value)
    }
}

impl From<f64> for QueryParam {
    fn from(value: f64) -> Self {
        QueryParam::Float(value)
    }
}

/// A parameterized query: template with `$1..$n` placeholders plus the
/// values bound to them, in placeholder order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredQuery {
    pub template: String,
    pub parameters: Vec<QueryParam>,
}

impl StructuredQuery {
    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    /// Placeholder indexes (`$n`) in the order they appear in the template
    pub fn placeholders(&self) -> Vec<usize> {
        let mut found = Vec::new();
        let mut chars = self.template.char_indices().peekable();
        while let Some((_, c)) = chars.next() {
            if c != '$' {
                continue;
            }
            let mut digits = String::new();
            while let Some((_, d)) = chars.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                digits.push(*d);
                chars.next();
            }
            if let Ok(index) = digits.parse::<usize>() {
                found.push(index);
            }
        }
        found
    }

    /// Every placeholder `$1..$n` is used and `n` equals the parameter count.
    pub fn is_consistent(&self) -> bool {
        let mut used = self.placeholders();
        used.sort_unstable();
        used.dedup();
        used.len() == self.parameters.len()
            && used.iter().enumerate().all(|(i, index)| *index == i + 1)
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// Machine-readable error detail attached to failed outcomes.
///
/// `reason` is the error's display text; it never carries a stack trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: ErrorCode,
    pub reason: String,
}

/// The single value returned by the orchestrator for a request stage.
///
/// Either the success fields (`structured_query`, `facets`, and once
/// executed `rows` + `summary`) or the error fields are populated, never both.
/// Use the constructors; they keep that invariant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_query: Option<StructuredQuery>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<Facets>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<ResultSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<ErrorDetail>,
}

impl Outcome {
    /// Query built; waiting for the caller to execute it
    pub fn awaiting_execution(structured_query: StructuredQuery, facets: Facets) -> Self {
        Self {
            success: true,
            structured_query: Some(structured_query),
            facets: Some(facets),
            rows: None,
            summary: None,
            error: None,
            error_detail: None,
        }
    }

    /// Rows supplied and summarized
    pub fn completed(
        structured_query: StructuredQuery,
        facets: Facets,
        rows: ResultSet,
        summary: String,
    ) -> Self {
        Self {
            success: true,
            structured_query: Some(structured_query),
            facets: Some(facets),
            rows: Some(rows),
            summary: Some(summary),
            error: None,
            error_detail: None,
        }
    }

    pub fn failure(err: &SearchError) -> Self {
        let code = err.code();
        Self {
            success: false,
            structured_query: None,
            facets: None,
            rows: None,
            summary: None,
            error: Some(code.message().to_string()),
            error_detail: Some(ErrorDetail {
                code,
                reason: err.to_string(),
            }),
        }
    }

    pub fn is_awaiting_execution(&self) -> bool {
        self.success && self.structured_query.is_some() && self.rows.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.success && self.rows.is_some()
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        self.error_detail.as_ref().map(|detail| detail.code)
    }
}
