//! Thin request handler around the orchestrator.
//!
//! Takes a `{query, user_id}` request, plans it, runs the structured query
//! through an `ExecutionSurface`, and renders the JSON response body
//! `{success, restaurants, summary, error, code}` with an HTTP status hint.
//! Transport (HTTP framework, auth) is left to the embedding service.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use search_types::{ErrorCode, ExecutionError, Outcome, ResultSet, Row, SearchQuery, StructuredQuery};

use crate::orchestrator::SearchOrchestrator;

/// Runs structured queries against the data store.
///
/// Typically backed by the store's `execute_search_query` RPC, which takes
/// the template and the parameter array.
#[async_trait]
pub trait ExecutionSurface: Send + Sync {
    async fn execute(&self, query: &StructuredQuery) -> Result<ResultSet, ExecutionError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub user_id: String,
}

/// Response body returned to API callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub restaurants: Vec<Row>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    /// HTTP status the transport should use; not part of the body
    #[serde(skip)]
    pub status: u16,
}

impl SearchResponse {
    pub fn from_outcome(outcome: Outcome) -> Self {
        let code = outcome.error_code();
        Self {
            success: outcome.success,
            restaurants: outcome.rows.unwrap_or_default(),
            summary: outcome.summary,
            error: outcome.error,
            code,
            status: code.map_or(200, status_for),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// HTTP status for each error code
pub fn status_for(code: ErrorCode) -> u16 {
    match code {
        ErrorCode::InvalidInput => 400,
        ErrorCode::UnsupportedFacet | ErrorCode::QueryTooComplex => 422,
        ErrorCode::Timeout => 504,
        ErrorCode::ParseError | ErrorCode::ExecutionError => 502,
    }
}

/// Plans, executes and summarizes one request.
#[derive(Clone)]
pub struct SearchHandler {
    orchestrator: SearchOrchestrator,
    surface: Arc<dyn ExecutionSurface>,
}

impl SearchHandler {
    pub fn new(orchestrator: SearchOrchestrator, surface: Arc<dyn ExecutionSurface>) -> Self {
        Self {
            orchestrator,
            surface,
        }
    }

    pub async fn handle(&self, request: SearchRequest) -> SearchResponse {
        info!(requester = %request.user_id, "Search request received");
        let query = SearchQuery::new(request.query, request.user_id);

        let pending = self.orchestrator.process_query(&query).await;
        let Some(structured_query) = pending.structured_query.clone() else {
            return SearchResponse::from_outcome(pending);
        };

        let execution = self.surface.execute(&structured_query).await;
        debug!(ok = execution.is_ok(), "Execution surface returned");

        SearchResponse::from_outcome(self.orchestrator.complete(pending, execution))
    }

    /// Handle a raw JSON body; a body that does not parse is invalid input.
    pub async fn handle_json(&self, body: &str) -> SearchResponse {
        match serde_json::from_str::<SearchRequest>(body) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                debug!(error = %e, "Rejecting malformed request body");
                SearchResponse {
                    success: false,
                    restaurants: Vec::new(),
                    summary: None,
                    error: Some(ErrorCode::InvalidInput.message().to_string()),
                    code: Some(ErrorCode::InvalidInput),
                    status: status_for(ErrorCode::InvalidInput),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_types::{QueryParam, SearchConfig};
    use serde_json::json;
    use std::sync::Mutex;

    /// Returns canned rows and records every query it was asked to run
    struct RecordingSurface {
        rows: ResultSet,
        seen: Mutex<Vec<StructuredQuery>>,
    }

    impl RecordingSurface {
        fn new(rows: ResultSet) -> Arc<Self> {
            Arc::new(Self {
                rows,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ExecutionSurface for RecordingSurface {
        async fn execute(&self, query: &StructuredQuery) -> Result<ResultSet, ExecutionError> {
            self.seen.lock().unwrap().push(query.clone());
            Ok(self.rows.clone())
        }
    }

    struct FailingSurface;

    #[async_trait]
    impl ExecutionSurface for FailingSurface {
        async fn execute(&self, _query: &StructuredQuery) -> Result<ResultSet, ExecutionError> {
            Err(ExecutionError::new("connection reset by peer"))
        }
    }

    fn handler(surface: Arc<dyn ExecutionSurface>) -> SearchHandler {
        SearchHandler::new(SearchOrchestrator::local(&SearchConfig::default()), surface)
    }

    fn request(query: &str) -> SearchRequest {
        SearchRequest {
            query: query.into(),
            user_id: "u1".into(),
        }
    }

    #[tokio::test]
    async fn test_successful_search() {
        let surface = RecordingSurface::new(vec![
            json!({"Name": "Luigi's", "CuisineType": "Italian", "Rating": 4.5}),
            json!({"Name": "Mario's", "CuisineType": "Italian", "Rating": 4.1}),
        ]);
        let response = handler(surface.clone())
            .handle(request("cheap italian food open now"))
            .await;

        assert!(response.success);
        assert_eq!(response.status, 200);
        assert_eq!(response.restaurants.len(), 2);
        assert!(response.summary.as_deref().unwrap().contains("italian"));

        let seen = surface.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].parameters[0], QueryParam::Text("italian".into()));
    }

    #[tokio::test]
    async fn test_invalid_input_skips_execution() {
        let surface = RecordingSurface::new(Vec::new());
        let response = handler(surface.clone()).handle(request("   ")).await;

        assert!(!response.success);
        assert_eq!(response.status, 400);
        assert_eq!(response.code, Some(ErrorCode::InvalidInput));
        assert!(surface.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_execution_failure() {
        let response = handler(Arc::new(FailingSurface)).handle(request("tapas")).await;

        assert!(!response.success);
        assert_eq!(response.status, 502);
        assert_eq!(response.error.as_deref(), Some("execution error"));
        assert!(response.restaurants.is_empty());
    }

    #[tokio::test]
    async fn test_json_round_trip() {
        let surface = RecordingSurface::new(vec![json!({"Name": "Bao", "Rating": 4.4})]);
        let response = handler(surface)
            .handle_json(r#"{"query": "taiwanese buns in soho", "user_id": "u9"}"#)
            .await;

        let body: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["restaurants"][0]["Name"], "Bao");
        assert!(body.get("error").is_none());
        assert!(body.get("status").is_none());
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let response = handler(RecordingSurface::new(Vec::new()))
            .handle_json("{not json")
            .await;
        assert_eq!(response.status, 400);
        assert_eq!(response.code, Some(ErrorCode::InvalidInput));

        let body: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
        assert_eq!(body["code"], "INVALID_INPUT");
    }

    #[test]
    fn test_status_codes_are_distinct_per_class() {
        assert_eq!(status_for(ErrorCode::QueryTooComplex), 422);
        assert_eq!(status_for(ErrorCode::UnsupportedFacet), 422);
        assert_eq!(status_for(ErrorCode::Timeout), 504);
        assert_eq!(status_for(ErrorCode::ParseError), 502);
    }
}
