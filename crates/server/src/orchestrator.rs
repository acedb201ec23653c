//! # Search Orchestrator
//!
//! This module coordinates one search request:
//! 1. Validate the query
//! 2. Parse facets (lexicon, plus the understanding service when configured)
//! 3. Build the structured query
//! 4. Hand it back to the caller for execution
//! 5. Summarize the rows the caller supplies (`complete`)
//!
//! The orchestrator never talks to the data store. Every failure comes back
//! as a failure `Outcome` with a stable code; nothing is retried.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use intent::IntentParser;
use query_builder::QueryBuilder;
use search_types::{
    ExecutionError, Facets, Outcome, ResultSet, SearchConfig, SearchError, SearchQuery,
    StructuredQuery,
};
use summarizer::Summarizer;
use understanding_client::UnderstandingClient;

/// Coordinates parsing, building and summarizing.
///
/// Holds only immutable components, so clones can serve concurrent
/// requests without locking.
#[derive(Clone)]
pub struct SearchOrchestrator {
    parser: IntentParser,
    builder: QueryBuilder,
    summarizer: Summarizer,
}

impl SearchOrchestrator {
    /// Create an orchestrator from configuration.
    ///
    /// Connects to the understanding service when `understanding_addr` is
    /// set; otherwise parsing uses the local lexicon only.
    pub async fn new(config: &SearchConfig) -> Result<Self> {
        let mut parser = IntentParser::new(config);
        if let Some(addr) = &config.understanding_addr {
            let client = UnderstandingClient::connect(addr.clone())
                .await
                .with_context(|| format!("Failed to connect to understanding service at {addr}"))?;
            info!("Connected to understanding service at {}", client.service_address());
            parser = parser.with_understanding(Arc::new(client));
        }

        Ok(Self::with_components(
            parser,
            QueryBuilder::new(config),
            Summarizer::new(config),
        ))
    }

    /// Lexicon-only orchestrator; never touches the network
    pub fn local(config: &SearchConfig) -> Self {
        Self::with_components(
            IntentParser::new(config),
            QueryBuilder::new(config),
            Summarizer::new(config),
        )
    }

    pub fn with_components(parser: IntentParser, builder: QueryBuilder, summarizer: Summarizer) -> Self {
        Self {
            parser,
            builder,
            summarizer,
        }
    }

    /// Plan a query: returns an outcome awaiting execution, or a failure.
    pub async fn process_query(&self, query: &SearchQuery) -> Outcome {
        let start_time = Instant::now();
        let requester = query.requester_id();

        match self.plan(query).await {
            Ok((structured_query, facets)) => {
                info!(
                    requester,
                    facets = ?facets.structured_names(),
                    parameters = structured_query.parameter_count(),
                    elapsed_ms = start_time.elapsed().as_millis() as u64,
                    "Planned search query"
                );
                Outcome::awaiting_execution(structured_query, facets)
            }
            Err(err) => {
                warn!(
                    requester,
                    code = err.code().as_str(),
                    error = %err,
                    elapsed_ms = start_time.elapsed().as_millis() as u64,
                    "Search query failed"
                );
                Outcome::failure(&err)
            }
        }
    }

    /// Validate, parse and build
    async fn plan(&self, query: &SearchQuery) -> search_types::Result<(StructuredQuery, Facets)> {
        query.validate()?;

        let parse_start = Instant::now();
        let facets = self
            .parser
            .parse_with_requester(query.text(), query.requester_id())
            .await?;
        debug!(
            facets = facets.len(),
            elapsed_ms = parse_start.elapsed().as_millis() as u64,
            "Parsed facets"
        );

        let structured_query = self.builder.build(&facets)?;
        Ok((structured_query, facets))
    }

    /// Finish a planned query with the caller's execution result.
    ///
    /// Rows are summarized into a completed outcome; an execution error is
    /// passed through unchanged as a failure. Outcomes that are not awaiting
    /// execution are returned as they are.
    pub fn complete(
        &self,
        pending: Outcome,
        execution: std::result::Result<ResultSet, ExecutionError>,
    ) -> Outcome {
        if !pending.is_awaiting_execution() {
            debug!("Outcome is not awaiting execution, returning it unchanged");
            return pending;
        }
        let (Some(structured_query), Some(facets)) = (pending.structured_query, pending.facets)
        else {
            return Outcome::failure(&SearchError::InvalidInput(
                "pending outcome has no structured query".into(),
            ));
        };

        match execution {
            Ok(rows) => {
                let summary = self.summarizer.summarize(&rows, &facets);
                info!(rows = rows.len(), "Summarized search results");
                Outcome::completed(structured_query, facets, rows, summary)
            }
            Err(err) => {
                warn!(error = %err, store_code = ?err.store_code, "Execution failed");
                Outcome::failure(&SearchError::Execution(err))
            }
        }
    }
}
