//! # Intent Parser
//!
//! Turns free text into `Facets`:
//! 1. Normalize the text once
//! 2. Run the local extractor pipeline
//! 3. Optionally ask the understanding service, under a timeout
//! 4. Merge its confident candidates into whatever the lexicon missed
//! 5. Record the trimmed text as `keywords`
//!
//! The service is called at most once per parse and never retried.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use search_types::{
    FacetKind, FacetValue, Facets, MealTime, PriceLevel, Result, SearchConfig, SearchError,
    VisitDay,
    facets::{HOURS_PER_DAY, names},
};
use understanding_client::{FacetCandidate, FacetUnderstanding};

use crate::extractor_pipeline::ExtractorPipeline;
use crate::normalize::NormalizedQuery;

/// Requester id used when the caller does not supply one
const ANONYMOUS: &str = "anonymous";

/// Extracts search facets from query text.
///
/// Cloning is cheap; clones share the pipeline and the service handle.
#[derive(Clone)]
pub struct IntentParser {
    pipeline: Arc<ExtractorPipeline>,
    understanding: Option<Arc<dyn FacetUnderstanding>>,
    timeout: Duration,
    min_confidence: f32,
}

impl IntentParser {
    /// Lexicon-only parser with the standard extractors
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            pipeline: Arc::new(ExtractorPipeline::standard()),
            understanding: None,
            timeout: config.understanding_timeout(),
            min_confidence: config.min_confidence,
        }
    }

    /// Replace the extractor pipeline
    pub fn with_pipeline(mut self, pipeline: ExtractorPipeline) -> Self {
        self.pipeline = Arc::new(pipeline);
        self
    }

    /// Consult an understanding service after the local extractors
    pub fn with_understanding(mut self, service: Arc<dyn FacetUnderstanding>) -> Self {
        self.understanding = Some(service);
        self
    }

    pub fn has_understanding(&self) -> bool {
        self.understanding.is_some()
    }

    pub async fn parse(&self, text: &str) -> Result<Facets> {
        self.parse_with_requester(text, ANONYMOUS).await
    }

    /// Parse on behalf of `requester_id`, which is forwarded to the
    /// understanding service.
    pub async fn parse_with_requester(&self, text: &str, requester_id: &str) -> Result<Facets> {
        let query = Self::normalize(text)?;
        let mut facets = self.pipeline.apply(&query);

        if let Some(service) = &self.understanding {
            let candidates = self.ask(service.as_ref(), query.original(), requester_id).await?;
            self.merge_candidates(&mut facets, candidates)?;
        }

        facets.insert(names::KEYWORDS, FacetValue::Text(query.original().to_string()));
        debug!(
            requester = requester_id,
            facets = ?facets.structured_names(),
            "Parsed query"
        );
        Ok(facets)
    }

    /// Parse with the local extractors only, skipping any configured service
    pub fn parse_local(&self, text: &str) -> Result<Facets> {
        let query = Self::normalize(text)?;
        let mut facets = self.pipeline.apply(&query);
        facets.insert(names::KEYWORDS, FacetValue::Text(query.original().to_string()));
        Ok(facets)
    }

    fn normalize(text: &str) -> Result<NormalizedQuery> {
        let query = NormalizedQuery::new(text);
        if query.is_empty() {
            return Err(SearchError::InvalidInput("query text is empty".into()));
        }
        Ok(query)
    }

    async fn ask(
        &self,
        service: &dyn FacetUnderstanding,
        text: &str,
        requester_id: &str,
    ) -> Result<Vec<FacetCandidate>> {
        let start = Instant::now();
        let response =
            tokio::time::timeout(self.timeout, service.extract_facets(text, requester_id)).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match response {
            Err(_) => {
                warn!(service = service.name(), elapsed_ms, "Understanding service timed out");
                Err(SearchError::Timeout {
                    timeout_ms: self.timeout.as_millis() as u64,
                })
            }
            Ok(Err(e)) => {
                warn!(service = service.name(), elapsed_ms, error = %e, "Understanding service failed");
                Err(SearchError::Parse(e.to_string()))
            }
            Ok(Ok(candidates)) => {
                debug!(
                    service = service.name(),
                    elapsed_ms,
                    count = candidates.len(),
                    "Received facet candidates"
                );
                Ok(candidates)
            }
        }
    }

    /// Fill facets the lexicon did not find. On conflict the lexicon wins.
    fn merge_candidates(&self, facets: &mut Facets, candidates: Vec<FacetCandidate>) -> Result<()> {
        let mut confident = 0;
        let mut usable = 0;

        for candidate in candidates {
            // NaN never counts as confident
            if candidate.confidence.is_nan() || candidate.confidence < self.min_confidence {
                debug!(
                    facet = %candidate.name,
                    confidence = candidate.confidence,
                    "Dropping low-confidence candidate"
                );
                continue;
            }
            confident += 1;

            let name = candidate.name.trim().to_lowercase();
            let Some(value) = coerce(&name, candidate.value) else {
                warn!(facet = %name, "Omitting unusable facet candidate");
                continue;
            };
            usable += 1;

            // keywords always come from the query text itself
            if name == names::KEYWORDS {
                continue;
            }
            if !facets.insert_if_absent(name.clone(), value) {
                debug!(facet = %name, "Keeping lexicon value over service candidate");
            }
        }

        if confident > 0 && usable == 0 {
            return Err(SearchError::Parse("unusable facets".into()));
        }
        Ok(())
    }
}

/// Convert a candidate value to the shape the catalogue expects for `name`.
///
/// Returns `None` for unknown names, missing values and anything that does
/// not fit, so the facet is left out rather than guessed.
fn coerce(name: &str, value: Option<FacetValue>) -> Option<FacetValue> {
    let kind = FacetKind::for_name(name)?;
    let value = match (kind, value?) {
        (FacetKind::PriceLevel, FacetValue::Text(label)) => {
            FacetValue::PriceLevel(PriceLevel::from_label(&label)?)
        }
        (FacetKind::MealTime, FacetValue::Text(label)) => {
            FacetValue::MealTime(MealTime::from_label(&label)?)
        }
        (FacetKind::VisitDay, FacetValue::Text(label)) => {
            FacetValue::VisitDay(VisitDay::from_label(&label)?)
        }
        (FacetKind::TextList, FacetValue::Text(text)) => FacetValue::TextList(vec![text]),
        (_, value) => value,
    };

    let value = match value {
        FacetValue::Text(text) => FacetValue::Text(clean_text(&text)?),
        FacetValue::TextList(items) => {
            let items: Vec<String> = items.iter().filter_map(|item| clean_text(item)).collect();
            if items.is_empty() {
                return None;
            }
            FacetValue::TextList(items)
        }
        FacetValue::Range(range) if range.is_empty() || !range.is_finite() => return None,
        FacetValue::Range(range) if name == names::VISIT_TIME && !range.is_within(0.0, HOURS_PER_DAY) => {
            return None;
        }
        other => other,
    };

    kind.accepts(&value).then_some(value)
}

fn clean_text(text: &str) -> Option<String> {
    let cleaned = text.trim().to_lowercase();
    (!cleaned.is_empty()).then_some(cleaned)
}
