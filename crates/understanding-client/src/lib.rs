//! Client for the query-understanding gRPC service.
//!
//! The understanding service reads a free-text query and proposes facet
//! candidates with a confidence each. This crate provides:
//! - `FacetUnderstanding`, the trait the intent parser depends on
//! - `UnderstandingClient`, its tonic implementation
//! - conversion from protobuf candidates to `FacetCandidate`

use anyhow::{Context, Result};
use async_trait::async_trait;
use thiserror::Error;
use tonic::transport::Channel;
use tracing::{debug, error, info};

use search_types::{FacetValue, NumericRange};

// Include the generated protobuf code
pub mod understanding {
    tonic::include_proto!("understanding");
}

use understanding::{
    ExtractRequest, facet_candidate,
    query_understanding_client::QueryUnderstandingClient as GrpcUnderstandingClient,
};

/// Errors that can occur when interacting with the understanding service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnderstandingError {
    #[error("Failed to connect to understanding service: {0}")]
    ConnectionError(String),

    #[error("Understanding request failed: {0}")]
    RequestError(String),

    #[error("Invalid response from understanding service: {0}")]
    InvalidResponse(String),
}

impl From<tonic::Status> for UnderstandingError {
    /// `Unavailable` means the channel could not reach the service
    fn from(status: tonic::Status) -> Self {
        let detail = format!("{:?}: {}", status.code(), status.message());
        match status.code() {
            tonic::Code::Unavailable => UnderstandingError::ConnectionError(detail),
            _ => UnderstandingError::RequestError(detail),
        }
    }
}

/// One facet proposed by the understanding service.
///
/// `value` is `None` when the service sent a candidate without a value.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetCandidate {
    pub name: String,
    pub value: Option<FacetValue>,
    pub confidence: f32,
}

impl FacetCandidate {
    pub fn new(name: impl Into<String>, value: FacetValue, confidence: f32) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
            confidence,
        }
    }
}

impl From<understanding::FacetCandidate> for FacetCandidate {
    fn from(candidate: understanding::FacetCandidate) -> Self {
        let value = candidate.value.map(|value| match value {
            facet_candidate::Value::Text(text) => FacetValue::Text(text),
            facet_candidate::Value::List(list) => FacetValue::TextList(list.items),
            facet_candidate::Value::Range(range) => FacetValue::Range(NumericRange {
                min: range.min,
                max: range.max,
                min_exclusive: range.min_exclusive,
                max_exclusive: range.max_exclusive,
            }),
            facet_candidate::Value::Flag(flag) => FacetValue::Flag(flag),
        });
        Self {
            name: candidate.name,
            value,
            confidence: candidate.confidence,
        }
    }
}

/// Anything that can turn query text into facet candidates.
///
/// ## Design Note
/// - `Send + Sync` so one instance can be shared by concurrent requests
/// - Implementations must not mutate shared state; each call stands alone
#[async_trait]
pub trait FacetUnderstanding: Send + Sync {
    /// Short name for logging
    fn name(&self) -> &str;

    async fn extract_facets(
        &self,
        text: &str,
        requester_id: &str,
    ) -> std::result::Result<Vec<FacetCandidate>, UnderstandingError>;
}

/// Client for the understanding service.
///
/// Wraps the generated gRPC client. Cloning is cheap: clones share the
/// underlying channel.
#[derive(Clone)]
pub struct UnderstandingClient {
    client: GrpcUnderstandingClient<Channel>,
    service_addr: String,
}

impl UnderstandingClient {
    /// Connect to the understanding service.
    ///
    /// # Arguments
    /// * `addr` - Address of the gRPC service (e.g., "http://localhost:50052")
    pub async fn connect(addr: impl Into<String>) -> Result<Self> {
        let addr = addr.into();
        info!("Connecting to understanding service at {}", addr);

        let channel = Channel::from_shared(addr.clone())
            .context("Creating channel from address")?
            .connect()
            .await
            .context("Connecting to understanding service")?;

        Ok(Self {
            client: GrpcUnderstandingClient::new(channel),
            service_addr: addr,
        })
    }

    /// Get the address of the service this client is connected to.
    pub fn service_address(&self) -> &str {
        &self.service_addr
    }
}

#[async_trait]
impl FacetUnderstanding for UnderstandingClient {
    fn name(&self) -> &str {
        "grpc"
    }

    async fn extract_facets(
        &self,
        text: &str,
        requester_id: &str,
    ) -> std::result::Result<Vec<FacetCandidate>, UnderstandingError> {
        debug!(requester = requester_id, "Requesting facet candidates");

        let request = tonic::Request::new(ExtractRequest {
            text: text.to_string(),
            requester_id: requester_id.to_string(),
        });

        // tonic clients need &mut self; the clone shares the channel
        let mut client = self.client.clone();
        let response = client.extract_facets(request).await.map_err(|status| {
            error!("gRPC error while extracting facets: {}", status);
            UnderstandingError::from(status)
        })?;

        let candidates: Vec<FacetCandidate> = response
            .into_inner()
            .facets
            .into_iter()
            .map(FacetCandidate::from)
            .collect();

        if candidates.iter().any(|c| c.name.trim().is_empty()) {
            error!("Understanding service returned a candidate without a name");
            return Err(UnderstandingError::InvalidResponse(
                "facet candidate without a name".into(),
            ));
        }

        debug!(count = candidates.len(), "Received facet candidates");
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understanding::{RangeValue, TextList};

    #[test]
    fn test_convert_text_candidate() {
        let proto = understanding::FacetCandidate {
            name: "cuisine".into(),
            value: Some(facet_candidate::Value::Text("thai".into())),
            confidence: 0.9,
        };

        let candidate = FacetCandidate::from(proto);
        assert_eq!(candidate.name, "cuisine");
        assert_eq!(candidate.value, Some(FacetValue::Text("thai".into())));
        assert_eq!(candidate.confidence, 0.9);
    }

    #[test]
    fn test_convert_range_keeps_exclusivity() {
        let proto = understanding::FacetCandidate {
            name: "price_range".into(),
            value: Some(facet_candidate::Value::Range(RangeValue {
                min: None,
                max: Some(20.0),
                min_exclusive: false,
                max_exclusive: true,
            })),
            confidence: 0.8,
        };

        let candidate = FacetCandidate::from(proto);
        assert_eq!(candidate.value, Some(FacetValue::Range(NumericRange::below(20.0))));
    }

    #[test]
    fn test_status_mapping() {
        let err = UnderstandingError::from(tonic::Status::unavailable("connection refused"));
        assert_eq!(
            err,
            UnderstandingError::ConnectionError("Unavailable: connection refused".into())
        );

        let err = UnderstandingError::from(tonic::Status::internal("model crashed"));
        assert!(matches!(err, UnderstandingError::RequestError(_)));
        assert!(err.to_string().contains("model crashed"));
    }

    #[test]
    fn test_convert_list_and_missing_value() {
        let list = understanding::FacetCandidate {
            name: "dietary".into(),
            value: Some(facet_candidate::Value::List(TextList {
                items: vec!["vegan".into(), "halal".into()],
            })),
            confidence: 0.7,
        };
        assert_eq!(
            FacetCandidate::from(list).value,
            Some(FacetValue::TextList(vec!["vegan".into(), "halal".into()]))
        );

        let empty = understanding::FacetCandidate {
            name: "location".into(),
            value: None,
            confidence: 0.7,
        };
        assert_eq!(FacetCandidate::from(empty).value, None);
    }
}
