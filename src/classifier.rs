use crate::core::Verdict;
use crate::core::error::ServiceError;
use crate::providers::base_client::HttpClient;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

pub const CLASSIFIER_TIMEOUT: Duration = Duration::from_secs(60);
const CLASSIFIER_MAX_LEN: u32 = 512;

/// Scores a verification payload and returns the verdict label.
#[async_trait]
pub trait FactClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Verdict, ServiceError>;
}

#[derive(Serialize)]
struct ScoringRequest<'a> {
    inputs: [&'a str; 1],
    max_len: u32,
}

/// Classifier hosted behind an HTTP scoring endpoint.
///
/// Anything but `200 OK` from the endpoint is a failed call.
pub struct ScoringClassifier {
    client: HttpClient,
}

impl ScoringClassifier {
    pub fn new(scoring_url: String, api_key: &str) -> Result<Self, ServiceError> {
        Self::with_timeout(scoring_url, api_key, CLASSIFIER_TIMEOUT)
    }

    pub fn with_timeout(
        scoring_url: String,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        Ok(Self {
            client: HttpClient::with_bearer(scoring_url, api_key, Some(timeout))?.require_ok(),
        })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.client.timeout()
    }
}

#[async_trait]
impl FactClassifier for ScoringClassifier {
    async fn classify(&self, text: &str) -> Result<Verdict, ServiceError> {
        let payload = ScoringRequest {
            inputs: [text],
            max_len: CLASSIFIER_MAX_LEN,
        };
        let body = self.client.post("", &payload).await?;
        tracing::debug!(body = %body, "Classifier response");
        parse_verdict(&body)
    }
}

/// Reads `pred_label` from a scoring response; a missing label means `irrelevant`.
fn parse_verdict(body: &str) -> Result<Verdict, ServiceError> {
    let parsed: Value = serde_json::from_str(body)?;
    let obj = parsed.as_object().ok_or_else(|| {
        ServiceError::MalformedResponse(format!("Expected a JSON object, got: {}", body))
    })?;

    Ok(match obj.get("pred_label") {
        None => Verdict::Irrelevant,
        Some(Value::String(label)) => Verdict::from_label(label),
        Some(other) => Verdict::Other(other.to_string()),
    })
}
