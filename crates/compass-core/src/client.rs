use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::{AnalysisRequest, AnalysisResponse, Insight};
use crate::controller::Analyze;
use crate::error::AnalyzeError;
use crate::query::Query;

/// HTTP client for the analysis endpoint.
///
/// One POST per call: no retries, no timeout, no cancellation.
#[derive(Clone)]
pub struct AnalysisClient {
    client: Client,
    endpoint: String,
}

impl AnalysisClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn analyze(&self, query: &Query) -> Result<Insight, AnalyzeError> {
        let request = AnalysisRequest::from(query);
        debug!(endpoint = %self.endpoint, "sending analysis request");

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        info!(status = status.as_u16(), "analysis response received");

        if !status.is_success() {
            let body = response.text().await?;
            warn!(status = status.as_u16(), "analysis endpoint returned an error status");
            return Err(AnalyzeError::Server { status, body });
        }

        let body = response.text().await?;
        let payload: Value = serde_json::from_str(&body)?;
        AnalysisResponse::from_json(&payload).into_insight()
    }
}

#[async_trait]
impl Analyze for AnalysisClient {
    async fn analyze(&self, query: &Query) -> Result<Insight, AnalyzeError> {
        AnalysisClient::analyze(self, query).await
    }
}
