// HTTP implementation of the classification service contract.
//
// POST {base_url}/api/detect with `{"url": "..."}`. A 2xx response carries
// `{"result": ..., "message": ...}`; anything else is a failure regardless
// of what the body says. No retries and no timeout beyond reqwest's own.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

use super::traits::ScamClassifier;
use crate::protocol::{Classification, DetectionRequest};

/// Default base URL of the classification service.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Path of the detection endpoint, relative to the base URL.
pub const DETECT_PATH: &str = "/api/detect";

const JSON_UTF8: &str = "application/json; charset=UTF-8";

/// Classifier backed by the remote HTTP service.
pub struct HttpClassifier {
    client: Client,
    endpoint: String,
}

impl HttpClassifier {
    /// Create a classifier pointing at the given base URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("scamwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), DETECT_PATH),
        })
    }

    /// Full URL requests are POSTed to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ScamClassifier for HttpClassifier {
    async fn classify(&self, url: &str) -> Result<Classification> {
        let body = serde_json::to_vec(&DetectionRequest::new(url))
            .context("Failed to encode detection request")?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, JSON_UTF8)
            .body(body)
            .send()
            .await
            .context("Classification service request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Classification service returned {}", status);
        }

        let classification: Classification = response
            .json()
            .await
            .context("Failed to parse classification response")?;

        debug!(
            url,
            result = %classification.result,
            confidence = ?classification.confidence,
            "Classified URL"
        );

        Ok(classification)
    }
}
