//! Azure AI Document Intelligence client for the prebuilt read model.
//!
//! Analysis is a long-running operation: the document is submitted, then the
//! `Operation-Location` URL is polled with exponential backoff until the
//! service reports `succeeded` or `failed`, or the poll timeout elapses.
//! Nothing is retried; any non-success HTTP status (429 included) fails the
//! call.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use docnorm_core::analysis::AnalyzeResult;
use docnorm_core::{
    DocnormError, DocnormResult, DocumentAnalyzer, DocumentIntelligenceConfig, DocumentSource,
};
use reqwest::Client;
use serde::Deserialize;

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OPERATION_LOCATION_HEADER: &str = "Operation-Location";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Body of a poll response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub status: String,
    pub analyze_result: Option<AnalyzeResult>,
    pub error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// What a poll response means for the polling loop.
#[derive(Debug)]
enum PollOutcome {
    Pending,
    Done(AnalyzeResult),
}

impl AnalyzeResponse {
    fn into_outcome(self) -> DocnormResult<PollOutcome> {
        match self.status.as_str() {
            "succeeded" => self
                .analyze_result
                .map(PollOutcome::Done)
                .ok_or_else(|| DocnormError::analysis("succeeded without an analyzeResult")),
            "failed" => Err(DocnormError::analysis(match self.error {
                Some(error) => format!("analysis failed: {} {}", error.code, error.message),
                None => "analysis failed".to_string(),
            })),
            _ => Ok(PollOutcome::Pending),
        }
    }
}

/// Document analyzer backed by Azure Document Intelligence.
pub struct AzureDocumentIntelligence {
    client: Client,
    config: DocumentIntelligenceConfig,
}

impl AzureDocumentIntelligence {
    /// Create a client from explicit configuration.
    ///
    /// The endpoint must be an absolute http(s) URL.
    pub fn new(config: DocumentIntelligenceConfig) -> DocnormResult<Self> {
        let endpoint = url::Url::parse(&config.endpoint).map_err(|e| {
            DocnormError::Configuration(format!("invalid endpoint '{}': {}", config.endpoint, e))
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(DocnormError::Configuration(format!(
                "endpoint must be http(s): {}",
                config.endpoint
            )));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DocnormError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Create a client from `DOCUMENTINTELLIGENCE_API_KEY` and
    /// `DOCUMENTINTELLIGENCE_ENDPOINT`.
    pub fn from_env() -> DocnormResult<Self> {
        Self::new(DocumentIntelligenceConfig::from_env()?)
    }

    /// URL the analysis request is posted to.
    pub fn analyze_url(&self) -> String {
        format!(
            "{}/documentintelligence/documentModels/{}:analyze?api-version={}&stringIndexType=unicodeCodePoint",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model_id,
            self.config.api_version
        )
    }

    async fn submit(&self, source: &DocumentSource) -> DocnormResult<String> {
        let response = self
            .client
            .post(self.analyze_url())
            .header(SUBSCRIPTION_KEY_HEADER, &self.config.api_key)
            .json(&request_body(source))
            .send()
            .await
            .map_err(|e| DocnormError::analysis(format!("submit failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(DocnormError::analysis(format!(
                "submit returned {}: {}",
                status, text
            )));
        }

        response
            .headers()
            .get(OPERATION_LOCATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| DocnormError::analysis("response missing Operation-Location header"))
    }

    async fn poll_until_complete(&self, operation_url: &str) -> DocnormResult<AnalyzeResult> {
        let poll = async {
            let mut backoff = self.config.poll_interval();

            loop {
                let response = self
                    .client
                    .get(operation_url)
                    .header(SUBSCRIPTION_KEY_HEADER, &self.config.api_key)
                    .send()
                    .await
                    .map_err(|e| DocnormError::analysis(format!("poll request failed: {}", e)))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let text = response.text().await.unwrap_or_default();
                    return Err(DocnormError::analysis(format!(
                        "poll returned {}: {}",
                        status, text
                    )));
                }

                let body: AnalyzeResponse = response
                    .json()
                    .await
                    .map_err(|e| DocnormError::analysis(format!("response parse failed: {}", e)))?;

                match body.into_outcome()? {
                    PollOutcome::Done(result) => return Ok(result),
                    PollOutcome::Pending => {
                        tracing::debug!(delay_ms = backoff.as_millis() as u64, "Analysis pending");
                        tokio::time::sleep(backoff).await;
                        backoff = next_backoff(backoff, self.config.max_poll_interval());
                    }
                }
            }
        };

        let timeout = self.config.poll_timeout();
        tokio::time::timeout(timeout, poll).await.map_err(|_| {
            DocnormError::analysis(format!(
                "polling timed out after {}s",
                timeout.as_secs()
            ))
        })?
    }
}

#[async_trait]
impl DocumentAnalyzer for AzureDocumentIntelligence {
    #[tracing::instrument(skip(self, source), fields(model = %self.config.model_id))]
    async fn analyze(&self, source: DocumentSource) -> DocnormResult<AnalyzeResult> {
        let operation_url = self.submit(&source).await?;
        let result = self.poll_until_complete(&operation_url).await?;

        tracing::debug!(
            pages = result.pages.len(),
            styles = result.styles.len(),
            "Analysis succeeded"
        );
        Ok(result)
    }

    fn model_id(&self) -> &str {
        &self.config.model_id
    }
}

/// JSON body of the analyze request.
fn request_body(source: &DocumentSource) -> serde_json::Value {
    match source {
        DocumentSource::Bytes(data) => {
            serde_json::json!({ "base64Source": general_purpose::STANDARD.encode(data) })
        }
        DocumentSource::Url(url) => serde_json::json!({ "urlSource": url }),
    }
}

fn next_backoff(current: Duration, max: Duration) -> Duration {
    (current * 2).min(max)
}
