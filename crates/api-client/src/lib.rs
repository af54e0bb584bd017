/// REST client for the document listing endpoint.
/// One GET for the list, a reusable retry helper for idempotent
/// requests, and a liveness probe.
use std::future::Future;
use std::time::Duration;

use documents::Document;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, warn};

/// Fixed timeout for the liveness probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Overall timeout for regular requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server returned status {0}")]
    Status(StatusCode),

    #[error("unexpected response payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether a retry has any chance of succeeding. Network failures and
    /// 5xx responses are transient; 4xx responses and malformed payloads
    /// are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Status(status) => status.is_server_error(),
            ApiError::Payload(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Client for the document REST endpoint.
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("docboard/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { base_url, client })
    }

    /// Fetch the document list. One GET; callers that want retry compose
    /// this with [`ApiClient::retry_fetch`].
    ///
    /// A non-2xx status or a body that is not a JSON array of documents
    /// is a fetch failure. The cause is logged here; callers surface a
    /// generic message to the user.
    pub async fn fetch_documents(&self) -> Result<Vec<Document>> {
        let url = format!("{}/documents", self.base_url);
        debug!("fetching document list from {url}");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("document list request failed with status {status}");
            return Err(ApiError::Status(status));
        }

        // Parse the body ourselves so a malformed payload is classified
        // as a payload error, not a retryable transport error.
        let body = response.text().await?;
        let documents: Vec<Document> = serde_json::from_str(&body).map_err(|err| {
            warn!("document list payload did not parse: {err}");
            err
        })?;

        debug!("fetched {} documents", documents.len());
        Ok(documents)
    }

    /// Retry helper for idempotent requests.
    ///
    /// Retryable failures (network, 5xx) wait `base_delay × attempt`
    /// before the next try — linear backoff, unlike the live client's
    /// exponential reconnect. Non-retryable failures (4xx, malformed
    /// payload) and the final attempt return the error as-is.
    pub async fn retry_fetch<T, F, Fut>(
        &self,
        request: F,
        max_attempts: u32,
        base_delay: Duration,
    ) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match request().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    let delay = base_delay * attempt;
                    warn!(
                        "request failed (attempt {attempt}/{max_attempts}), retrying in {delay:?}: {err}"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Lightweight liveness probe: HEAD the documents endpoint with a
    /// short fixed timeout. Never returns an error.
    pub async fn is_server_available(&self) -> bool {
        let url = format!("{}/documents", self.base_url);

        match self.client.head(&url).timeout(PROBE_TIMEOUT).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                debug!("liveness probe failed: {err}");
                false
            }
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
