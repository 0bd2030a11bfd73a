//! Voyage AI embedding provider.
//!
//! Speaks the Voyage embeddings endpoint (JSON over HTTPS, bearer auth).
//! Inputs are partitioned into bounded batches which are dispatched
//! concurrently behind a semaphore, then flattened back into input order.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use super::traits::{EmbedError, EmbedResult, Embedder};

/// Default base URL for the Voyage AI API.
pub const VOYAGE_BASE_URL: &str = "https://api.voyageai.com/v1";

/// Default embedding model.
pub const DEFAULT_MODEL: &str = "voyage-3.5-lite";

/// Default maximum input size parameter sent with each batch.
const DEFAULT_MAX_TOKEN_LENGTH: u64 = 1_000_000;

/// Default number of texts per batch request.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Default cap on simultaneous in-flight batch requests.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Default retry budget for transient failures (429 and 5xx).
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default base delay for exponential backoff between retries.
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Voyage embeddings request format.
#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a [String],
    model: &'a str,
    #[serde(rename = "maxTokenLength")]
    max_token_length: u64,
}

/// Voyage embeddings response format.
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Voyage error body, when one is present.
#[derive(Debug, Deserialize)]
struct VoyageErrorBody {
    detail: String,
}

/// Provider for the Voyage AI embeddings API.
///
/// Also works against any endpoint that accepts the same request shape,
/// which is what the tests use via [`VoyageEmbedder::custom`].
pub struct VoyageEmbedder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_token_length: u64,
    batch_size: usize,
    limiter: Arc<Semaphore>,
    max_retries: u32,
    retry_delay: Duration,
}

impl VoyageEmbedder {
    /// Creates an embedder against the hosted Voyage API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::custom(VOYAGE_BASE_URL, api_key)
    }

    /// Creates an embedder against a custom endpoint.
    pub fn custom(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            max_token_length: DEFAULT_MAX_TOKEN_LENGTH,
            batch_size: DEFAULT_BATCH_SIZE,
            limiter: Arc::new(Semaphore::new(DEFAULT_MAX_CONCURRENCY)),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Overrides the embedding model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Overrides the number of texts per batch request.
    ///
    /// # Panics
    ///
    /// Panics if `batch_size` is zero.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch_size must be at least 1");
        self.batch_size = batch_size;
        self
    }

    /// Overrides the cap on simultaneous in-flight batch requests.
    ///
    /// # Panics
    ///
    /// Panics if `max_concurrency` is zero.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        assert!(max_concurrency > 0, "max_concurrency must be at least 1");
        self.limiter = Arc::new(Semaphore::new(max_concurrency));
        self
    }

    /// Overrides the retry budget for transient failures.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Overrides the base delay for exponential backoff.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Overrides the HTTP client (useful for request timeouts or proxies).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            headers.insert(AUTHORIZATION, value);
        }

        headers
    }

    /// Splits the input into consecutive batches of at most `batch_size`.
    fn batch_inputs<'a>(&self, texts: &'a [String]) -> Vec<&'a [String]> {
        texts.chunks(self.batch_size).collect()
    }

    async fn embed_batch_with_retry(&self, batch: &[String]) -> EmbedResult<Vec<Vec<f32>>> {
        let attempts = self.max_retries + 1;

        for attempt in 0..attempts {
            match self.embed_batch(batch).await {
                Err(EmbedError::Api { status, message }) if is_retryable(status) => {
                    if attempt + 1 == attempts {
                        return Err(EmbedError::RetryExhausted {
                            attempts,
                            status,
                            message,
                        });
                    }
                    let backoff = self.retry_delay * 2u32.saturating_pow(attempt);
                    tracing::warn!(status, attempt, backoff_ms = backoff.as_millis() as u64,
                        "transient embedding failure, retrying");
                    tokio::time::sleep(backoff).await;
                }
                other => return other,
            }
        }

        unreachable!("retry loop always returns")
    }

    async fn embed_batch(&self, batch: &[String]) -> EmbedResult<Vec<Vec<f32>>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/embeddings", self.base_url);
        let body = EmbeddingRequest {
            input: batch,
            model: &self.model,
            max_token_length: self.max_token_length,
        };

        let response = self
            .client
            .post(&url)
            .headers(self.build_headers())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.handle_error_response(response).await);
        }

        let api_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbedError::InvalidResponse(format!("failed to parse response: {e}")))?;

        if api_response.data.len() != batch.len() {
            return Err(EmbedError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                batch.len(),
                api_response.data.len()
            )));
        }

        Ok(api_response.data.into_iter().map(|d| d.embedding).collect())
    }

    async fn handle_error_response(&self, response: reqwest::Response) -> EmbedError {
        let status = response.status();
        let reason = status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string();

        let message = match response.json::<VoyageErrorBody>().await {
            Ok(body) => body.detail,
            Err(_) => reason,
        };

        if status.as_u16() == 401 {
            return EmbedError::Authentication(message);
        }

        EmbedError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

fn is_retryable(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

#[async_trait]
impl Embedder for VoyageEmbedder {
    fn model(&self) -> &str {
        &self.model
    }

    async fn embed_bulk(&self, texts: &[String]) -> EmbedResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let batches = self.batch_inputs(texts);
        tracing::debug!(texts = texts.len(), batches = batches.len(), "embedding bulk input");

        // try_join_all preserves input order regardless of completion order,
        // and the first failed batch abandons the whole call.
        let results = futures::future::try_join_all(batches.into_iter().map(|batch| async {
            let _permit = self
                .limiter
                .acquire()
                .await
                .expect("concurrency limiter is never closed");
            self.embed_batch_with_retry(batch).await
        }))
        .await?;

        Ok(results.into_iter().flatten().collect())
    }
}
