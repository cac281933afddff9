use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{ExtractHit, SearchExtract, SearchHit, UpstreamError};
use crate::config::{SearchConfig, DEFAULT_SEARCH_BETA_VERSION, DEFAULT_SEARCH_URL};

/// HTTP client for the Parallel search and extract APIs.
pub struct ParallelClient {
    api_key: String,
    base_url: String,
    beta_version: String,
    client: Client,
}

impl ParallelClient {
    /// Creates a client against the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_SEARCH_URL.to_string(),
            beta_version: DEFAULT_SEARCH_BETA_VERSION.to_string(),
            client: Client::new(),
        }
    }

    /// Creates a client from `[search]` configuration.
    pub fn from_config(config: &SearchConfig) -> Result<Self, UpstreamError> {
        let api_key = config.api_key_or_env().ok_or(UpstreamError::MissingApiKey)?;

        Self::new(api_key)
            .with_base_url(&config.base_url)
            .with_beta_version(&config.beta_version)
            .with_timeout(Duration::from_secs(config.request_timeout_secs))
    }

    /// Sets the service URL (for proxies and tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the `parallel-beta` header value.
    pub fn with_beta_version(mut self, version: impl Into<String>) -> Self {
        self.beta_version = version.into();
        self
    }

    /// Bounds each search and extract call.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, UpstreamError> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| UpstreamError::Network(format!("cannot build HTTP client: {err}")))?;
        Ok(self)
    }

    async fn post<B, R>(&self, endpoint: &str, body: &B) -> Result<R, UpstreamError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/v1beta/{}", self.base_url, endpoint);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("parallel-beta", &self.beta_version)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| UpstreamError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl SearchExtract for ParallelClient {
    async fn search(
        &self,
        objective: &str,
        max_results: usize,
        max_excerpt_chars: usize,
    ) -> Result<Vec<SearchHit>, UpstreamError> {
        let request = SearchRequest {
            objective,
            search_queries: Vec::new(),
            max_results,
            excerpts: ExcerptSettings {
                max_chars_per_result: max_excerpt_chars,
            },
        };

        let response: ResultsEnvelope<SearchHit> = self.post("search", &request).await?;
        Ok(response.results)
    }

    async fn extract(
        &self,
        urls: &[String],
        objective: &str,
        max_excerpt_chars: usize,
    ) -> Result<Vec<ExtractHit>, UpstreamError> {
        if urls.is_empty() {
            return Err(UpstreamError::NoUrls);
        }

        let request = ExtractRequest {
            urls,
            objective,
            excerpts: ExcerptSettings {
                max_chars_per_result: max_excerpt_chars,
            },
            full_content: false,
        };

        let response: ResultsEnvelope<ExtractHit> = self.post("extract", &request).await?;
        Ok(response.results)
    }
}

#[derive(Debug, Serialize)]
struct ExcerptSettings {
    max_chars_per_result: usize,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    objective: &'a str,
    search_queries: Vec<String>,
    max_results: usize,
    excerpts: ExcerptSettings,
}

#[derive(Debug, Serialize)]
struct ExtractRequest<'a> {
    urls: &'a [String],
    objective: &'a str,
    excerpts: ExcerptSettings,
    full_content: bool,
}

#[derive(Debug, Deserialize)]
struct ResultsEnvelope<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}
