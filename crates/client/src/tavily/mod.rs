//! Tavily API client.
//!
//! Two endpoints are used by the fact-check pipeline:
//!
//! - **Extract** (`POST /extract`): readable text of a page.
//! - **Search** (`POST /search`): evidence for a single statement.
//!
//! Authentication is a bearer token in the `Authorization` header.

pub mod response;

pub use response::SearchHit;

use crate::error::{PipelineError, Service, check_status};
use reqwest::header;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default base URL for the Tavily API.
const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "newsfax/0.1";

/// Tavily client configuration.
#[derive(Debug, Clone)]
pub struct TavilyConfig {
    pub api_key: String,
    /// Base URL (default: https://api.tavily.com).
    pub base_url: String,
    /// Request timeout (default: 30s).
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TavilyConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Tavily API client.
#[derive(Debug, Clone)]
pub struct TavilyClient {
    http: reqwest::Client,
    config: TavilyConfig,
}

impl TavilyClient {
    /// Create a new Tavily client with the given configuration.
    pub fn new(config: TavilyConfig) -> Result<Self, PipelineError> {
        if config.api_key.is_empty() {
            return Err(PipelineError::MissingApiKey(Service::Tavily));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PipelineError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    /// Extract readable text from a page.
    pub async fn extract(&self, url: &str) -> Result<String, PipelineError> {
        let start = Instant::now();
        let body = response::ExtractRequest { urls: [url], extract_depth: "basic" };
        let response: response::ExtractResponse = self.post("extract", &body).await?;

        for failed in &response.failed_results {
            tracing::debug!(url = %failed.url, error = ?failed.error, "tavily extract reported failure");
        }

        let content = response
            .into_content()
            .ok_or_else(|| PipelineError::NoContent(url.to_string()))?;

        tracing::debug!("extracted {} chars in {:?}", content.len(), start.elapsed());
        Ok(content)
    }

    /// Search the web for evidence about `query`.
    pub async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, PipelineError> {
        let body = response::SearchRequest { query, max_results, search_depth: "basic" };
        let response: response::SearchResponse = self.post("search", &body).await?;

        tracing::debug!("tavily search returned {} results", response.results.len());
        Ok(response.results)
    }

    async fn post<B: Serialize, R: DeserializeOwned>(&self, endpoint: &str, body: &B) -> Result<R, PipelineError> {
        let url = format!("{}/{endpoint}", self.config.base_url.trim_end_matches('/'));

        let http_response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, &self.config.user_agent)
            .json(body)
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!("tavily {endpoint} response status: {status}");
        check_status(Service::Tavily, status)?;

        let bytes = http_response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| PipelineError::Parse(e.to_string()))
    }
}
