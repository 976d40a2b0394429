//! Fact-check pipeline error types.

use std::sync::Arc;

/// Upstream API a request was sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Tavily,
    Chat,
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Service::Tavily => f.write_str("tavily"),
            Service::Chat => f.write_str("chat"),
        }
    }
}

/// Errors from the extraction and verification pipeline.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PipelineError {
    /// API key not configured.
    #[error("missing API key for {0}")]
    MissingApiKey(Service),

    /// Authentication failed (invalid API key).
    #[error("{0}: authentication failed")]
    AuthError(Service),

    /// Rate limited by the upstream API.
    #[error("{0}: rate limited")]
    RateLimited(Service),

    /// HTTP error response.
    #[error("{service}: HTTP error {status}")]
    HttpError { service: Service, status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),

    /// The page yielded no readable content.
    #[error("no content extracted from {0}")]
    NoContent(String),
}

impl From<reqwest::Error> for PipelineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { PipelineError::Timeout } else { PipelineError::Network(Arc::new(err)) }
    }
}

impl From<PipelineError> for newsfax_core::Error {
    fn from(err: PipelineError) -> Self {
        newsfax_core::Error::CheckFailed(err.to_string())
    }
}

/// Map an HTTP status to the matching error, if it is one.
pub(crate) fn check_status(service: Service, status: reqwest::StatusCode) -> Result<(), PipelineError> {
    if status == 401 || status == 403 {
        return Err(PipelineError::AuthError(service));
    }

    if status == 429 {
        return Err(PipelineError::RateLimited(service));
    }

    if status.is_client_error() || status.is_server_error() {
        return Err(PipelineError::HttpError { service, status: status.as_u16() });
    }

    Ok(())
}
