//! Tavily API request and response types.

use serde::{Deserialize, Serialize};

/// Body for `POST /extract`.
#[derive(Debug, Serialize)]
pub struct ExtractRequest<'a> {
    pub urls: [&'a str; 1],
    pub extract_depth: &'a str,
}

/// Raw response from the extract endpoint.
#[derive(Debug, Deserialize)]
pub struct ExtractResponse {
    #[serde(default)]
    pub results: Vec<ExtractResult>,
    #[serde(default)]
    pub failed_results: Vec<FailedResult>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractResult {
    pub url: String,
    #[serde(default)]
    pub raw_content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FailedResult {
    pub url: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body for `POST /search`.
#[derive(Debug, Serialize)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    pub max_results: usize,
    pub search_depth: &'a str,
}

/// Raw response from the search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

/// One search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    /// Snippet of the page relevant to the query.
    #[serde(default)]
    pub content: String,
}

impl ExtractResponse {
    /// Content for the first successful result, if it has any text.
    pub fn into_content(self) -> Option<String> {
        self.results
            .into_iter()
            .filter_map(|r| r.raw_content)
            .find(|c| !c.trim().is_empty())
    }
}
