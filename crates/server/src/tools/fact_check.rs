//! fact_check tool implementation.
//!
//! Canonicalizes the URL into a job key and asks the coordinator to ensure a
//! result exists. The reply never waits on the check itself.

use newsfax_client::fact_check_key;
use newsfax_core::{CheckedFact, Coordinator, Error, Outcome};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters shared by the fact-check tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FactCheckParams {
    /// The page to fact-check. `https://` is assumed when no scheme is given.
    pub url: String,
}

/// Caller-facing state of a fact check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Processing,
    Complete,
    Failed,
    /// Never submitted. Only reported by `fact_check_status`.
    Unknown,
}

/// Output shared by the fact-check tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FactCheckOutput {
    /// The canonical URL the check is stored under.
    pub url: String,
    pub status: CheckStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Checked facts, present once the status is `complete`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facts: Option<Vec<CheckedFact>>,
    /// Last failure message, present when the status is `failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
}

impl FactCheckOutput {
    pub(crate) fn new(url: String, status: CheckStatus) -> Self {
        Self { url, status, message: None, facts: None, error: None, attempts: None }
    }

    fn from_outcome(url: String, outcome: Outcome) -> Self {
        match outcome {
            Outcome::Started => Self {
                message: Some("Fact checking started".to_string()),
                ..Self::new(url, CheckStatus::Processing)
            },
            Outcome::InProgress => Self {
                message: Some("Fact checking in progress".to_string()),
                ..Self::new(url, CheckStatus::Processing)
            },
            Outcome::Ready { facts } => Self { facts: Some(facts), ..Self::new(url, CheckStatus::Complete) },
            Outcome::Failed { error, attempts } => {
                Self { error: Some(error), attempts: Some(attempts), ..Self::new(url, CheckStatus::Failed) }
            }
        }
    }

    pub(crate) fn into_result(self) -> Result<CallToolResult, McpError> {
        let json = serde_json::to_string_pretty(&self)
            .map_err(|e| Error::Encode(format!("Failed to serialize fact check output: {e}")))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

/// Turn a caller-supplied URL into the job key, rejecting malformed input.
pub(crate) fn key_for(url: &str) -> Result<String, Error> {
    fact_check_key(url).map_err(|e| Error::InvalidUrl(format!("{url:?}: {e}")))
}

/// Implementation of the fact_check tool.
pub async fn fact_check_impl(coordinator: &Coordinator, params: FactCheckParams) -> Result<CallToolResult, McpError> {
    let key = key_for(&params.url)?;
    let outcome = coordinator.ensure(&key).await?;
    tracing::debug!(key = %key, ?outcome, "fact_check");

    FactCheckOutput::from_outcome(key, outcome).into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{coordinator_with, output_of, wait_settled};
    use newsfax_core::{Source, Truthfulness};

    fn sample_facts() -> Vec<CheckedFact> {
        vec![CheckedFact {
            text: "Unemployment fell to 3.5% in 2023.".to_string(),
            truthfulness: Truthfulness::SomewhatTrue,
            summary: "The rate was 3.5% for part of the year.".to_string(),
            sources: vec![Source {
                url: "https://www.bls.gov/".to_string(),
                favicon: "https://www.bls.gov/favicon.ico".to_string(),
            }],
        }]
    }

    #[tokio::test]
    async fn test_fact_check_started_then_complete() {
        let coordinator = coordinator_with(Ok(sample_facts())).await;
        let params = FactCheckParams { url: "news.example.com/story".to_string() };

        let first = output_of(&fact_check_impl(&coordinator, params.clone()).await.unwrap());
        assert_eq!(first.status, CheckStatus::Processing);
        assert_eq!(first.message.as_deref(), Some("Fact checking started"));
        assert_eq!(first.url, "https://news.example.com/story");
        assert!(first.facts.is_none());

        let settled = wait_settled(&coordinator, &params.url).await;
        assert_eq!(settled.status, CheckStatus::Complete);

        let again = output_of(&fact_check_impl(&coordinator, params).await.unwrap());
        assert_eq!(again.status, CheckStatus::Complete);
        assert_eq!(again.facts, Some(sample_facts()));
        assert!(again.message.is_none());
    }

    #[tokio::test]
    async fn test_equivalent_urls_share_one_job() {
        let coordinator = coordinator_with(Ok(sample_facts())).await;

        let first = FactCheckParams { url: "https://News.Example.com/story#comments".to_string() };
        let output = output_of(&fact_check_impl(&coordinator, first).await.unwrap());
        assert_eq!(output.message.as_deref(), Some("Fact checking started"));

        let second = FactCheckParams { url: "  news.example.com/story ".to_string() };
        let output = output_of(&fact_check_impl(&coordinator, second).await.unwrap());
        assert_ne!(output.message.as_deref(), Some("Fact checking started"));
        assert_eq!(output.url, "https://news.example.com/story");
    }

    #[tokio::test]
    async fn test_fact_check_failed() {
        let coordinator = coordinator_with(Err("tavily extract returned no content".to_string())).await;
        let params = FactCheckParams { url: "https://example.com/broken".to_string() };

        fact_check_impl(&coordinator, params.clone()).await.unwrap();
        assert_eq!(wait_settled(&coordinator, &params.url).await.status, CheckStatus::Failed);

        let output = output_of(&fact_check_impl(&coordinator, params).await.unwrap());
        assert_eq!(output.status, CheckStatus::Failed);
        assert_eq!(output.attempts, Some(1));
        assert!(output.error.unwrap().contains("no content"));
    }

    #[tokio::test]
    async fn test_fact_check_rejects_bad_urls() {
        let coordinator = coordinator_with(Ok(Vec::new())).await;

        for url in ["", "   ", "ftp://example.com/file", "https://"] {
            let err = fact_check_impl(&coordinator, FactCheckParams { url: url.to_string() })
                .await
                .unwrap_err();
            assert_eq!(err.code.0, -32602, "url {url:?}");
        }
    }

    #[test]
    fn test_output_omits_absent_fields() {
        let output = FactCheckOutput::from_outcome("https://example.com/".to_string(), Outcome::InProgress);
        let value = serde_json::to_value(&output).unwrap();

        assert_eq!(value["status"], "processing");
        assert_eq!(value["message"], "Fact checking in progress");
        assert!(value.get("facts").is_none());
        assert!(value.get("error").is_none());
    }
}
