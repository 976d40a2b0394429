//! fact_check_status tool implementation.
//!
//! Reports the stored record for a URL. Never starts a check, so a failed key
//! with retries left is reported as failed until `fact_check` is called again.

use newsfax_core::{Coordinator, JobState};
use rmcp::{ErrorData as McpError, model::CallToolResult};

use super::fact_check::{CheckStatus, FactCheckOutput, FactCheckParams, key_for};

/// Implementation of the fact_check_status tool.
pub async fn status_impl(coordinator: &Coordinator, params: FactCheckParams) -> Result<CallToolResult, McpError> {
    let key = key_for(&params.url)?;

    let output = match coordinator.status(&key).await? {
        None => FactCheckOutput::new(key, CheckStatus::Unknown),
        Some(record) => {
            let attempts = Some(record.attempts);
            match record.state {
                JobState::Pending => FactCheckOutput { attempts, ..FactCheckOutput::new(key, CheckStatus::Processing) },
                JobState::Done { facts } => {
                    FactCheckOutput { facts: Some(facts), attempts, ..FactCheckOutput::new(key, CheckStatus::Complete) }
                }
                JobState::Failed { error } => {
                    FactCheckOutput { error: Some(error), attempts, ..FactCheckOutput::new(key, CheckStatus::Failed) }
                }
            }
        }
    };

    output.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::fact_check::fact_check_impl;
    use crate::tools::test_support::{coordinator_with, output_of, wait_settled};

    #[tokio::test]
    async fn test_status_unknown_does_not_start() {
        let coordinator = coordinator_with(Ok(Vec::new())).await;
        let params = FactCheckParams { url: "example.com/never".to_string() };

        let output = output_of(&status_impl(&coordinator, params.clone()).await.unwrap());
        assert_eq!(output.status, CheckStatus::Unknown);
        assert_eq!(output.url, "https://example.com/never");

        assert!(coordinator.status("https://example.com/never").await.unwrap().is_none());

        let started = output_of(&fact_check_impl(&coordinator, params).await.unwrap());
        assert_eq!(started.message.as_deref(), Some("Fact checking started"));
    }

    #[tokio::test]
    async fn test_status_reports_complete() {
        let coordinator = coordinator_with(Ok(Vec::new())).await;
        let params = FactCheckParams { url: "https://example.com/empty".to_string() };

        fact_check_impl(&coordinator, params.clone()).await.unwrap();
        let output = wait_settled(&coordinator, &params.url).await;

        assert_eq!(output.status, CheckStatus::Complete);
        assert_eq!(output.facts, Some(Vec::new()));
        assert_eq!(output.attempts, Some(1));
    }

    #[tokio::test]
    async fn test_status_rejects_bad_url() {
        let coordinator = coordinator_with(Ok(Vec::new())).await;
        let err = status_impl(&coordinator, FactCheckParams { url: "ftp://example.com/file".to_string() })
            .await
            .unwrap_err();
        assert_eq!(err.code.0, -32602);
    }
}
