//! MCP tool implementations.
//!
//! This module contains all tools exposed by the newsfax server.

pub mod fact_check;
pub mod status;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::time::Duration;

    use newsfax_core::{CheckedFact, Coordinator, CoordinatorConfig, Error, FactChecker, ResultStore};
    use rmcp::model::CallToolResult;

    use super::fact_check::{CheckStatus, FactCheckOutput, FactCheckParams};
    use super::status::status_impl;

    /// Checker that answers every key with the same result.
    struct StubChecker {
        result: Result<Vec<CheckedFact>, String>,
    }

    #[async_trait::async_trait]
    impl FactChecker for StubChecker {
        async fn check(&self, _key: &str) -> Result<Vec<CheckedFact>, Error> {
            self.result.clone().map_err(Error::CheckFailed)
        }
    }

    pub async fn coordinator_with(result: Result<Vec<CheckedFact>, String>) -> Coordinator {
        let store = ResultStore::open_in_memory().await.unwrap();
        let config = CoordinatorConfig { max_attempts: 1, check_timeout: Duration::from_secs(5) };
        Coordinator::new(store, Arc::new(StubChecker { result }), config)
    }

    pub fn output_of(result: &CallToolResult) -> FactCheckOutput {
        let content_val = serde_json::to_value(&result.content[0]).unwrap();
        let text = content_val
            .get("text")
            .and_then(|v| v.as_str())
            .expect("Expected text field in content");
        serde_json::from_str(text).unwrap()
    }

    /// Poll the status tool until the check leaves `processing`.
    pub async fn wait_settled(coordinator: &Coordinator, url: &str) -> FactCheckOutput {
        for _ in 0..500 {
            let params = FactCheckParams { url: url.to_string() };
            let output = output_of(&status_impl(coordinator, params).await.unwrap());
            if output.status != CheckStatus::Processing {
                return output;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("fact check for {url} never settled");
    }
}
