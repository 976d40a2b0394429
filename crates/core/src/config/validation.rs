//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `check_timeout_secs` is 0 or exceeds 1 hour
    /// - `max_attempts` is 0 or exceeds 10
    /// - `max_content_chars`, `max_facts` or `max_sources` is 0
    /// - `user_agent`, `openai_model` or a base URL is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.check_timeout_secs == 0 {
            return Err(invalid("check_timeout_secs", "must be greater than 0"));
        }
        if self.check_timeout_secs > 3_600 {
            return Err(invalid("check_timeout_secs", "must not exceed 1 hour (3600s)"));
        }

        if self.max_attempts == 0 {
            return Err(invalid("max_attempts", "must be at least 1"));
        }
        if self.max_attempts > 10 {
            return Err(invalid("max_attempts", "must not exceed 10"));
        }

        if self.max_content_chars == 0 {
            return Err(invalid("max_content_chars", "must be greater than 0"));
        }
        if self.max_facts == 0 {
            return Err(invalid("max_facts", "must be greater than 0"));
        }
        if self.max_sources == 0 {
            return Err(invalid("max_sources", "must be greater than 0"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }
        if self.openai_model.is_empty() {
            return Err(invalid("openai_model", "must not be empty"));
        }
        if self.openai_base_url.is_empty() {
            return Err(invalid("openai_base_url", "must not be empty"));
        }
        if self.tavily_base_url.is_empty() {
            return Err(invalid("tavily_base_url", "must not be empty"));
        }

        if self.check_timeout_secs * 1_000 < self.timeout_ms {
            tracing::warn!(
                check_timeout_secs = self.check_timeout_secs,
                timeout_ms = self.timeout_ms,
                "check_timeout_secs is shorter than a single HTTP request timeout"
            );
        }

        Ok(())
    }
}
