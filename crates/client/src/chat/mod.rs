//! OpenAI-compatible chat completions client.
//!
//! Requests are sent in JSON mode (`response_format: json_object`) so every
//! reply can be deserialized directly into a typed struct.

use crate::error::{PipelineError, Service, check_status};
use reqwest::header;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default base URL for the chat API.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Chat client configuration.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_key: String,
    /// Base URL (default: https://api.openai.com/v1).
    pub base_url: String,
    pub model: String,
    /// Request timeout (default: 30s).
    pub timeout: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat completions client.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    config: ChatConfig,
}

impl ChatClient {
    /// Create a new chat client with the given configuration.
    pub fn new(config: ChatConfig) -> Result<Self, PipelineError> {
        if config.api_key.is_empty() {
            return Err(PipelineError::MissingApiKey(Service::Chat));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PipelineError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    /// Send a system + user prompt and decode the JSON reply as `T`.
    pub async fn complete_json<T: DeserializeOwned>(&self, system: &str, user: &str) -> Result<T, PipelineError> {
        let start = Instant::now();
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let body = ChatRequest {
            model: &self.config.model,
            messages: [Message { role: "system", content: system }, Message { role: "user", content: user }],
            temperature: 0.0,
            response_format: ResponseFormat { kind: "json_object" },
        };

        let http_response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!("chat response status: {status}");
        check_status(Service::Chat, status)?;

        let bytes = http_response.bytes().await?;
        let response: ChatResponse = serde_json::from_slice(&bytes).map_err(|e| PipelineError::Parse(e.to_string()))?;
        let content = extract_content(response)?;

        tracing::debug!(model = %self.config.model, "chat completion in {:?}", start.elapsed());
        serde_json::from_str(&content).map_err(|e| PipelineError::Parse(format!("model reply: {e}")))
    }
}

fn extract_content(response: ChatResponse) -> Result<String, PipelineError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| PipelineError::Parse("chat response has no content".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_new_missing_key() {
        let result = ChatClient::new(ChatConfig::default());
        assert!(matches!(result, Err(PipelineError::MissingApiKey(Service::Chat))));
    }

    #[test]
    fn test_request_shape() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: [Message { role: "system", content: "s" }, Message { role: "user", content: "u" }],
            temperature: 0.0,
            response_format: ResponseFormat { kind: "json_object" },
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["response_format"]["type"], "json_object");
        assert_eq!(value["messages"][1]["role"], "user");
    }

    #[test]
    fn test_extract_content() {
        let json = r#"{"choices": [{"index": 0, "message": {"role": "assistant", "content": "{\"quotes\": []}"}}]}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_content(response).unwrap(), r#"{"quotes": []}"#);
    }

    #[test]
    fn test_extract_content_empty_choices() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(extract_content(response), Err(PipelineError::Parse(_))));
    }
}
