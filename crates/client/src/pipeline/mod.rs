//! Fact-check pipeline: extract, pick statements, verify each one.
//!
//! 1. Tavily extract returns the page text, truncated to `max_content_chars`.
//! 2. The chat model lists verbatim factual statements (at most `max_facts`).
//! 3. Each statement is searched on Tavily and judged by the chat model.
//!
//! A statement whose verification fails is skipped. Failing to read the page
//! or to list statements fails the whole check.

pub mod prompts;

use crate::chat::{ChatClient, ChatConfig};
use crate::error::PipelineError;
use crate::key::favicon_for;
use crate::tavily::{SearchHit, TavilyClient, TavilyConfig};
use newsfax_core::{AppConfig, CheckedFact, Error, FactChecker, Source};
use prompts::{QuotesReply, VerdictReply};

/// Fallback icon for the web-search source used when no evidence URL survives.
const SEARCH_FAVICON: &str = "https://www.google.com/favicon.ico";

/// Page text and web evidence.
#[async_trait::async_trait]
pub trait Research: Send + Sync {
    async fn extract(&self, url: &str) -> Result<String, PipelineError>;

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, PipelineError>;
}

/// The model's two questions: which statements to check, and how true one is.
#[async_trait::async_trait]
pub trait Judge: Send + Sync {
    async fn quotes(&self, content: &str, max_facts: usize) -> Result<QuotesReply, PipelineError>;

    async fn verdict(&self, statement: &str, hits: &[SearchHit]) -> Result<VerdictReply, PipelineError>;
}

#[async_trait::async_trait]
impl Research for TavilyClient {
    async fn extract(&self, url: &str) -> Result<String, PipelineError> {
        TavilyClient::extract(self, url).await
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, PipelineError> {
        TavilyClient::search(self, query, max_results).await
    }
}

#[async_trait::async_trait]
impl Judge for ChatClient {
    async fn quotes(&self, content: &str, max_facts: usize) -> Result<QuotesReply, PipelineError> {
        self.complete_json(prompts::QUOTES_SYSTEM, &prompts::quotes_prompt(content, max_facts))
            .await
    }

    async fn verdict(&self, statement: &str, hits: &[SearchHit]) -> Result<VerdictReply, PipelineError> {
        self.complete_json(prompts::VERDICT_SYSTEM, &prompts::verdict_prompt(statement, hits))
            .await
    }
}

/// Size limits applied while checking one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineLimits {
    pub max_content_chars: usize,
    pub max_facts: usize,
    pub max_sources: usize,
}

impl Default for PipelineLimits {
    fn default() -> Self {
        Self { max_content_chars: 8_000, max_facts: 8, max_sources: 3 }
    }
}

/// The production [`FactChecker`]: Tavily for research, a chat model as judge.
#[derive(Debug, Clone)]
pub struct FactCheckPipeline<R = TavilyClient, J = ChatClient> {
    research: R,
    judge: J,
    limits: PipelineLimits,
}

impl FactCheckPipeline {
    /// Build the pipeline from application configuration.
    ///
    /// Fails if either API key is missing.
    pub fn from_config(config: &AppConfig) -> Result<Self, PipelineError> {
        let tavily = TavilyClient::new(TavilyConfig {
            api_key: config.tavily_api_key.clone().unwrap_or_default(),
            base_url: config.tavily_base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })?;

        let chat = ChatClient::new(ChatConfig {
            api_key: config.openai_api_key.clone().unwrap_or_default(),
            base_url: config.openai_base_url.clone(),
            model: config.openai_model.clone(),
            timeout: config.timeout(),
        })?;

        let limits = PipelineLimits {
            max_content_chars: config.max_content_chars,
            max_facts: config.max_facts,
            max_sources: config.max_sources,
        };

        Ok(Self::new(tavily, chat, limits))
    }
}

impl<R: Research, J: Judge> FactCheckPipeline<R, J> {
    pub fn new(research: R, judge: J, limits: PipelineLimits) -> Self {
        Self { research, judge, limits }
    }

    async fn find_statements(&self, content: &str) -> Result<Vec<String>, PipelineError> {
        let content = prompts::truncate_content(content, self.limits.max_content_chars);
        let reply = self.judge.quotes(content, self.limits.max_facts).await?;

        Ok(prompts::select_quotes(reply.quotes, self.limits.max_facts))
    }

    async fn verify(&self, statement: &str) -> Result<CheckedFact, PipelineError> {
        let hits = self.research.search(statement, self.limits.max_sources).await?;
        let verdict = self.judge.verdict(statement, &hits).await?;

        let sources = build_sources(statement, &verdict.sources, &hits, self.limits.max_sources);

        Ok(CheckedFact {
            text: statement.to_string(),
            truthfulness: verdict.truthfulness,
            summary: verdict.summary.trim().to_string(),
            sources,
        })
    }
}

#[async_trait::async_trait]
impl<R: Research, J: Judge> FactChecker for FactCheckPipeline<R, J> {
    async fn check(&self, key: &str) -> Result<Vec<CheckedFact>, Error> {
        let content = self.research.extract(key).await?;
        let statements = self.find_statements(&content).await?;
        tracing::info!(statements = statements.len(), "verifying statements");

        let mut facts = Vec::with_capacity(statements.len());
        for statement in &statements {
            match self.verify(statement).await {
                Ok(fact) => facts.push(fact),
                Err(e) => tracing::warn!(error = %e, statement = %statement, "skipping unverified statement"),
            }
        }

        Ok(facts)
    }
}

/// Sources for a verdict.
///
/// Uses the model-cited `http(s)` URLs, or the search hits when the model
/// cited none, capped at `max_sources`. Falls back to a web search link for
/// the statement when nothing usable remains.
fn build_sources(statement: &str, cited: &[String], hits: &[SearchHit], max_sources: usize) -> Vec<Source> {
    let cited: Vec<&str> = cited
        .iter()
        .map(|u| u.trim())
        .filter(|u| u.starts_with("http://") || u.starts_with("https://"))
        .collect();

    let candidates: Vec<&str> = if cited.is_empty() { hits.iter().map(|h| h.url.as_str()).collect() } else { cited };

    let mut sources: Vec<Source> = Vec::new();
    for url in candidates {
        if sources.len() == max_sources {
            break;
        }
        if sources.iter().any(|s| s.url == url) {
            continue;
        }
        if let Some(favicon) = favicon_for(url) {
            sources.push(Source { url: url.to_string(), favicon });
        }
    }

    if sources.is_empty() {
        sources.push(search_source(statement));
    }

    sources
}

fn search_source(statement: &str) -> Source {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("q", statement)
        .finish();
    Source { url: format!("https://www.google.com/search?{query}"), favicon: SEARCH_FAVICON.to_string() }
}
