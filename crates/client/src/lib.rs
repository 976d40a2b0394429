//! Client code for newsfax.
//!
//! This crate provides the fact-check pipeline (Tavily extraction and search,
//! chat-model verdicts) behind the core `FactChecker` trait, and the URL keys
//! shared by every transport.

pub mod chat;
pub mod error;
pub mod key;
pub mod pipeline;
pub mod tavily;

pub use chat::{ChatClient, ChatConfig};
pub use error::{PipelineError, Service};
pub use key::{KeyError, fact_check_key};
pub use pipeline::{FactCheckPipeline, Judge, PipelineLimits, Research};
pub use tavily::{SearchHit, TavilyClient, TavilyConfig};
