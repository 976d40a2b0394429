//! newsfax server entry point.
//!
//! Boots the fact-check MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use newsfax_client::FactCheckPipeline;
use newsfax_core::{AppConfig, Coordinator, CoordinatorConfig, ResultStore};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let store = ResultStore::open(&config.db_path).await?;

    let recovered = store.recover_interrupted().await?;
    if recovered > 0 {
        tracing::warn!(recovered, "marked interrupted fact checks as failed");
    }
    for (status, count) in store.count_by_state().await? {
        tracing::info!(status = %status, count, "stored fact checks");
    }

    let pipeline = FactCheckPipeline::from_config(&config)?;
    let coordinator = Coordinator::new(store, Arc::new(pipeline), CoordinatorConfig::from(&config));

    tracing::info!(db_path = %config.db_path.display(), "Starting newsfax server on stdio transport");

    let handler = handler::NewsfaxServer::new(coordinator);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
