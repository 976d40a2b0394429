//! MCP server handler implementation.
//!
//! Routes tool calls to the fact-check tools, all of which share one
//! [`Coordinator`].
use crate::tools::fact_check::{FactCheckParams, fact_check_impl};
use crate::tools::status::status_impl;

use newsfax_core::Coordinator;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for newsfax.
#[derive(Clone)]
pub struct NewsfaxServer {
    coordinator: Coordinator,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl NewsfaxServer {
    pub fn new(coordinator: Coordinator) -> Self {
        Self { coordinator, tool_router: Self::tool_router() }
    }

    /// Start or poll a fact check for a page.
    ///
    /// Never waits for the check itself: the first call starts it, later calls
    /// report progress until the stored facts are returned.
    #[tool(
        description = "Fact-check the statements on a web page. Returns status 'processing' while the check runs; call again with the same URL to get status 'complete' with the checked facts, or 'failed' with the error."
    )]
    async fn fact_check(&self, params: Parameters<FactCheckParams>) -> Result<CallToolResult, McpError> {
        fact_check_impl(&self.coordinator, params.0).await
    }

    /// Look up a fact check without starting one.
    #[tool(
        description = "Report the stored fact-check status for a URL without starting a check. Returns 'unknown' if the URL was never submitted."
    )]
    async fn fact_check_status(&self, params: Parameters<FactCheckParams>) -> Result<CallToolResult, McpError> {
        status_impl(&self.coordinator, params.0).await
    }
}

impl ServerHandler for NewsfaxServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "newsfax".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::coordinator_with;

    #[tokio::test]
    async fn test_router_lists_both_tools() {
        let server = NewsfaxServer::new(coordinator_with(Ok(Vec::new())).await);

        let mut names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["fact_check".to_string(), "fact_check_status".to_string()]);
    }

    #[tokio::test]
    async fn test_server_info() {
        let info = NewsfaxServer::new(coordinator_with(Ok(Vec::new())).await).get_info();
        assert_eq!(info.server_info.name, "newsfax");
        assert!(info.capabilities.tools.is_some());
    }
}
