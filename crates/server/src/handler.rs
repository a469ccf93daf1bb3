//! MCP server handler implementation.
//!
//! The host side of the agent: each lifecycle tool delivers one signal to
//! the shared [`CacheAgent`] and the cache tools inspect its storage.

use std::sync::Arc;

use crate::tools::cache::{CacheDeleteParams, CacheGetParams, delete_impl, get_impl, keys_impl};
use crate::tools::{SwFetchParams, activate_impl, fetch_impl, install_impl};

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
use scribe_client::CacheAgent;

/// The MCP server handler for scribe-sw.
#[derive(Clone)]
pub struct ScribeSwServer {
    agent: Arc<CacheAgent>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl ScribeSwServer {
    /// Create a new server handler around a shared agent.
    pub fn new(agent: Arc<CacheAgent>) -> Self {
        Self { agent, tool_router: Self::tool_router() }
    }

    #[tool(description = "Deliver the install signal: pre-cache the manifest into the current cache generation. \
                          Individual manifest failures are reported but do not fail the install.")]
    async fn sw_install(&self) -> Result<CallToolResult, McpError> {
        install_impl(&self.agent).await
    }

    #[tool(description = "Deliver the activate signal: delete every cache bucket except the current generation.")]
    async fn sw_activate(&self) -> Result<CallToolResult, McpError> {
        activate_impl(&self.agent).await
    }

    #[tool(description = "Deliver a fetch signal for one page request. Answers from cache first, then the network; \
                          same-origin 200 responses are cached in the background.")]
    async fn sw_fetch(&self, params: Parameters<SwFetchParams>) -> Result<CallToolResult, McpError> {
        fetch_impl(&self.agent, params.0).await
    }

    #[tool(description = "List cache buckets in creation order with their entry counts.")]
    async fn cache_keys(&self) -> Result<CallToolResult, McpError> {
        keys_impl(self.agent.storage().as_ref(), self.agent.generation()).await
    }

    #[tool(description = "Look up a stored response by URL and method, in one bucket or across all of them.")]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(self.agent.storage().as_ref(), self.agent.scope(), params.0).await
    }

    #[tool(description = "Delete a cache bucket and all of its entries.")]
    async fn cache_delete(&self, params: Parameters<CacheDeleteParams>) -> Result<CallToolResult, McpError> {
        delete_impl(self.agent.storage().as_ref(), params.0).await
    }
}

impl ServerHandler for ScribeSwServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "scribe-sw".into(),
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
