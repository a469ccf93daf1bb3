//! MCP tool implementations.
//!
//! Lifecycle tools deliver `install`, `activate` and `fetch` signals to the
//! agent; cache tools inspect and prune the storage it writes to.

pub mod cache;
pub mod lifecycle;
pub mod sw_fetch;

pub use lifecycle::{activate_impl, install_impl};
pub use sw_fetch::{SwFetchParams, fetch_impl};

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

use crate::error::HostError;

/// Render a tool output as pretty JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output).map_err(|e| HostError::Serialize(e.to_string()))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
