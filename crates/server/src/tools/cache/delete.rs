//! cache_delete tool implementation.
//!
//! Deletes one bucket by name, entries included.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use scribe_core::CacheStorage;

use crate::error::HostError;
use crate::tools::json_result;

/// Parameters for the cache_delete tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheDeleteParams {
    /// Name of the bucket to delete.
    pub bucket: String,
}

/// Output from the cache_delete tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheDeleteOutput {
    /// Whether the bucket existed.
    pub deleted: bool,
}

/// Implementation of the cache_delete tool.
pub async fn delete_impl(storage: &dyn CacheStorage, params: CacheDeleteParams) -> Result<CallToolResult, McpError> {
    let bucket = params.bucket.trim();
    if bucket.is_empty() {
        return Err(HostError::InvalidInput("bucket must not be empty".to_string()).into());
    }

    let deleted = storage.delete(bucket).await?;
    tracing::info!(cache = bucket, deleted, "cache_delete");

    json_result(&CacheDeleteOutput { deleted })
}
