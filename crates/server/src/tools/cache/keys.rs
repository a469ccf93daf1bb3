//! cache_keys tool implementation.
//!
//! Lists bucket names and entry counts in creation order.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use scribe_core::CacheStorage;

use crate::tools::json_result;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BucketSummary {
    pub name: String,
    pub entries: usize,
    /// Whether this is the agent's current generation.
    pub current: bool,
}

/// Output from the cache_keys tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheKeysOutput {
    pub buckets: Vec<BucketSummary>,
}

/// Implementation of the cache_keys tool.
pub async fn keys_impl(storage: &dyn CacheStorage, generation: &str) -> Result<CallToolResult, McpError> {
    let mut buckets = Vec::new();
    for name in storage.keys().await? {
        let entries = storage.entries(&name).await?.len();
        let current = name == generation;
        buckets.push(BucketSummary { name, entries, current });
    }

    json_result(&CacheKeysOutput { buckets })
}
