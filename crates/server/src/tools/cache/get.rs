//! cache_get tool implementation.
//!
//! Looks up a stored response by request identity.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use scribe_client::resolve;
use scribe_core::{CacheStorage, Error, RequestKey, ResponseKind};
use url::Url;

use crate::tools::json_result;

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// URL of the stored request, absolute or relative to the agent scope.
    pub url: String,

    /// HTTP method of the stored request (default: GET).
    #[serde(default)]
    pub method: Option<String>,

    /// Bucket to search. All buckets are searched, oldest first, when omitted.
    #[serde(default)]
    pub bucket: Option<String>,
}

/// Output from the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetOutput {
    pub url: String,
    pub status: u16,
    pub status_text: String,
    pub kind: ResponseKind,
    pub redirected: bool,
    pub content_type: Option<String>,
    pub stored_at: String,
    pub body_bytes: usize,
}

/// Implementation of the cache_get tool.
pub async fn get_impl(
    storage: &dyn CacheStorage, scope: &Url, params: CacheGetParams,
) -> Result<CallToolResult, McpError> {
    let url = resolve(scope, &params.url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
    let key = RequestKey::new(params.method.as_deref().unwrap_or("GET"), url.as_str());

    let stored = match params.bucket.as_deref() {
        Some(bucket) => storage.match_in(bucket, &key).await?,
        None => storage.match_any(&key).await?,
    }
    .ok_or_else(|| Error::CacheMiss(key.to_string()))?;

    let content_type = stored.content_type().map(str::to_string);
    let body_bytes = stored.body.len();
    let output = CacheGetOutput {
        url: stored.url,
        status: stored.status,
        status_text: stored.status_text,
        kind: stored.kind,
        redirected: stored.redirected,
        content_type,
        stored_at: stored.stored_at,
        body_bytes,
    };

    json_result(&output)
}
