//! sw_fetch tool implementation.
//!
//! Delivers a fetch signal for one page request and reports where the
//! answer came from. Cache writes started by the request are not awaited.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use scribe_client::{CacheAgent, FetchOutcome, LifecycleSignal, Method, Request, RequestMode, SignalOutcome, resolve};
use scribe_core::{Error, ResponseKind};

use super::json_result;

/// Input parameters for sw_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwFetchParams {
    /// URL of the request, absolute or relative to the agent scope.
    pub url: String,

    /// HTTP method (default: GET).
    #[serde(default = "default_method")]
    pub method: String,

    /// Request mode: "cors" (default), "no-cors", "same-origin" or "navigate".
    #[serde(default = "default_mode")]
    pub mode: String,
}

fn default_method() -> String {
    "GET".into()
}

fn default_mode() -> String {
    "cors".into()
}

/// Output structure for sw_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwFetchOutput {
    /// "cache", "network" or "failed".
    pub source: String,
    /// Final URL of the response.
    pub url: Option<String>,
    /// HTTP status; 0 for opaque responses.
    pub status: Option<u16>,
    pub kind: Option<ResponseKind>,
    pub redirected: bool,
    pub content_type: Option<String>,
    /// Whether a copy is being written to the cache.
    pub caching: bool,
    /// Body as lossy UTF-8; omitted for opaque responses.
    pub body: Option<String>,
    pub body_bytes: usize,
}

impl SwFetchOutput {
    fn from_outcome(outcome: FetchOutcome) -> Self {
        let source = outcome.source().to_string();
        let caching = matches!(outcome, FetchOutcome::Network { write: Some(_), .. });

        let Some(response) = outcome.into_response() else {
            return Self {
                source,
                url: None,
                status: None,
                kind: None,
                redirected: false,
                content_type: None,
                caching: false,
                body: None,
                body_bytes: 0,
            };
        };

        let url = Some(response.url.to_string());
        let status = Some(response.status);
        let kind = response.kind;
        let redirected = response.redirected;
        let content_type = response.content_type().map(str::to_string);
        let bytes = response.into_body();

        Self {
            source,
            url,
            status,
            kind: Some(kind),
            redirected,
            content_type,
            caching,
            body: (kind != ResponseKind::Opaque).then(|| String::from_utf8_lossy(&bytes).into_owned()),
            body_bytes: bytes.len(),
        }
    }
}

/// Implementation of the sw_fetch tool.
pub async fn fetch_impl(agent: &CacheAgent, params: SwFetchParams) -> Result<CallToolResult, McpError> {
    let url = resolve(agent.scope(), &params.url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
    let method = Method::from_bytes(params.method.trim().to_ascii_uppercase().as_bytes())
        .map_err(|_| Error::InvalidInput(format!("invalid method: {}", params.method)))?;
    let mode: RequestMode = params.mode.parse()?;

    let request = Request::get(url).with_method(method).with_mode(mode);
    let outcome = match agent.dispatch(LifecycleSignal::Fetch(request)).await {
        SignalOutcome::Fetched(outcome) => outcome,
        other => {
            return Err(McpError::internal_error(format!("unexpected signal outcome: {other:?}"), None));
        }
    };

    json_result(&SwFetchOutput::from_outcome(outcome))
}
