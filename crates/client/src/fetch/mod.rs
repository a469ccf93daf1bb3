//! Network capability and its reqwest implementation.
//!
//! ### Response classification
//! - Final URL same-origin with the scope: `basic`
//! - Cross-origin, `no-cors` mode: `opaque` (status 0, headers hidden)
//! - Any other cross-origin response: `cors`
//!
//! ### Limits
//! - Max redirects: 5 (configurable)
//! - Max body bytes: 10MB (configurable)
//! - No request timeout; a hung request stays pending

pub mod request;
pub mod response;
pub mod url;

use async_trait::async_trait;
use reqwest::Client;
use std::time::Instant;

pub use self::url::{UrlError, resolve, same_origin};
pub use request::{Method, Request, RequestMode};
pub use response::Response;

use ::url::Url;
use scribe_core::{AppConfig, Error, ResponseKind};

/// Issues requests on behalf of the agent.
#[async_trait]
pub trait Network: Send + Sync {
    /// Perform the request. An `Err` means no response arrived at all;
    /// HTTP error statuses are returned as responses.
    async fn fetch(&self, request: &Request) -> Result<Response, Error>;
}

/// Classify a response by where it came from and how it was requested.
pub fn classify(scope: &Url, final_url: &Url, mode: RequestMode) -> ResponseKind {
    if same_origin(scope, final_url) {
        ResponseKind::Basic
    } else if mode == RequestMode::NoCors {
        ResponseKind::Opaque
    } else {
        ResponseKind::Cors
    }
}

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Scope of the controlled application; its origin is "same-origin".
    pub scope: Url,

    /// User agent string (default: "scribe-sw/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 10MB)
    pub max_bytes: usize,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl FetchConfig {
    /// Build from the loaded application config.
    pub fn from_app(config: &AppConfig) -> Result<Self, Error> {
        let scope = config.scope_url().map_err(|e| Error::InvalidUrl(e.to_string()))?;
        Ok(Self {
            scope,
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            max_redirects: config.max_redirects,
        })
    }
}

/// Whether a declared body length is over the byte limit.
fn exceeds_limit(len: u64, max_bytes: usize) -> bool {
    !usize::try_from(len).is_ok_and(|len| len <= max_bytes)
}

/// reqwest-backed network client.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }
}

#[async_trait]
impl Network for FetchClient {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        let start = Instant::now();

        if request.mode == RequestMode::SameOrigin && !same_origin(&self.config.scope, &request.url) {
            return Err(Error::InvalidInput(format!("same-origin request to {}", request.url)));
        }

        let mut builder = self.http.request(request.method.clone(), request.url.as_str());
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Network(format!("{}: {}", request.url, e)))?;

        if let Some(len) = response.content_length()
            && exceeds_limit(len, self.config.max_bytes)
        {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let status = response.status();
        let final_url = response.url().clone();
        let headers = response.headers().clone();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Network(format!("failed to read response: {}", e)))?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", bytes.len(), self.config.max_bytes)));
        }

        let redirected = final_url != request.url;
        let kind = classify(&self.config.scope, &final_url, request.mode);

        tracing::debug!(
            url = %request.url,
            final_url = %final_url,
            status = status.as_u16(),
            kind = %kind,
            bytes = bytes.len(),
            fetch_ms = start.elapsed().as_millis() as u64,
            "network fetch complete"
        );

        let response = match kind {
            ResponseKind::Opaque => Response::opaque(final_url, bytes),
            _ => Response::new(final_url, status.as_u16(), kind, bytes).with_headers(headers),
        };

        Ok(response.with_redirected(redirected))
    }
}
