//! Responses handed back to the page.
//!
//! A `Response` owns its body and is not `Clone`: the body can be
//! consumed once. Callers that need two consumers (the page and the cache)
//! split it with [`Response::tee`] before either side reads it.

use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use scribe_core::{Error, ResponseKind, StoredResponse};
use url::Url;

#[derive(Debug)]
pub struct Response {
    pub url: Url,
    /// HTTP status; 0 for opaque responses.
    pub status: u16,
    pub status_text: String,
    pub kind: ResponseKind,
    pub redirected: bool,
    pub headers: HeaderMap,
    body: Bytes,
}

impl Response {
    pub fn new(url: Url, status: u16, kind: ResponseKind, body: impl Into<Bytes>) -> Self {
        let status_text = StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or_default()
            .to_string();

        Self { url, status, status_text, kind, redirected: false, headers: HeaderMap::new(), body: body.into() }
    }

    /// A cross-origin no-cors response: status 0, no headers, body kept
    /// only so it can be passed through.
    pub fn opaque(url: Url, body: impl Into<Bytes>) -> Self {
        Self {
            url,
            status: 0,
            status_text: String::new(),
            kind: ResponseKind::Opaque,
            redirected: false,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        if self.kind != ResponseKind::Opaque {
            self.headers = headers;
        }
        self
    }

    pub fn with_redirected(mut self, redirected: bool) -> Self {
        self.redirected = redirected;
        self
    }

    /// Status in the 200-299 range.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// Split into two independently consumable copies.
    pub fn tee(self) -> (Response, Response) {
        let copy = Response {
            url: self.url.clone(),
            status: self.status,
            status_text: self.status_text.clone(),
            kind: self.kind,
            redirected: self.redirected,
            headers: self.headers.clone(),
            body: self.body.clone(),
        };
        (self, copy)
    }

    /// Consume the response and take its body.
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Consume the response into the snapshot a cache bucket stores.
    pub fn into_stored(self) -> StoredResponse {
        let headers = self
            .headers
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string())))
            .collect();

        StoredResponse {
            url: self.url.to_string(),
            status: self.status,
            status_text: self.status_text,
            kind: self.kind,
            redirected: self.redirected,
            headers,
            body: self.body,
            stored_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Rebuild a response from a stored snapshot.
    ///
    /// Headers that no longer parse are dropped.
    pub fn from_stored(stored: StoredResponse) -> Result<Self, Error> {
        let url = Url::parse(&stored.url).map_err(|e| Error::CorruptEntry(format!("{}: {e}", stored.url)))?;

        let mut headers = HeaderMap::new();
        for (name, value) in &stored.headers {
            if let (Ok(name), Ok(value)) = (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
                headers.append(name, value);
            }
        }

        Ok(Self {
            url,
            status: stored.status,
            status_text: stored.status_text,
            kind: stored.kind,
            redirected: stored.redirected,
            headers,
            body: stored.body,
        })
    }
}
