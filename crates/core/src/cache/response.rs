//! Stored request identities and response snapshots.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::hash::compute_request_key;
use crate::Error;

/// Identity of a request in a cache bucket: method plus canonical URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestKey {
    pub method: String,
    pub url: String,
}

impl RequestKey {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self { method: method.into().to_ascii_uppercase(), url: url.into() }
    }

    /// Shorthand for the common GET identity.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }

    /// Content-addressed storage key.
    pub fn hash(&self) -> String {
        compute_request_key(&self.method, &self.url)
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// Origin classification of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    /// Same-origin response; status, headers and body are inspectable.
    Basic,
    /// Cross-origin response fetched in CORS mode.
    Cors,
    /// Cross-origin response fetched without CORS; contents are not inspectable.
    Opaque,
}

impl ResponseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseKind::Basic => "basic",
            ResponseKind::Cors => "cors",
            ResponseKind::Opaque => "opaque",
        }
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(ResponseKind::Basic),
            "cors" => Ok(ResponseKind::Cors),
            "opaque" => Ok(ResponseKind::Opaque),
            other => Err(Error::CorruptEntry(format!("unknown response kind: {other}"))),
        }
    }
}

/// A response snapshot as held by a cache bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResponse {
    pub url: String,
    pub status: u16,
    pub status_text: String,
    pub kind: ResponseKind,
    pub redirected: bool,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
    pub stored_at: String,
}

impl StoredResponse {
    /// First header value matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }
}
