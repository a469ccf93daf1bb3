//! Requests issued by the controlled page.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use scribe_core::{Error, RequestKey};
use url::Url;

pub use reqwest::Method;

/// How the page asked for a resource; decides the response kind for
/// cross-origin URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMode {
    SameOrigin,
    #[default]
    Cors,
    NoCors,
    Navigate,
}

impl RequestMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMode::SameOrigin => "same-origin",
            RequestMode::Cors => "cors",
            RequestMode::NoCors => "no-cors",
            RequestMode::Navigate => "navigate",
        }
    }
}

impl fmt::Display for RequestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "same-origin" => Ok(RequestMode::SameOrigin),
            "cors" => Ok(RequestMode::Cors),
            "no-cors" => Ok(RequestMode::NoCors),
            "navigate" => Ok(RequestMode::Navigate),
            other => Err(Error::InvalidInput(format!("unknown request mode: {other}"))),
        }
    }
}

/// An intercepted request.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub mode: RequestMode,
    pub body: Option<Bytes>,
}

impl Request {
    /// A GET request in CORS mode, the default for constructed requests.
    pub fn get(url: Url) -> Self {
        Self { method: Method::GET, url, mode: RequestMode::Cors, body: None }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_mode(mut self, mode: RequestMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Identity under which the request is looked up and stored.
    pub fn key(&self) -> RequestKey {
        RequestKey::new(self.method.as_str(), self.url.as_str())
    }
}
