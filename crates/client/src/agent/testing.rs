//! Scripted network for agent tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use scribe_core::{Error, ResponseKind};
use url::Url;

use crate::fetch::{Network, Request, Response, classify};

pub(crate) fn scope() -> Url {
    Url::parse("http://localhost:8080/").unwrap()
}

pub(crate) fn url(s: &str) -> Url {
    scope().join(s).unwrap()
}

#[derive(Clone)]
enum Route {
    Respond { status: u16, body: Bytes, final_url: Option<Url> },
    Fail,
}

/// Answers from a fixed route table and records every call.
///
/// Unknown URLs and every URL while offline fail like a dropped connection.
pub(crate) struct StubNetwork {
    routes: HashMap<String, Route>,
    offline: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl StubNetwork {
    pub(crate) fn new() -> Self {
        Self { routes: HashMap::new(), offline: AtomicBool::new(false), calls: Mutex::new(Vec::new()) }
    }

    pub(crate) fn route(mut self, target: &str, status: u16, body: &'static str) -> Self {
        self.routes
            .insert(url(target).to_string(), Route::Respond { status, body: Bytes::from_static(body.as_bytes()), final_url: None });
        self
    }

    pub(crate) fn redirect(mut self, target: &str, final_target: &str, body: &'static str) -> Self {
        self.routes.insert(
            url(target).to_string(),
            Route::Respond { status: 200, body: Bytes::from_static(body.as_bytes()), final_url: Some(url(final_target)) },
        );
        self
    }

    pub(crate) fn fail(mut self, target: &str) -> Self {
        self.routes.insert(url(target).to_string(), Route::Fail);
        self
    }

    pub(crate) fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn calls_for(&self, target: &str) -> usize {
        let target = url(target).to_string();
        self.calls.lock().unwrap().iter().filter(|c| **c == target).count()
    }
}

#[async_trait]
impl Network for StubNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        self.calls.lock().unwrap().push(request.url.to_string());

        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::Network(format!("{}: offline", request.url)));
        }

        match self.routes.get(request.url.as_str()) {
            Some(Route::Respond { status, body, final_url }) => {
                let final_url = final_url.clone().unwrap_or_else(|| request.url.clone());
                let redirected = final_url != request.url;
                let response = match classify(&scope(), &final_url, request.mode) {
                    ResponseKind::Opaque => Response::opaque(final_url, body.clone()),
                    kind => Response::new(final_url, *status, kind, body.clone()),
                };
                Ok(response.with_redirected(redirected))
            }
            Some(Route::Fail) | None => Err(Error::Network(format!("{}: connection refused", request.url))),
        }
    }
}
