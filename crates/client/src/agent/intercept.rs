//! Fetch handler: cache first, network second.
//!
//! A cached response is returned as-is with no revalidation. On a miss the
//! request goes to the network; a storable response is split with `tee`, one
//! copy returns to the page immediately and the other is written to the
//! current bucket by a detached task.

use std::sync::Arc;

use scribe_core::{CacheStorage, Error, RequestKey};
use tokio::task::JoinHandle;

use super::CacheAgent;
use super::policy::{Disposition, disposition};
use crate::fetch::{Request, Response};

/// Result of intercepting one page request.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Answered from the current bucket without touching the network.
    Cached(Response),
    /// Answered from the network. `write` is the detached cache write, if the
    /// response was storable; the page does not wait for it.
    Network { response: Response, write: Option<JoinHandle<()>> },
    /// The network request failed; the page sees a failed fetch.
    Unanswered,
}

impl FetchOutcome {
    pub fn response(&self) -> Option<&Response> {
        match self {
            FetchOutcome::Cached(response) | FetchOutcome::Network { response, .. } => Some(response),
            FetchOutcome::Unanswered => None,
        }
    }

    pub fn into_response(self) -> Option<Response> {
        match self {
            FetchOutcome::Cached(response) | FetchOutcome::Network { response, .. } => Some(response),
            FetchOutcome::Unanswered => None,
        }
    }

    /// Short label for logs and host output.
    pub fn source(&self) -> &'static str {
        match self {
            FetchOutcome::Cached(_) => "cache",
            FetchOutcome::Network { .. } => "network",
            FetchOutcome::Unanswered => "failed",
        }
    }
}

impl CacheAgent {
    /// Handle one intercepted page request.
    pub async fn handle_fetch(&self, request: Request) -> FetchOutcome {
        let key = request.key();

        if let Some(response) = self.lookup(&key).await {
            tracing::debug!(request = %key, "cache hit");
            return FetchOutcome::Cached(response);
        }

        let response = match self.network.fetch(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(request = %key, error = %e, "Fetching failed");
                return FetchOutcome::Unanswered;
            }
        };

        match disposition(&response) {
            Disposition::PassThrough(reason) => {
                tracing::debug!(request = %key, status = response.status, %reason, "returning response without caching");
                FetchOutcome::Network { response, write: None }
            }
            Disposition::Store => {
                let (response, copy) = response.tee();
                let write = self.spawn_write(key, copy);
                FetchOutcome::Network { response, write: Some(write) }
            }
        }
    }

    /// Current-bucket lookup. Storage errors count as a miss.
    async fn lookup(&self, key: &RequestKey) -> Option<Response> {
        let stored = match self.storage.match_in(&self.generation, key).await {
            Ok(stored) => stored?,
            Err(e) => {
                tracing::warn!(request = %key, error = %e, "cache lookup failed, falling back to network");
                return None;
            }
        };

        match Response::from_stored(stored) {
            Ok(response) => Some(response),
            Err(e) => {
                tracing::warn!(request = %key, error = %e, "ignoring unreadable cache entry");
                None
            }
        }
    }

    fn spawn_write(&self, key: RequestKey, copy: Response) -> JoinHandle<()> {
        let storage = Arc::clone(&self.storage);
        let generation = self.generation.clone();

        tokio::spawn(async move {
            match write_entry(storage.as_ref(), &generation, &key, copy).await {
                Ok(()) => tracing::debug!(request = %key, generation = %generation, "cached network response"),
                Err(e) => tracing::debug!(request = %key, error = %e, "cache write dropped"),
            }
        })
    }
}

async fn write_entry(storage: &dyn CacheStorage, generation: &str, key: &RequestKey, copy: Response) -> Result<(), Error> {
    storage.open(generation).await?;
    storage.put(generation, key, &copy.into_stored()).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use reqwest::Method;
    use scribe_core::{CacheDb, MemoryStorage, ResponseKind, StoredResponse};
    use tokio::sync::Notify;

    use super::*;
    use crate::fetch::RequestMode;
    use crate::agent::testing::{StubNetwork, scope, url};

    /// Memory storage whose writes block until released.
    struct GatedStorage {
        inner: MemoryStorage,
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl CacheStorage for GatedStorage {
        async fn open(&self, name: &str) -> Result<(), Error> {
            self.inner.open(name).await
        }

        async fn match_in(&self, name: &str, key: &RequestKey) -> Result<Option<StoredResponse>, Error> {
            self.inner.match_in(name, key).await
        }

        async fn match_any(&self, key: &RequestKey) -> Result<Option<StoredResponse>, Error> {
            self.inner.match_any(key).await
        }

        async fn put(&self, name: &str, key: &RequestKey, response: &StoredResponse) -> Result<(), Error> {
            self.gate.notified().await;
            self.inner.put(name, key, response).await
        }

        async fn keys(&self) -> Result<Vec<String>, Error> {
            self.inner.keys().await
        }

        async fn delete(&self, name: &str) -> Result<bool, Error> {
            self.inner.delete(name).await
        }

        async fn entries(&self, name: &str) -> Result<Vec<RequestKey>, Error> {
            self.inner.entries(name).await
        }
    }

    fn agent_with(storage: Arc<dyn CacheStorage>, network: Arc<StubNetwork>) -> CacheAgent {
        CacheAgent::new(scope(), storage, network)
    }

    async fn settle(outcome: FetchOutcome) -> Option<Response> {
        match outcome {
            FetchOutcome::Network { response, write: Some(write) } => {
                write.await.unwrap();
                Some(response)
            }
            other => other.into_response(),
        }
    }

    #[tokio::test]
    async fn test_cache_hit_makes_no_network_call() {
        let storage = Arc::new(MemoryStorage::new());
        let network = Arc::new(StubNetwork::new().route("/", 200, "shell"));
        let agent = agent_with(storage.clone(), network.clone()).with_manifest(["/"]);
        agent.install().await;
        let before = network.calls();

        let outcome = agent.handle_fetch(Request::get(url("/"))).await;

        assert_eq!(outcome.source(), "cache");
        assert_eq!(network.calls(), before);
        assert_eq!(outcome.into_response().unwrap().into_body().as_ref(), b"shell");
    }

    #[tokio::test]
    async fn test_same_origin_200_is_stored() {
        let storage = Arc::new(MemoryStorage::new());
        let network = Arc::new(StubNetwork::new().route("/app.js", 200, "console.log('hi')"));
        let agent = agent_with(storage.clone(), network);

        let outcome = agent.handle_fetch(Request::get(url("/app.js"))).await;
        assert_eq!(outcome.source(), "network");
        let response = settle(outcome).await.unwrap();

        let stored = storage
            .match_in(agent.generation(), &RequestKey::get(url("/app.js").to_string()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, response.status);
        assert_eq!(stored.kind, ResponseKind::Basic);
        assert_eq!(stored.body, response.into_body());
    }

    #[tokio::test]
    async fn test_response_returned_before_write_lands() {
        let inner = MemoryStorage::new();
        let gate = Arc::new(Notify::new());
        let storage = Arc::new(GatedStorage { inner: inner.clone(), gate: gate.clone() });
        let network = Arc::new(StubNetwork::new().route("/app.js", 200, "console.log('hi')"));
        let agent = agent_with(storage, network);

        let outcome = agent.handle_fetch(Request::get(url("/app.js"))).await;

        let FetchOutcome::Network { response, write: Some(write) } = outcome else {
            panic!("expected a network response with a pending write");
        };
        assert_eq!(response.into_body().as_ref(), b"console.log('hi')");
        assert!(!write.is_finished());
        assert!(inner.is_empty().await);

        gate.notify_one();
        write.await.unwrap();

        let key = RequestKey::get(url("/app.js").to_string());
        assert!(inner.match_in(agent.generation(), &key).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_opaque_is_returned_but_not_stored() {
        let storage = Arc::new(MemoryStorage::new());
        let network = Arc::new(StubNetwork::new().route("https://unpkg.com/lucide@latest", 200, "lucide"));
        let agent = agent_with(storage.clone(), network);

        let request = Request::get(url("https://unpkg.com/lucide@latest")).with_mode(RequestMode::NoCors);
        let outcome = agent.handle_fetch(request).await;

        match &outcome {
            FetchOutcome::Network { response, write } => {
                assert_eq!(response.kind, ResponseKind::Opaque);
                assert!(write.is_none());
            }
            other => panic!("expected network response, got {}", other.source()),
        }
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_cors_is_returned_but_not_stored() {
        let storage = Arc::new(MemoryStorage::new());
        let network = Arc::new(StubNetwork::new().route("https://cdn.tailwindcss.com", 200, "tw"));
        let agent = agent_with(storage.clone(), network);

        let outcome = agent.handle_fetch(Request::get(url("https://cdn.tailwindcss.com"))).await;

        assert_eq!(outcome.response().unwrap().kind, ResponseKind::Cors);
        assert!(settle(outcome).await.is_some());
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_same_origin_404_is_returned_unchanged() {
        let storage = Arc::new(MemoryStorage::new());
        let network = Arc::new(StubNetwork::new().route("/missing", 404, "nope"));
        let agent = agent_with(storage.clone(), network.clone());

        let response = settle(agent.handle_fetch(Request::get(url("/missing"))).await).await.unwrap();

        assert_eq!(response.status, 404);
        assert!(storage.is_empty().await);

        agent.handle_fetch(Request::get(url("/missing"))).await;
        assert_eq!(network.calls_for("/missing"), 2);
    }

    #[tokio::test]
    async fn test_redirected_response_is_not_stored() {
        let storage = Arc::new(MemoryStorage::new());
        let network = Arc::new(StubNetwork::new().redirect("/editor", "/editor/", "<html>"));
        let agent = agent_with(storage.clone(), network);

        let response = settle(agent.handle_fetch(Request::get(url("/editor"))).await).await.unwrap();

        assert!(response.redirected);
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_network_failure_is_unanswered() {
        let storage = Arc::new(MemoryStorage::new());
        let network = Arc::new(StubNetwork::new().fail("/api/draft"));
        let agent = agent_with(storage.clone(), network);

        let outcome = agent.handle_fetch(Request::get(url("/api/draft"))).await;

        assert!(matches!(outcome, FetchOutcome::Unanswered));
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_offline_after_population_serves_from_cache() {
        let storage = Arc::new(MemoryStorage::new());
        let network = Arc::new(StubNetwork::new().route("/style.css", 200, "body{}"));
        let agent = agent_with(storage.clone(), network.clone());

        settle(agent.handle_fetch(Request::get(url("/style.css"))).await).await;
        network.set_offline(true);
        let calls_online = network.calls();

        for _ in 0..2 {
            let outcome = agent.handle_fetch(Request::get(url("/style.css"))).await;
            assert_eq!(outcome.source(), "cache");
            assert_eq!(outcome.into_response().unwrap().into_body().as_ref(), b"body{}");
        }
        assert_eq!(network.calls(), calls_online);
    }

    #[tokio::test]
    async fn test_post_is_passed_to_network_and_write_is_dropped() {
        let storage = Arc::new(MemoryStorage::new());
        let network = Arc::new(StubNetwork::new().route("/save", 200, "saved"));
        let agent = agent_with(storage.clone(), network);

        let request = Request::get(url("/save")).with_method(Method::POST).with_body("draft");
        let response = settle(agent.handle_fetch(request).await).await.unwrap();

        assert_eq!(response.status, 200);
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_ignores_other_generations() {
        let storage = Arc::new(MemoryStorage::new());
        let network = Arc::new(StubNetwork::new().route("/", 200, "fresh"));
        let old = agent_with(storage.clone(), network.clone()).with_generation("urdu-text-editor-v0");
        let current = agent_with(storage.clone(), network.clone());
        settle(old.handle_fetch(Request::get(url("/"))).await).await;

        let outcome = current.handle_fetch(Request::get(url("/"))).await;

        assert_eq!(outcome.source(), "network");
        assert_eq!(network.calls_for("/"), 2);
    }

    #[tokio::test]
    async fn test_round_trip_through_sqlite() {
        let storage = Arc::new(CacheDb::open_in_memory().await.unwrap());
        let network = Arc::new(StubNetwork::new().route("/index.html", 200, "<html>index</html>"));
        let agent = agent_with(storage, network.clone());

        settle(agent.handle_fetch(Request::get(url("/index.html"))).await).await;
        let outcome = agent.handle_fetch(Request::get(url("/index.html"))).await;

        assert_eq!(outcome.source(), "cache");
        assert_eq!(network.calls_for("/index.html"), 1);
    }
}
