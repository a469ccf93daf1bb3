//! The cache agent.
//!
//! Three lifecycle handlers share one cache generation name:
//!
//! - [`CacheAgent::install`] pre-caches the manifest into the current bucket
//! - [`CacheAgent::handle_fetch`] answers page requests cache-first
//! - [`CacheAgent::activate`] deletes buckets from earlier generations
//!
//! Storage and network are injected capabilities, so the same agent runs
//! against SQLite and reqwest in the host and against in-memory fakes in tests.

mod install;
mod intercept;
mod policy;
mod reap;
mod signal;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use scribe_core::{CACHE_NAME, CacheStorage, MANIFEST};
use url::Url;

use crate::fetch::Network;

pub use install::{InstallReport, ManifestFailure};
pub use intercept::FetchOutcome;
pub use policy::{Disposition, PassReason, disposition};
pub use reap::ActivateReport;
pub use signal::{LifecycleSignal, Pending, SignalKind, SignalOutcome};

/// Cache-first agent bound to one cache generation.
pub struct CacheAgent {
    generation: String,
    scope: Url,
    manifest: Vec<String>,
    storage: Arc<dyn CacheStorage>,
    network: Arc<dyn Network>,
}

impl CacheAgent {
    /// Agent for the compiled-in generation and manifest.
    pub fn new(scope: Url, storage: Arc<dyn CacheStorage>, network: Arc<dyn Network>) -> Self {
        Self {
            generation: CACHE_NAME.to_string(),
            scope,
            manifest: MANIFEST.iter().map(|entry| entry.to_string()).collect(),
            storage,
            network,
        }
    }

    /// Replace the generation name, e.g. for a newer agent version.
    pub fn with_generation(mut self, generation: impl Into<String>) -> Self {
        self.generation = generation.into();
        self
    }

    /// Replace the manifest. It stays fixed for the agent's lifetime.
    pub fn with_manifest<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.manifest = entries.into_iter().map(Into::into).collect();
        self
    }

    pub fn generation(&self) -> &str {
        &self.generation
    }

    pub fn scope(&self) -> &Url {
        &self.scope
    }

    pub fn manifest(&self) -> &[String] {
        &self.manifest
    }

    pub fn storage(&self) -> &Arc<dyn CacheStorage> {
        &self.storage
    }
}
