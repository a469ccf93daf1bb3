//! Install handler: pre-caches the manifest.
//!
//! Population is best-effort. Each manifest entry is fetched and stored on
//! its own; a failed entry is logged and recorded in the report, and the
//! install still completes.

use futures_util::future::join_all;
use serde::Serialize;

use super::CacheAgent;
use crate::fetch::{Request, resolve};
use scribe_core::Error;

/// Outcome of one install.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InstallReport {
    pub generation: String,
    /// Manifest entries now present in the bucket, in manifest order.
    pub stored: Vec<String>,
    pub failed: Vec<ManifestFailure>,
}

impl InstallReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestFailure {
    pub entry: String,
    pub reason: String,
}

impl CacheAgent {
    /// Handle the install signal.
    pub async fn install(&self) -> InstallReport {
        let mut report = InstallReport { generation: self.generation.clone(), ..Default::default() };

        if let Err(e) = self.storage.open(&self.generation).await {
            tracing::error!(generation = %self.generation, error = %e, "Failed to open cache during install");
            report.failed = self
                .manifest
                .iter()
                .map(|entry| ManifestFailure { entry: entry.clone(), reason: e.to_string() })
                .collect();
            return report;
        }

        tracing::info!(generation = %self.generation, entries = self.manifest.len(), "Opened cache");

        let results = join_all(
            self.manifest
                .iter()
                .map(|entry| async move { (entry, self.precache(entry).await) }),
        )
        .await;

        for (entry, result) in results {
            match result {
                Ok(()) => report.stored.push(entry.clone()),
                Err(e) => {
                    tracing::error!(entry = %entry, error = %e, "Failed to cache resource during install");
                    report.failed.push(ManifestFailure { entry: entry.clone(), reason: e.to_string() });
                }
            }
        }

        tracing::info!(
            generation = %self.generation,
            stored = report.stored.len(),
            failed = report.failed.len(),
            "Install complete"
        );

        report
    }

    async fn precache(&self, entry: &str) -> Result<(), Error> {
        let url = resolve(&self.scope, entry).map_err(|e| Error::InvalidUrl(format!("{entry}: {e}")))?;
        let request = Request::get(url);

        let response = self.network.fetch(&request).await?;
        if !response.ok() {
            return Err(Error::HttpError(format!("status {} for {}", response.status, request.url)));
        }

        self.storage
            .put(&self.generation, &request.key(), &response.into_stored())
            .await
    }
}
