//! Activate handler: removes buckets left by earlier generations.

use futures_util::future::join_all;
use serde::Serialize;

use super::CacheAgent;

/// Outcome of one activation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivateReport {
    /// The generation that stays.
    pub kept: String,
    pub deleted: Vec<String>,
    /// Stale buckets whose deletion was rejected.
    pub failed: Vec<String>,
}

impl CacheAgent {
    /// Handle the activate signal.
    ///
    /// Every bucket whose name differs from the current generation is deleted;
    /// deletions run concurrently and a rejected one does not stop the others.
    pub async fn activate(&self) -> ActivateReport {
        let mut report = ActivateReport { kept: self.generation.clone(), ..Default::default() };

        let names = match self.storage.keys().await {
            Ok(names) => names,
            Err(e) => {
                tracing::error!(error = %e, "Failed to enumerate caches during activate");
                return report;
            }
        };

        let stale: Vec<String> = names.into_iter().filter(|name| *name != self.generation).collect();
        let results = join_all(stale.iter().map(|name| self.storage.delete(name))).await;

        for (name, result) in stale.into_iter().zip(results) {
            match result {
                Ok(true) => {
                    tracing::info!(cache = %name, "Deleted stale cache");
                    report.deleted.push(name);
                }
                Ok(false) => tracing::debug!(cache = %name, "stale cache already gone"),
                Err(e) => {
                    tracing::warn!(cache = %name, error = %e, "Failed to delete stale cache");
                    report.failed.push(name);
                }
            }
        }

        report
    }
}
