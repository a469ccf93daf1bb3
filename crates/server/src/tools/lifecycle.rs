//! sw_install and sw_activate tool implementations.
//!
//! Each call delivers one lifecycle signal and answers once the agent's
//! pending operation has settled.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use scribe_client::{CacheAgent, LifecycleSignal, SignalOutcome};

use super::json_result;

/// Deliver the install signal and report which manifest entries were cached.
pub async fn install_impl(agent: &CacheAgent) -> Result<CallToolResult, McpError> {
    match agent.dispatch(LifecycleSignal::Install).await {
        SignalOutcome::Installed(report) => json_result(&report),
        other => Err(unexpected(other)),
    }
}

/// Deliver the activate signal and report which stale buckets were removed.
pub async fn activate_impl(agent: &CacheAgent) -> Result<CallToolResult, McpError> {
    match agent.dispatch(LifecycleSignal::Activate).await {
        SignalOutcome::Activated(report) => json_result(&report),
        other => Err(unexpected(other)),
    }
}

fn unexpected(outcome: SignalOutcome) -> McpError {
    McpError::internal_error(format!("unexpected signal outcome: {outcome:?}"), None)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::tools::test_support::{agent, output_json};
    use scribe_core::{CacheStorage, MemoryStorage};

    #[tokio::test]
    async fn test_install_impl_reports_stored_entries() {
        let storage = Arc::new(MemoryStorage::new());
        let agent = agent(storage.clone(), false);

        let result = install_impl(&agent).await.unwrap();
        let output = output_json(&result);

        assert_eq!(output["generation"], agent.generation());
        assert_eq!(output["stored"].as_array().unwrap().len(), 2);
        assert!(output["failed"].as_array().unwrap().is_empty());
        assert_eq!(storage.len().await, 2);
    }

    #[tokio::test]
    async fn test_install_impl_offline_still_succeeds() {
        let storage = Arc::new(MemoryStorage::new());
        let agent = agent(storage.clone(), true);

        let result = install_impl(&agent).await.unwrap();
        let output = output_json(&result);

        assert_eq!(output["failed"].as_array().unwrap().len(), 2);
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_activate_impl_deletes_stale_buckets() {
        let storage = Arc::new(MemoryStorage::new());
        storage.open("urdu-text-editor-v0").await.unwrap();
        let agent = agent(storage.clone(), false);
        storage.open(agent.generation()).await.unwrap();

        let result = activate_impl(&agent).await.unwrap();
        let output = output_json(&result);

        assert_eq!(output["deleted"][0], "urdu-text-editor-v0");
        assert_eq!(storage.keys().await.unwrap(), vec![agent.generation().to_string()]);
    }
}
