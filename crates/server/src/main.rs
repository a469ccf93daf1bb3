//! scribe-sw host entry point.
//!
//! Boots the cache agent against SQLite storage and the reqwest network,
//! then serves lifecycle signals as MCP tools on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use scribe_client::{CacheAgent, FetchClient, FetchConfig};
use scribe_core::{AppConfig, CacheDb};
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let fetch_config = FetchConfig::from_app(&config)?;

    let storage = Arc::new(CacheDb::open(&config.db_path).await?);
    let network = Arc::new(FetchClient::new(fetch_config.clone())?);
    let agent = Arc::new(CacheAgent::new(fetch_config.scope, storage, network));

    tracing::info!(
        generation = agent.generation(),
        scope = %agent.scope(),
        db_path = %config.db_path.display(),
        "Starting scribe-sw host on stdio transport"
    );

    let handler = handler::ScribeSwServer::new(agent);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
