//! Core types and shared functionality for scribe-sw.
//!
//! This crate provides:
//! - Cache storage capability with SQLite and in-memory backends
//! - The build-time manifest and cache generation name
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod manifest;

pub use cache::{CacheDb, CacheStorage, MemoryStorage, RequestKey, ResponseKind, StoredResponse};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use manifest::{CACHE_NAME, MANIFEST};
