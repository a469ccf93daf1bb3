//! Cache storage capability and its backends.
//!
//! The agent never touches a concrete store directly; it depends on
//! [`CacheStorage`], which models named buckets of request → response
//! pairs. Two backends ship:
//!
//! - [`CacheDb`]: persistent SQLite storage via tokio-rusqlite (WAL mode,
//!   versioned migrations, cascade delete from bucket to entries)
//! - [`MemoryStorage`]: in-process storage for tests and ephemeral hosts

pub mod buckets;
pub mod connection;
pub mod entries;
pub mod hash;
pub mod memory;
pub mod migrations;
pub mod response;
pub mod storage;

pub use crate::Error;

pub use connection::CacheDb;
pub use memory::MemoryStorage;
pub use response::{RequestKey, ResponseKind, StoredResponse};
pub use storage::CacheStorage;
