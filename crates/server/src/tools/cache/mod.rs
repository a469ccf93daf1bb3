//! Cache-related MCP tools.
//!
//! These tools read and prune the storage the agent writes to, without
//! going through a lifecycle signal.

pub mod delete;
pub mod get;
pub mod keys;

pub use delete::{CacheDeleteParams, delete_impl};
pub use get::{CacheGetParams, get_impl};
pub use keys::keys_impl;
