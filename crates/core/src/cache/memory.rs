//! In-process cache storage.
//!
//! Holds buckets in a `Vec` to keep creation order, guarded by a tokio
//! RwLock so concurrent agent tasks can share one instance.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::response::{RequestKey, StoredResponse};
use super::storage::CacheStorage;
use crate::Error;

#[derive(Debug, Default)]
struct Bucket {
    name: String,
    entries: HashMap<RequestKey, StoredResponse>,
    order: Vec<RequestKey>,
}

/// Cache storage that lives only as long as the process.
///
/// Cloning shares the underlying buckets.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    buckets: Arc<RwLock<Vec<Bucket>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries across all buckets.
    pub async fn len(&self) -> usize {
        self.buckets.read().await.iter().map(|b| b.entries.len()).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheStorage for MemoryStorage {
    async fn open(&self, name: &str) -> Result<(), Error> {
        let mut buckets = self.buckets.write().await;
        if !buckets.iter().any(|b| b.name == name) {
            buckets.push(Bucket { name: name.to_string(), ..Default::default() });
        }
        Ok(())
    }

    async fn match_in(&self, name: &str, key: &RequestKey) -> Result<Option<StoredResponse>, Error> {
        let buckets = self.buckets.read().await;
        Ok(buckets
            .iter()
            .find(|b| b.name == name)
            .and_then(|b| b.entries.get(key))
            .cloned())
    }

    async fn match_any(&self, key: &RequestKey) -> Result<Option<StoredResponse>, Error> {
        let buckets = self.buckets.read().await;
        Ok(buckets.iter().find_map(|b| b.entries.get(key)).cloned())
    }

    async fn put(&self, name: &str, key: &RequestKey, response: &StoredResponse) -> Result<(), Error> {
        if !key.is_get() {
            return Err(Error::UnsupportedMethod(key.method.clone()));
        }

        let mut buckets = self.buckets.write().await;
        let bucket = buckets
            .iter_mut()
            .find(|b| b.name == name)
            .ok_or_else(|| Error::BucketNotFound(name.to_string()))?;

        if bucket.entries.insert(key.clone(), response.clone()).is_none() {
            bucket.order.push(key.clone());
        }
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, Error> {
        Ok(self.buckets.read().await.iter().map(|b| b.name.clone()).collect())
    }

    async fn delete(&self, name: &str) -> Result<bool, Error> {
        let mut buckets = self.buckets.write().await;
        let before = buckets.len();
        buckets.retain(|b| b.name != name);
        Ok(buckets.len() != before)
    }

    async fn entries(&self, name: &str) -> Result<Vec<RequestKey>, Error> {
        let buckets = self.buckets.read().await;
        Ok(buckets
            .iter()
            .find(|b| b.name == name)
            .map(|b| b.order.clone())
            .unwrap_or_default())
    }
}
