//! The cache storage capability.

use async_trait::async_trait;

use super::connection::CacheDb;
use super::response::{RequestKey, StoredResponse};
use crate::Error;

/// Named buckets of request → response pairs.
///
/// Every operation is asynchronous and independent; writes to the same key
/// from concurrent tasks are not serialised, the last one to land wins.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Create the bucket if it does not exist yet.
    async fn open(&self, name: &str) -> Result<(), Error>;

    /// Look up a request in one bucket.
    async fn match_in(&self, name: &str, key: &RequestKey) -> Result<Option<StoredResponse>, Error>;

    /// Look up a request across all buckets, oldest bucket first.
    async fn match_any(&self, key: &RequestKey) -> Result<Option<StoredResponse>, Error>;

    /// Store a response under a request identity.
    ///
    /// Fails with `BucketNotFound` if the bucket was never opened and with
    /// `UnsupportedMethod` for non-GET requests.
    async fn put(&self, name: &str, key: &RequestKey, response: &StoredResponse) -> Result<(), Error>;

    /// Bucket names in creation order.
    async fn keys(&self) -> Result<Vec<String>, Error>;

    /// Delete a bucket and all of its entries. Returns whether it existed.
    async fn delete(&self, name: &str) -> Result<bool, Error>;

    /// Request identities stored in one bucket.
    async fn entries(&self, name: &str) -> Result<Vec<RequestKey>, Error>;
}

#[async_trait]
impl CacheStorage for CacheDb {
    async fn open(&self, name: &str) -> Result<(), Error> {
        self.open_bucket(name).await
    }

    async fn match_in(&self, name: &str, key: &RequestKey) -> Result<Option<StoredResponse>, Error> {
        self.get_entry(name, key).await
    }

    async fn match_any(&self, key: &RequestKey) -> Result<Option<StoredResponse>, Error> {
        self.find_entry(key).await
    }

    async fn put(&self, name: &str, key: &RequestKey, response: &StoredResponse) -> Result<(), Error> {
        if !key.is_get() {
            return Err(Error::UnsupportedMethod(key.method.clone()));
        }
        self.upsert_entry(name, key, response).await
    }

    async fn keys(&self) -> Result<Vec<String>, Error> {
        self.bucket_names().await
    }

    async fn delete(&self, name: &str) -> Result<bool, Error> {
        self.delete_bucket(name).await
    }

    async fn entries(&self, name: &str) -> Result<Vec<RequestKey>, Error> {
        self.list_entries(name).await
    }
}
