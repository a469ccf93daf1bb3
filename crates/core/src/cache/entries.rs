//! Entry read/write operations.
//!
//! Entries are keyed by bucket and request-identity hash. Writes use UPSERT
//! semantics so repeated stores of the same identity overwrite each other.

use super::connection::CacheDb;
use super::response::{RequestKey, StoredResponse};
use crate::Error;
use bytes::Bytes;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

const ENTRY_COLUMNS: &str =
    "e.url, e.status, e.status_text, e.kind, e.redirected, e.headers_json, e.body, e.stored_at";

fn read_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEntry> {
    Ok(RawEntry {
        url: row.get(0)?,
        status: row.get(1)?,
        status_text: row.get(2)?,
        kind: row.get(3)?,
        redirected: row.get::<_, i32>(4)? == 1,
        headers_json: row.get(5)?,
        body: row.get(6)?,
        stored_at: row.get(7)?,
    })
}

/// Row shape before the kind and headers are decoded.
struct RawEntry {
    url: String,
    status: u16,
    status_text: String,
    kind: String,
    redirected: bool,
    headers_json: String,
    body: Vec<u8>,
    stored_at: String,
}

impl RawEntry {
    fn decode(self) -> Result<StoredResponse, Error> {
        Ok(StoredResponse {
            url: self.url,
            status: self.status,
            status_text: self.status_text,
            kind: self.kind.parse()?,
            redirected: self.redirected,
            headers: serde_json::from_str(&self.headers_json)?,
            body: Bytes::from(self.body),
            stored_at: self.stored_at,
        })
    }
}

impl CacheDb {
    /// Insert or replace the entry for a request identity.
    ///
    /// Fails with `BucketNotFound` if the bucket has not been opened.
    pub async fn upsert_entry(&self, bucket: &str, key: &RequestKey, response: &StoredResponse) -> Result<(), Error> {
        let bucket = bucket.to_string();
        let key = key.clone();
        let response = response.clone();
        let headers_json = serde_json::to_string(&response.headers)?;

        self.conn
            .call(move |conn| -> Result<(), Error> {
                let exists: bool =
                    conn.query_row("SELECT EXISTS(SELECT 1 FROM buckets WHERE name = ?1)", params![bucket], |row| {
                        row.get(0)
                    })?;
                if !exists {
                    return Err(Error::BucketNotFound(bucket));
                }

                conn.execute(
                    "INSERT INTO entries (
                    bucket, key_hash, method, url, status, status_text,
                    kind, redirected, headers_json, body, stored_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                ON CONFLICT(bucket, key_hash) DO UPDATE SET
                    method = excluded.method,
                    url = excluded.url,
                    status = excluded.status,
                    status_text = excluded.status_text,
                    kind = excluded.kind,
                    redirected = excluded.redirected,
                    headers_json = excluded.headers_json,
                    body = excluded.body,
                    stored_at = excluded.stored_at",
                    params![
                        &bucket,
                        key.hash(),
                        &key.method,
                        &key.url,
                        response.status,
                        &response.status_text,
                        response.kind.as_str(),
                        response.redirected as i32,
                        &headers_json,
                        response.body.as_ref(),
                        &response.stored_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Get the entry for a request identity in one bucket.
    ///
    /// Returns None if the bucket or the entry doesn't exist.
    pub async fn get_entry(&self, bucket: &str, key: &RequestKey) -> Result<Option<StoredResponse>, Error> {
        let bucket = bucket.to_string();
        let key_hash = key.hash();
        let raw = self
            .conn
            .call(move |conn| -> Result<Option<RawEntry>, Error> {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {ENTRY_COLUMNS} FROM entries e WHERE e.bucket = ?1 AND e.key_hash = ?2"
                ))?;

                match stmt.query_row(params![bucket, key_hash], read_entry) {
                    Ok(raw) => Ok(Some(raw)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        raw.map(RawEntry::decode).transpose()
    }

    /// Find the entry for a request identity in any bucket.
    ///
    /// Buckets are searched in creation order; the first hit wins.
    pub async fn find_entry(&self, key: &RequestKey) -> Result<Option<StoredResponse>, Error> {
        let key_hash = key.hash();
        let raw = self
            .conn
            .call(move |conn| -> Result<Option<RawEntry>, Error> {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {ENTRY_COLUMNS} FROM entries e
                    JOIN buckets b ON b.name = e.bucket
                    WHERE e.key_hash = ?1
                    ORDER BY b.rowid ASC
                    LIMIT 1"
                ))?;

                match stmt.query_row(params![key_hash], read_entry) {
                    Ok(raw) => Ok(Some(raw)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        raw.map(RawEntry::decode).transpose()
    }

    /// Request identities stored in a bucket, in first-insert order.
    ///
    /// Overwriting an entry keeps its position.
    pub async fn list_entries(&self, bucket: &str) -> Result<Vec<RequestKey>, Error> {
        let bucket = bucket.to_string();
        self.conn
            .call(move |conn| -> Result<Vec<RequestKey>, Error> {
                let mut stmt =
                    conn.prepare("SELECT method, url FROM entries WHERE bucket = ?1 ORDER BY rowid ASC")?;
                let keys = stmt
                    .query_map(params![bucket], |row| Ok(RequestKey { method: row.get(0)?, url: row.get(1)? }))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(keys)
            })
            .await
            .map_err(Error::from)
    }
}
