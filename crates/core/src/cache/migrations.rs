//! Storage schema migrations.
//!
//! Applied versions are recorded in `_migrations`; each pending SQL batch runs
//! once, in order, and the schema files themselves are idempotent.

use std::num::ParseIntError;

use super::Error;
use tokio_rusqlite::{Connection, params};

/// Migration list: (version, SQL).
const MIGRATIONS: &[(&str, &str)] = &[("1", include_str!("../../migrations/001_buckets.sql"))];

/// Apply every migration newer than the recorded schema version.
///
/// # Errors
///
/// Returns an error if a migration SQL fails to execute or a version
/// number cannot be parsed.
pub async fn run(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            )",
            [],
        )?;

        let current: i64 =
            conn.query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |row| row.get(0))?;

        for (version, sql) in MIGRATIONS {
            let version_num: i64 = version
                .parse()
                .map_err(|e: ParseIntError| Error::MigrationFailed(e.to_string()))?;
            if version_num <= current {
                continue;
            }

            conn.execute_batch(sql)
                .map_err(|e| Error::MigrationFailed(format!("version {version_num}: {e}")))?;
            conn.execute(
                "INSERT INTO _migrations (version, applied_at) VALUES (?1, ?2)",
                params![version_num, chrono::Utc::now().to_rfc3339()],
            )?;
            tracing::debug!(version = version_num, "applied storage migration");
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}
