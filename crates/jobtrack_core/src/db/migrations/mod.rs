//! Storage table migrations.
//!
//! The record format lives inside one JSON value, so the only schema is the
//! `kv_store` table itself. Versions still go through `PRAGMA user_version`
//! so a file written by a newer build is refused instead of overwritten.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

/// `(version, sql)` pairs in strictly increasing version order.
const MIGRATIONS: &[(u32, &str)] = &[(1, include_str!("0001_kv_store.sql"))];

/// Returns the latest storage version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |(version, _)| *version)
}

/// Creates or upgrades the storage table in one transaction.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file is newer than this binary.
/// - `Sqlite` when a statement fails; nothing is applied in that case.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let latest = latest_version();
    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }

    let pending: Vec<&(u32, &str)> = MIGRATIONS
        .iter()
        .filter(|(version, _)| *version > current)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, sql) in pending {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;
    Ok(())
}
