//! Record store contract and implementations.
//!
//! # Responsibility
//! - Persist the whole application collection as one serialized value.
//! - Keep storage details out of service orchestration.
//!
//! # Invariants
//! - `save` overwrites prior contents entirely; there are no partial writes.
//! - `load` returns an empty collection when nothing is stored.
//! - Read paths reject invalid persisted data instead of masking it.

use crate::config::TrackerConfig;
use crate::db::DbError;
use crate::model::application::JobApplication;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key the collection is written under.
pub const DEFAULT_STORAGE_KEY: &str = "job-applications";

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence failure surfaced to callers of the record store.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Serialization(serde_json::Error),
    /// Stored value exists but does not decode into a valid collection.
    InvalidData(String),
    /// Backend refused the write (quota, read-only medium, injected failure).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "failed to serialize applications: {err}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted application data: {message}")
            }
            Self::Unavailable(message) => write!(f, "record store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidData(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Whole-collection persistence used by the application service.
pub trait ApplicationStore {
    fn load(&self) -> StoreResult<Vec<JobApplication>>;
    fn save(&mut self, applications: &[JobApplication]) -> StoreResult<()>;
    fn clear(&mut self) -> StoreResult<()>;
}

impl<S: ApplicationStore + ?Sized> ApplicationStore for &mut S {
    fn load(&self) -> StoreResult<Vec<JobApplication>> {
        (**self).load()
    }

    fn save(&mut self, applications: &[JobApplication]) -> StoreResult<()> {
        (**self).save(applications)
    }

    fn clear(&mut self) -> StoreResult<()> {
        (**self).clear()
    }
}

/// Encodes a collection as the stored JSON array.
pub fn encode_applications(applications: &[JobApplication]) -> StoreResult<String> {
    serde_json::to_string(applications).map_err(StoreError::Serialization)
}

/// Decodes a stored JSON array and re-checks record invariants.
pub fn decode_applications(raw: &str) -> StoreResult<Vec<JobApplication>> {
    let applications: Vec<JobApplication> = serde_json::from_str(raw).map_err(|err| {
        StoreError::InvalidData(format!("stored value is not a record array: {err}"))
    })?;

    for application in &applications {
        application.validate().map_err(|err| {
            StoreError::InvalidData(format!("record {}: {err}", application.id))
        })?;
    }

    Ok(applications)
}

/// In-process store holding the serialized collection text.
///
/// Keeps the encoded form rather than live records so encode/decode failures
/// behave exactly like a persistent backend.
#[derive(Debug, Default)]
pub struct MemoryApplicationStore {
    value: Option<String>,
    fail_next_save: Option<String>,
    save_count: usize,
}

impl MemoryApplicationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with raw stored text.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            value: Some(raw.into()),
            ..Self::default()
        }
    }

    /// Makes the next `save` fail with `StoreError::Unavailable(reason)`.
    pub fn fail_next_save(&mut self, reason: impl Into<String>) {
        self.fail_next_save = Some(reason.into());
    }

    /// Raw stored text, if any.
    pub fn raw(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Number of successful saves since creation.
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl ApplicationStore for MemoryApplicationStore {
    fn load(&self) -> StoreResult<Vec<JobApplication>> {
        match self.value.as_deref() {
            Some(raw) => decode_applications(raw),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, applications: &[JobApplication]) -> StoreResult<()> {
        if let Some(reason) = self.fail_next_save.take() {
            return Err(StoreError::Unavailable(reason));
        }
        self.value = Some(encode_applications(applications)?);
        self.save_count += 1;
        Ok(())
    }

    fn clear(&mut self) -> StoreResult<()> {
        self.value = None;
        Ok(())
    }
}

/// SQLite-backed key-value store.
///
/// The collection lives as one JSON text value under `key` in `kv_store`.
pub struct SqliteApplicationStore<'conn> {
    conn: &'conn Connection,
    key: String,
}

impl<'conn> SqliteApplicationStore<'conn> {
    /// Creates a store using [`DEFAULT_STORAGE_KEY`].
    pub fn new(conn: &'conn Connection) -> Self {
        Self::with_key(conn, DEFAULT_STORAGE_KEY)
    }

    /// Creates a store under `config.storage_key`.
    pub fn from_config(conn: &'conn Connection, config: &TrackerConfig) -> Self {
        Self::with_key(conn, config.storage_key.clone())
    }

    pub fn with_key(conn: &'conn Connection, key: impl Into<String>) -> Self {
        Self {
            conn,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn read_raw(&self) -> StoreResult<Option<String>> {
        let raw = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [self.key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(raw)
    }
}

impl ApplicationStore for SqliteApplicationStore<'_> {
    fn load(&self) -> StoreResult<Vec<JobApplication>> {
        match self.read_raw()? {
            Some(raw) => decode_applications(&raw),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, applications: &[JobApplication]) -> StoreResult<()> {
        let encoded = encode_applications(applications)?;
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![self.key.as_str(), encoded],
        )?;
        Ok(())
    }

    fn clear(&mut self) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [self.key.as_str()])?;
        Ok(())
    }
}
