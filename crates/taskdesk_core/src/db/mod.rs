//! SQLite snapshot files for the entity store.
//!
//! # Responsibility
//! - Open snapshot files and make sure they carry the snapshot schema.
//! - Export/import whole stores through `SnapshotDb`.
//!
//! # Invariants
//! - Rows are never read or written before the schema check passes.
//! - A file stamped with a newer schema version is refused untouched.

use crate::repo::RepoResult;
use crate::store::EntityStore;
use log::{error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::{Duration, Instant};

pub mod schema;
mod snapshot;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// File was written by a newer schema than this crate understands.
    UnsupportedSchemaVersion { found: u32, supported: u32 },
    /// File claims the current schema but lacks a snapshot table.
    MissingTable(&'static str),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "snapshot schema version {found} is newer than supported {supported}"
            ),
            Self::MissingTable(table) => write!(f, "snapshot file has no `{table}` table"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::MissingTable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Open snapshot file with a checked schema.
#[derive(Debug)]
pub struct SnapshotDb {
    conn: Connection,
}

impl SnapshotDb {
    /// Opens (creating when missing) a snapshot file.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Self::bootstrap("file", Connection::open(path))
    }

    /// Opens a private in-memory snapshot, mostly for tests.
    pub fn in_memory() -> DbResult<Self> {
        Self::bootstrap("memory", Connection::open_in_memory())
    }

    fn bootstrap(mode: &str, opened: rusqlite::Result<Connection>) -> DbResult<Self> {
        let started_at = Instant::now();
        let result = opened.map_err(DbError::from).and_then(|mut conn| {
            conn.busy_timeout(Duration::from_secs(5))?;
            schema::ensure_schema(&mut conn)?;
            Ok(Self { conn })
        });
        match &result {
            Ok(_) => info!(
                "event=snapshot_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=snapshot_open module=db status=error mode={mode} duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            ),
        }
        result
    }

    /// Replaces the file's contents with `store`.
    pub fn save(&mut self, store: &EntityStore) -> RepoResult<()> {
        snapshot::write_store(&mut self.conn, store)
    }

    /// Rebuilds a store from the file's contents.
    pub fn load(&self) -> RepoResult<EntityStore> {
        snapshot::read_store(&self.conn)
    }

    pub fn schema_version(&self) -> DbResult<u32> {
        schema::schema_version(&self.conn)
    }

    /// Raw connection, for inspection and repair.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
