//! Snapshot schema bootstrap and checks.
//!
//! A snapshot file carries a single schema version in `PRAGMA user_version`.
//! A blank file (version 0) gets the tables created. A file stamped with the
//! current version must still hold every snapshot table.

use super::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// Schema version written by this crate.
pub const SCHEMA_VERSION: u32 = 1;

/// Tables a usable snapshot file must contain.
pub const SNAPSHOT_TABLES: [&str; 4] = ["categories", "priorities", "tasks", "id_counters"];

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Creates the snapshot tables on a blank file, or checks an existing one.
pub(crate) fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    match schema_version(conn)? {
        0 => create_schema(conn),
        SCHEMA_VERSION => match missing_tables(conn)?.first() {
            Some(table) => Err(DbError::MissingTable(table)),
            None => Ok(()),
        },
        found => Err(DbError::UnsupportedSchemaVersion {
            found,
            supported: SCHEMA_VERSION,
        }),
    }
}

fn create_schema(conn: &mut Connection) -> DbResult<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA_SQL)?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;
    info!("event=snapshot_schema module=db status=created version={SCHEMA_VERSION}");
    Ok(())
}

/// Reads the schema version stamp of an open snapshot file.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Snapshot tables absent from `conn`, in `SNAPSHOT_TABLES` order.
pub fn missing_tables(conn: &Connection) -> DbResult<Vec<&'static str>> {
    let mut stmt =
        conn.prepare("SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);")?;
    let mut missing = Vec::new();
    for table in SNAPSHOT_TABLES {
        if !stmt.query_row([table], |row| row.get::<_, bool>(0))? {
            missing.push(table);
        }
    }
    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::{ensure_schema, missing_tables, schema_version, SCHEMA_VERSION};
    use crate::db::DbError;
    use rusqlite::Connection;

    #[test]
    fn blank_connection_gets_every_table() {
        let mut conn = Connection::open_in_memory().unwrap();
        ensure_schema(&mut conn).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(missing_tables(&conn).unwrap().is_empty());

        // Second pass is a check only.
        ensure_schema(&mut conn).unwrap();
    }

    #[test]
    fn stamped_file_without_tables_is_rejected() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", SCHEMA_VERSION).unwrap();

        let err = ensure_schema(&mut conn).unwrap_err();
        assert!(matches!(err, DbError::MissingTable("categories")));
    }
}
