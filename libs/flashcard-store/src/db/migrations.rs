//! Schema versioning and upgrade.
//!
//! The stored version lives in `PRAGMA user_version`. A fresh file reports 0.
//! Steps are applied in ascending order, each inside the same transaction as
//! the version bump, so a failed step leaves the previous version in place.
//! Foreign key enforcement is suspended while steps run, since rebuilding a
//! table means dropping a parent that child rows still point at.

use rusqlite::Connection;
use serde::Deserialize;
use tracing::{info, warn};

use super::error::StoreError;
use super::schema::{
    DECKS_TABLE, DROP_ALL, FLASHCARDS_TABLE, REBUILD_DECKS, REBUILD_FLASHCARDS, SCHEMA,
    SCHEMA_VERSION,
};

type Result<T> = std::result::Result<T, StoreError>;

/// How to bring an older database up to [`SCHEMA_VERSION`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradePolicy {
    /// Apply every pending migration step; existing rows are kept.
    #[default]
    Migrate,
    /// Drop all tables and create the current schema. Existing rows are lost.
    Recreate,
}

/// One versioned schema change.
#[derive(Clone, Copy)]
pub struct Migration {
    pub version: u32,
    pub apply: fn(&Connection) -> rusqlite::Result<()>,
}

/// Every migration step, oldest first. The last entry must match
/// [`SCHEMA_VERSION`].
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    apply: initial_schema,
}];

/// Version 1: create missing tables, and rebuild child tables written
/// before `belongs_to` carried a foreign key.
fn initial_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)?;
    for (table, rebuild) in [
        (DECKS_TABLE, REBUILD_DECKS),
        (FLASHCARDS_TABLE, REBUILD_FLASHCARDS),
    ] {
        if !has_foreign_key(conn, table)? {
            info!(table, "rebuilding table to add foreign key");
            conn.execute_batch(rebuild)?;
        }
    }
    Ok(())
}

fn has_foreign_key(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pragma_foreign_key_list(?1)",
        [table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Read the stored schema version.
pub fn user_version(conn: &Connection) -> Result<u32> {
    let version: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version)
}

/// Create the current schema. Safe to call on an initialized database.
pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA).map_err(|source| StoreError::Schema {
        version: SCHEMA_VERSION,
        source,
    })
}

/// Bring the database to [`SCHEMA_VERSION`] and return the version found
/// before any change.
pub fn upgrade(conn: &mut Connection, policy: UpgradePolicy) -> Result<u32> {
    let found = user_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(StoreError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }
    if found == SCHEMA_VERSION {
        return Ok(found);
    }

    match policy {
        UpgradePolicy::Migrate => migrate(conn, found)?,
        UpgradePolicy::Recreate => recreate(conn)?,
    }
    Ok(found)
}

/// Apply every step newer than `from`, in order.
pub fn migrate(conn: &mut Connection, from: u32) -> Result<()> {
    let enforced: bool = conn.pragma_query_value(None, "foreign_keys", |row| row.get(0))?;
    conn.pragma_update(None, "foreign_keys", false)?;
    let applied = apply_steps(conn, from);
    conn.pragma_update(None, "foreign_keys", enforced)?;
    applied?;

    let mut stmt = conn.prepare("PRAGMA foreign_key_check")?;
    let dangling = stmt.query_map([], |_| Ok(()))?.count();
    if dangling > 0 {
        warn!(dangling, "existing rows reference missing parents");
    }
    Ok(())
}

fn apply_steps(conn: &mut Connection, from: u32) -> Result<()> {
    for step in MIGRATIONS.iter().filter(|m| m.version > from) {
        let tx = conn.transaction()?;
        (step.apply)(&tx).map_err(|source| StoreError::Schema {
            version: step.version,
            source,
        })?;
        tx.pragma_update(None, "user_version", step.version)?;
        tx.commit()?;
        info!(from, to = step.version, "applied schema migration");
    }
    Ok(())
}

/// Drop all tables and recreate the current schema.
pub fn recreate(conn: &mut Connection) -> Result<()> {
    warn!(to = SCHEMA_VERSION, "recreating schema; existing rows are discarded");
    let tx = conn.transaction()?;
    tx.execute_batch(DROP_ALL)
        .and_then(|_| tx.execute_batch(SCHEMA))
        .map_err(|source| StoreError::Schema {
            version: SCHEMA_VERSION,
            source,
        })?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;
    Ok(())
}
