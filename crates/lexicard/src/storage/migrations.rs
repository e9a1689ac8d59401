//! Schema versioning for the card database.
//!
//! The version lives under `schema_version` in the `metadata` table. Each
//! entry in [`MIGRATIONS`] upgrades the schema by one step and runs in its
//! own transaction together with the version bump.

use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::error::{Error, Result};

use super::schema::SCHEMA_STATEMENTS;

/// Schema version this build reads and writes.
pub const CURRENT_VERSION: i32 = 1;

const VERSION_KEY: &str = "schema_version";

struct Migration {
    version: i32,
    description: &'static str,
    apply: fn(&Connection) -> Result<()>,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "cards table with owner/created index",
    apply: base_schema,
}];

/// The base tables come from `SCHEMA_STATEMENTS`; nothing to change.
fn base_schema(_conn: &Connection) -> Result<()> {
    Ok(())
}

/// Create missing tables, then bring an older database up to
/// [`CURRENT_VERSION`].
///
/// # Errors
///
/// Fails if a statement fails, the stored version is unreadable, or the
/// database was written by a newer build.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    let stored = stored_version(conn)?;
    if stored > CURRENT_VERSION {
        return Err(migration_error(format!(
            "database schema version {stored} is newer than supported version {CURRENT_VERSION}"
        )));
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > stored) {
        let tx = conn.unchecked_transaction()?;
        (migration.apply)(&tx)?;
        write_version(&tx, migration.version)?;
        tx.commit()?;
        info!(
            "Applied schema migration v{}: {}",
            migration.version, migration.description
        );
    }

    Ok(())
}

/// Stored schema version; 0 for a database that never recorded one.
fn stored_version(conn: &Connection) -> Result<i32> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match raw {
        None => Ok(0),
        Some(value) => value
            .parse()
            .map_err(|_| migration_error(format!("invalid schema version: {value}"))),
    }
}

fn write_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT INTO metadata (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        (VERSION_KEY, version.to_string()),
    )?;
    Ok(())
}

fn migration_error(message: String) -> Error {
    Error::DatabaseMigration { message }
}
