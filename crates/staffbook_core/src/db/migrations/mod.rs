//! Employee schema history.
//!
//! Version 1 creates `employees` with its unique email column and the
//! department index used by the grouping report. A file from an unversioned
//! release has `user_version = 0` and an `employees` table already;
//! the migration's `IF NOT EXISTS` clauses adopt it as-is.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_employees.sql"),
}];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings the employee schema up to [`latest_version`] in one transaction.
///
/// Fails with [`DbError::UnsupportedSchemaVersion`] for files written by a
/// newer build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS
        .iter()
        .filter(|migration| migration.version > current_version)
    {
        tx.execute_batch(migration.sql)?;
        tx.pragma_update(None, "user_version", migration.version)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        current_version, latest
    );
    Ok(())
}

/// Reads the schema version recorded on the connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
