//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open the employee database from a file or in memory.
//! - Configure connection pragmas required by the store.
//! - Trigger schema migrations before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have migrations fully applied.

use super::migrations::apply_migrations;
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) an employee database file and applies pending migrations.
///
/// # Side effects
/// - Creates the file when it does not exist.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Opens a private in-memory employee database with the schema applied.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = connect().map_err(|err| {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
            started_at.elapsed().as_millis(),
            err
        );
        err
    })?;

    if let Err(err) = bootstrap_connection(&mut conn) {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={}",
            started_at.elapsed().as_millis(),
            err
        );
        return Err(err);
    }

    info!(
        "event=db_open module=db status=ok mode={mode} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)?;
    Ok(())
}
