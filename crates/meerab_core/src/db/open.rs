//! Connection bootstrap utilities for the document store.
//!
//! # Responsibility
//! - Interpret store connection strings.
//! - Open file, URI or in-memory SQLite connections.
//! - Configure connection pragmas and trigger schema migrations before
//!   returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have migrations fully applied.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const MEMORY_URIS: &[&str] = &[":memory:", "sqlite::memory:", "sqlite://:memory:"];

/// Where the document store lives, as parsed from a connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// Private in-memory database, gone when the process exits.
    Memory,
    /// Plain filesystem path.
    File(PathBuf),
    /// SQLite `file:` URI, passed through with URI parsing enabled.
    Uri(String),
}

/// Parses a store connection string.
///
/// Accepts `:memory:`, `file:` URIs, `sqlite:`/`sqlite://` prefixed paths and
/// bare filesystem paths.
///
/// # Errors
/// - Returns `DbError::InvalidUri` for blank input or an empty path.
pub fn parse_store_uri(uri: &str) -> DbResult<StoreLocation> {
    let trimmed = uri.trim();
    if trimmed.is_empty() {
        return Err(DbError::InvalidUri(uri.to_string()));
    }
    if MEMORY_URIS.contains(&trimmed) {
        return Ok(StoreLocation::Memory);
    }
    if trimmed.starts_with("file:") {
        return Ok(StoreLocation::Uri(trimmed.to_string()));
    }

    let path = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);
    if path.is_empty() {
        return Err(DbError::InvalidUri(uri.to_string()));
    }

    Ok(StoreLocation::File(PathBuf::from(path)))
}

/// Opens a document store file and applies all pending migrations.
///
/// # Side effects
/// - Performs connection bootstrap and migration checks.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_location(&StoreLocation::File(path.as_ref().to_path_buf()))
}

/// Opens an in-memory document store and applies all pending migrations.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_location(&StoreLocation::Memory)
}

pub(crate) fn open_location(location: &StoreLocation) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = mode_label(location);
    info!("event=db_open module=db status=start mode={mode}");

    let opened = match location {
        StoreLocation::Memory => Connection::open_in_memory(),
        StoreLocation::File(path) => Connection::open(path),
        StoreLocation::Uri(uri) => Connection::open_with_flags(
            uri,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        ),
    };

    let mut conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn, location) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection, location: &StoreLocation) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    if *location != StoreLocation::Memory {
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;
    }
    apply_migrations(conn)?;
    Ok(())
}

fn mode_label(location: &StoreLocation) -> &'static str {
    match location {
        StoreLocation::Memory => "memory",
        StoreLocation::File(_) => "file",
        StoreLocation::Uri(_) => "uri",
    }
}
