//! Schema migrations for the document collections.
//!
//! # Responsibility
//! - Keep the ordered list of collection schema steps.
//! - Bring a connection up to the latest step inside one transaction.
//!
//! # Invariants
//! - Step versions start at 1 and increase by one.
//! - The applied version is mirrored to `PRAGMA user_version`.
//! - A store written by a newer binary is refused, never downgraded.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;
use std::time::Instant;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "collections",
        sql: include_str!("0001_collections.sql"),
    },
    Migration {
        version: 2,
        name: "result_lookup_index",
        sql: include_str!("0002_result_lookup_index.sql"),
    },
];

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the store is newer than this binary.
/// - `DbError::Sqlite` when a step fails; the whole upgrade is rolled back.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let pending = pending_after(current)?;
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in pending {
        let started_at = Instant::now();
        tx.execute_batch(migration.sql)?;
        tx.pragma_update(None, "user_version", migration.version)?;
        info!(
            "event=db_migrate module=db status=ok version={} name={} duration_ms={}",
            migration.version,
            migration.name,
            started_at.elapsed().as_millis()
        );
    }
    tx.commit()?;

    Ok(())
}

fn pending_after(current: u32) -> DbResult<&'static [Migration]> {
    let latest = latest_version();
    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }

    // Versions are contiguous from 1, so the pending tail starts at `current`.
    Ok(&MIGRATIONS[current as usize..])
}

#[cfg(test)]
mod tests {
    use super::{latest_version, pending_after, MIGRATIONS};
    use crate::db::DbError;

    #[test]
    fn versions_are_contiguous_from_one() {
        for (index, migration) in MIGRATIONS.iter().enumerate() {
            assert_eq!(migration.version as usize, index + 1, "{}", migration.name);
        }
    }

    #[test]
    fn pending_list_starts_after_current_version() {
        assert_eq!(pending_after(0).unwrap().len(), MIGRATIONS.len());
        assert_eq!(pending_after(1).unwrap()[0].name, "result_lookup_index");
        assert!(pending_after(latest_version()).unwrap().is_empty());
    }

    #[test]
    fn newer_store_is_refused() {
        assert!(matches!(
            pending_after(latest_version() + 1),
            Err(DbError::UnsupportedSchemaVersion { .. })
        ));
    }
}
