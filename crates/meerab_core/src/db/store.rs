//! Shared document store handle.
//!
//! # Responsibility
//! - Own the single store connection for the process lifetime.
//! - Represent the degraded store-less state explicitly.
//! - Serialize access to the connection across request workers.
//!
//! # Invariants
//! - A `Store` is created once by the entry point and cloned into callers.
//! - `connect` never panics and never retries; failures degrade the handle.
//! - Closing only tears down the connection once no other clone is alive.
//! - A panic inside `with_conn` does not disable the store for later callers.

use super::open::{open_location, parse_store_uri, StoreLocation};
use super::{DbError, DbResult};
use log::{error, info, warn};
use rusqlite::Connection;
use std::sync::{Arc, Mutex, PoisonError};

/// Cloneable handle to the process-wide document store.
#[derive(Clone)]
pub struct Store {
    state: Arc<StoreState>,
}

enum StoreState {
    Connected {
        conn: Mutex<Connection>,
        location: StoreLocation,
    },
    Unavailable(String),
}

impl Store {
    /// Connects using a configuration-supplied connection string.
    ///
    /// A missing or unusable `uri` is logged and yields a store-less handle
    /// whose operations all fail with `DbError::Unavailable`.
    pub fn connect(uri: Option<&str>) -> Self {
        let Some(uri) = uri else {
            error!(
                "event=store_connect module=db status=error error_code=store_uri_missing"
            );
            return Self::unavailable("store connection string is not configured");
        };

        let location = match parse_store_uri(uri) {
            Ok(location) => location,
            Err(err) => {
                error!(
                    "event=store_connect module=db status=error error_code=store_uri_invalid error={err}"
                );
                return Self::unavailable(err.to_string());
            }
        };

        match Self::open(location) {
            Ok(store) => {
                info!("event=store_connect module=db status=ok");
                store
            }
            Err(err) => {
                error!(
                    "event=store_connect module=db status=error error_code=store_open_failed error={err}"
                );
                Self::unavailable(err.to_string())
            }
        }
    }

    /// Opens a store at a known location, propagating failures.
    pub fn open(location: StoreLocation) -> DbResult<Self> {
        let conn = open_location(&location)?;
        Ok(Self {
            state: Arc::new(StoreState::Connected {
                conn: Mutex::new(conn),
                location,
            }),
        })
    }

    /// Opens a private in-memory store.
    pub fn in_memory() -> DbResult<Self> {
        Self::open(StoreLocation::Memory)
    }

    /// Builds a store-less handle that fails every operation with `reason`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: Arc::new(StoreState::Unavailable(reason.into())),
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(*self.state, StoreState::Connected { .. })
    }

    /// Returns the opened location, or `None` for a store-less handle.
    pub fn location(&self) -> Option<&StoreLocation> {
        match &*self.state {
            StoreState::Connected { location, .. } => Some(location),
            StoreState::Unavailable(_) => None,
        }
    }

    /// Runs `op` with exclusive access to the connection.
    ///
    /// Blocks while another caller holds the connection; async callers must
    /// invoke this from a blocking-capable thread.
    pub fn with_conn<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<DbError>,
    {
        match &*self.state {
            StoreState::Connected { conn, .. } => {
                let guard = match conn.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => {
                        // A panicking caller leaves SQLite itself consistent.
                        warn!("event=store_lock module=db status=recovered reason=poisoned");
                        conn.clear_poison();
                        poisoned.into_inner()
                    }
                };
                op(&guard)
            }
            StoreState::Unavailable(reason) => Err(DbError::Unavailable(reason.clone()).into()),
        }
    }

    /// Tears down the connection if this is the last live handle.
    pub fn close(self) -> DbResult<()> {
        match Arc::try_unwrap(self.state) {
            Ok(StoreState::Connected { conn, .. }) => {
                let conn = conn.into_inner().unwrap_or_else(PoisonError::into_inner);
                conn.close().map_err(|(_, err)| DbError::Sqlite(err))?;
                info!("event=store_close module=db status=ok");
                Ok(())
            }
            Ok(StoreState::Unavailable(_)) => Ok(()),
            Err(_) => {
                warn!("event=store_close module=db status=skipped reason=handle_shared");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Store;
    use crate::db::DbError;

    #[test]
    fn missing_uri_yields_unavailable_store() {
        let store = Store::connect(None);
        assert!(!store.is_connected());

        let err = store
            .with_conn(|_| Ok::<_, DbError>(()))
            .expect_err("store-less handle must fail");
        assert!(matches!(err, DbError::Unavailable(_)));
    }

    #[test]
    fn memory_uri_connects() {
        let store = Store::connect(Some(":memory:"));
        assert!(store.is_connected());
        let count: i64 = store
            .with_conn(|conn| {
                conn.query_row("SELECT COUNT(*) FROM notices;", [], |row| row.get(0))
                    .map_err(DbError::from)
            })
            .unwrap();
        assert_eq!(count, 0);
        store.close().unwrap();
    }

    #[test]
    fn panic_inside_operation_does_not_disable_store() {
        let store = Store::in_memory().unwrap();

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            store.with_conn(|_| -> Result<(), DbError> { panic!("operation failed") })
        }));
        assert!(outcome.is_err());

        let count: i64 = store
            .with_conn(|conn| {
                conn.query_row("SELECT COUNT(*) FROM results;", [], |row| row.get(0))
                    .map_err(DbError::from)
            })
            .unwrap();
        assert_eq!(count, 0);
        store.close().unwrap();
    }
}
