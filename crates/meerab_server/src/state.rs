use log::error;
use meerab_core::{
    NoticeService, ResultService, ServiceResult, SqliteNoticeRepository, SqliteResultRepository,
    Store,
};
use tokio::task::spawn_blocking;

use crate::error::AppError;

/// Shared handler state; cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Runs a notice use-case on the blocking pool.
    pub async fn notices<T, F>(&self, op: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: for<'c> FnOnce(NoticeService<SqliteNoticeRepository<'c>>) -> ServiceResult<T>
            + Send
            + 'static,
    {
        let store = self.store.clone();
        run_blocking(move || {
            store.with_conn(|conn| op(NoticeService::new(SqliteNoticeRepository::new(conn))))
        })
        .await
    }

    /// Runs a result use-case on the blocking pool.
    pub async fn results<T, F>(&self, op: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: for<'c> FnOnce(ResultService<SqliteResultRepository<'c>>) -> ServiceResult<T>
            + Send
            + 'static,
    {
        let store = self.store.clone();
        run_blocking(move || {
            store.with_conn(|conn| op(ResultService::new(SqliteResultRepository::new(conn))))
        })
        .await
    }
}

async fn run_blocking<T, F>(task: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
{
    match spawn_blocking(task).await {
        Ok(outcome) => outcome.map_err(AppError::from),
        Err(err) => {
            error!("event=store_task module=state status=error error={err}");
            Err(AppError::Internal(format!("store task failed: {err}")))
        }
    }
}
