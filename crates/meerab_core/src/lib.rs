//! Core domain logic for the Meerab Institute website backend.
//! This crate owns the document store, record shapes and use-case services;
//! it has no knowledge of HTTP.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{DbError, DbResult, Store, StoreLocation};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::fields::FieldsError;
pub use model::notice::{Notice, NoticeFields, NoticeId};
pub use model::result::{ExamResult, ResultFields, ResultId};
pub use model::RecordId;
pub use repo::notice_repo::{NoticeRepository, SqliteNoticeRepository};
pub use repo::result_repo::{ResultRepository, SqliteResultRepository};
pub use repo::{RepoError, RepoResult};
pub use service::notice_service::NoticeService;
pub use service::result_service::ResultService;
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
