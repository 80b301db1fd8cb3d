//! Notice use-case service.
//!
//! # Responsibility
//! - Provide list/create/delete entry points for notices.
//! - Assign identity and creation time on create.
//!
//! # Invariants
//! - Lists are newest first and never paginated.
//! - Delete reports success whether or not a document matched.

use crate::model::notice::{Notice, NoticeFields};
use crate::model::timestamp::now_epoch_ms;
use crate::repo::notice_repo::NoticeRepository;
use crate::repo::parse_record_id;
use crate::service::ServiceResult;
use uuid::Uuid;

/// Notice service facade over repository implementations.
pub struct NoticeService<R: NoticeRepository> {
    repo: R,
}

impl<R: NoticeRepository> NoticeService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns every notice ordered by `createdAt` descending.
    pub fn list_notices(&self) -> ServiceResult<Vec<Notice>> {
        Ok(self.repo.list_notices()?)
    }

    /// Persists one notice and returns the stored record.
    pub fn create_notice(&self, fields: NoticeFields) -> ServiceResult<Notice> {
        let notice = Notice {
            id: Uuid::new_v4(),
            fields,
            created_at: now_epoch_ms(),
        };
        self.repo.insert_notice(&notice)?;
        Ok(notice)
    }

    /// Deletes a notice by identifier text.
    ///
    /// Returns whether a document was removed; a missing id is still `Ok`.
    ///
    /// # Errors
    /// - `RepoError::InvalidId` when `raw_id` is not a record id.
    pub fn delete_notice(&self, raw_id: &str) -> ServiceResult<bool> {
        let id = parse_record_id(raw_id)?;
        Ok(self.repo.delete_notice(id)?)
    }
}
