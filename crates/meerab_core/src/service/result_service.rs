//! Exam result use-case service.
//!
//! # Responsibility
//! - Provide single create, bulk create and key search for results.
//!
//! # Invariants
//! - Callers map bulk input in full (`ResultFields::batch_from_json`) before
//!   the store is touched; a batch is then written in one transaction.
//! - Entries of one batch share a single creation timestamp.
//! - Search is read-only and exact on `(roll, examName)`.

use crate::model::result::{ExamResult, ResultFields};
use crate::model::timestamp::now_epoch_ms;
use crate::repo::result_repo::ResultRepository;
use crate::service::ServiceResult;
use uuid::Uuid;

/// Result service facade over repository implementations.
pub struct ResultService<R: ResultRepository> {
    repo: R,
}

impl<R: ResultRepository> ResultService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists one result and returns the stored record.
    pub fn create_result(&self, fields: ResultFields) -> ServiceResult<ExamResult> {
        let result = ExamResult {
            id: Uuid::new_v4(),
            fields,
            created_at: now_epoch_ms(),
        };
        self.repo.insert_result(&result)?;
        Ok(result)
    }

    /// Persists a batch of field sets and returns the inserted count.
    ///
    /// The batch is written in one transaction: a store failure rolls it
    /// back and nothing is kept.
    pub fn bulk_create_results(&self, batch: Vec<ResultFields>) -> ServiceResult<usize> {
        let created_at = now_epoch_ms();
        let results = batch
            .into_iter()
            .map(|fields| ExamResult {
                id: Uuid::new_v4(),
                fields,
                created_at,
            })
            .collect::<Vec<_>>();

        Ok(self.repo.insert_results(&results)?)
    }

    /// Finds the result for `(roll, exam_name)`.
    ///
    /// Returns `Ok(None)` when nothing matches. With duplicate keys the
    /// newest record wins.
    pub fn search_result(&self, roll: &str, exam_name: &str) -> ServiceResult<Option<ExamResult>> {
        Ok(self.repo.find_by_key(roll, exam_name)?)
    }
}
