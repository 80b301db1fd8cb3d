//! Exam result repository contract and SQLite document implementation.
//!
//! # Responsibility
//! - Persist single and batched documents in the `results` collection.
//! - Look up documents by the `(roll, examName)` key.
//!
//! # Invariants
//! - Batch inserts run in one transaction: all rows land or none do.
//! - Key matching is exact and case-sensitive (BINARY collation).
//! - Duplicate keys resolve to the newest `created_at`, then newest insertion.

use crate::model::result::{ExamResult, ResultFields};
use crate::repo::{parse_document_row, RepoError, RepoResult};
use rusqlite::{params, Connection};

const RESULT_INSERT_SQL: &str = "INSERT INTO results (id, created_at, doc) VALUES (?1, ?2, ?3);";

/// Repository interface for the results collection.
pub trait ResultRepository {
    fn insert_result(&self, result: &ExamResult) -> RepoResult<()>;
    /// Inserts every entry atomically and returns the inserted count.
    fn insert_results(&self, results: &[ExamResult]) -> RepoResult<usize>;
    fn find_by_key(&self, roll: &str, exam_name: &str) -> RepoResult<Option<ExamResult>>;
}

/// SQLite-backed results repository.
pub struct SqliteResultRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteResultRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ResultRepository for SqliteResultRepository<'_> {
    fn insert_result(&self, result: &ExamResult) -> RepoResult<()> {
        let doc = encode_doc(result)?;
        self.conn.execute(
            RESULT_INSERT_SQL,
            params![result.id.to_string(), result.created_at, doc],
        )?;
        Ok(())
    }

    fn insert_results(&self, results: &[ExamResult]) -> RepoResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(RESULT_INSERT_SQL)?;
            for result in results {
                let doc = encode_doc(result)?;
                stmt.execute(params![result.id.to_string(), result.created_at, doc])?;
            }
        }
        tx.commit()?;
        Ok(results.len())
    }

    fn find_by_key(&self, roll: &str, exam_name: &str) -> RepoResult<Option<ExamResult>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, created_at, doc
             FROM results
             WHERE json_extract(doc, '$.roll') = ?1
               AND json_extract(doc, '$.examName') = ?2
             ORDER BY created_at DESC, rowid DESC
             LIMIT 1;",
        )?;

        let mut rows = stmt.query(params![roll, exam_name])?;
        if let Some(row) = rows.next()? {
            let (id, created_at, fields) = parse_document_row::<ResultFields>(row, "results")?;
            return Ok(Some(ExamResult {
                id,
                fields,
                created_at,
            }));
        }

        Ok(None)
    }
}

fn encode_doc(result: &ExamResult) -> RepoResult<String> {
    serde_json::to_string(&result.fields).map_err(RepoError::Encode)
}
