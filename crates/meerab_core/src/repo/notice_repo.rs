//! Notice repository contract and SQLite document implementation.
//!
//! # Responsibility
//! - Persist, list and hard-delete documents in the `notices` collection.
//!
//! # Invariants
//! - Listing order is `created_at DESC`, newest insertion first on ties.
//! - Deleting a missing id is not an error.

use crate::model::notice::{Notice, NoticeFields, NoticeId};
use crate::repo::{parse_document_row, RepoError, RepoResult};
use rusqlite::{params, Connection};

const NOTICE_SELECT_SQL: &str = "SELECT id, created_at, doc FROM notices";

/// Repository interface for the notices collection.
pub trait NoticeRepository {
    fn insert_notice(&self, notice: &Notice) -> RepoResult<()>;
    fn list_notices(&self) -> RepoResult<Vec<Notice>>;
    /// Returns whether a document was removed.
    fn delete_notice(&self, id: NoticeId) -> RepoResult<bool>;
}

/// SQLite-backed notices repository.
pub struct SqliteNoticeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoticeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl NoticeRepository for SqliteNoticeRepository<'_> {
    fn insert_notice(&self, notice: &Notice) -> RepoResult<()> {
        let doc = serde_json::to_string(&notice.fields).map_err(RepoError::Encode)?;
        self.conn.execute(
            "INSERT INTO notices (id, created_at, doc) VALUES (?1, ?2, ?3);",
            params![notice.id.to_string(), notice.created_at, doc],
        )?;
        Ok(())
    }

    fn list_notices(&self) -> RepoResult<Vec<Notice>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTICE_SELECT_SQL} ORDER BY created_at DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut notices = Vec::new();

        while let Some(row) = rows.next()? {
            let (id, created_at, fields) = parse_document_row::<NoticeFields>(row, "notices")?;
            notices.push(Notice {
                id,
                fields,
                created_at,
            });
        }

        Ok(notices)
    }

    fn delete_notice(&self, id: NoticeId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM notices WHERE id = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }
}
