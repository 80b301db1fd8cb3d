//! Repository layer abstractions and document-store implementations.
//!
//! # Responsibility
//! - Define collection-oriented data access contracts.
//! - Isolate SQL and JSON document encoding from services.
//!
//! # Invariants
//! - Every repository call issues at most one store round-trip (one
//!   statement, or one transaction for batches).
//! - Read paths reject invalid persisted documents instead of masking them.

use crate::db::DbError;
use crate::model::RecordId;
use rusqlite::Row;
use serde::de::DeserializeOwned;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod notice_repo;
pub mod result_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for document persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Identifier text is not a valid record id.
    InvalidId(String),
    InvalidData(String),
    Encode(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidId(raw) => write!(f, "invalid record id `{raw}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted document: {message}"),
            Self::Encode(err) => write!(f, "failed to encode document: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::InvalidId(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Parses caller-supplied identifier text.
pub fn parse_record_id(raw: &str) -> RepoResult<RecordId> {
    Uuid::parse_str(raw.trim()).map_err(|_| RepoError::InvalidId(raw.to_string()))
}

/// Decodes one `(id, created_at, doc)` row of a collection table.
pub(crate) fn parse_document_row<F: DeserializeOwned>(
    row: &Row<'_>,
    table: &str,
) -> RepoResult<(RecordId, i64, F)> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid id value `{id_text}` in {table}.id"))
    })?;

    let created_at: i64 = row.get("created_at")?;

    let doc_text: String = row.get("doc")?;
    let fields = serde_json::from_str(&doc_text).map_err(|err| {
        RepoError::InvalidData(format!("undecodable document `{id_text}` in {table}.doc: {err}"))
    })?;

    Ok((id, created_at, fields))
}
