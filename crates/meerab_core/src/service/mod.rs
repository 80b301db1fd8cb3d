//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep the HTTP layer decoupled from storage details.
//!
//! # Invariants
//! - Input errors are raised before any repository call.
//! - Store failures pass through unclassified as `ServiceError::Repo`.

use crate::model::fields::FieldsError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod notice_service;
pub mod result_service;

/// Error returned by notice and result use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Caller payload failed the field mapping; the store was not touched.
    Input(FieldsError),
    /// Persistence-layer failure, including a store-less process.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Input(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<FieldsError> for ServiceError {
    fn from(value: FieldsError) -> Self {
        Self::Input(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<crate::db::DbError> for ServiceError {
    fn from(value: crate::db::DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
