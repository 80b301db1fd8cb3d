use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use meerab_core::{FieldsError, ServiceError};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Payload shape was rejected before reaching the store.
    #[error("{0}")]
    BadRequest(String),

    /// Store failure, reported with the store's own message.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Prefixes the message of a server-side failure; input errors are kept as-is.
    pub fn context(self, prefix: &str) -> Self {
        match self {
            Self::Internal(message) => Self::Internal(format!("{prefix}: {message}")),
            other => other,
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Input(_) => Self::BadRequest(err.to_string()),
            ServiceError::Repo(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<FieldsError> for AppError {
    fn from(err: FieldsError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
