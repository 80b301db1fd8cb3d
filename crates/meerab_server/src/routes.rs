use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use log::info;
use meerab_core::{ExamResult, Notice, NoticeFields, ResultFields};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::AppError, state::AppState};

#[derive(Serialize)]
pub struct MessageResponse {
    message: &'static str,
}

#[derive(Serialize)]
pub struct BulkResponse {
    message: &'static str,
    count: usize,
}

#[derive(Serialize)]
pub struct SearchResponse {
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<ExamResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

impl SearchResponse {
    fn found(data: ExamResult) -> Self {
        Self {
            found: true,
            data: Some(data),
            message: None,
        }
    }

    fn not_found() -> Self {
        Self {
            found: false,
            data: None,
            message: Some("Result not found"),
        }
    }
}

#[derive(Deserialize)]
pub struct SearchParams {
    roll: Option<String>,
    #[serde(rename = "examName")]
    exam_name: Option<String>,
}

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

pub async fn list_notices(State(state): State<AppState>) -> Result<Json<Vec<Notice>>, AppError> {
    let notices = state.notices(|service| service.list_notices()).await?;
    Ok(Json(notices))
}

pub async fn create_notice(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let fields = NoticeFields::from_json(json_body(payload)?)?;
    let notice = state
        .notices(move |service| service.create_notice(fields))
        .await?;

    info!("event=notice_create module=routes status=ok id={}", notice.id);
    Ok(Json(MessageResponse {
        message: "Notice Added",
    }))
}

pub async fn delete_notice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let removed = state
        .notices(move |service| service.delete_notice(&id))
        .await?;

    info!("event=notice_delete module=routes status=ok removed={removed}");
    Ok(Json(MessageResponse {
        message: "Notice Deleted",
    }))
}

pub async fn create_result(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let fields = ResultFields::from_json(json_body(payload)?)?;
    let result = state
        .results(move |service| service.create_result(fields))
        .await?;

    info!("event=result_create module=routes status=ok id={}", result.id);
    Ok(Json(MessageResponse {
        message: "Result Saved",
    }))
}

pub async fn bulk_create_results(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BulkResponse>, AppError> {
    let batch = ResultFields::batch_from_json(json_body(payload)?)?;
    let count = state
        .results(move |service| service.bulk_create_results(batch))
        .await
        .map_err(|err| err.context("Bulk upload failed"))?;

    info!("event=result_bulk_create module=routes status=ok count={count}");
    Ok(Json(BulkResponse {
        message: "Bulk upload successful",
        count,
    }))
}

pub async fn search_results(
    State(state): State<AppState>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let Query(params) =
        query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    // Without both keys nothing can match.
    let (Some(roll), Some(exam_name)) = (params.roll, params.exam_name) else {
        return Ok(Json(SearchResponse::not_found()));
    };

    let found = state
        .results(move |service| service.search_result(&roll, &exam_name))
        .await?;

    Ok(Json(match found {
        Some(result) => SearchResponse::found(result),
        None => SearchResponse::not_found(),
    }))
}
