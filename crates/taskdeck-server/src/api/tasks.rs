//! CRUD handlers for task documents.
//!
//! - `POST /`       create, `201` with the stored document
//! - `GET /`        list all
//! - `PUT /:id`     partial update, returns the document before the update (or `null`)
//! - `DELETE /:id`  returns the removed document (or `null`)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use taskdeck_core::{Task, TaskFields, TaskId, TaskPatch};

use super::ApiError;
use crate::app_state::AppState;

type ApiResult<T> = std::result::Result<T, ApiError>;

fn log_failure(op: &'static str, e: ApiError) -> ApiError {
    tracing::warn!(op, code = e.0.client_code().as_str(), error = %e.0, "task operation failed");
    e
}

pub async fn create(
    State(app): State<AppState>,
    Json(fields): Json<TaskFields>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = app
        .store()
        .insert(fields)
        .await
        .map_err(|e| log_failure("create", e.into()))?;
    tracing::debug!(id = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn list(State(app): State<AppState>) -> ApiResult<Json<Vec<Task>>> {
    let tasks = app
        .store()
        .find_all()
        .await
        .map_err(|e| log_failure("list", e.into()))?;
    Ok(Json(tasks))
}

pub async fn update(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<TaskPatch>,
) -> ApiResult<Json<Option<Task>>> {
    let id = TaskId::parse(&id).map_err(|e| log_failure("update", e.into()))?;
    let before = app
        .store()
        .find_one_and_update(id, patch)
        .await
        .map_err(|e| log_failure("update", e.into()))?;
    Ok(Json(before))
}

pub async fn delete(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Option<Task>>> {
    let id = TaskId::parse(&id).map_err(|e| log_failure("delete", e.into()))?;
    let removed = app
        .store()
        .find_by_id_and_delete(id)
        .await
        .map_err(|e| log_failure("delete", e.into()))?;
    Ok(Json(removed))
}
