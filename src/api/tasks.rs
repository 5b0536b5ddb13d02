use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use notebook_core::models::{CreateTaskInput, SetDoneInput, Task};

use super::form::json_or_default;
use super::{run_blocking, ApiError};
use crate::state::AppState;

pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = run_blocking(move || state.tasks.list()).await?;
    Ok(Json(tasks))
}

pub async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<CreateTaskInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let task = run_blocking(move || state.tasks.create(input)).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    run_blocking(move || state.tasks.delete(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /tasks/:id`. With no `done` in the body the stored value is toggled.
pub async fn set_done(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Task>, ApiError> {
    let input: SetDoneInput = json_or_default(&headers, &body)?;

    let task = run_blocking(move || state.tasks.set_done(&id, input)).await?;
    Ok(Json(task))
}
