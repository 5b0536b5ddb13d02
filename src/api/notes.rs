use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, Query, Request, State};
use axum::http::StatusCode;
use axum::Json;
use notebook_core::models::{Attachment, Note, NoteStatus};
use serde::Deserialize;

use super::form::{read_multipart, read_note_form};
use super::{run_blocking, ApiError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListNotesQuery {
    pub status: Option<String>,
}

pub async fn list_notes(
    State(state): State<AppState>,
    Query(query): Query<ListNotesQuery>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let status = match query.status.as_deref() {
        None | Some("") => None,
        Some(s) => Some(
            NoteStatus::from_str(s)
                .ok_or_else(|| ApiError::BadRequest(format!("Invalid status: {}", s)))?,
        ),
    };

    let notes = run_blocking(move || state.notes.list_notes_by_status(status)).await?;
    Ok(Json(notes))
}

pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Note>, ApiError> {
    let note = run_blocking(move || state.notes.get_note(&id)).await?;
    Ok(Json(note))
}

pub async fn create_note(
    State(state): State<AppState>,
    request: Request,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let (input, files) = read_note_form(request, &state).await?.into_create();

    let note = run_blocking(move || state.notes.create_note(input, files)).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Request,
) -> Result<Json<Note>, ApiError> {
    let (input, files) = read_note_form(request, &state).await?.into_update();

    let note = run_blocking(move || state.notes.update_note_with_files(&id, input, files)).await?;
    Ok(Json(note))
}

pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    run_blocking(move || state.notes.delete_note(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_attachments(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Vec<Attachment>>), ApiError> {
    let files = match multipart {
        Ok(multipart) => match read_multipart(multipart).await {
            Ok(form) => form.files,
            Err(e) => {
                // An unknown note is reported ahead of a bad upload.
                let notes = state.notes.clone();
                let lookup = id.clone();
                run_blocking(move || notes.get_note(&lookup)).await?;
                return Err(e);
            }
        },
        // Not a multipart body, so no files: the service decides between 404 and 400.
        Err(_) => Vec::new(),
    };

    let added = run_blocking(move || state.notes.add_attachments(&id, files)).await?;
    Ok((StatusCode::CREATED, Json(added)))
}

pub async fn delete_attachment(
    State(state): State<AppState>,
    Path((id, attachment_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    run_blocking(move || state.notes.delete_attachment(&id, &attachment_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
