//! Request bodies for note creation and update.
//!
//! The browser client submits notes as `multipart/form-data` (text fields plus
//! `files`), while API callers may send plain JSON. Both end up as a [`NoteForm`].

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use notebook_core::models::{CreateNoteInput, NewFile, UpdateNoteInput};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::error::ApiError;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Default, Deserialize)]
pub struct NoteForm {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<String>,
    #[serde(skip)]
    pub files: Vec<NewFile>,
}

impl NoteForm {
    pub fn into_create(self) -> (CreateNoteInput, Vec<NewFile>) {
        let input = CreateNoteInput {
            title: self.title.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            status: self.status,
        };
        (input, self.files)
    }

    pub fn into_update(self) -> (UpdateNoteInput, Vec<NewFile>) {
        let input = UpdateNoteInput {
            title: self.title,
            content: self.content,
            status: self.status,
        };
        (input, self.files)
    }
}

pub fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

/// Parse a JSON body. An empty body, or one that is not declared as JSON, is
/// read as the default value.
pub fn json_or_default<T>(headers: &HeaderMap, body: &[u8]) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if body.is_empty() || !is_json(headers) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {}", e)))
}

/// Read a note body from either a multipart form or JSON.
pub async fn read_note_form<S>(request: Request, state: &S) -> Result<NoteForm, ApiError>
where
    S: Send + Sync,
{
    if is_multipart(request.headers()) {
        let multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        read_multipart(multipart).await
    } else {
        let headers = request.headers().clone();
        let body = Bytes::from_request(request, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        json_or_default(&headers, &body)
    }
}

/// Collect the note fields and every `files` part of a multipart body.
pub async fn read_multipart(mut multipart: Multipart) -> Result<NoteForm, ApiError> {
    let mut form = NoteForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => form.title = Some(field.text().await?),
            "content" => form.content = Some(field.text().await?),
            "status" => form.status = Some(field.text().await?),
            "files" | "files[]" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_CONTENT_TYPE)
                    .to_string();
                let bytes = field.bytes().await?;

                // An empty file input still submits one nameless, empty part.
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                form.files.push(NewFile::new(file_name, content_type, bytes.to_vec()));
            }
            other => tracing::debug!("Ignoring multipart field {:?}", other),
        }
    }

    Ok(form)
}
