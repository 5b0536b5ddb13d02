use thiserror::Error;

/// Failure reading or writing a backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

/// Errors returned by the note and task services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("Note not found")]
    NoteNotFound,

    #[error("Attachment not found")]
    AttachmentNotFound,

    #[error("Task not found")]
    TaskNotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NoteNotFound | Self::AttachmentNotFound | Self::TaskNotFound
        )
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        Self::Store(StoreError::Io(err))
    }
}
