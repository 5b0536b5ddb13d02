use std::sync::Arc;

use notebook_core::models::{Note, Task};
use notebook_core::{
    AttachmentStore, CollectionStore, DocumentDb, DocumentStore, JsonFileStore, NoteService,
    StoreError, TaskService,
};

use crate::config::{AppConfig, Backend};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub notes: Arc<NoteService>,
    pub tasks: Arc<TaskService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Open the configured backend and the uploads directory.
    pub fn open(config: AppConfig) -> Result<Self, StoreError> {
        let attachments = AttachmentStore::new(config.uploads_dir(), "/uploads");
        attachments.ensure_dir()?;

        let notes: Arc<dyn CollectionStore<Note>>;
        let tasks: Arc<dyn CollectionStore<Task>>;
        match config.backend {
            Backend::Json => {
                notes = Arc::new(JsonFileStore::<Note>::new(config.notes_path()));
                tasks = Arc::new(JsonFileStore::<Task>::new(config.tasks_path()));
            }
            Backend::Document => {
                let db = DocumentDb::open(config.db_path())?;
                db.migrate()?;
                notes = Arc::new(DocumentStore::<Note>::new(db.clone(), "notes"));
                tasks = Arc::new(DocumentStore::<Task>::new(db, "tasks"));
            }
        }

        Ok(Self {
            notes: Arc::new(NoteService::new(notes, attachments)),
            tasks: Arc::new(TaskService::new(tasks)),
            config: Arc::new(config),
        })
    }
}
