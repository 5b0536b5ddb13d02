//! Core library for Notebook.
//!
//! This crate provides the domain models, persistence stores and the note/task
//! services, independent of any transport layer.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use notebook_core::{AttachmentStore, JsonFileStore, NoteService};
//! use notebook_core::models::{CreateNoteInput, Note};
//!
//! let store = Arc::new(JsonFileStore::<Note>::new("data/notes.json"));
//! let attachments = AttachmentStore::new("data/uploads", "/uploads");
//! attachments.ensure_dir()?;
//!
//! let notes = NoteService::new(store, attachments);
//! let note = notes.create_note(
//!     CreateNoteInput {
//!         title: "Homework".into(),
//!         content: "Finish ch.3".into(),
//!         status: None,
//!     },
//!     Vec::new(),
//! )?;
//! assert!(notes.get_note(&note.id).is_ok());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod attachments;
pub mod error;
pub mod models;
pub mod service;
pub mod store;

// Re-export commonly used types at crate root
pub use attachments::AttachmentStore;
pub use error::{ServiceError, StoreError};
pub use service::{NoteService, TaskService};
pub use store::{CollectionStore, DocumentDb, DocumentStore, JsonFileStore};
