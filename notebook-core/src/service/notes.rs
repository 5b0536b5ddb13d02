use std::sync::{Arc, Mutex};

use uuid::Uuid;

use super::lock;
use crate::attachments::AttachmentStore;
use crate::error::ServiceError;
use crate::models::{
    non_empty, now, Attachment, CreateNoteInput, NewFile, Note, NoteStatus, UpdateNoteInput,
};
use crate::store::CollectionStore;

/// CRUD over notes and their attachments.
pub struct NoteService {
    store: Arc<dyn CollectionStore<Note>>,
    attachments: AttachmentStore,
    lock: Mutex<()>,
}

impl NoteService {
    pub fn new(store: Arc<dyn CollectionStore<Note>>, attachments: AttachmentStore) -> Self {
        Self {
            store,
            attachments,
            lock: Mutex::new(()),
        }
    }

    pub fn attachments(&self) -> &AttachmentStore {
        &self.attachments
    }

    pub fn list_notes(&self) -> Result<Vec<Note>, ServiceError> {
        let _guard = lock(&self.lock);
        Ok(self.store.load()?)
    }

    /// List notes, keeping only those with `status` when one is given.
    pub fn list_notes_by_status(
        &self,
        status: Option<NoteStatus>,
    ) -> Result<Vec<Note>, ServiceError> {
        let notes = self.list_notes()?;
        Ok(match status {
            Some(status) => notes.into_iter().filter(|n| n.status == status).collect(),
            None => notes,
        })
    }

    pub fn get_note(&self, id: &str) -> Result<Note, ServiceError> {
        let _guard = lock(&self.lock);
        self.store
            .load()?
            .into_iter()
            .find(|n| n.id == id)
            .ok_or(ServiceError::NoteNotFound)
    }

    pub fn create_note(
        &self,
        input: CreateNoteInput,
        files: Vec<NewFile>,
    ) -> Result<Note, ServiceError> {
        if input.title.is_empty() || input.content.is_empty() {
            return Err(ServiceError::validation("Title and content are required."));
        }
        let status = parse_status(input.status.as_deref())?.unwrap_or_default();

        let _guard = lock(&self.lock);
        let mut notes = self.store.load()?;

        let attachments = self.store_files(files)?;
        let created_at = now();
        let note = Note {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            content: input.content,
            status,
            created_at,
            updated_at: created_at,
            attachments,
        };

        notes.push(note.clone());
        self.save_or_discard(&notes, &note.attachments)?;

        tracing::info!("Created note {} with {} attachment(s)", note.id, note.attachments.len());
        Ok(note)
    }

    /// Partial update. Absent or empty fields keep their previous value.
    pub fn update_note(&self, id: &str, input: UpdateNoteInput) -> Result<Note, ServiceError> {
        self.update_note_with_files(id, input, Vec::new())
    }

    /// Partial update that also appends any uploaded `files` as attachments.
    pub fn update_note_with_files(
        &self,
        id: &str,
        input: UpdateNoteInput,
        files: Vec<NewFile>,
    ) -> Result<Note, ServiceError> {
        let status = parse_status(input.status.as_deref())?;

        let _guard = lock(&self.lock);
        let mut notes = self.store.load()?;
        let note = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(ServiceError::NoteNotFound)?;

        if let Some(title) = non_empty(input.title.as_deref()) {
            note.title = title.to_string();
        }
        if let Some(content) = non_empty(input.content.as_deref()) {
            note.content = content.to_string();
        }
        if let Some(status) = status {
            note.status = status;
        }

        let added = self.store_files(files)?;
        note.attachments.extend(added.iter().cloned());
        note.updated_at = now().max(note.created_at);

        let updated = note.clone();
        self.save_or_discard(&notes, &added)?;
        Ok(updated)
    }

    /// Delete a note together with the stored files of all its attachments.
    ///
    /// Files go first; a file that cannot be removed is logged and left behind.
    pub fn delete_note(&self, id: &str) -> Result<(), ServiceError> {
        let _guard = lock(&self.lock);
        let mut notes = self.store.load()?;
        let index = notes
            .iter()
            .position(|n| n.id == id)
            .ok_or(ServiceError::NoteNotFound)?;

        let note = notes.remove(index);
        for attachment in &note.attachments {
            self.delete_file(attachment);
        }

        self.store.save(&notes)?;
        tracing::info!("Deleted note {}", id);
        Ok(())
    }

    /// Append `files` to an existing note and return the new attachment records.
    pub fn add_attachments(
        &self,
        note_id: &str,
        files: Vec<NewFile>,
    ) -> Result<Vec<Attachment>, ServiceError> {
        let _guard = lock(&self.lock);
        let mut notes = self.store.load()?;
        let note = notes
            .iter_mut()
            .find(|n| n.id == note_id)
            .ok_or(ServiceError::NoteNotFound)?;

        if files.is_empty() {
            return Err(ServiceError::validation("No files uploaded."));
        }

        let added = self.store_files(files)?;
        note.attachments.extend(added.iter().cloned());
        note.updated_at = now().max(note.created_at);

        self.save_or_discard(&notes, &added)?;
        Ok(added)
    }

    pub fn delete_attachment(&self, note_id: &str, attachment_id: &str) -> Result<(), ServiceError> {
        let _guard = lock(&self.lock);
        let mut notes = self.store.load()?;
        let note = notes
            .iter_mut()
            .find(|n| n.id == note_id)
            .ok_or(ServiceError::NoteNotFound)?;
        let index = note
            .attachments
            .iter()
            .position(|a| a.id == attachment_id)
            .ok_or(ServiceError::AttachmentNotFound)?;

        let attachment = note.attachments.remove(index);
        self.delete_file(&attachment);
        note.updated_at = now().max(note.created_at);

        self.store.save(&notes)?;
        Ok(())
    }

    /// Write every file to the attachment store. If one fails, the files
    /// already written by this call are removed again.
    fn store_files(&self, files: Vec<NewFile>) -> Result<Vec<Attachment>, ServiceError> {
        let mut stored = Vec::with_capacity(files.len());
        for file in files {
            match self.attachments.store(&file.bytes, &file.file_name) {
                Ok(file_path) => stored.push(Attachment {
                    id: Uuid::new_v4().to_string(),
                    file_size: file.bytes.len() as u64,
                    file_name: file.file_name,
                    file_type: file.content_type,
                    file_path,
                }),
                Err(e) => {
                    tracing::error!("Failed to store attachment {}: {}", file.file_name, e);
                    stored.iter().for_each(|a| self.delete_file(a));
                    return Err(e.into());
                }
            }
        }
        Ok(stored)
    }

    fn save_or_discard(&self, notes: &[Note], added: &[Attachment]) -> Result<(), ServiceError> {
        if let Err(e) = self.store.save(notes) {
            tracing::error!("Failed to save notes: {}", e);
            added.iter().for_each(|a| self.delete_file(a));
            return Err(e.into());
        }
        Ok(())
    }

    fn delete_file(&self, attachment: &Attachment) {
        if let Err(e) = self.attachments.delete(&attachment.file_path) {
            tracing::warn!("Failed to delete {}: {}", attachment.file_path, e);
        }
    }
}

/// Parse an optional status. Empty means "not given"; anything else must be a
/// known status.
fn parse_status(value: Option<&str>) -> Result<Option<NoteStatus>, ServiceError> {
    match non_empty(value) {
        None => Ok(None),
        Some(s) => NoteStatus::from_str(s)
            .map(Some)
            .ok_or_else(|| ServiceError::validation(format!("Invalid status: {}", s))),
    }
}
