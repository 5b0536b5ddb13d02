use serde::{Deserialize, Serialize};

/// Metadata for one uploaded file owned by a note.
///
/// The binary lives in the attachment store under a generated name; the
/// original name is kept only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    /// Name the file was uploaded with.
    pub file_name: String,
    /// Size in bytes.
    pub file_size: u64,
    /// MIME type reported by the client.
    pub file_type: String,
    /// Relative URL of the stored binary, e.g. `/uploads/<uuid>.png`.
    pub file_path: String,
}

/// A file received with a request, not yet written to the attachment store.
#[derive(Debug, Clone)]
pub struct NewFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl NewFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}
