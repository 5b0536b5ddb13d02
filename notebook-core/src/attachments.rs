//! Filesystem storage for uploaded attachment binaries.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Directory of uploaded files stored under generated names.
///
/// Files are addressed by the relative URL handed back from [`store`](Self::store),
/// e.g. `/uploads/0b7c...e1.png`. Only the final component of such a path is
/// ever used to locate a file, so a stored path cannot point outside the
/// directory.
#[derive(Debug, Clone)]
pub struct AttachmentStore {
    dir: PathBuf,
    url_prefix: String,
}

impl AttachmentStore {
    pub fn new(dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir)
    }

    /// Write `bytes` under a fresh random name that keeps the extension of
    /// `original_name`, returning the relative path of the stored file.
    pub fn store(&self, bytes: &[u8], original_name: &str) -> io::Result<String> {
        let file_name = generated_name(original_name);
        fs::write(self.dir.join(&file_name), bytes)?;
        tracing::debug!("Stored attachment {} as {}", original_name, file_name);
        Ok(format!("{}/{}", self.url_prefix, file_name))
    }

    /// Remove the file behind `relative_path`. A file that is already gone is
    /// not an error.
    pub fn delete(&self, relative_path: &str) -> io::Result<()> {
        let Some(path) = self.resolve(relative_path) else {
            return Ok(());
        };
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// On-disk location of a stored file, or `None` if the path has no file
    /// name component.
    pub fn resolve(&self, relative_path: &str) -> Option<PathBuf> {
        Path::new(relative_path)
            .file_name()
            .map(|name| self.dir.join(name))
    }
}

fn generated_name(original_name: &str) -> String {
    let id = Uuid::new_v4();
    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty());

    match extension {
        Some(ext) => format!("{}.{}", id, ext),
        None => id.to_string(),
    }
}
