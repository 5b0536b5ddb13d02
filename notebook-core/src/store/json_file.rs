use std::fs;
use std::io::{self, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use super::CollectionStore;
use crate::error::StoreError;

/// A collection stored as one pretty-printed JSON array on disk.
///
/// Reads never fail: a missing file is an empty collection, and an unreadable
/// or corrupt file is logged and also read as empty.
pub struct JsonFileStore<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T> CollectionStore<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    fn load(&self) -> Result<Vec<T>, StoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                tracing::error!("Error reading {}: {}", self.path.display(), e);
                return Ok(Vec::new());
            }
        };

        match serde_json::from_str(&data) {
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::error!("Error parsing {}: {}", self.path.display(), e);
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, records: &[T]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(records)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        // Temp file + rename so readers never see a half-written document.
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}
