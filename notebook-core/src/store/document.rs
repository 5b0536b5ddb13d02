use std::marker::PhantomData;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::schema::SCHEMA;
use super::CollectionStore;
use crate::error::StoreError;
use crate::models::Record;

/// Handle to the SQLite database backing the document store.
#[derive(Clone)]
pub struct DocumentDb {
    conn: Arc<Mutex<Connection>>,
}

impl DocumentDb {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        tracing::debug!("Opening document database at {}", path.display());
        let conn = Connection::open(path)?;
        Ok(Self::from_connection(conn))
    }

    pub fn open_memory() -> Result<Self, StoreError> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    pub fn migrate(&self) -> Result<(), StoreError> {
        self.with_connection(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
    }

    pub fn with_connection<F, R>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<R, StoreError>,
    {
        let mut conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut conn)
    }
}

/// A collection of JSON documents keyed by record id.
pub struct DocumentStore<T> {
    db: DocumentDb,
    collection: String,
    _record: PhantomData<fn() -> T>,
}

impl<T> DocumentStore<T> {
    pub fn new(db: DocumentDb, collection: impl Into<String>) -> Self {
        Self {
            db,
            collection: collection.into(),
            _record: PhantomData,
        }
    }
}

impl<T> CollectionStore<T> for DocumentStore<T>
where
    T: Serialize + DeserializeOwned + Record,
{
    fn load(&self) -> Result<Vec<T>, StoreError> {
        self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT body FROM documents WHERE collection = ?1 ORDER BY position",
            )?;
            let rows = stmt.query_map(params![self.collection], |row| row.get::<_, String>(0))?;

            let mut records = Vec::new();
            for body in rows {
                records.push(serde_json::from_str(&body?)?);
            }
            Ok(records)
        })
    }

    fn save(&self, records: &[T]) -> Result<(), StoreError> {
        self.db.with_connection(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM documents WHERE collection = ?1",
                params![self.collection],
            )?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO documents (collection, id, position, body) VALUES (?1, ?2, ?3, ?4)",
                )?;
                for (position, record) in records.iter().enumerate() {
                    let body = serde_json::to_string(record)?;
                    stmt.execute(params![self.collection, record.id(), position as i64, body])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
    }
}
