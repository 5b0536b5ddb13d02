//! Persistence stores.
//!
//! A store holds one whole collection and is only ever read or written in
//! full. Callers depend on [`CollectionStore`] and never on a concrete backend.

mod document;
mod json_file;
mod schema;

pub use document::{DocumentDb, DocumentStore};
pub use json_file::JsonFileStore;

use crate::error::StoreError;

pub trait CollectionStore<T>: Send + Sync {
    /// Load the full collection in insertion order. A missing backing
    /// resource is an empty collection.
    fn load(&self) -> Result<Vec<T>, StoreError>;

    /// Replace the full collection.
    fn save(&self, records: &[T]) -> Result<(), StoreError>;
}
