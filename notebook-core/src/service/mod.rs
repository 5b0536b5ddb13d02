//! Note and task services.
//!
//! Every mutating operation is one read-modify-write of the whole collection,
//! done while holding the service's lock so concurrent requests cannot lose
//! each other's updates.

mod notes;
mod tasks;

pub use notes::NoteService;
pub use tasks::TaskService;

use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock(mutex: &Mutex<()>) -> MutexGuard<'_, ()> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
