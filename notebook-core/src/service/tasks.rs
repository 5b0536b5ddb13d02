use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::lock;
use crate::error::ServiceError;
use crate::models::{CreateTaskInput, SetDoneInput, Task};
use crate::store::CollectionStore;

/// The flat task list.
pub struct TaskService {
    store: Arc<dyn CollectionStore<Task>>,
    lock: Mutex<()>,
}

impl TaskService {
    pub fn new(store: Arc<dyn CollectionStore<Task>>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    pub fn list(&self) -> Result<Vec<Task>, ServiceError> {
        let _guard = lock(&self.lock);
        Ok(self.store.load()?)
    }

    pub fn create(&self, input: CreateTaskInput) -> Result<Task, ServiceError> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(ServiceError::validation("Title is required."));
        }

        let _guard = lock(&self.lock);
        let mut tasks = self.store.load()?;

        // Ids are creation timestamps; step past any taken in the same millisecond.
        let mut stamp = Utc::now().timestamp_millis();
        while tasks.iter().any(|t| t.id == stamp.to_string()) {
            stamp += 1;
        }

        let task = Task {
            id: stamp.to_string(),
            title: title.to_string(),
            done: false,
        };
        tasks.push(task.clone());
        self.store.save(&tasks)?;
        Ok(task)
    }

    pub fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let _guard = lock(&self.lock);
        let mut tasks = self.store.load()?;
        let index = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(ServiceError::TaskNotFound)?;

        tasks.remove(index);
        self.store.save(&tasks)?;
        Ok(())
    }

    /// Set `done` to the given value, or flip it when none is given.
    pub fn set_done(&self, id: &str, input: SetDoneInput) -> Result<Task, ServiceError> {
        let _guard = lock(&self.lock);
        let mut tasks = self.store.load()?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(ServiceError::TaskNotFound)?;

        task.done = input.done.unwrap_or(!task.done);
        let updated = task.clone();

        self.store.save(&tasks)?;
        Ok(updated)
    }
}
