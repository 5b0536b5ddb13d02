use serde::{Deserialize, Serialize};

/// An entry of the flat task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Creation time in epoch milliseconds, as a string.
    pub id: String,
    pub title: String,
    pub done: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTaskInput {
    #[serde(default)]
    pub title: String,
}

/// Body of `PATCH /tasks/:id`. A missing `done` toggles the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetDoneInput {
    pub done: Option<bool>,
}
