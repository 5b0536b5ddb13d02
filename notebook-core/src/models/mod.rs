mod attachment;
mod note;
mod task;

pub use attachment::*;
pub use note::*;
pub use task::*;

use chrono::{DateTime, SubsecRound, Utc};

/// A record persisted in a collection, keyed by its string identifier.
pub trait Record {
    fn id(&self) -> &str;
}

impl Record for Note {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Task {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Current time at the millisecond precision timestamps are persisted with.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
