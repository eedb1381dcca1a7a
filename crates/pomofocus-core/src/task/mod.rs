//! Tasks and the task registry.

mod registry;

pub use registry::TaskRegistry;

use serde::{Deserialize, Serialize};

/// A unit of work with a pomodoro estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub estimated_pomodoros: u32,
    pub completed_pomodoros: u32,
}

impl Task {
    /// True once the completed count has reached the estimate.
    pub fn is_maxed(&self) -> bool {
        self.completed_pomodoros >= self.estimated_pomodoros
    }

    /// `completed/estimated`, as shown next to the title.
    pub fn progress_label(&self) -> String {
        format!("{}/{}", self.completed_pomodoros, self.estimated_pomodoros)
    }
}
