//! Completed-interval history and the statistics derived from it.

mod history;
mod stats;

pub use history::SessionLog;
pub use stats::{format_minutes, DailySummary, SessionStats, DEFAULT_HISTORY_DAYS};

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerMode;

/// Immutable record of one interval that ran to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    /// Completion time, epoch milliseconds.
    pub timestamp: i64,
    /// Interval length in seconds.
    pub duration: u32,
    pub mode: TimerMode,
    /// Task selected when the interval completed. Not kept in sync with
    /// task deletion.
    pub task_id: Option<String>,
}

impl Session {
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }

    pub fn is_pomodoro(&self) -> bool {
        self.mode == TimerMode::Pomodoro
    }

    pub fn minutes(&self) -> f64 {
        f64::from(self.duration) / 60.0
    }
}
