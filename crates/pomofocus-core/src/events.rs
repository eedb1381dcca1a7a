use serde::{Deserialize, Serialize};

use crate::timer::TimerMode;

/// Every state change of the timer produces an Event.
/// The coordinator consumes them; the shell may print them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        time_left_secs: u32,
    },
    TimerPaused {
        mode: TimerMode,
        time_left_secs: u32,
    },
    TimerReset {
        mode: TimerMode,
    },
    /// A full interval elapsed and should be written to the session log.
    LogSession {
        duration_secs: u32,
        mode: TimerMode,
    },
    /// An interval reached zero while running.
    TimerCompleted {
        mode: TimerMode,
    },
    ModeSwitched {
        from: TimerMode,
        to: TimerMode,
        /// `true` when the engine switched on its own after a completion.
        automatic: bool,
    },
}
