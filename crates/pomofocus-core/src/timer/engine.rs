//! Timer engine implementation.
//!
//! The timer engine is a tick-driven countdown. It does not use internal
//! threads or read the wall clock - the caller is responsible for calling
//! `tick()` once per second while the timer is running.
//!
//! ## State Transitions
//!
//! ```text
//! {pomodoro, shortBreak, longBreak} x {running, paused}
//!
//! pomodoro --complete--> shortBreak   (count % 4 != 0)
//! pomodoro --complete--> longBreak    (count % 4 == 0)
//! *Break   --complete--> pomodoro
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new();
//! engine.toggle();
//! // Once per second:
//! for event in engine.tick() { /* LogSession, TimerCompleted, ModeSwitched */ }
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::mode::{format_clock, TimerMode, POMODOROS_BEFORE_LONG_BREAK};
use crate::events::Event;

/// Serializable view of the engine for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub mode: TimerMode,
    pub time_left_seconds: u32,
    pub is_running: bool,
    pub pomodoro_count: u32,
    pub display: String,
}

/// Core timer engine.
///
/// Ephemeral: nothing here is persisted, `pomodoro_count` starts at zero
/// on every launch.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    mode: TimerMode,
    time_left_secs: u32,
    is_running: bool,
    pomodoro_count: u32,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerEngine {
    /// Create a paused engine in pomodoro mode with a full interval.
    pub fn new() -> Self {
        Self {
            mode: TimerMode::Pomodoro,
            time_left_secs: TimerMode::Pomodoro.duration_secs(),
            is_running: false,
            pomodoro_count: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn time_left_secs(&self) -> u32 {
        self.time_left_secs
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn pomodoro_count(&self) -> u32 {
        self.pomodoro_count
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.mode,
            time_left_seconds: self.time_left_secs,
            is_running: self.is_running,
            pomodoro_count: self.pomodoro_count,
            display: format_clock(self.time_left_secs),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or pause.
    pub fn toggle(&mut self) -> Event {
        self.is_running = !self.is_running;
        debug!(mode = %self.mode, running = self.is_running, "timer toggled");
        if self.is_running {
            Event::TimerStarted {
                mode: self.mode,
                time_left_secs: self.time_left_secs,
            }
        } else {
            Event::TimerPaused {
                mode: self.mode,
                time_left_secs: self.time_left_secs,
            }
        }
    }

    /// Refill the current interval and pause. Mode and count are kept.
    pub fn reset(&mut self) -> Event {
        self.time_left_secs = self.mode.duration_secs();
        self.is_running = false;
        Event::TimerReset { mode: self.mode }
    }

    /// Explicit mode change. Progress in the current interval is discarded
    /// and nothing is logged for it.
    pub fn switch_mode(&mut self, mode: TimerMode) -> Event {
        let from = self.mode;
        self.set_mode(mode);
        Event::ModeSwitched {
            from,
            to: mode,
            automatic: false,
        }
    }

    /// Advance the countdown by one second.
    ///
    /// Returns no events while paused or mid-interval. On the tick that
    /// reaches zero returns, in order, `LogSession`, `TimerCompleted` and
    /// the automatic `ModeSwitched`.
    pub fn tick(&mut self) -> Vec<Event> {
        if !self.is_running {
            return Vec::new();
        }
        self.time_left_secs = self.time_left_secs.saturating_sub(1);
        if self.time_left_secs > 0 {
            return Vec::new();
        }
        self.complete()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self) -> Vec<Event> {
        let finished = self.mode;
        self.is_running = false;

        let next = match finished {
            TimerMode::Pomodoro => {
                self.pomodoro_count += 1;
                if self.pomodoro_count % POMODOROS_BEFORE_LONG_BREAK == 0 {
                    TimerMode::LongBreak
                } else {
                    TimerMode::ShortBreak
                }
            }
            TimerMode::ShortBreak | TimerMode::LongBreak => TimerMode::Pomodoro,
        };
        debug!(%finished, %next, count = self.pomodoro_count, "interval completed");
        self.set_mode(next);

        vec![
            Event::LogSession {
                duration_secs: finished.duration_secs(),
                mode: finished,
            },
            Event::TimerCompleted { mode: finished },
            Event::ModeSwitched {
                from: finished,
                to: next,
                automatic: true,
            },
        ]
    }

    fn set_mode(&mut self, mode: TimerMode) {
        self.mode = mode;
        self.time_left_secs = mode.duration_secs();
        self.is_running = false;
    }
}
