mod engine;
mod mode;

pub use engine::{TimerEngine, TimerSnapshot};
pub use mode::{
    format_clock, TimerMode, LONG_BREAK_SECS, POMODOROS_BEFORE_LONG_BREAK, POMODORO_SECS,
    SHORT_BREAK_SECS,
};
