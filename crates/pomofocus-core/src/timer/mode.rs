use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Pomodoro length in seconds.
pub const POMODORO_SECS: u32 = 25 * 60;
/// Short break length in seconds.
pub const SHORT_BREAK_SECS: u32 = 5 * 60;
/// Long break length in seconds.
pub const LONG_BREAK_SECS: u32 = 15 * 60;
/// Every n-th completed pomodoro is followed by a long break.
pub const POMODOROS_BEFORE_LONG_BREAK: u32 = 4;

/// The interval type the timer is counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    Pomodoro,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    /// Configured length of this mode in seconds.
    pub fn duration_secs(self) -> u32 {
        match self {
            TimerMode::Pomodoro => POMODORO_SECS,
            TimerMode::ShortBreak => SHORT_BREAK_SECS,
            TimerMode::LongBreak => LONG_BREAK_SECS,
        }
    }

    /// Wire name, as stored in the session list.
    pub fn as_str(self) -> &'static str {
        match self {
            TimerMode::Pomodoro => "pomodoro",
            TimerMode::ShortBreak => "shortBreak",
            TimerMode::LongBreak => "longBreak",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Pomodoro => "Pomodoro",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimerMode {
    type Err = String;

    /// Accepts the wire names plus the short aliases used by the CLI.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pomodoro" | "p" | "focus" => Ok(TimerMode::Pomodoro),
            "shortBreak" | "short" | "sb" => Ok(TimerMode::ShortBreak),
            "longBreak" | "long" | "lb" => Ok(TimerMode::LongBreak),
            other => Err(format!("unknown timer mode: {other}")),
        }
    }
}

/// Format seconds as `MM:SS`.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_are_fixed() {
        assert_eq!(TimerMode::Pomodoro.duration_secs(), 1500);
        assert_eq!(TimerMode::ShortBreak.duration_secs(), 300);
        assert_eq!(TimerMode::LongBreak.duration_secs(), 900);
    }

    #[test]
    fn serializes_as_camel_case() {
        let json = serde_json::to_string(&TimerMode::ShortBreak).unwrap();
        assert_eq!(json, "\"shortBreak\"");
        let mode: TimerMode = serde_json::from_str("\"longBreak\"").unwrap();
        assert_eq!(mode, TimerMode::LongBreak);
    }

    #[test]
    fn parses_aliases() {
        assert_eq!("sb".parse::<TimerMode>().unwrap(), TimerMode::ShortBreak);
        assert_eq!("pomodoro".parse::<TimerMode>().unwrap(), TimerMode::Pomodoro);
        assert!("nap".parse::<TimerMode>().is_err());
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(1500), "25:00");
        assert_eq!(format_clock(61), "01:01");
        assert_eq!(format_clock(0), "00:00");
    }
}
