//! Aggregate statistics over the session history.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use super::Session;

/// Number of most recent active dates kept in [`SessionStats::daily`].
pub const DEFAULT_HISTORY_DAYS: usize = 7;

/// Pomodoro totals for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: NaiveDate,
    /// Display form, e.g. `May 1, 2024`.
    pub label: String,
    pub pomodoros: u32,
    pub focus_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub total_focus_minutes: f64,
    pub total_pomodoros: u32,
    pub today_pomodoros: u32,
    /// Newest first. One entry per date with any recorded session.
    pub daily: Vec<DailySummary>,
}

impl SessionStats {
    /// Derive statistics from the full history.
    ///
    /// Calendar dates are compared in `now`'s timezone by year/month/day,
    /// not as a rolling 24 hour window.
    pub fn compute<Tz: TimeZone>(
        sessions: &[Session],
        now: &DateTime<Tz>,
        history_days: usize,
    ) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();

        let mut stats = SessionStats::default();
        let mut by_date: BTreeMap<NaiveDate, (u32, f64)> = BTreeMap::new();

        for session in sessions {
            let date = session
                .completed_at()
                .map(|at| at.with_timezone(&tz).date_naive());

            if let Some(date) = date {
                let entry = by_date.entry(date).or_insert((0, 0.0));
                if session.is_pomodoro() {
                    entry.0 += 1;
                    entry.1 += session.minutes();
                }
            }

            if !session.is_pomodoro() {
                continue;
            }
            stats.total_pomodoros += 1;
            stats.total_focus_minutes += session.minutes();
            if date == Some(today) {
                stats.today_pomodoros += 1;
            }
        }

        stats.daily = by_date
            .into_iter()
            .rev()
            .take(history_days)
            .map(|(date, (pomodoros, focus_minutes))| DailySummary {
                date,
                label: date.format("%b %-d, %Y").to_string(),
                pomodoros,
                focus_minutes,
            })
            .collect();
        stats
    }
}

/// Format minutes as `N min` below an hour, else `Hh Mm`.
pub fn format_minutes(minutes: f64) -> String {
    let hours = (minutes / 60.0).floor();
    let mins = (minutes % 60.0).round();
    if hours == 0.0 {
        format!("{mins} min")
    } else {
        format!("{hours}h {mins}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerMode;
    use chrono::{Duration, FixedOffset, Utc};

    fn session(at: DateTime<Utc>, mode: TimerMode) -> Session {
        Session {
            id: at.timestamp_millis().to_string(),
            timestamp: at.timestamp_millis(),
            duration: mode.duration_secs(),
            mode,
            task_id: None,
        }
    }

    #[test]
    fn totals_count_only_pomodoros() {
        let d1 = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let sessions = vec![
            session(d1, TimerMode::Pomodoro),
            session(d1 + Duration::minutes(30), TimerMode::Pomodoro),
            session(d1 + Duration::minutes(35), TimerMode::ShortBreak),
        ];
        let stats = SessionStats::compute(&sessions, &d1, DEFAULT_HISTORY_DAYS);
        assert_eq!(stats.total_focus_minutes, 50.0);
        assert_eq!(stats.total_pomodoros, 2);
        assert_eq!(stats.today_pomodoros, 2);
        assert_eq!(stats.daily.len(), 1);
        assert_eq!(stats.daily[0].pomodoros, 2);
        assert_eq!(stats.daily[0].focus_minutes, 50.0);
        assert_eq!(stats.daily[0].label, "May 1, 2024");
    }

    #[test]
    fn today_is_a_calendar_date_not_24_hours() {
        let late_yesterday = Utc.with_ymd_and_hms(2024, 5, 1, 23, 50, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 0, 10, 0).unwrap();
        let sessions = vec![
            session(late_yesterday, TimerMode::Pomodoro),
            session(now, TimerMode::Pomodoro),
        ];
        let stats = SessionStats::compute(&sessions, &now, DEFAULT_HISTORY_DAYS);
        assert_eq!(stats.today_pomodoros, 1);
        assert_eq!(stats.total_pomodoros, 2);
    }

    #[test]
    fn dates_follow_the_given_timezone() {
        // 23:30 UTC is already the next day at UTC+2.
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 23, 30, 0).unwrap();
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = Utc
            .with_ymd_and_hms(2024, 5, 2, 8, 0, 0)
            .unwrap()
            .with_timezone(&tz);
        let stats = SessionStats::compute(&[session(at, TimerMode::Pomodoro)], &now, 7);
        assert_eq!(stats.today_pomodoros, 1);
        assert_eq!(
            stats.daily[0].date,
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
        );
    }

    #[test]
    fn daily_is_newest_first_and_truncated() {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let sessions: Vec<Session> = (0..10)
            .map(|day| session(base + Duration::days(day), TimerMode::Pomodoro))
            .collect();
        let now = base + Duration::days(9);
        let stats = SessionStats::compute(&sessions, &now, 7);
        assert_eq!(stats.daily.len(), 7);
        assert_eq!(
            stats.daily[0].date,
            NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
        );
        assert_eq!(
            stats.daily[6].date,
            NaiveDate::from_ymd_opt(2024, 5, 4).unwrap()
        );
        assert!(stats
            .daily
            .windows(2)
            .all(|pair| pair[0].date > pair[1].date));
    }

    #[test]
    fn break_only_days_show_zero_pomodoros() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let stats = SessionStats::compute(&[session(at, TimerMode::LongBreak)], &at, 7);
        assert_eq!(stats.total_pomodoros, 0);
        assert_eq!(stats.daily.len(), 1);
        assert_eq!(stats.daily[0].pomodoros, 0);
        assert_eq!(stats.daily[0].focus_minutes, 0.0);
    }

    #[test]
    fn empty_history() {
        let now = Utc::now();
        let stats = SessionStats::compute(&[], &now, 7);
        assert_eq!(stats, SessionStats::default());
    }

    #[test]
    fn minutes_formatting() {
        assert_eq!(format_minutes(50.0), "50 min");
        assert_eq!(format_minutes(0.0), "0 min");
        assert_eq!(format_minutes(75.0), "1h 15m");
        assert_eq!(format_minutes(150.0), "2h 30m");
    }
}
