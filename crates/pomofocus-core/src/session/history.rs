use std::rc::Rc;

use chrono::{DateTime, Local, TimeZone};
use tracing::{debug, info};

use super::stats::{SessionStats, DEFAULT_HISTORY_DAYS};
use super::Session;
use crate::clock::{unique_millis_id, Clock};
use crate::observer::Observers;
use crate::storage::{load_list, save_list, KeyValueStore, SESSIONS_KEY};
use crate::timer::TimerMode;

/// Owns the session history and mirrors it to the store.
///
/// Append-only: there is no edit or delete. Statistics are recomputed from
/// the full list on every call.
pub struct SessionLog {
    store: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
    sessions: Vec<Session>,
    history_days: usize,
    observers: Observers<Session>,
}

impl SessionLog {
    /// Load the persisted history. Missing or malformed data starts empty.
    pub fn load(store: Rc<dyn KeyValueStore>, clock: Rc<dyn Clock>) -> Self {
        let sessions = load_list(store.as_ref(), SESSIONS_KEY);
        debug!(count = sessions.len(), "loaded sessions");
        Self {
            store,
            clock,
            sessions,
            history_days: DEFAULT_HISTORY_DAYS,
            observers: Observers::default(),
        }
    }

    /// Limit the per-day history to the `days` most recent active dates.
    pub fn set_history_days(&mut self, days: usize) {
        self.history_days = days;
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Register a callback run with the full list after every append.
    pub fn subscribe(&mut self, observer: impl Fn(&[Session]) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Record a finished interval, stamped with the current time.
    pub fn append(
        &mut self,
        duration_secs: u32,
        mode: TimerMode,
        task_id: Option<String>,
    ) -> &Session {
        let now_ms = self.clock.now_ms();
        let id = unique_millis_id(now_ms, |candidate| {
            self.sessions.iter().any(|s| s.id == candidate)
        });
        info!(%mode, duration_secs, task_id = task_id.as_deref().unwrap_or("-"), "session logged");
        self.sessions.push(Session {
            id,
            timestamp: now_ms,
            duration: duration_secs,
            mode,
            task_id,
        });
        save_list(self.store.as_ref(), SESSIONS_KEY, &self.sessions);
        self.observers.notify(&self.sessions);
        &self.sessions[self.sessions.len() - 1]
    }

    /// Statistics relative to the current local date.
    pub fn aggregate(&self) -> SessionStats {
        let now = self.clock.now().with_timezone(&Local);
        self.aggregate_at(&now)
    }

    /// Statistics relative to `now`; calendar dates are taken in `now`'s zone.
    pub fn aggregate_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> SessionStats {
        SessionStats::compute(&self.sessions, now, self.history_days)
    }
}

impl std::fmt::Debug for SessionLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLog")
            .field("sessions", &self.sessions.len())
            .field("history_days", &self.history_days)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStore;
    use chrono::Utc;
    use std::cell::RefCell;

    fn log_at(start: DateTime<Utc>) -> (SessionLog, Rc<MemoryStore>, Rc<ManualClock>) {
        let store = Rc::new(MemoryStore::new());
        let clock = Rc::new(ManualClock::new(start));
        let log = SessionLog::load(store.clone(), clock.clone());
        (log, store, clock)
    }

    #[test]
    fn append_stamps_with_clock_and_persists() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 25, 0).unwrap();
        let (mut log, store, _) = log_at(start);
        let session = log
            .append(1500, TimerMode::Pomodoro, Some("7".into()))
            .clone();
        assert_eq!(session.timestamp, start.timestamp_millis());
        assert_eq!(session.id, start.timestamp_millis().to_string());
        assert_eq!(session.task_id.as_deref(), Some("7"));

        let persisted: Vec<Session> =
            serde_json::from_str(&store.get(SESSIONS_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(persisted, vec![session]);
    }

    #[test]
    fn history_survives_reload() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 25, 0).unwrap();
        let (mut log, store, clock) = log_at(start);
        log.append(1500, TimerMode::Pomodoro, None);
        clock.advance_secs(300);
        log.append(300, TimerMode::ShortBreak, None);

        let reloaded = SessionLog::load(store, clock);
        assert_eq!(reloaded.sessions(), log.sessions());
    }

    #[test]
    fn observers_see_every_append() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 25, 0).unwrap();
        let (mut log, _, _) = log_at(start);
        let lengths = Rc::new(RefCell::new(Vec::new()));
        let sink = lengths.clone();
        log.subscribe(move |sessions| sink.borrow_mut().push(sessions.len()));
        log.append(1500, TimerMode::Pomodoro, None);
        log.append(300, TimerMode::ShortBreak, None);
        assert_eq!(*lengths.borrow(), vec![1, 2]);
    }

    #[test]
    fn aggregate_uses_clock_date() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let (mut log, _, _) = log_at(start);
        log.append(1500, TimerMode::Pomodoro, None);
        let stats = log.aggregate_at(&start);
        assert_eq!(stats.today_pomodoros, 1);
        assert_eq!(stats.total_pomodoros, 1);
    }
}
