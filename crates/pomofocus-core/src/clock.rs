//! Wall-clock abstraction.
//!
//! Record ids and timestamps come from a [`Clock`] so that tests can pin
//! "now" instead of sleeping.

use std::cell::Cell;

use chrono::{DateTime, TimeZone, Utc};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    fn now_ms(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// The real system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now_ms: Cell<i64>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now_ms: Cell::new(start.timestamp_millis()),
        }
    }

    pub fn advance_secs(&self, secs: i64) {
        self.now_ms.set(self.now_ms.get() + secs * 1000);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.now_ms.get())
            .single()
            .unwrap_or_default()
    }
}

/// Allocate a timestamp-derived id that does not collide with `taken`.
///
/// Ids are the epoch-millisecond value as a decimal string; when two records
/// are created within the same millisecond the value is bumped.
pub(crate) fn unique_millis_id(now_ms: i64, taken: impl Fn(&str) -> bool) -> String {
    let mut candidate = now_ms;
    loop {
        let id = candidate.to_string();
        if !taken(&id) {
            return id;
        }
        candidate += 1;
    }
}
