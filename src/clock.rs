//! Wall-clock sources.
//!
//! Everything time-dependent (cache key dates, next-prayer resolution,
//! adhan matching) reads local time through [`Clock`] so it can be driven
//! deterministically in tests.

use crate::models::TimeOfDay;
use chrono::{Local, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use std::sync::Mutex;

pub trait Clock: Send + Sync {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from(self.now().time())
    }
}

/// System clock, in the host's local zone unless a zone is configured.
#[derive(Debug, Clone, Default)]
pub struct SystemClock {
    timezone: Option<Tz>,
}

impl SystemClock {
    pub fn new(timezone: Option<Tz>) -> Self {
        Self { timezone }
    }

    pub fn timezone(&self) -> Option<Tz> {
        self.timezone
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        match self.timezone {
            Some(tz) => Utc::now().with_timezone(&tz).naive_local(),
            None => Local::now().naive_local(),
        }
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
