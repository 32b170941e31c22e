#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use prayer_times::{AppError, AppResult, Notifier, PrayerNotification, ProviderTimings, TimingsProvider, TimingsQuery};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub const TIMES: [&str; 6] = ["05:12", "06:31", "12:15", "15:45", "18:02", "19:20"];

pub fn provider_timings(times: [&str; 6]) -> ProviderTimings {
    let json = format!(
        r#"{{
            "timings": {{"Fajr": "{}", "Sunrise": "{}", "Dhuhr": "{}", "Asr": "{}", "Maghrib": "{}", "Isha": "{}"}},
            "date": {{
                "readable": "16 Oct 2026",
                "gregorian": {{"date": "16-10-2026", "day": "16", "weekday": {{"en": "Friday"}},
                    "month": {{"number": 10, "en": "October"}}, "year": "2026"}},
                "hijri": {{"date": "04-05-1448", "day": "04", "weekday": {{"en": "Al Juma'a"}},
                    "month": {{"number": 5, "en": "Jumada al-ula"}}, "year": "1448"}}
            }},
            "meta": {{"timezone": "Asia/Tokyo"}}
        }}"#,
        times[0], times[1], times[2], times[3], times[4], times[5]
    );
    serde_json::from_str(&json).unwrap()
}

pub fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, day)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

/// Provider returning canned times, switchable into failure mode.
pub struct FakeProvider {
    times: Mutex<[&'static str; 6]>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl FakeProvider {
    pub fn new(times: [&'static str; 6]) -> Self {
        Self {
            times: Mutex::new(times),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_times(&self, times: [&'static str; 6]) {
        *self.times.lock().unwrap() = times;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TimingsProvider for FakeProvider {
    async fn fetch_timings(&self, _query: &TimingsQuery) -> AppResult<ProviderTimings> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::provider("Timings request failed: 503 Service Unavailable"));
        }
        let times = *self.times.lock().unwrap();
        Ok(provider_timings(times))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub received: Mutex<Vec<PrayerNotification>>,
}

impl RecordingNotifier {
    pub fn received(&self) -> Vec<PrayerNotification> {
        self.received.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &PrayerNotification) {
        self.received.lock().unwrap().push(notification.clone());
    }
}
