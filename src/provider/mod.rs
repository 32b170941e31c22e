//! Upstream prayer-timings source.
//!
//! [`TimingsProvider`] is the seam between the app and the network; the
//! production implementation is [`aladhan::AladhanClient`].

pub mod aladhan;

use crate::error::{AppError, AppResult};
use crate::models::{CacheKey, DayDetails, Location, Prayer, PrayerName, PrayerSchedule, ProviderTimings, School, Settings, TimeOfDay};
use async_trait::async_trait;
use chrono::NaiveDate;
use log::warn;

pub use aladhan::AladhanClient;

/// Parameters of one timings request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingsQuery {
    pub location: Location,
    pub method: u8,
    pub school: School,
}

impl TimingsQuery {
    pub fn new(location: Location, method: u8, school: School) -> Self {
        Self {
            location,
            method,
            school,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.location(), settings.method, settings.school)
    }

    pub fn cache_key(&self, date: NaiveDate) -> CacheKey {
        CacheKey::new(self.location.clone(), self.school, date)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TimingsProvider: Send + Sync {
    /// Today's timings for the query. Any failure is `AppError::Provider`.
    async fn fetch_timings(&self, query: &TimingsQuery) -> AppResult<ProviderTimings>;
}

/// Provider times look like `05:12`, sometimes followed by a zone tag such as
/// `05:12 (JST)`.
pub fn parse_provider_time(raw: &str) -> AppResult<TimeOfDay> {
    raw.split_whitespace()
        .next()
        .ok_or_else(|| AppError::parse("empty prayer time"))?
        .parse()
}

/// Builds the schedule for `key` from a provider payload. Prayers whose time
/// does not parse are dropped; a payload with no usable prayer is an error.
pub fn to_schedule(data: &ProviderTimings, key: CacheKey) -> AppResult<PrayerSchedule> {
    let mut prayers = Vec::with_capacity(PrayerName::ALL.len());
    for name in PrayerName::ALL {
        let raw = data.timings.get(name);
        match parse_provider_time(raw) {
            Ok(time) => prayers.push(Prayer::new(name, time)),
            Err(e) => warn!("Skipping {} with unreadable time '{}': {}", name, raw, e),
        }
    }

    if prayers.is_empty() {
        return Err(AppError::provider("No readable prayer times in response"));
    }

    Ok(PrayerSchedule::new(key, prayers)?.with_details(DayDetails::from(data)))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::ProviderTimings;

    /// A timingsByCity `data` object with the given Fajr..Isha times.
    pub fn provider_timings(times: [&str; 6]) -> ProviderTimings {
        let json = format!(
            r#"{{
                "timings": {{"Fajr": "{}", "Sunrise": "{}", "Dhuhr": "{}", "Asr": "{}", "Maghrib": "{}", "Isha": "{}"}},
                "date": {{
                    "readable": "16 Oct 2026",
                    "gregorian": {{"date": "16-10-2026", "format": "DD-MM-YYYY", "day": "16",
                        "weekday": {{"en": "Friday"}}, "month": {{"number": 10, "en": "October"}}, "year": "2026"}},
                    "hijri": {{"date": "04-05-1448", "format": "DD-MM-YYYY", "day": "04",
                        "weekday": {{"en": "Al Juma'a", "ar": "الجمعة"}},
                        "month": {{"number": 5, "en": "Jumada al-ula", "ar": "جمادى الأولى"}}, "year": "1448"}}
                }},
                "meta": {{"timezone": "Asia/Tokyo"}}
            }}"#,
            times[0], times[1], times[2], times[3], times[4], times[5]
        );
        serde_json::from_str(&json).expect("fixture is valid JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::provider_timings;
    use super::*;

    fn key() -> CacheKey {
        TimingsQuery::new(Location::new("Osaka", "Japan"), 3, School::Hanafi)
            .cache_key(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap())
    }

    #[test]
    fn test_parse_provider_time() {
        assert_eq!(parse_provider_time("05:12").unwrap(), "05:12".parse().unwrap());
        assert_eq!(parse_provider_time("5:12 (JST)").unwrap(), "05:12".parse().unwrap());
        assert!(parse_provider_time("").is_err());
        assert!(parse_provider_time("noon").is_err());
    }

    #[test]
    fn test_to_schedule_orders_and_labels() {
        let data = provider_timings(["05:12", "06:31", "12:15", "15:45", "18:02", "19:20"]);
        let schedule = to_schedule(&data, key()).unwrap();

        let names: Vec<_> = schedule.prayers().iter().map(|p| p.name).collect();
        assert_eq!(names, PrayerName::ALL.to_vec());
        assert_eq!(schedule.get(PrayerName::Asr).unwrap().label(), "عصر");
        assert_eq!(schedule.details().unwrap().timezone, "Asia/Tokyo");
    }

    #[test]
    fn test_to_schedule_skips_malformed_times() {
        let data = provider_timings(["05:12", "--:--", "12:15", "15:45", "18:02", "19:20"]);
        let schedule = to_schedule(&data, key()).unwrap();
        assert_eq!(schedule.prayers().len(), 5);
        assert!(schedule.get(PrayerName::Sunrise).is_none());
    }

    #[test]
    fn test_to_schedule_rejects_empty_payload() {
        let data = provider_timings(["x", "x", "x", "x", "x", "x"]);
        let err = to_schedule(&data, key()).unwrap_err();
        assert!(err.is_provider_failure());
    }
}
