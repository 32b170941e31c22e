// file: src/models/cache.rs
use super::prayer::{Location, PrayerSchedule, School};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const CACHE_KEY_PREFIX: &str = "prayer-times-";
const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_LEN: usize = 10;

/// Identifies one cached schedule: a location and school on one local day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub location: Location,
    pub school: School,
    pub date: NaiveDate,
}

impl CacheKey {
    pub fn new(location: Location, school: School, date: NaiveDate) -> Self {
        Self {
            location,
            school,
            date,
        }
    }

    /// `prayer-times-{city}-{country}-{school}-{YYYY-MM-DD}`
    pub fn storage_key(&self) -> String {
        format!(
            "{}{}-{}-{}-{}",
            CACHE_KEY_PREFIX,
            self.location.city,
            self.location.country,
            self.school.value(),
            self.date.format(DATE_FORMAT)
        )
    }

    /// Cache keys carry the prefix and end in a date. Preference keys share
    /// the prefix but never the date suffix.
    pub fn is_cache_key(storage_key: &str) -> bool {
        Self::date_of(storage_key).is_some()
    }

    /// Date suffix of a storage key. City and country may themselves contain
    /// dashes, so only the trailing date is recoverable.
    pub fn date_of(storage_key: &str) -> Option<NaiveDate> {
        if !storage_key.starts_with(CACHE_KEY_PREFIX) || storage_key.len() < CACHE_KEY_PREFIX.len() + DATE_LEN + 1 {
            return None;
        }
        let split = storage_key.len() - DATE_LEN;
        if !storage_key.is_char_boundary(split) || !storage_key[..split].ends_with('-') {
            return None;
        }
        NaiveDate::parse_from_str(&storage_key[split..], DATE_FORMAT).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub schedule: PrayerSchedule,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(key: CacheKey, schedule: PrayerSchedule) -> Self {
        Self {
            key,
            schedule,
            fetched_at: Utc::now(),
        }
    }
}
