// file: src/models/mod.rs

// Declare modules
pub mod cache;
pub mod locations;
pub mod notification;
pub mod prayer;
pub mod settings;
pub mod time;
pub mod timings;

// Flattened so callers can write `use crate::models::PrayerSchedule`.
pub use cache::{CacheEntry, CacheKey, CACHE_KEY_PREFIX};
pub use notification::PrayerNotification;
pub use prayer::{Location, Prayer, PrayerName, PrayerSchedule, School};
pub use settings::{Setting, Settings};
pub use time::{TimeFormat, TimeOfDay};
pub use timings::{DateInfo, DayDetails, GregorianDate, HijriDate, Meta, ProviderTimings, Timings};
