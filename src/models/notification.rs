// file: src/models/notification.rs
use super::prayer::{Prayer, PrayerName};
use super::time::{TimeFormat, TimeOfDay};
use serde::{Deserialize, Serialize};

/// Payload handed to notification delivery when a prayer time arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerNotification {
    pub title: String,
    pub body: String,
    pub prayer: PrayerName,
    pub time: TimeOfDay,
    pub formatted_time: String,
}

impl PrayerNotification {
    pub fn new(prayer: &Prayer, format: TimeFormat) -> Self {
        let formatted_time = prayer.time.format(format);
        Self {
            title: format!("🕌 {} Prayer Time", prayer.name),
            body: format!("It's time for {} prayer at {}", prayer.name, formatted_time),
            prayer: prayer.name,
            time: prayer.time,
            formatted_time,
        }
    }
}
