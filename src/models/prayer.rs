// file: src/models/prayer.rs
use super::cache::CacheKey;
use super::time::TimeOfDay;
use super::timings::DayDetails;
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrayerName {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    pub const ALL: [PrayerName; 6] = [
        PrayerName::Fajr,
        PrayerName::Sunrise,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
    ];

    /// The five obligatory prayers; Sunrise is only a marker.
    pub const DAILY: [PrayerName; 5] = [
        PrayerName::Fajr,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Fajr",
            PrayerName::Sunrise => "Sunrise",
            PrayerName::Dhuhr => "Dhuhr",
            PrayerName::Asr => "Asr",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isha",
        }
    }

    pub fn arabic(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "فجر",
            PrayerName::Sunrise => "شروق",
            PrayerName::Dhuhr => "ظهر",
            PrayerName::Asr => "عصر",
            PrayerName::Maghrib => "مغرب",
            PrayerName::Isha => "عشاء",
        }
    }
}

impl fmt::Display for PrayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrayerName {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        PrayerName::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::invalid_input(format!("Unknown prayer: {}", s)))
    }
}

/// Jurisprudential convention used upstream for the Asr calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum School {
    Shafi,
    #[default]
    Hanafi,
}

impl School {
    pub fn value(&self) -> u8 {
        match self {
            School::Shafi => 0,
            School::Hanafi => 1,
        }
    }

    /// Zero is Shafi; every other value is treated as Hanafi.
    pub fn from_value(value: u8) -> Self {
        if value == 0 {
            School::Shafi
        } else {
            School::Hanafi
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            School::Shafi => "Shafi",
            School::Hanafi => "Hanafi",
        }
    }
}

impl FromStr for School {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        let trimmed = s.trim();
        if let Ok(value) = trimmed.parse::<u8>() {
            return Ok(School::from_value(value));
        }
        match trimmed.to_lowercase().as_str() {
            "shafi" => Ok(School::Shafi),
            "hanafi" => Ok(School::Hanafi),
            _ => Err(AppError::invalid_input(format!("Unknown school: {}", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub country: String,
}

impl Location {
    pub fn new<C: Into<String>, K: Into<String>>(city: C, country: K) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.city, self.country)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prayer {
    pub name: PrayerName,
    pub time: TimeOfDay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localized_label: Option<String>,
}

impl Prayer {
    pub fn new(name: PrayerName, time: TimeOfDay) -> Self {
        Self {
            name,
            time,
            localized_label: Some(name.arabic().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        self.localized_label.as_deref().unwrap_or_else(|| self.name.arabic())
    }
}

/// One day of prayer times at one location. Never mutated once built;
/// a fresher fetch replaces the whole value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredSchedule")]
pub struct PrayerSchedule {
    key: CacheKey,
    prayers: Vec<Prayer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<DayDetails>,
}

/// Serialized form, checked before it becomes a [`PrayerSchedule`].
#[derive(Deserialize)]
struct StoredSchedule {
    key: CacheKey,
    prayers: Vec<Prayer>,
    #[serde(default)]
    details: Option<DayDetails>,
}

impl TryFrom<StoredSchedule> for PrayerSchedule {
    type Error = AppError;

    fn try_from(stored: StoredSchedule) -> AppResult<Self> {
        if stored.prayers.windows(2).any(|pair| pair[0].time > pair[1].time) {
            return Err(AppError::invalid_input("Stored prayer times are out of order"));
        }
        let mut schedule = Self::new(stored.key, stored.prayers)?;
        schedule.details = stored.details;
        Ok(schedule)
    }
}

impl PrayerSchedule {
    pub fn new(key: CacheKey, mut prayers: Vec<Prayer>) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for prayer in &prayers {
            if !seen.insert(prayer.name) {
                return Err(AppError::invalid_input(format!(
                    "Duplicate prayer in schedule: {}",
                    prayer.name
                )));
            }
        }
        // stable: equal times keep provider order
        prayers.sort_by_key(|prayer| prayer.time);

        Ok(Self {
            key,
            prayers,
            details: None,
        })
    }

    pub fn with_details(mut self, details: DayDetails) -> Self {
        self.details = Some(details);
        self
    }

    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    pub fn prayers(&self) -> &[Prayer] {
        &self.prayers
    }

    pub fn details(&self) -> Option<&DayDetails> {
        self.details.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.prayers.is_empty()
    }

    pub fn first(&self) -> Option<&Prayer> {
        self.prayers.first()
    }

    pub fn get(&self, name: PrayerName) -> Option<&Prayer> {
        self.prayers.iter().find(|prayer| prayer.name == name)
    }

    /// Structural equality of the ordered (name, time) sequence, ignoring
    /// labels and day details.
    pub fn same_times(&self, other: &PrayerSchedule) -> bool {
        self.prayers.len() == other.prayers.len()
            && self
                .prayers
                .iter()
                .zip(other.prayers.iter())
                .all(|(a, b)| a.name == b.name && a.time == b.time)
    }

    /// Copy of this schedule restricted to the given names.
    pub fn only(&self, names: &[PrayerName]) -> Self {
        Self {
            key: self.key.clone(),
            prayers: self
                .prayers
                .iter()
                .filter(|prayer| names.contains(&prayer.name))
                .cloned()
                .collect(),
            details: self.details.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn key() -> CacheKey {
        CacheKey::new(
            Location::new("Osaka", "Japan"),
            School::Hanafi,
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        )
    }

    fn prayer(name: PrayerName, time: &str) -> Prayer {
        Prayer::new(name, time.parse().unwrap())
    }

    #[test]
    fn test_schedule_sorted_by_time() {
        let schedule = PrayerSchedule::new(
            key(),
            vec![
                prayer(PrayerName::Isha, "19:20"),
                prayer(PrayerName::Fajr, "05:12"),
                prayer(PrayerName::Asr, "15:45"),
            ],
        )
        .unwrap();

        let names: Vec<_> = schedule.prayers().iter().map(|p| p.name).collect();
        assert_eq!(names, vec![PrayerName::Fajr, PrayerName::Asr, PrayerName::Isha]);
    }

    #[test]
    fn test_schedule_rejects_duplicate_names() {
        let result = PrayerSchedule::new(
            key(),
            vec![prayer(PrayerName::Fajr, "05:12"), prayer(PrayerName::Fajr, "05:13")],
        );
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_same_times_ignores_labels() {
        let a = PrayerSchedule::new(key(), vec![prayer(PrayerName::Fajr, "05:12")]).unwrap();
        let mut relabelled = prayer(PrayerName::Fajr, "05:12");
        relabelled.localized_label = None;
        let b = PrayerSchedule::new(key(), vec![relabelled]).unwrap();
        let c = PrayerSchedule::new(key(), vec![prayer(PrayerName::Fajr, "05:13")]).unwrap();

        assert!(a.same_times(&b));
        assert!(!a.same_times(&c));
    }

    #[test]
    fn test_deserialize_checks_order_and_names() {
        let schedule = PrayerSchedule::new(
            key(),
            vec![prayer(PrayerName::Fajr, "05:12"), prayer(PrayerName::Dhuhr, "12:15")],
        )
        .unwrap();
        let json = serde_json::to_value(&schedule).unwrap();
        let back: PrayerSchedule = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(back, schedule);

        let mut reversed = json.clone();
        reversed["prayers"].as_array_mut().unwrap().reverse();
        assert!(serde_json::from_value::<PrayerSchedule>(reversed).is_err());

        let mut duplicated = json;
        let fajr = duplicated["prayers"][0].clone();
        duplicated["prayers"].as_array_mut().unwrap().insert(0, fajr);
        assert!(serde_json::from_value::<PrayerSchedule>(duplicated).is_err());
    }

    #[test]
    fn test_only_filters_names() {
        let schedule = PrayerSchedule::new(
            key(),
            vec![prayer(PrayerName::Fajr, "05:12"), prayer(PrayerName::Sunrise, "06:30")],
        )
        .unwrap();

        let daily = schedule.only(&PrayerName::DAILY);
        assert_eq!(daily.prayers().len(), 1);
        assert!(daily.get(PrayerName::Sunrise).is_none());
    }

    #[test]
    fn test_school_values() {
        assert_eq!(School::from_value(0), School::Shafi);
        assert_eq!(School::from_value(1), School::Hanafi);
        assert_eq!(School::from_value(7), School::Hanafi);
        assert_eq!("0".parse::<School>().unwrap(), School::Shafi);
        assert_eq!("hanafi".parse::<School>().unwrap(), School::Hanafi);
        assert!("maliki".parse::<School>().is_err());
    }

    #[test]
    fn test_prayer_name_parse_and_label() {
        assert_eq!("asr".parse::<PrayerName>().unwrap(), PrayerName::Asr);
        assert_eq!(PrayerName::Maghrib.arabic(), "مغرب");
        assert_eq!(prayer(PrayerName::Isha, "19:20").label(), "عشاء");
    }
}
