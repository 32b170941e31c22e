// file: src/models/timings.rs
// Wire shapes of the upstream timings API (`data` object of timingsByCity).
use super::prayer::PrayerName;
use serde::{Deserialize, Serialize};

/// Raw `HH:MM` strings keyed by prayer, exactly as the provider sends them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Timings {
    pub fajr: String,
    pub sunrise: String,
    pub dhuhr: String,
    pub asr: String,
    pub maghrib: String,
    pub isha: String,
}

impl Timings {
    pub fn get(&self, name: PrayerName) -> &str {
        match name {
            PrayerName::Fajr => &self.fajr,
            PrayerName::Sunrise => &self.sunrise,
            PrayerName::Dhuhr => &self.dhuhr,
            PrayerName::Asr => &self.asr,
            PrayerName::Maghrib => &self.maghrib,
            PrayerName::Isha => &self.isha,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeekdayName {
    pub en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonthName {
    pub number: u32,
    pub en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GregorianDate {
    pub date: String,
    #[serde(default)]
    pub format: String,
    pub day: String,
    #[serde(default)]
    pub weekday: WeekdayName,
    #[serde(default)]
    pub month: MonthName,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HijriDate {
    pub date: String,
    #[serde(default)]
    pub format: String,
    pub day: String,
    #[serde(default)]
    pub weekday: WeekdayName,
    #[serde(default)]
    pub month: MonthName,
    pub year: String,
}

impl GregorianDate {
    /// "Friday, October 16, 2026 [16-10-2026 AD]"
    pub fn display(&self) -> String {
        format!(
            "{}, {} {}, {} [{} AD]",
            self.weekday.en, self.month.en, self.day, self.year, self.date
        )
    }
}

impl HijriDate {
    /// "Al Juma'a (الجمعة), 04 Jumādá al-ūlá (جُمادى الأولى), 1448 [04-05-1448 AH]"
    pub fn display(&self) -> String {
        format!(
            "{} ({}), {} {} ({}), {} [{} AH]",
            self.weekday.en,
            self.weekday.ar.as_deref().unwrap_or(""),
            self.day,
            self.month.en,
            self.month.ar.as_deref().unwrap_or(""),
            self.year,
            self.date
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInfo {
    #[serde(default)]
    pub readable: String,
    pub gregorian: GregorianDate,
    pub hijri: HijriDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderTimings {
    pub timings: Timings,
    pub date: DateInfo,
    pub meta: Meta,
}

/// Calendar and timezone details carried alongside a cached schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayDetails {
    pub gregorian: GregorianDate,
    pub hijri: HijriDate,
    pub timezone: String,
}

impl From<&ProviderTimings> for DayDetails {
    fn from(data: &ProviderTimings) -> Self {
        Self {
            gregorian: data.date.gregorian.clone(),
            hijri: data.date.hijri.clone(),
            timezone: data.meta.timezone.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "timings": {
            "Fajr": "05:12", "Sunrise": "06:31", "Dhuhr": "12:15", "Asr": "15:45",
            "Sunset": "18:00", "Maghrib": "18:02", "Isha": "19:20", "Imsak": "05:02",
            "Midnight": "00:07"
        },
        "date": {
            "readable": "16 Oct 2026",
            "timestamp": "1792108800",
            "gregorian": {
                "date": "16-10-2026", "format": "DD-MM-YYYY", "day": "16",
                "weekday": {"en": "Friday"}, "month": {"number": 10, "en": "October"},
                "year": "2026", "designation": {"abbreviated": "AD", "expanded": "Anno Domini"}
            },
            "hijri": {
                "date": "04-05-1448", "format": "DD-MM-YYYY", "day": "04",
                "weekday": {"en": "Al Juma'a", "ar": "الجمعة"},
                "month": {"number": 5, "en": "Jumādá al-ūlá", "ar": "جُمادى الأولى"},
                "year": "1448", "holidays": []
            }
        },
        "meta": {"latitude": 34.69, "longitude": 135.5, "timezone": "Asia/Tokyo"}
    }"#;

    #[test]
    fn test_deserialize_provider_payload_ignores_extra_fields() {
        let data: ProviderTimings = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(data.timings.get(PrayerName::Asr), "15:45");
        assert_eq!(data.meta.timezone, "Asia/Tokyo");
        assert_eq!(data.date.hijri.month.ar.as_deref(), Some("جُمادى الأولى"));
        assert_eq!(data.date.gregorian.weekday.ar, None);
    }

    #[test]
    fn test_date_display() {
        let data: ProviderTimings = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(
            data.date.gregorian.display(),
            "Friday, October 16, 2026 [16-10-2026 AD]"
        );
        assert!(data.date.hijri.display().ends_with("1448 [04-05-1448 AH]"));
    }

    #[test]
    fn test_day_details_from_payload() {
        let data: ProviderTimings = serde_json::from_str(SAMPLE).unwrap();
        let details = DayDetails::from(&data);
        assert_eq!(details.timezone, "Asia/Tokyo");
        assert_eq!(details.gregorian.date, "16-10-2026");
    }
}
