//! Ramadan timetable support.
//!
//! The timetable is a fixed, separately published month of rows (one per
//! fasting day) with 12-hour `H:MM AM` strings. Some cities need the whole
//! table shifted by a constant number of minutes.

use crate::error::{AppError, AppResult};
use crate::models::time::MINUTES_PER_DAY;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Year the bundled timetable dates belong to.
pub const TIMETABLE_YEAR: i32 = 2026;

lazy_static! {
    static ref TIME_12H: Regex = Regex::new(r"(?i)^(\d{1,2}):(\d{2})\s*(AM|PM)$").expect("valid regex");
}

/// Per-city correction, in minutes, applied to the published timetable.
const CITY_OFFSETS: &[(&str, i32)] = &[("Tokyo", -17)];

const MONTHS: &[(&str, u32)] = &[
    ("january", 1), ("jan", 1),
    ("february", 2), ("feb", 2),
    ("march", 3), ("mar", 3),
    ("april", 4), ("apr", 4),
    ("may", 5),
    ("june", 6), ("jun", 6),
    ("july", 7), ("jul", 7),
    ("august", 8), ("aug", 8),
    ("september", 9), ("sep", 9),
    ("october", 10), ("oct", 10),
    ("november", 11), ("nov", 11),
    ("december", 12), ("dec", 12),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableRow {
    #[serde(rename = "Day", deserialize_with = "string_or_number")]
    pub day: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Suhoor End", default)]
    pub suhoor_end: String,
    #[serde(rename = "Fajr", default)]
    pub fajr: String,
    #[serde(rename = "Sunrise", default)]
    pub sunrise: String,
    #[serde(rename = "Zuhr", default)]
    pub zuhr: String,
    #[serde(rename = "Ashar", default)]
    pub ashar: String,
    #[serde(rename = "Maghrib", default)]
    pub maghrib: String,
    #[serde(rename = "Iftar Start", default)]
    pub iftar_start: String,
    #[serde(rename = "Isha", default)]
    pub isha: String,
}

impl TimetableRow {
    fn times_mut(&mut self) -> [&mut String; 8] {
        [
            &mut self.suhoor_end,
            &mut self.fajr,
            &mut self.sunrise,
            &mut self.zuhr,
            &mut self.ashar,
            &mut self.maghrib,
            &mut self.iftar_start,
            &mut self.isha,
        ]
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n.to_string(),
        Raw::Text(s) => s,
    })
}

pub fn offset_for_city(city: &str) -> i32 {
    CITY_OFFSETS
        .iter()
        .find(|(name, _)| *name == city)
        .map(|(_, offset)| *offset)
        .unwrap_or(0)
}

/// Shifts a 12-hour time string by `offset` minutes, wrapping around
/// midnight. The hour keeps its original width (`4:55 AM` stays unpadded,
/// `04:55 AM` stays padded). Text that is not a 12-hour time is returned as is.
pub fn shift_time(text: &str, offset: i32) -> String {
    if offset == 0 {
        return text.to_string();
    }
    let Some(caps) = TIME_12H.captures(text.trim()) else {
        debug!("Leaving unrecognized time '{}' unshifted", text);
        return text.to_string();
    };

    let hour_text = &caps[1];
    let (Ok(hour12), Ok(minute)) = (hour_text.parse::<i32>(), caps[2].parse::<i32>()) else {
        return text.to_string();
    };
    if !(1..=12).contains(&hour12) || minute > 59 {
        return text.to_string();
    }

    let mut hour24 = hour12 % 12;
    if caps[3].eq_ignore_ascii_case("PM") {
        hour24 += 12;
    }

    let total = (((hour24 * 60 + minute + offset) % MINUTES_PER_DAY) + MINUTES_PER_DAY) % MINUTES_PER_DAY;
    let shifted_hour24 = total / 60;
    let period = if shifted_hour24 >= 12 { "PM" } else { "AM" };
    let shifted_hour12 = match shifted_hour24 % 12 {
        0 => 12,
        h => h,
    };

    if hour_text.len() == 2 {
        format!("{:02}:{:02} {}", shifted_hour12, total % 60, period)
    } else {
        format!("{}:{:02} {}", shifted_hour12, total % 60, period)
    }
}

/// Copy of `row` with every time column shifted by `offset` minutes.
pub fn adjust(row: &TimetableRow, offset: i32) -> TimetableRow {
    let mut adjusted = row.clone();
    if offset != 0 {
        for time in adjusted.times_mut() {
            *time = shift_time(time, offset);
        }
    }
    adjusted
}

/// Parses a row date such as `4 March` or `4 Mar` in `year`.
pub fn parse_row_date(text: &str, year: i32) -> Option<NaiveDate> {
    let mut parts = text.split_whitespace();
    let day: u32 = parts.next()?.parse().ok()?;
    let month_text = parts.next()?.to_lowercase();
    let month = MONTHS
        .iter()
        .find(|(name, _)| *name == month_text)
        .map(|(_, number)| *number)?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// First row dated today or later; the first row when every day has passed.
pub fn find_next_day(rows: &[TimetableRow], year: i32, today: NaiveDate) -> Option<&TimetableRow> {
    rows.iter()
        .find(|row| parse_row_date(&row.date, year).map_or(false, |date| date >= today))
        .or_else(|| rows.first())
}

pub fn find_current_day(rows: &[TimetableRow], year: i32, today: NaiveDate) -> Option<&TimetableRow> {
    rows.iter()
        .find(|row| parse_row_date(&row.date, year) == Some(today))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RamadanTimetable {
    pub year: i32,
    pub rows: Vec<TimetableRow>,
}

impl RamadanTimetable {
    pub fn new(year: i32, rows: Vec<TimetableRow>) -> Self {
        Self { year, rows }
    }

    /// Parses a JSON array of rows.
    pub fn from_json_str(json: &str, year: i32) -> AppResult<Self> {
        let rows: Vec<TimetableRow> = serde_json::from_str(json)
            .map_err(|e| AppError::parse(format!("Invalid Ramadan timetable: {}", e)))?;
        Ok(Self::new(year, rows))
    }

    pub fn from_path(path: &Path, year: i32) -> AppResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("Cannot read Ramadan timetable {:?}: {}", path, e))
        })?;
        let timetable = Self::from_json_str(&json, year)?;
        info!("Loaded {} Ramadan timetable rows from {:?}", timetable.rows.len(), path);
        Ok(timetable)
    }

    /// All rows with `city`'s offset applied.
    pub fn adjusted_rows(&self, city: &str) -> Vec<TimetableRow> {
        let offset = offset_for_city(city);
        self.rows.iter().map(|row| adjust(row, offset)).collect()
    }

    pub fn next_day(&self, city: &str, today: NaiveDate) -> Option<TimetableRow> {
        find_next_day(&self.rows, self.year, today).map(|row| adjust(row, offset_for_city(city)))
    }

    pub fn current_day(&self, city: &str, today: NaiveDate) -> Option<TimetableRow> {
        find_current_day(&self.rows, self.year, today).map(|row| adjust(row, offset_for_city(city)))
    }
}
