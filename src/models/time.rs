// file: src/models/time.rs
use crate::error::{AppError, AppResult};
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MINUTES_PER_DAY: i32 = 24 * 60;

/// A wall-clock time with minute precision, as the timings API reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "12")]
    H12,
    #[serde(rename = "24")]
    H24,
}

impl TimeFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFormat::H12 => "12",
            TimeFormat::H24 => "24",
        }
    }
}

impl FromStr for TimeFormat {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s.trim() {
            "12" => Ok(TimeFormat::H12),
            "24" => Ok(TimeFormat::H24),
            other => Err(AppError::invalid_input(format!("Unknown time format: {}", other))),
        }
    }
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> AppResult<Self> {
        if hour > 23 || minute > 59 {
            return Err(AppError::parse(format!("Time out of range: {}:{}", hour, minute)));
        }
        Ok(Self { hour, minute })
    }

    /// Builds a time from minutes since midnight, wrapping across day boundaries.
    pub fn from_minutes(total: i32) -> Self {
        let wrapped = ((total % MINUTES_PER_DAY) + MINUTES_PER_DAY) % MINUTES_PER_DAY;
        Self {
            hour: (wrapped / 60) as u8,
            minute: (wrapped % 60) as u8,
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn minutes_since_midnight(&self) -> i32 {
        self.hour as i32 * 60 + self.minute as i32
    }

    pub fn add_minutes(&self, offset: i32) -> Self {
        Self::from_minutes(self.minutes_since_midnight() + offset)
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        // hour/minute are range-checked on construction
        NaiveTime::from_hms_opt(self.hour as u32, self.minute as u32, 0).unwrap_or(NaiveTime::MIN)
    }

    pub fn format(&self, format: TimeFormat) -> String {
        match format {
            TimeFormat::H24 => self.to_string(),
            TimeFormat::H12 => {
                let period = if self.hour >= 12 { "PM" } else { "AM" };
                let hour12 = match self.hour % 12 {
                    0 => 12,
                    h => h,
                };
                format!("{:02}:{:02} {}", hour12, self.minute, period)
            }
        }
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(time: NaiveTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        let trimmed = s.trim();
        let (hour_text, minute_text) = trimmed
            .split_once(':')
            .ok_or_else(|| AppError::parse(format!("Expected HH:MM, got '{}'", s)))?;

        let well_formed = (1..=2).contains(&hour_text.len())
            && minute_text.len() == 2
            && hour_text.chars().all(|c| c.is_ascii_digit())
            && minute_text.chars().all(|c| c.is_ascii_digit());
        if !well_formed {
            return Err(AppError::parse(format!("Expected HH:MM, got '{}'", s)));
        }

        let hour = hour_text
            .parse::<u8>()
            .map_err(|e| AppError::parse(format!("Invalid hour in '{}': {}", s, e)))?;
        let minute = minute_text
            .parse::<u8>()
            .map_err(|e| AppError::parse(format!("Invalid minute in '{}': {}", s, e)))?;

        Self::new(hour, minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = AppError;

    fn try_from(value: String) -> AppResult<Self> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}
