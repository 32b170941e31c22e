// file: src/models/settings.rs
use super::prayer::{Location, School};
use super::time::TimeFormat;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const KEY_CITY: &str = "prayer-times-city";
pub const KEY_COUNTRY: &str = "prayer-times-country";
pub const KEY_SCHOOL: &str = "prayer-times-school";
pub const KEY_TIME_FORMAT: &str = "prayer-times-timing";
pub const KEY_METHOD: &str = "prayer-times-method";
pub const KEY_VOLUME: &str = "prayer-times-volume";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub city: String,
    pub country: String,
    pub school: School,
    pub method: u8, // upstream calculation method id
    pub time_format: TimeFormat,
    pub volume: f32, // 0.0 to 1.0
}

impl Settings {
    pub fn location(&self) -> Location {
        Location::new(self.city.clone(), self.country.clone())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            city: "Osaka".to_string(),
            country: "Japan".to_string(),
            school: School::Hanafi,
            method: 3,
            time_format: TimeFormat::H12,
            volume: 0.7, // 70% volume by default
        }
    }
}
