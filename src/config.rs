//! Runtime configuration
//!
//! Everything comes from the environment; unset variables fall back to a
//! database under the user's data directory, the public Aladhan endpoint and
//! the host's local timezone.

use crate::error::{AppError, AppResult};
use crate::models::Settings;
use crate::provider::aladhan::DEFAULT_BASE_URL;
use chrono_tz::Tz;
use log::info;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "PRAYER_TIMES_DB_PATH";
pub const ENV_API_URL: &str = "PRAYER_TIMES_API_URL";
pub const ENV_TIMEZONE: &str = "PRAYER_TIMES_TZ";
pub const ENV_RAMADAN_FILE: &str = "PRAYER_TIMES_RAMADAN_FILE";

/// Highest calculation method id the upstream API defines; 99 is "custom".
const MAX_METHOD: u8 = 23;
const CUSTOM_METHOD: u8 = 99;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub api_url: String,
    pub timezone: Option<Tz>,
    pub ramadan_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let timezone = match var(ENV_TIMEZONE) {
            Some(name) => Some(
                name.trim()
                    .parse::<Tz>()
                    .map_err(|e| AppError::config(format!("{}: {}", ENV_TIMEZONE, e)))?,
            ),
            None => None,
        };

        Ok(Self {
            db_path: var(ENV_DB_PATH).map(PathBuf::from).unwrap_or_else(default_db_path),
            api_url: var(ENV_API_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timezone,
            ramadan_file: var(ENV_RAMADAN_FILE).map(PathBuf::from),
        })
    }

    pub fn validate(&self) -> AppResult<()> {
        url::Url::parse(&self.api_url)
            .map_err(|e| AppError::config(format!("{} is not a valid URL: {}", ENV_API_URL, e)))?;

        if self.db_path.as_os_str().is_empty() {
            return Err(AppError::config(format!("{} is empty", ENV_DB_PATH)));
        }

        if let Some(path) = &self.ramadan_file {
            if !path.is_file() {
                return Err(AppError::config(format!("Ramadan timetable {:?} not found", path)));
            }
        }

        info!(
            "Configuration: db={:?}, api={}, tz={}",
            self.db_path,
            self.api_url,
            self.timezone.map(|tz| tz.name().to_string()).unwrap_or_else(|| "local".to_string())
        );
        Ok(())
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("prayer-times")
        .join("prayer-times.db")
}

/// Rejects preferences the upstream API or the audio layer cannot use.
pub fn validate_settings(settings: &Settings) -> AppResult<()> {
    if settings.city.trim().is_empty() || settings.country.trim().is_empty() {
        return Err(AppError::invalid_input("City and country are required"));
    }
    if settings.method > MAX_METHOD && settings.method != CUSTOM_METHOD {
        return Err(AppError::invalid_input(format!(
            "Unknown calculation method {}",
            settings.method
        )));
    }
    if !(0.0..=1.0).contains(&settings.volume) {
        return Err(AppError::invalid_input(format!(
            "Volume {} is outside 0.0-1.0",
            settings.volume
        )));
    }
    Ok(())
}
