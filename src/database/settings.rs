// file: src/database/settings.rs
use crate::models::settings::{
    KEY_CITY, KEY_COUNTRY, KEY_METHOD, KEY_SCHOOL, KEY_TIME_FORMAT, KEY_VOLUME,
};
use crate::models::locations::select_city;
use crate::models::{Setting, Settings};
use anyhow::Result;
use log::warn;
use sqlx::SqlitePool;

pub async fn get(pool: &SqlitePool) -> Result<Settings> {
    let settings = sqlx::query_as::<_, Setting>("SELECT key, value FROM settings")
        .fetch_all(pool)
        .await?;

    // Unparseable values keep their defaults
    let mut app_settings = Settings::default();
    for setting in settings {
        match setting.key.as_str() {
            KEY_CITY => app_settings.city = setting.value,
            KEY_COUNTRY => app_settings.country = setting.value,
            KEY_SCHOOL => {
                app_settings.school = setting.value.parse().unwrap_or(app_settings.school)
            }
            KEY_TIME_FORMAT => {
                app_settings.time_format = setting.value.parse().unwrap_or_default()
            }
            KEY_METHOD => app_settings.method = setting.value.parse().unwrap_or(3),
            KEY_VOLUME => app_settings.volume = setting.value.parse().unwrap_or(0.7),
            other => warn!("Ignoring unknown setting '{}'", other),
        }
    }

    // A city the saved country does not offer falls back to its first city
    if let Some(city) = select_city(&app_settings.country, Some(app_settings.city.as_str())) {
        if city != app_settings.city {
            warn!(
                "{} is not offered for {}, using {}",
                app_settings.city, app_settings.country, city
            );
            app_settings.city = city.to_string();
        }
    }

    Ok(app_settings)
}

pub async fn update(pool: &SqlitePool, settings: &Settings) -> Result<()> {
    let school_str = settings.school.value().to_string();
    let method_str = settings.method.to_string();
    let volume_str = settings.volume.to_string();

    let updates = vec![
        (KEY_CITY, settings.city.as_str()),
        (KEY_COUNTRY, settings.country.as_str()),
        (KEY_SCHOOL, school_str.as_str()),
        (KEY_TIME_FORMAT, settings.time_format.as_str()),
        (KEY_METHOD, method_str.as_str()),
        (KEY_VOLUME, volume_str.as_str()),
    ];

    let mut tx = pool.begin().await?;
    for (key, value) in updates {
        sqlx::query(
            "INSERT INTO settings (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    Ok(())
}
