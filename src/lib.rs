// Prayer Times Library
// Daily prayer-time loading, caching and adhan notification

pub mod alerts;
pub mod api;
pub mod audio;
pub mod cache;
pub mod clock;
pub mod config;
pub mod database;
pub mod error;
pub mod http_config;
pub mod models;
pub mod provider;
pub mod ramadan;
pub mod schedule;
pub mod service;
pub mod utils;

// Re-export commonly used types
pub use alerts::{monitor_prayers, AdhanNotifier, MonitorEvent, NotificationScheduler, Notifier};
pub use audio::{AudioManager, SoundFiles};
pub use cache::{DailyCache, KeyValueStore, MemoryStore};
pub use clock::{Clock, ManualClock, SystemClock};
pub use database::{Database, SqliteStore};
pub use error::{AppError, AppResult};
pub use models::{
    CacheEntry, CacheKey, Location, Prayer, PrayerName, PrayerNotification, PrayerSchedule, ProviderTimings,
    School, Settings, TimeFormat, TimeOfDay,
};
pub use provider::{AladhanClient, TimingsProvider, TimingsQuery};
pub use schedule::{resolve_next_prayer, NextPrayer};
pub use service::{LoadOutcome, PrayerTimesService};

use std::sync::Arc;

/// Application state shared across the application
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub audio: Arc<AudioManager>,
    pub service: PrayerTimesService,
    pub shutdown: tokio_util::sync::CancellationToken,
}
