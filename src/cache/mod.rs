// Daily prayer-time cache over a pluggable key/value store.
// Entries are keyed by location, school and local date, and are purged once
// their date is no longer today.

use crate::error::{AppError, AppResult};
use crate::models::{CacheEntry, CacheKey, PrayerSchedule};
use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Minimal string key/value capability the cache persists through.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;
    async fn remove(&self, key: &str) -> AppResult<()>;
    async fn keys(&self) -> AppResult<Vec<String>>;
}

/// In-process store; contents are lost on exit.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn keys(&self) -> AppResult<Vec<String>> {
        Ok(self.entries.read().await.keys().cloned().collect())
    }
}

pub struct DailyCache {
    store: Arc<dyn KeyValueStore>,
}

impl DailyCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Cached entry for `key`. Unreadable JSON counts as a miss.
    pub async fn get(&self, key: &CacheKey) -> AppResult<Option<CacheEntry>> {
        let storage_key = key.storage_key();
        let Some(raw) = self.store.get(&storage_key).await? else {
            debug!("Cache miss for {}", storage_key);
            return Ok(None);
        };

        match decode_entry(&raw) {
            Ok(entry) => {
                debug!("Cache hit for {}", storage_key);
                Ok(Some(entry))
            }
            Err(e) => {
                warn!("Ignoring cached value for {}: {}", storage_key, e);
                Ok(None)
            }
        }
    }

    /// Stores `schedule` under `key`, replacing whatever was there.
    pub async fn put(&self, key: &CacheKey, schedule: PrayerSchedule) -> AppResult<CacheEntry> {
        let entry = CacheEntry::new(key.clone(), schedule);
        let raw = serde_json::to_string(&entry)?;
        self.store.set(&key.storage_key(), &raw).await?;
        debug!("Cached schedule for {}", key.storage_key());
        Ok(entry)
    }

    /// Writes `schedule` only when nothing is cached yet or the cached prayer
    /// times differ. Returns whether the entry was replaced.
    pub async fn replace_if_changed(&self, key: &CacheKey, schedule: PrayerSchedule) -> AppResult<bool> {
        if let Some(existing) = self.get(key).await? {
            if existing.schedule.same_times(&schedule) {
                debug!("Cached schedule for {} is unchanged", key.storage_key());
                return Ok(false);
            }
        }
        self.put(key, schedule).await?;
        Ok(true)
    }

    /// Removes every cache entry not dated `today`. Keys without a cache date
    /// are left alone. Returns the number removed.
    pub async fn purge_stale(&self, today: NaiveDate) -> AppResult<usize> {
        let stale: Vec<String> = self
            .store
            .keys()
            .await?
            .into_iter()
            .filter(|key| CacheKey::date_of(key).map_or(false, |date| date != today))
            .collect();

        for key in &stale {
            self.store.remove(key).await?;
        }

        if !stale.is_empty() {
            info!("Cleared {} old cache entries", stale.len());
        }
        Ok(stale.len())
    }
}

fn decode_entry(raw: &str) -> AppResult<CacheEntry> {
    serde_json::from_str(raw).map_err(|e| AppError::cache_corruption(e.to_string()))
}
