//! Cache-first loading of the displayed prayer schedule.
//!
//! A cached schedule for today is shown immediately and refreshed once in the
//! background. On a miss the provider is asked directly; if that fails, the
//! cache is consulted once more before the error is surfaced.

use crate::cache::DailyCache;
use crate::clock::Clock;
use crate::error::AppResult;
use crate::models::{CacheKey, PrayerSchedule};
use crate::provider::{to_schedule, TimingsProvider, TimingsQuery};
use crate::utils::logging::{log_cache_purge, log_schedule_loaded};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub type DisplayedSchedule = Option<Arc<PrayerSchedule>>;

#[derive(Debug)]
pub enum LoadOutcome {
    /// Served from today's cache entry; `refresh` re-fetches in the background.
    Cached {
        schedule: Arc<PrayerSchedule>,
        refresh: JoinHandle<()>,
    },
    Fetched(Arc<PrayerSchedule>),
    /// The provider failed but a cache entry turned up on the second look.
    Fallback(Arc<PrayerSchedule>),
}

impl LoadOutcome {
    pub fn schedule(&self) -> &Arc<PrayerSchedule> {
        match self {
            LoadOutcome::Cached { schedule, .. } => schedule,
            LoadOutcome::Fetched(schedule) | LoadOutcome::Fallback(schedule) => schedule,
        }
    }
}

#[derive(Clone)]
pub struct PrayerTimesService {
    provider: Arc<dyn TimingsProvider>,
    cache: Arc<DailyCache>,
    clock: Arc<dyn Clock>,
    displayed: Arc<watch::Sender<DisplayedSchedule>>,
}

impl PrayerTimesService {
    pub fn new(provider: Arc<dyn TimingsProvider>, cache: Arc<DailyCache>, clock: Arc<dyn Clock>) -> Self {
        let (displayed, _) = watch::channel(None);
        Self {
            provider,
            cache,
            clock,
            displayed: Arc::new(displayed),
        }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn cache(&self) -> &Arc<DailyCache> {
        &self.cache
    }

    /// Receiver that observes every change of the displayed schedule.
    pub fn subscribe(&self) -> watch::Receiver<DisplayedSchedule> {
        self.displayed.subscribe()
    }

    pub fn current(&self) -> DisplayedSchedule {
        self.displayed.borrow().clone()
    }

    pub async fn load(&self, query: &TimingsQuery) -> AppResult<LoadOutcome> {
        let key = query.cache_key(self.clock.today());

        if let Some(entry) = self.cache.get(&key).await? {
            let schedule = Arc::new(entry.schedule);
            log_schedule_loaded(&key, "cache", schedule.prayers().len());
            self.publish(schedule.clone());

            let service = self.clone();
            let query = query.clone();
            let refresh = tokio::spawn(async move {
                service.refresh(&query, &key).await;
            });
            return Ok(LoadOutcome::Cached { schedule, refresh });
        }

        match self.fetch(query, &key).await {
            Ok(schedule) => {
                let entry = self.cache.put(&key, schedule).await?;
                let schedule = Arc::new(entry.schedule);
                log_schedule_loaded(&key, "provider", schedule.prayers().len());
                self.publish(schedule.clone());
                Ok(LoadOutcome::Fetched(schedule))
            }
            Err(e) if e.is_provider_failure() => {
                warn!("Fetching prayer times failed: {}", e);
                match self.cache.get(&key).await? {
                    Some(entry) => {
                        info!("Using cached prayer times after fetch failure");
                        let schedule = Arc::new(entry.schedule);
                        log_schedule_loaded(&key, "cache fallback", schedule.prayers().len());
                        self.publish(schedule.clone());
                        Ok(LoadOutcome::Fallback(schedule))
                    }
                    None => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Removes cache entries not dated today.
    pub async fn purge_stale(&self) -> AppResult<usize> {
        let started = Instant::now();
        let removed = self.cache.purge_stale(self.clock.today()).await?;
        log_cache_purge(removed, started.elapsed().as_millis() as u64);
        Ok(removed)
    }

    async fn fetch(&self, query: &TimingsQuery, key: &CacheKey) -> AppResult<PrayerSchedule> {
        let data = self.provider.fetch_timings(query).await?;
        to_schedule(&data, key.clone())
    }

    async fn refresh(&self, query: &TimingsQuery, key: &CacheKey) {
        let schedule = match self.fetch(query, key).await {
            Ok(schedule) => schedule,
            Err(e) => {
                debug!("Background refresh failed: {}", e);
                return;
            }
        };

        match self.cache.replace_if_changed(key, schedule.clone()).await {
            Ok(true) => debug!("Updated cached prayer times for {}", key.storage_key()),
            Ok(false) => {}
            Err(e) => warn!("Could not store refreshed prayer times: {}", e),
        }

        let stale = self
            .current()
            .map(|shown| shown.key() == key && !shown.same_times(&schedule))
            .unwrap_or(false);
        if stale {
            info!("Prayer times changed upstream, updating display");
            self.publish(Arc::new(schedule));
        }
    }

    fn publish(&self, schedule: Arc<PrayerSchedule>) {
        self.displayed.send_replace(Some(schedule));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use crate::clock::ManualClock;
    use crate::error::AppError;
    use crate::models::{Location, PrayerName, ProviderTimings, School};
    use crate::provider::fixtures::provider_timings;
    use crate::provider::MockTimingsProvider;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    const TIMES: [&str; 6] = ["05:12", "06:31", "12:15", "15:45", "18:02", "19:20"];
    const LATER: [&str; 6] = ["05:13", "06:32", "12:15", "15:45", "18:01", "19:19"];

    fn query() -> TimingsQuery {
        TimingsQuery::new(Location::new("Osaka", "Japan"), 3, School::Hanafi)
    }

    fn clock() -> Arc<ManualClock> {
        let now = NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(13, 0, 0)
            .unwrap();
        Arc::new(ManualClock::new(now))
    }

    fn service(provider: MockTimingsProvider) -> PrayerTimesService {
        let cache = Arc::new(DailyCache::new(Arc::new(MemoryStore::new())));
        PrayerTimesService::new(Arc::new(provider), cache, clock())
    }

    async fn seed(service: &PrayerTimesService, times: [&str; 6]) {
        let key = query().cache_key(service.clock().today());
        let schedule = to_schedule(&provider_timings(times), key.clone()).unwrap();
        service.cache().put(&key, schedule).await.unwrap();
    }

    #[tokio::test]
    async fn test_miss_fetches_and_caches() {
        let mut provider = MockTimingsProvider::new();
        provider
            .expect_fetch_timings()
            .times(1)
            .returning(|_| Ok(provider_timings(TIMES)));
        let service = service(provider);

        let outcome = service.load(&query()).await.unwrap();
        assert!(matches!(outcome, LoadOutcome::Fetched(_)));
        assert_eq!(outcome.schedule().prayers().len(), 6);
        assert_eq!(service.current().unwrap().as_ref(), outcome.schedule().as_ref());

        let key = query().cache_key(service.clock().today());
        assert!(service.cache().get(&key).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_hit_displays_cache_then_refreshes() {
        let mut provider = MockTimingsProvider::new();
        provider
            .expect_fetch_timings()
            .times(1)
            .returning(|_| Ok(provider_timings(LATER)));
        let service = service(provider);
        seed(&service, TIMES).await;
        let mut rx = service.subscribe();

        let outcome = service.load(&query()).await.unwrap();
        let LoadOutcome::Cached { schedule, refresh } = outcome else {
            panic!("expected a cache hit");
        };
        assert_eq!(schedule.get(PrayerName::Fajr).unwrap().time, "05:12".parse().unwrap());

        refresh.await.unwrap();
        assert!(rx.has_changed().unwrap());
        let shown = rx.borrow_and_update().clone().unwrap();
        assert_eq!(shown.get(PrayerName::Fajr).unwrap().time, "05:13".parse().unwrap());
    }

    #[tokio::test]
    async fn test_refresh_with_same_times_keeps_display() {
        let mut provider = MockTimingsProvider::new();
        provider
            .expect_fetch_timings()
            .returning(|_| Ok(provider_timings(TIMES)));
        let service = service(provider);
        seed(&service, TIMES).await;

        let outcome = service.load(&query()).await.unwrap();
        let shown = service.current().unwrap();
        let LoadOutcome::Cached { refresh, .. } = outcome else {
            panic!("expected a cache hit");
        };
        refresh.await.unwrap();

        assert!(Arc::ptr_eq(&shown, &service.current().unwrap()));
    }

    #[tokio::test]
    async fn test_failed_refresh_is_silent() {
        let mut provider = MockTimingsProvider::new();
        provider
            .expect_fetch_timings()
            .returning(|_| Err(AppError::provider("offline")));
        let service = service(provider);
        seed(&service, TIMES).await;

        let LoadOutcome::Cached { refresh, schedule } = service.load(&query()).await.unwrap() else {
            panic!("expected a cache hit");
        };
        refresh.await.unwrap();
        assert_eq!(service.current().unwrap(), schedule);
    }

    #[tokio::test]
    async fn test_provider_failure_without_cache_propagates() {
        let mut provider = MockTimingsProvider::new();
        provider
            .expect_fetch_timings()
            .returning(|_| Err(AppError::provider("HTTP 503")));
        let service = service(provider);

        let err = service.load(&query()).await.unwrap_err();
        assert!(err.is_provider_failure());
        assert!(service.current().is_none());
    }

    /// Stores today's schedule as a side effect, then fails the request.
    struct CachesThenFails {
        cache: Arc<DailyCache>,
        today: NaiveDate,
    }

    #[async_trait]
    impl TimingsProvider for CachesThenFails {
        async fn fetch_timings(&self, query: &TimingsQuery) -> AppResult<ProviderTimings> {
            let key = query.cache_key(self.today);
            let schedule = to_schedule(&provider_timings(TIMES), key.clone())?;
            self.cache.put(&key, schedule).await?;
            Err(AppError::provider("HTTP 503"))
        }
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back_to_cache() {
        let cache = Arc::new(DailyCache::new(Arc::new(MemoryStore::new())));
        let clock = clock();
        let provider = CachesThenFails {
            cache: cache.clone(),
            today: clock.today(),
        };
        let service = PrayerTimesService::new(Arc::new(provider), cache, clock);
        let mut rx = service.subscribe();

        let outcome = service.load(&query()).await.unwrap();
        let LoadOutcome::Fallback(schedule) = outcome else {
            panic!("expected the cache fallback");
        };
        assert_eq!(schedule.get(PrayerName::Fajr).unwrap().time, "05:12".parse().unwrap());

        assert!(rx.has_changed().unwrap());
        let shown = rx.borrow_and_update().clone().unwrap();
        assert!(Arc::ptr_eq(&shown, &schedule));
    }

    #[tokio::test]
    async fn test_purge_stale_uses_clock_date() {
        let provider = MockTimingsProvider::new();
        let service = service(provider);
        let yesterday = query().cache_key(NaiveDate::from_ymd_opt(2026, 10, 15).unwrap());
        let schedule = to_schedule(&provider_timings(TIMES), yesterday.clone()).unwrap();
        service.cache().put(&yesterday, schedule).await.unwrap();
        seed(&service, TIMES).await;

        assert_eq!(service.purge_stale().await.unwrap(), 1);
        assert!(service.cache().get(&yesterday).await.unwrap().is_none());
    }
}
