// Prayer-time alerting: the notification scheduler, adhan delivery and the
// background monitor loop that drives them.

mod notifier;
mod scheduler;

pub use notifier::AdhanNotifier;
pub use scheduler::NotificationScheduler;

use crate::models::{PrayerNotification, PrayerSchedule, Settings};
use crate::provider::TimingsQuery;
use crate::AppState;
use chrono::NaiveDate;
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tokio::time::{interval, interval_at, Duration, Instant, MissedTickBehavior};

pub const CLOCK_TICK: Duration = Duration::from_secs(1);
pub const PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(12 * 60 * 60);

/// Delivery target for prayer notifications.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &PrayerNotification);
}

#[derive(Debug, Clone)]
pub enum MonitorEvent {
    PrayerTime(PrayerNotification),
    ScheduleUpdated(Arc<PrayerSchedule>),
    CachePurged(usize),
    Error(String),
}

pub async fn monitor_prayers(state: Arc<AppState>, notifier: Arc<dyn Notifier>, sender: Option<Sender<MonitorEvent>>) {
    info!("Starting prayer monitor loop");

    let settings = current_settings(&state).await;
    let clock = state.service.clock().clone();
    let mut scheduler = NotificationScheduler::new(clock.clone(), notifier, settings.time_format);
    let mut displayed = state.service.subscribe();

    purge(&state, &sender).await;
    reload(&state, &settings, &sender).await;

    let mut loading: Option<JoinHandle<()>> = None;
    let mut current_day = clock.today();

    let mut clock_tick = interval(CLOCK_TICK);
    clock_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut purge_tick = interval_at(Instant::now() + PURGE_INTERVAL, PURGE_INTERVAL);
    purge_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut refresh_tick = interval_at(Instant::now() + REFRESH_INTERVAL, REFRESH_INTERVAL);
    refresh_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;

            _ = state.shutdown.cancelled() => {
                info!("Shutdown signal received, stopping monitor loop");
                break;
            }
            changed = displayed.changed() => {
                if changed.is_err() {
                    warn!("Schedule publisher dropped, stopping monitor loop");
                    break;
                }
                let schedule = displayed.borrow_and_update().clone();
                if let Some(schedule) = schedule {
                    scheduler.set_schedule(schedule.clone());
                    send(&sender, MonitorEvent::ScheduleUpdated(schedule)).await;
                }
            }
            _ = clock_tick.tick() => {
                let today = clock.today();
                if today != current_day {
                    current_day = today;
                    if is_outdated(&scheduler, today) {
                        info!("Date changed to {}, loading prayer times", today);
                        start_reload(&state, &mut scheduler, &sender, &mut loading).await;
                    }
                }

                let fired = scheduler.tick();
                if !fired.is_empty() {
                    debug!("Fired {} prayer notification(s)", fired.len());
                }
            }
            _ = purge_tick.tick() => {
                purge(&state, &sender).await;
                if is_outdated(&scheduler, clock.today()) {
                    info!("Displayed schedule is not for today, reloading");
                    start_reload(&state, &mut scheduler, &sender, &mut loading).await;
                }
            }
            _ = refresh_tick.tick() => {
                info!("Refreshing prayer times");
                start_reload(&state, &mut scheduler, &sender, &mut loading).await;
            }
        }
    }

    if let Some(task) = loading {
        task.abort();
    }
    info!("Prayer monitor loop stopped gracefully");
}

fn is_outdated(scheduler: &NotificationScheduler, today: NaiveDate) -> bool {
    scheduler
        .active()
        .map(|schedule| schedule.key().date != today)
        .unwrap_or(true)
}

/// Re-reads settings and loads the schedule on a separate task so clock ticks
/// keep running during the fetch. The result arrives through the displayed
/// schedule channel. At most one load runs at a time.
async fn start_reload(
    state: &Arc<AppState>,
    scheduler: &mut NotificationScheduler,
    sender: &Option<Sender<MonitorEvent>>,
    loading: &mut Option<JoinHandle<()>>,
) {
    if loading.as_ref().map_or(false, |task| !task.is_finished()) {
        debug!("Prayer times load already in progress");
        return;
    }

    let settings = current_settings(state).await;
    scheduler.set_time_format(settings.time_format);

    let state = state.clone();
    let sender = sender.clone();
    *loading = Some(tokio::spawn(async move {
        reload(&state, &settings, &sender).await;
    }));
}

async fn current_settings(state: &AppState) -> Settings {
    match state.db.get_settings().await {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Could not read settings, using defaults: {}", e);
            Settings::default()
        }
    }
}

async fn purge(state: &AppState, sender: &Option<Sender<MonitorEvent>>) {
    match state.service.purge_stale().await {
        Ok(0) => {}
        Ok(removed) => send(sender, MonitorEvent::CachePurged(removed)).await,
        Err(e) => {
            error!("Cache purge failed: {}", e);
            send(sender, MonitorEvent::Error(e.to_safe_string())).await;
        }
    }
}

async fn reload(state: &AppState, settings: &Settings, sender: &Option<Sender<MonitorEvent>>) {
    let query = TimingsQuery::from_settings(settings);
    if let Err(e) = state.service.load(&query).await {
        error!("Failed to load prayer times for {}: {}", query.location, e);
        send(sender, MonitorEvent::Error(e.to_safe_string())).await;
    }
}

async fn send(sender: &Option<Sender<MonitorEvent>>, event: MonitorEvent) {
    if let Some(tx) = sender {
        let _ = tx.send(event).await;
    }
}
