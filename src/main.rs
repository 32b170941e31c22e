// Prayer Times - daily prayer times with adhan notifications
// Main entry point for the background daemon

use log::{error, info, warn};
use prayer_times::config::{validate_settings, Config};
use prayer_times::ramadan::{RamadanTimetable, TIMETABLE_YEAR};
use prayer_times::schedule::{format_remaining, resolve_next_prayer, time_until};
use prayer_times::utils::logging::init_logging;
use prayer_times::{
    monitor_prayers, AdhanNotifier, AladhanClient, AppState, AudioManager, Clock, DailyCache, Database,
    MonitorEvent, PrayerTimesService, SystemClock,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    info!("Starting prayer times daemon");

    let config = Config::from_env()?;
    config.validate()?;

    if let Some(dir) = config.db_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let db = match Database::new(&config.db_path.to_string_lossy()).await {
        Ok(database) => Arc::new(database),
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            eprintln!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    let settings = db.get_settings().await?;
    if let Err(e) = validate_settings(&settings) {
        warn!("Stored settings look wrong: {}", e.to_safe_string());
    }
    info!("Location: {}, method {}, {} school", settings.location(), settings.method, settings.school.as_str());

    let audio = match AudioManager::new() {
        Ok(audio_manager) => Arc::new(audio_manager),
        Err(e) => {
            warn!("Failed to initialize audio system: {}", e);
            warn!("Continuing without audio - adhan playback will be disabled");
            Arc::new(AudioManager::new_dummy())
        }
    };
    audio.set_volume(settings.volume)?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new(config.timezone));
    let provider = Arc::new(AladhanClient::new(config.api_url.clone())?);
    let cache = Arc::new(DailyCache::new(Arc::new(db.kv_store())));
    let service = PrayerTimesService::new(provider, cache, clock.clone());

    if let Some(path) = &config.ramadan_file {
        match RamadanTimetable::from_path(path, TIMETABLE_YEAR) {
            Ok(timetable) => {
                if let Some(day) = timetable.next_day(&settings.city, clock.today()) {
                    info!(
                        "Next Ramadan day {} ({}): Suhoor ends {}, Iftar {}",
                        day.day, day.date, day.suhoor_end, day.iftar_start
                    );
                }
            }
            Err(e) => warn!("Ignoring Ramadan timetable: {}", e),
        }
    }

    let shutdown = CancellationToken::new();
    let state = Arc::new(AppState {
        db,
        audio: audio.clone(),
        service,
        shutdown: shutdown.clone(),
    });

    let (tx, mut rx) = mpsc::channel::<MonitorEvent>(32);
    let notifier = Arc::new(AdhanNotifier::new(audio, Some(tx.clone())));
    let monitor = tokio::spawn(monitor_prayers(state.clone(), notifier, Some(tx)));

    let ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, shutting down");
            ctrl_c.cancel();
        }
    });

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            event = rx.recv() => match event {
                Some(MonitorEvent::PrayerTime(notification)) => {
                    info!("{}: {}", notification.title, notification.body);
                }
                Some(MonitorEvent::ScheduleUpdated(schedule)) => {
                    let now = clock.now();
                    if let Some(next) = resolve_next_prayer(&schedule, clock.time_of_day()) {
                        info!(
                            "Next prayer: {} at {} (in {})",
                            next.prayer.name,
                            next.prayer.time.format(settings.time_format),
                            format_remaining(time_until(next.prayer.time, now.time()))
                        );
                    }
                }
                Some(MonitorEvent::CachePurged(removed)) => info!("Removed {} old cached schedules", removed),
                Some(MonitorEvent::Error(message)) => warn!("{}", message),
                None => break,
            },
        }
    }

    if let Err(e) = monitor.await {
        error!("Monitor task failed: {}", e);
    }
    info!("Prayer times daemon stopped");
    Ok(())
}
