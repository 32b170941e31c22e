use crate::models::CacheKey;
use env_logger::{Builder, Target};
use log::{Level, LevelFilter, SetLoggerError};
use std::env;
use std::io::Write;

/// Level named by `RUST_LOG`, `info` when unset or unrecognized.
pub fn level_from_env(value: Option<&str>) -> LevelFilter {
    match value.unwrap_or("info").to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

pub fn init_logging() -> Result<(), SetLoggerError> {
    let log_level = level_from_env(env::var("RUST_LOG").ok().as_deref());

    let mut builder = Builder::from_default_env();

    builder.format(|buf, record| {
        let timestamp = buf.timestamp();
        let target = record.target();

        match record.level() {
            Level::Info => writeln!(buf, "{} [INFO] [{}]: {}", timestamp, target, record.args()),
            level => writeln!(
                buf,
                "{} [{}] [{}:{}] {}: {}",
                timestamp,
                level,
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                target,
                record.args()
            ),
        }
    });

    // Filter out noisy modules in production
    if env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()) == "production" {
        builder.filter_module("reqwest", LevelFilter::Warn);
        builder.filter_module("hyper", LevelFilter::Warn);
        builder.filter_module("sqlx", LevelFilter::Warn);
        builder.filter_module("rodio", LevelFilter::Warn);
    }

    builder.filter_level(log_level).target(Target::Stdout).try_init()
}

pub fn log_schedule_loaded(key: &CacheKey, source: &str, prayers: usize) {
    log::info!(
        "[Schedule] {} prayers for {} ({}) on {} from {}",
        prayers,
        key.location,
        key.school.as_str(),
        key.date,
        source
    );
}

pub fn log_cache_purge(removed: usize, duration_ms: u64) {
    log::debug!("[Cache] Purged {} stale entries in {}ms", removed, duration_ms);
}

pub fn log_network_error(operation: &str, error: &dyn std::error::Error) {
    log::warn!("[Network] {} failed: {}", operation, error);
}
