// Next-prayer resolution and countdown helpers.
// Pure functions of (schedule, now); safe to call on every clock tick.

use crate::models::{Prayer, PrayerSchedule, TimeOfDay};
use chrono::{Duration, NaiveTime};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextPrayer {
    pub prayer: Prayer,
    pub is_tomorrow: bool,
}

/// First prayer strictly after `now`; after the last prayer of the day this
/// rolls over to tomorrow's first prayer. `None` only for an empty schedule.
pub fn resolve_next_prayer(schedule: &PrayerSchedule, now: TimeOfDay) -> Option<NextPrayer> {
    if let Some(prayer) = schedule.prayers().iter().find(|prayer| prayer.time > now) {
        return Some(NextPrayer {
            prayer: prayer.clone(),
            is_tomorrow: false,
        });
    }

    schedule.first().map(|prayer| NextPrayer {
        prayer: prayer.clone(),
        is_tomorrow: true,
    })
}

/// Time left until `target`, counting into tomorrow when it has already
/// passed today (or is exactly now).
pub fn time_until(target: TimeOfDay, now: NaiveTime) -> Duration {
    let target = target.to_naive_time();
    let remaining = target - now;
    if remaining <= Duration::zero() {
        remaining + Duration::days(1)
    } else {
        remaining
    }
}

/// `HH:MM:SS` with hours left, `MM:SS` with minutes left, else `SSs`.
pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{:02}:{:02}", minutes, seconds)
    } else {
        format!("{:02}s", seconds)
    }
}
