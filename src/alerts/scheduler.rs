// file: src/alerts/scheduler.rs
use super::Notifier;
use crate::clock::Clock;
use crate::models::{PrayerName, PrayerNotification, PrayerSchedule, TimeFormat, TimeOfDay};
use chrono::NaiveDate;
use log::{debug, info};
use std::collections::HashSet;
use std::sync::Arc;

/// Fires one notification per prayer when the clock reaches its minute.
///
/// Ticks are expected roughly once a second. A minute that passes without a
/// tick is not caught up later. Notification state is per calendar day, so a
/// schedule left over from yesterday still fires today.
pub struct NotificationScheduler {
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    time_format: TimeFormat,
    active: Option<Arc<PrayerSchedule>>,
    notified: HashSet<PrayerName>,
    notified_on: Option<NaiveDate>,
    last_notified: Option<PrayerName>,
}

impl NotificationScheduler {
    pub fn new(clock: Arc<dyn Clock>, notifier: Arc<dyn Notifier>, time_format: TimeFormat) -> Self {
        Self {
            clock,
            notifier,
            time_format,
            active: None,
            notified: HashSet::new(),
            notified_on: None,
            last_notified: None,
        }
    }

    /// Makes `schedule` the one being watched. Notification state survives
    /// only if the new schedule is for the same key with the same times.
    pub fn set_schedule(&mut self, schedule: Arc<PrayerSchedule>) {
        let unchanged = self
            .active
            .as_ref()
            .map(|active| active.key() == schedule.key() && active.same_times(&schedule))
            .unwrap_or(false);

        if !unchanged {
            debug!("Watching new schedule for {}", schedule.key().storage_key());
            self.notified.clear();
            self.last_notified = None;
        }
        self.active = Some(schedule);
    }

    pub fn set_time_format(&mut self, time_format: TimeFormat) {
        self.time_format = time_format;
    }

    pub fn active(&self) -> Option<&Arc<PrayerSchedule>> {
        self.active.as_ref()
    }

    pub fn last_notified(&self) -> Option<PrayerName> {
        self.last_notified
    }

    pub fn tick(&mut self) -> Vec<PrayerNotification> {
        let now = self.clock.time_of_day();
        self.tick_at(now)
    }

    pub fn tick_at(&mut self, now: TimeOfDay) -> Vec<PrayerNotification> {
        let Some(schedule) = self.active.clone() else {
            return Vec::new();
        };

        let today = self.clock.today();
        if self.notified_on != Some(today) {
            if self.notified_on.is_some() && !self.notified.is_empty() {
                debug!("New day {}, clearing notified prayers", today);
            }
            self.notified.clear();
            self.notified_on = Some(today);
        }

        let mut fired = Vec::new();
        for prayer in schedule.prayers().iter().filter(|p| p.time == now) {
            if !self.notified.insert(prayer.name) {
                continue;
            }

            let notification = PrayerNotification::new(prayer, self.time_format);
            info!("{}", notification.body);
            self.notifier.notify(&notification);
            self.last_notified = Some(prayer.name);
            fired.push(notification);
        }
        fired
    }
}
