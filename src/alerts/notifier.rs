// file: src/alerts/notifier.rs
use super::{MonitorEvent, Notifier};
use crate::audio::AudioManager;
use crate::models::PrayerNotification;
use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::mpsc::{error::TrySendError, Sender};

/// Plays the adhan and forwards the notification to whoever is listening.
pub struct AdhanNotifier {
    audio: Arc<AudioManager>,
    sender: Option<Sender<MonitorEvent>>,
}

impl AdhanNotifier {
    pub fn new(audio: Arc<AudioManager>, sender: Option<Sender<MonitorEvent>>) -> Self {
        Self { audio, sender }
    }
}

impl Notifier for AdhanNotifier {
    fn notify(&self, notification: &PrayerNotification) {
        if let Err(e) = self.audio.play_adhan(notification.prayer) {
            warn!("Failed to play adhan: {}", e);
        }

        let Some(tx) = &self.sender else {
            return;
        };
        match tx.try_send(MonitorEvent::PrayerTime(notification.clone())) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => warn!("Notification channel full, dropping {}", notification.title),
            Err(TrySendError::Closed(_)) => debug!("Notification channel closed"),
        }
    }
}
