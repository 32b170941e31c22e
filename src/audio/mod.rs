use crate::models::PrayerName;
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

const APP_DIR: &str = "prayer-times";

#[derive(Clone)]
pub struct AudioManager {
    volume: Arc<Mutex<f32>>,
    sound_files: Arc<Mutex<SoundFiles>>,
    enabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoundFiles {
    pub adhan: PathBuf,
    pub fajr_adhan: PathBuf,
    pub test_sound: PathBuf,
}

impl SoundFiles {
    fn in_dir(dir: &Path) -> Self {
        SoundFiles {
            adhan: dir.join("adhan.mp3"),
            fajr_adhan: dir.join("adhan_fajr.mp3"),
            test_sound: dir.join("test_sound.wav"),
        }
    }

    /// Fajr has its own recording; every other prayer shares the regular one.
    pub fn for_prayer(&self, prayer: PrayerName) -> &Path {
        match prayer {
            PrayerName::Fajr => &self.fajr_adhan,
            _ => &self.adhan,
        }
    }
}

impl Default for SoundFiles {
    fn default() -> Self {
        Self::in_dir(&sounds_dir())
    }
}

fn sounds_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("sounds")
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl AudioManager {
    pub fn new() -> Result<Self> {
        info!("Initializing audio system");

        Ok(AudioManager {
            volume: Arc::new(Mutex::new(0.7)), // Default volume 70%
            sound_files: Arc::new(Mutex::new(Self::default_sound_files()?)),
            enabled: true,
        })
    }

    /// Audio manager that never touches an output device.
    /// Used when audio system initialization fails, and in tests.
    pub fn new_dummy() -> Self {
        warn!("Using dummy audio manager - adhan playback is disabled");

        AudioManager {
            volume: Arc::new(Mutex::new(0.0)),
            sound_files: Arc::new(Mutex::new(SoundFiles::in_dir(Path::new("")))),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn default_sound_files() -> Result<SoundFiles> {
        // ./sounds wins during development
        let dev_sounds = PathBuf::from("sounds");
        if dev_sounds.join("adhan.mp3").exists() {
            debug!("Using development sounds from {:?}", dev_sounds);
            return Ok(SoundFiles::in_dir(&dev_sounds));
        }
        Ok(SoundFiles::default())
    }

    pub fn set_volume(&self, volume: f32) -> Result<()> {
        let vol = volume.clamp(0.0, 1.0);
        *lock(&self.volume) = vol;
        info!("Set audio volume to {:.0}%", vol * 100.0);
        Ok(())
    }

    pub fn get_volume(&self) -> f32 {
        *lock(&self.volume)
    }

    pub fn update_sound_files(&self, sound_files: SoundFiles) -> Result<()> {
        *lock(&self.sound_files) = sound_files;
        info!("Updated sound file paths");
        Ok(())
    }

    pub fn sound_files(&self) -> SoundFiles {
        lock(&self.sound_files).clone()
    }

    /// Starts the adhan for `prayer` on a blocking thread and returns
    /// immediately. Playback failures are only logged.
    pub fn play_adhan(&self, prayer: PrayerName) -> Result<()> {
        let path = self.sound_files().for_prayer(prayer).to_path_buf();
        info!("Playing adhan for {}", prayer);
        self.play(path)
    }

    pub fn test_audio(&self) -> Result<()> {
        info!("Testing audio system");
        let path = self.sound_files().test_sound;
        self.play(path)
    }

    fn play(&self, sound_path: PathBuf) -> Result<()> {
        if !self.enabled {
            debug!("Audio disabled, skipping {:?}", sound_path);
            return Ok(());
        }

        let volume = self.get_volume();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = Self::play_sound_file(&sound_path, volume) {
                error!("Failed to play sound {:?}: {}", sound_path, e);
            }
        });

        Ok(())
    }

    fn play_sound_file(sound_path: &Path, volume: f32) -> Result<()> {
        // OutputStream is not Send, so it is created per playback
        let (stream, stream_handle) =
            OutputStream::try_default().context("Failed to create audio output stream")?;

        if !sound_path.exists() {
            warn!("Sound file does not exist: {:?}", sound_path);
            return Self::play_default_sound(&stream_handle, volume);
        }

        debug!("Playing sound file: {:?}", sound_path);

        let file = File::open(sound_path).context("Failed to open sound file")?;
        let source = Decoder::new(BufReader::new(file))?
            .convert_samples::<f32>()
            .amplify(volume);

        let sink = Sink::try_new(&stream_handle)?;
        sink.append(source);
        sink.sleep_until_end();

        drop(stream);
        Ok(())
    }

    fn play_default_sound(stream_handle: &OutputStreamHandle, volume: f32) -> Result<()> {
        warn!("Playing default tone (no adhan recording found)");

        // Three short tones in place of the recording
        let sink = Sink::try_new(stream_handle)?;
        for _ in 0..3 {
            sink.append(
                rodio::source::SineWave::new(660.0)
                    .take_duration(Duration::from_millis(400))
                    .amplify(volume * 0.3),
            );
            sink.append(rodio::source::Zero::<f32>::new(1, 44_100).take_duration(Duration::from_millis(200)));
        }
        sink.sleep_until_end();

        Ok(())
    }

    pub fn ensure_sound_directory() -> Result<PathBuf> {
        let dir = sounds_dir();
        if !dir.exists() {
            std::fs::create_dir_all(&dir).context("Failed to create sounds directory")?;
            info!("Created sounds directory: {:?}", dir);
        }
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sound_files_for_prayer() {
        let temp_dir = TempDir::new().unwrap();
        let files = SoundFiles::in_dir(temp_dir.path());

        assert!(files.for_prayer(PrayerName::Fajr).ends_with("adhan_fajr.mp3"));
        assert!(files.for_prayer(PrayerName::Maghrib).ends_with("adhan.mp3"));
        assert!(files.for_prayer(PrayerName::Sunrise).ends_with("adhan.mp3"));
    }

    #[test]
    fn test_set_volume_clamps() {
        let manager = AudioManager::new().unwrap();

        manager.set_volume(0.5).unwrap();
        assert_eq!(manager.get_volume(), 0.5);

        manager.set_volume(1.5).unwrap();
        assert_eq!(manager.get_volume(), 1.0);

        manager.set_volume(-0.5).unwrap();
        assert_eq!(manager.get_volume(), 0.0);
    }

    #[test]
    fn test_update_sound_files() {
        let manager = AudioManager::new_dummy();
        let temp_dir = TempDir::new().unwrap();
        let files = SoundFiles::in_dir(temp_dir.path());

        manager.update_sound_files(files.clone()).unwrap();
        assert_eq!(manager.sound_files(), files);
    }

    #[test]
    fn test_default_sound_files_live_under_app_dir() {
        let files = SoundFiles::default();
        assert!(files.adhan.to_string_lossy().contains(APP_DIR));
        assert!(files.test_sound.ends_with("test_sound.wav"));
    }

    #[tokio::test]
    async fn test_dummy_manager_plays_nothing() {
        let manager = AudioManager::new_dummy();
        assert!(!manager.is_enabled());
        assert_eq!(manager.get_volume(), 0.0);
        assert!(manager.play_adhan(PrayerName::Isha).is_ok());
        assert!(manager.test_audio().is_ok());
    }
}
