//! Playback state: volume and current station.
//!
//! [`PlaybackController`] is the only owner of the playback state. Every
//! mutation is bounds-checked (volume in `0..=21`, station in `1..=count`
//! with wrap-around) and forwarded to the audio engine: a volume change
//! issues `set_volume`, a station change issues `connect_to_stream`.

use crate::capabilities::{AudioEngine, AudioEvent};
use crate::config_ext::RadioSettings;
use pmoconfig::{ConfigStore, SettingKey};
use pmostations::{InitialStream, Station, StationCatalog};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Highest volume accepted by the audio engine.
pub const MAX_VOLUME: u8 = 21;

/// Snapshot of the playback state, as shown by the display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaybackStatus {
    pub station: Option<usize>,
    pub station_name: Option<String>,
    pub volume: u8,
    pub now_playing: String,
}

pub struct PlaybackController {
    catalog: StationCatalog,
    audio: Box<dyn AudioEngine>,
    volume: u8,
    current_station: Option<usize>,
    now_playing: String,
    click_debounce: Duration,
    last_click: Option<Instant>,
    store: Option<Arc<dyn ConfigStore>>,
}

impl PlaybackController {
    /// Initial state from `settings`. A default station outside the catalog
    /// falls back to the first one; an empty catalog has no current station.
    pub fn new(catalog: StationCatalog, audio: Box<dyn AudioEngine>, settings: &RadioSettings) -> Self {
        let current_station = if catalog.contains(settings.default_station) {
            Some(settings.default_station)
        } else {
            catalog.first().map(|s| s.index)
        };

        Self {
            catalog,
            audio,
            volume: settings.default_volume.min(MAX_VOLUME),
            current_station,
            now_playing: String::new(),
            click_debounce: settings.click_debounce,
            last_click: None,
            store: None,
        }
    }

    /// Persists volume and station to `store` on every change, and restores
    /// the values saved there when they are still valid.
    pub fn with_persistence(mut self, store: Arc<dyn ConfigStore>) -> Self {
        if let Ok(volume) = store.read(SettingKey::Volume).trim().parse::<u8>() {
            if volume <= MAX_VOLUME {
                debug!(volume, "Restored volume");
                self.volume = volume;
            }
        }
        if let Ok(station) = store.read(SettingKey::Station).trim().parse::<usize>() {
            if self.catalog.contains(station) {
                debug!(station, "Restored station");
                self.current_station = Some(station);
            }
        }
        self.store = Some(store);
        self
    }

    /// Pushes the initial volume and starts the initial stream: the current
    /// station, or `fallback_url` when no catalog is loaded.
    pub fn start(&mut self, fallback_url: &str) -> InitialStream {
        self.audio.set_volume(self.volume);

        let initial = match self.current() {
            Some(station) => InitialStream::Station(station.clone()),
            None => self.catalog.initial_stream(fallback_url),
        };
        info!(url=%initial.url(), station=?initial.index(), "Starting playback");
        if !self.audio.connect_to_stream(initial.url()) {
            warn!(url=%initial.url(), "Audio engine refused the stream");
        }
        initial
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn current_station(&self) -> Option<usize> {
        self.current_station
    }

    pub fn current(&self) -> Option<&Station> {
        self.current_station.and_then(|i| self.catalog.get(i))
    }

    pub fn catalog(&self) -> &StationCatalog {
        &self.catalog
    }

    pub fn now_playing(&self) -> &str {
        &self.now_playing
    }

    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            station: self.current_station,
            station_name: self.current().map(|s| s.name.clone()),
            volume: self.volume,
            now_playing: self.now_playing.clone(),
        }
    }

    /// Sets the volume if `volume` is in `0..=21`; otherwise nothing changes.
    pub fn set_volume(&mut self, volume: u64) -> bool {
        if volume > MAX_VOLUME as u64 {
            debug!(volume, "Volume out of range, ignored");
            return false;
        }
        self.apply_volume(volume as u8);
        true
    }

    /// Moves the volume by `step`, stopping at the bounds.
    pub fn adjust_volume(&mut self, step: i32) {
        let target = (self.volume as i32 + step).clamp(0, MAX_VOLUME as i32) as u8;
        if target != self.volume {
            self.apply_volume(target);
        }
    }

    /// Encoder rotation: same bounds as [`Self::adjust_volume`], no wrap.
    pub fn apply_encoder_delta(&mut self, delta: i32) {
        if delta != 0 {
            self.adjust_volume(delta);
            debug!(delta, volume = self.volume, "Encoder moved");
        }
    }

    /// Selects station `index` if it exists; retunes only on change.
    pub fn set_station(&mut self, index: u64) -> bool {
        let Some(index) = usize::try_from(index).ok().filter(|i| self.catalog.contains(*i)) else {
            debug!(index, "Station out of range, ignored");
            return false;
        };
        self.tune(index);
        true
    }

    /// Moves `step` stations forward (or backward when negative), wrapping
    /// around. Returns the new station, `None` on an empty catalog.
    pub fn step_station(&mut self, step: i32) -> Option<usize> {
        let mut index = self.current_station.unwrap_or(0);
        for _ in 0..step.unsigned_abs() {
            index = if step > 0 {
                self.catalog.next(index)?
            } else {
                self.catalog.previous(index)?
            };
        }
        if step != 0 {
            self.tune(index);
        }
        self.current_station
    }

    /// Encoder button: next station, ignoring clicks closer than the
    /// debounce delay. Returns `true` when the click was handled.
    pub fn click_next_station(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_click {
            if now.saturating_duration_since(last) < self.click_debounce {
                return false;
            }
        }
        self.last_click = Some(now);
        self.step_station(1).is_some()
    }

    /// Pumps the audio engine and handles the events it produced.
    pub fn service_audio(&mut self) {
        self.audio.pump();
        while let Some(event) = self.audio.poll_event() {
            self.on_audio_event(event);
        }
    }

    pub fn on_audio_event(&mut self, event: AudioEvent) {
        match event {
            AudioEvent::StreamTitle(title) => {
                info!("streamtitle {}", title);
                self.now_playing = title;
            }
            AudioEvent::Info(info) => debug!("info        {}", info),
            AudioEvent::Id3(info) => debug!("id3data     {}", info),
            AudioEvent::Station(info) => info!("station     {}", info),
            AudioEvent::Bitrate(info) => debug!("bitrate     {}", info),
            AudioEvent::Commercial(info) => info!("commercial  {}", info),
            AudioEvent::IcyUrl(info) => debug!("icyurl      {}", info),
            AudioEvent::LastHost(info) => debug!("lasthost    {}", info),
            AudioEvent::EndOfStream(info) => info!("eof_stream  {}", info),
        }
    }

    fn apply_volume(&mut self, volume: u8) {
        self.volume = volume;
        self.audio.set_volume(volume);
        self.persist(SettingKey::Volume, volume as usize);
    }

    fn tune(&mut self, index: usize) {
        if self.current_station == Some(index) {
            return;
        }
        self.current_station = Some(index);
        self.now_playing.clear();

        let Some(station) = self.catalog.get(index) else {
            return;
        };
        info!(station = index, name=%station.name, url=%station.url, "Retune");
        if !self.audio.connect_to_stream(&station.url) {
            warn!(url=%station.url, "Audio engine refused the stream");
        }
        self.persist(SettingKey::Station, index);
    }

    fn persist(&self, key: SettingKey, value: usize) {
        if let Some(store) = &self.store {
            if let Err(e) = store.write(key, &value.to_string()) {
                warn!(%key, error=%e, "Failed to persist playback state");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct SilentEngine {
        volume: u8,
    }

    impl AudioEngine for SilentEngine {
        fn set_volume(&mut self, volume: u8) {
            self.volume = volume;
        }
        fn volume(&self) -> u8 {
            self.volume
        }
        fn connect_to_stream(&mut self, _url: &str) -> bool {
            true
        }
        fn pump(&mut self) {}
        fn poll_event(&mut self) -> Option<AudioEvent> {
            None
        }
    }

    fn controller(count: usize) -> PlaybackController {
        let catalog =
            StationCatalog::from_pairs((1..=count).map(|i| (format!("S{i}"), format!("http://s{i}"))));
        PlaybackController::new(catalog, Box::new(SilentEngine::default()), &RadioSettings::default())
    }

    #[test]
    fn test_defaults() {
        let playback = controller(3);
        assert_eq!(playback.volume(), 17);
        assert_eq!(playback.current_station(), Some(1));
    }

    #[test]
    fn test_default_station_outside_catalog_uses_first() {
        let settings = RadioSettings {
            default_station: 9,
            ..RadioSettings::default()
        };
        let catalog = StationCatalog::from_pairs([("A", "a"), ("B", "b")]);
        let playback = PlaybackController::new(catalog, Box::new(SilentEngine::default()), &settings);
        assert_eq!(playback.current_station(), Some(1));
    }

    #[test]
    fn test_step_station_multiple() {
        let mut playback = controller(5);
        assert_eq!(playback.step_station(3), Some(4));
        assert_eq!(playback.step_station(-4), Some(5));
        assert_eq!(playback.step_station(0), Some(5));
    }

    #[test]
    fn test_stream_title_updates_now_playing() {
        let mut playback = controller(2);
        playback.on_audio_event(AudioEvent::StreamTitle("Artist - Song".into()));
        assert_eq!(playback.status().now_playing, "Artist - Song");

        playback.step_station(1);
        assert_eq!(playback.now_playing(), "");
    }
}
