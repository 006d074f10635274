#![allow(dead_code)]

use pmoradio::{
    AudioEngine, AudioEvent, PlaybackController, PlaybackStatus, RadioSettings, RotaryEncoder,
    SerialPort, StatusDisplay,
};
use pmostations::StationCatalog;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// What the audio engine was asked to do.
#[derive(Debug, Default)]
pub struct AudioLog {
    pub volume: u8,
    pub volumes: Vec<u8>,
    pub streams: Vec<String>,
    pub pumps: usize,
    pub events: VecDeque<AudioEvent>,
}

#[derive(Clone, Default)]
pub struct FakeAudio(pub Arc<Mutex<AudioLog>>);

impl FakeAudio {
    pub fn log(&self) -> std::sync::MutexGuard<'_, AudioLog> {
        self.0.lock().unwrap()
    }
}

impl AudioEngine for FakeAudio {
    fn set_volume(&mut self, volume: u8) {
        let mut log = self.log();
        log.volume = volume;
        log.volumes.push(volume);
    }

    fn volume(&self) -> u8 {
        self.log().volume
    }

    fn connect_to_stream(&mut self, url: &str) -> bool {
        self.log().streams.push(url.to_string());
        true
    }

    fn pump(&mut self) {
        self.log().pumps += 1;
    }

    fn poll_event(&mut self) -> Option<AudioEvent> {
        self.log().events.pop_front()
    }
}

/// Serial port fed by the test, recording replies.
#[derive(Clone, Default)]
pub struct FakeSerial {
    pub input: Arc<Mutex<Vec<u8>>>,
    pub output: Arc<Mutex<Vec<String>>>,
}

impl FakeSerial {
    pub fn send(&self, bytes: &[u8]) {
        self.input.lock().unwrap().extend_from_slice(bytes);
    }

    pub fn replies(&self) -> Vec<String> {
        self.output.lock().unwrap().clone()
    }
}

impl SerialPort for FakeSerial {
    fn read_available(&mut self, buf: &mut Vec<u8>) {
        buf.append(&mut self.input.lock().unwrap());
    }

    fn write_line(&mut self, line: &str) {
        self.output.lock().unwrap().push(line.to_string());
    }
}

#[derive(Clone, Default)]
pub struct FakeEncoder {
    pub delta: Arc<Mutex<i32>>,
    pub clicks: Arc<Mutex<usize>>,
}

impl FakeEncoder {
    pub fn turn(&self, delta: i32) {
        *self.delta.lock().unwrap() += delta;
    }

    pub fn click(&self) {
        *self.clicks.lock().unwrap() += 1;
    }
}

impl RotaryEncoder for FakeEncoder {
    fn read_delta(&mut self) -> i32 {
        std::mem::take(&mut *self.delta.lock().unwrap())
    }

    fn consume_button_click(&mut self) -> bool {
        let mut clicks = self.clicks.lock().unwrap();
        if *clicks > 0 {
            *clicks -= 1;
            true
        } else {
            false
        }
    }
}

#[derive(Clone, Default)]
pub struct FakeDisplay(pub Arc<Mutex<Vec<PlaybackStatus>>>);

impl StatusDisplay for FakeDisplay {
    fn render(&mut self, status: &PlaybackStatus) {
        self.0.lock().unwrap().push(status.clone());
    }
}

pub fn catalog(count: usize) -> StationCatalog {
    StationCatalog::from_pairs((1..=count).map(|i| (format!("Station {i}"), format!("http://s{i}"))))
}

pub fn controller(count: usize) -> (PlaybackController, FakeAudio) {
    let audio = FakeAudio::default();
    let playback = PlaybackController::new(
        catalog(count),
        Box::new(audio.clone()),
        &RadioSettings::default(),
    );
    (playback, audio)
}
