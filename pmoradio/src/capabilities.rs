//! Collaborators driven by the control loop.
//!
//! Each trait is a narrow capability the loop calls once per tick. None of
//! the calls may block: the audio engine does its own buffering work inside
//! [`AudioEngine::pump`].

use crate::playback::PlaybackStatus;

/// Notifications emitted by the audio engine while streaming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    Info(String),
    Id3(String),
    /// Station name announced by the stream
    Station(String),
    /// Title currently played ("now playing")
    StreamTitle(String),
    Bitrate(String),
    /// Commercial break, duration in seconds
    Commercial(String),
    /// Homepage of the stream
    IcyUrl(String),
    /// URL of the stream actually played
    LastHost(String),
    EndOfStream(String),
}

/// Audio decode/transport engine.
pub trait AudioEngine: Send {
    /// Volume in `0..=21`.
    fn set_volume(&mut self, volume: u8);

    fn volume(&self) -> u8;

    /// Starts streaming from `url`. Returns `false` if the engine refused it.
    fn connect_to_stream(&mut self, url: &str) -> bool;

    /// Per-tick decode/buffering work.
    fn pump(&mut self);

    fn poll_event(&mut self) -> Option<AudioEvent>;
}

/// Status display (station, volume, now playing).
pub trait StatusDisplay: Send {
    fn render(&mut self, status: &PlaybackStatus);
}

/// Rotary encoder with push button, already debounced by its driver.
pub trait RotaryEncoder: Send {
    /// Rotation since the previous call.
    fn read_delta(&mut self) -> i32;

    /// `true` once per button click.
    fn consume_button_click(&mut self) -> bool;
}

/// Local text command channel.
pub trait SerialPort: Send {
    /// Appends the bytes received since the previous call to `buf`.
    fn read_available(&mut self, buf: &mut Vec<u8>);

    fn write_line(&mut self, line: &str);
}
