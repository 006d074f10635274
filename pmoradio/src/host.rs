//! Collaborators for running the control core on a host machine.

use crate::capabilities::{AudioEngine, AudioEvent, RotaryEncoder, SerialPort, StatusDisplay};
use crate::playback::{MAX_VOLUME, PlaybackStatus};
use std::collections::VecDeque;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Audio engine that only logs what it is asked to play.
#[derive(Debug, Default)]
pub struct LogAudioEngine {
    volume: u8,
    url: Option<String>,
    events: VecDeque<AudioEvent>,
}

impl LogAudioEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stream currently "playing".
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

impl AudioEngine for LogAudioEngine {
    fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(MAX_VOLUME);
        info!(volume = self.volume, "Volume");
    }

    fn volume(&self) -> u8 {
        self.volume
    }

    fn connect_to_stream(&mut self, url: &str) -> bool {
        info!(%url, "Connect to stream");
        self.url = Some(url.to_string());
        self.events
            .push_back(AudioEvent::Info(format!("Connect to new host: \"{url}\"")));
        self.events.push_back(AudioEvent::LastHost(url.to_string()));
        true
    }

    fn pump(&mut self) {}

    fn poll_event(&mut self) -> Option<AudioEvent> {
        self.events.pop_front()
    }
}

/// Display that logs the status whenever it changes.
#[derive(Debug, Default)]
pub struct LogDisplay {
    last: Option<PlaybackStatus>,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusDisplay for LogDisplay {
    fn render(&mut self, status: &PlaybackStatus) {
        if self.last.as_ref() == Some(status) {
            return;
        }
        info!(
            "ST>{:02} VOL>{:02} {} {}",
            status.station.unwrap_or(0),
            status.volume,
            status.station_name.as_deref().unwrap_or(""),
            status.now_playing
        );
        self.last = Some(status.clone());
    }
}

/// Host without a rotary encoder.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEncoder;

impl RotaryEncoder for NoEncoder {
    fn read_delta(&mut self) -> i32 {
        0
    }

    fn consume_button_click(&mut self) -> bool {
        false
    }
}

/// Serial channel over the process stdin/stdout.
///
/// A background task reads stdin; [`SerialPort::read_available`] drains what
/// it received without waiting.
pub struct StdioSerial {
    rx: mpsc::UnboundedReceiver<Vec<u8>>,
}

impl StdioSerial {
    /// Starts the stdin reader. Must be called within a tokio runtime.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut stdin = tokio::io::stdin();
            let mut buf = [0u8; 256];
            loop {
                match stdin.read(&mut buf).await {
                    Ok(0) => {
                        debug!("stdin closed");
                        break;
                    }
                    Ok(n) => {
                        if tx.send(buf[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error=%e, "stdin read failed");
                        break;
                    }
                }
            }
        });

        Self { rx }
    }
}

impl SerialPort for StdioSerial {
    fn read_available(&mut self, buf: &mut Vec<u8>) {
        while let Ok(chunk) = self.rx.try_recv() {
            buf.extend_from_slice(&chunk);
        }
    }

    fn write_line(&mut self, line: &str) {
        println!("{line}");
    }
}
