//! Cooperative control loop.
//!
//! [`Radio`] owns the playback state and every input channel. One
//! [`Radio::tick`] pumps the audio engine, then handles at most one serial
//! line, at most one HTTP request, the encoder and the display refresh, and
//! returns. HTTP handlers never touch the playback state: they go through a
//! [`RadioHandle`], whose requests are served by the loop.

use crate::capabilities::{RotaryEncoder, SerialPort, StatusDisplay};
use crate::command::interpret;
use crate::config_ext::RadioSettings;
use crate::error::{RadioError, Result};
use crate::playback::{PlaybackController, PlaybackStatus};
use crate::serial::LineReader;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Requests queued before the loop drops new ones.
const REQUEST_QUEUE: usize = 16;

enum RadioRequest {
    Command {
        line: String,
        reply: oneshot::Sender<String>,
    },
    Status {
        reply: oneshot::Sender<PlaybackStatus>,
    },
}

/// Cloneable access to a running [`Radio`] from other tasks.
#[derive(Clone)]
pub struct RadioHandle {
    tx: mpsc::Sender<RadioRequest>,
}

impl RadioHandle {
    /// Runs `line` through the command interpreter on the control loop.
    pub async fn command(&self, line: impl Into<String>) -> Result<String> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(RadioRequest::Command {
                line: line.into(),
                reply,
            })
            .await
            .map_err(|_| RadioError::LoopClosed)?;
        rx.await.map_err(|_| RadioError::LoopClosed)
    }

    pub async fn status(&self) -> Result<PlaybackStatus> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(RadioRequest::Status { reply })
            .await
            .map_err(|_| RadioError::LoopClosed)?;
        rx.await.map_err(|_| RadioError::LoopClosed)
    }
}

pub struct Radio {
    playback: PlaybackController,
    serial: Option<Box<dyn SerialPort>>,
    encoder: Option<Box<dyn RotaryEncoder>>,
    display: Option<Box<dyn StatusDisplay>>,
    lines: LineReader,
    scratch: Vec<u8>,
    requests: mpsc::Receiver<RadioRequest>,
    tick_interval: Duration,
    display_refresh: Duration,
    next_refresh: Option<Instant>,
}

impl Radio {
    pub fn new(playback: PlaybackController, settings: &RadioSettings) -> (Self, RadioHandle) {
        let (tx, requests) = mpsc::channel(REQUEST_QUEUE);
        let radio = Self {
            playback,
            serial: None,
            encoder: None,
            display: None,
            lines: LineReader::new(settings.serial_buffer),
            scratch: Vec::new(),
            requests,
            tick_interval: settings.tick_interval,
            display_refresh: settings.display_refresh,
            next_refresh: None,
        };
        (radio, RadioHandle { tx })
    }

    pub fn with_serial(mut self, serial: Box<dyn SerialPort>) -> Self {
        self.serial = Some(serial);
        self
    }

    pub fn with_encoder(mut self, encoder: Box<dyn RotaryEncoder>) -> Self {
        self.encoder = Some(encoder);
        self
    }

    pub fn with_display(mut self, display: Box<dyn StatusDisplay>) -> Self {
        self.display = Some(display);
        self
    }

    pub fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut PlaybackController {
        &mut self.playback
    }

    /// One iteration of the control loop. Never blocks.
    pub fn tick(&mut self, now: Instant) {
        self.playback.service_audio();
        self.scan_serial();
        self.serve_request();
        self.scan_encoder(now);
        self.refresh_display(now);
    }

    /// Ticks every `tick_interval` until `cancel` fires.
    pub async fn run(mut self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(tick=?self.tick_interval, "Control loop started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => self.tick(tokio::time::Instant::now().into_std()),
            }
        }
        info!("Control loop stopped");
    }

    fn scan_serial(&mut self) {
        let Some(serial) = self.serial.as_mut() else {
            return;
        };

        self.scratch.clear();
        serial.read_available(&mut self.scratch);
        if !self.scratch.is_empty() {
            self.lines.push(&self.scratch);
        }

        if let Some(line) = self.lines.next_line() {
            let reply = interpret(&line, &mut self.playback);
            serial.write_line(&reply);
        }
    }

    fn serve_request(&mut self) {
        let Ok(request) = self.requests.try_recv() else {
            return;
        };

        match request {
            RadioRequest::Command { line, reply } => {
                let answer = interpret(&line, &mut self.playback);
                if reply.send(answer).is_err() {
                    debug!("Command requester went away");
                }
            }
            RadioRequest::Status { reply } => {
                let _ = reply.send(self.playback.status());
            }
        }
    }

    fn scan_encoder(&mut self, now: Instant) {
        let Some(encoder) = self.encoder.as_mut() else {
            return;
        };

        let delta = encoder.read_delta();
        if delta != 0 {
            self.playback.apply_encoder_delta(delta);
        }
        if encoder.consume_button_click() {
            self.playback.click_next_station(now);
        }
    }

    fn refresh_display(&mut self, now: Instant) {
        let Some(display) = self.display.as_mut() else {
            return;
        };

        if self.next_refresh.is_some_and(|next| now < next) {
            return;
        }
        display.render(&self.playback.status());
        self.next_refresh = Some(now + self.display_refresh);
    }
}
