//! Text command protocol: `ARGUMENT[=VALUE]`.
//!
//! The interpreter is tolerant by construction. Comments (`#...`) are
//! stripped, unknown arguments are accepted without effect and out-of-range
//! values are ignored; nothing here ever reports a fault.
//!
//! Arguments are matched by prefix against an ordered rule list, first match
//! wins: `volume`, `volumex` and `volume_level` all reach the volume handler.
//!
//! ```
//! use pmoradio::command::{Command, CommandTarget, CommandValue};
//!
//! let command = Command::parse("  Volume = up  # louder").unwrap();
//! assert_eq!(command.target(), Some(CommandTarget::Volume));
//! assert_eq!(command.value(), CommandValue::Up);
//! ```

use crate::playback::PlaybackController;
use tracing::debug;

/// Reply to any command that does not report a state.
pub const ACCEPTED: &str = "Command accepted";
/// Reply of the preset handler when there is no catalog.
pub const NO_STATIONS: &str = "No stations loaded";

/// Handler an argument is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandTarget {
    Volume,
    Preset,
}

/// Ordered `(prefix, target)` dispatch rules.
const RULES: &[(&str, CommandTarget)] = &[
    ("volume", CommandTarget::Volume),
    ("preset", CommandTarget::Preset),
];

/// Normalized value of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandValue {
    Up,
    Down,
    /// Magnitude of the integer read from the value, 0 if none
    Number(u64),
}

/// A command line split into its argument and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Lower-cased argument, never empty
    pub argument: String,
    /// Raw value, `"0"` when the line has no `=`
    pub value: String,
}

impl Command {
    /// Parses one line. Returns `None` when nothing is left once the comment
    /// is stripped or when the argument is empty.
    pub fn parse(raw: &str) -> Option<Self> {
        let line = strip_comment(raw).trim();

        let (argument, value) = match line.split_once('=') {
            Some((argument, value)) => (argument.trim(), value.trim()),
            None => (line, "0"),
        };

        if argument.is_empty() {
            return None;
        }

        Some(Self {
            argument: argument.to_lowercase(),
            value: value.to_string(),
        })
    }

    /// First rule whose prefix starts the argument.
    pub fn target(&self) -> Option<CommandTarget> {
        RULES
            .iter()
            .find(|(prefix, _)| self.argument.starts_with(prefix))
            .map(|(_, target)| *target)
    }

    /// `up` / `down` are matched as case-sensitive prefixes of the value.
    pub fn value(&self) -> CommandValue {
        if self.value.starts_with("up") {
            CommandValue::Up
        } else if self.value.starts_with("down") {
            CommandValue::Down
        } else {
            CommandValue::Number(parse_magnitude(&self.value))
        }
    }
}

/// Everything before the first `#`.
fn strip_comment(raw: &str) -> &str {
    raw.split_once('#').map_or(raw, |(before, _)| before)
}

/// Absolute value of the leading integer of `text`.
///
/// Leading whitespace and one sign are allowed; reading stops at the first
/// non-digit. No digits reads as 0, overflow saturates.
pub fn parse_magnitude(text: &str) -> u64 {
    let text = text.trim_start();
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);

    digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u64, |acc, d| {
            acc.saturating_mul(10).saturating_add(u64::from(d - b'0'))
        })
}

/// Interprets one command line against `playback` and returns the reply.
pub fn interpret(raw: &str, playback: &mut PlaybackController) -> String {
    let Some(command) = Command::parse(raw) else {
        return ACCEPTED.to_string();
    };

    debug!(command=%command.argument, value=%command.value, "Command received");

    match command.target() {
        Some(CommandTarget::Volume) => volume(command.value(), playback),
        Some(CommandTarget::Preset) => preset(command.value(), playback),
        None => ACCEPTED.to_string(),
    }
}

fn volume(value: CommandValue, playback: &mut PlaybackController) -> String {
    match value {
        CommandValue::Up => playback.adjust_volume(1),
        CommandValue::Down => playback.adjust_volume(-1),
        CommandValue::Number(n) => {
            playback.set_volume(n);
        }
    }
    format!("Volume is now {}", playback.volume())
}

fn preset(value: CommandValue, playback: &mut PlaybackController) -> String {
    if playback.catalog().is_empty() {
        return NO_STATIONS.to_string();
    }

    match value {
        CommandValue::Up => {
            playback.step_station(1);
        }
        CommandValue::Down => {
            playback.step_station(-1);
        }
        CommandValue::Number(n) => {
            playback.set_station(n);
        }
    }

    match playback.current() {
        Some(station) => format!("Preset set to {}. {}", station.index, station.name),
        None => NO_STATIONS.to_string(),
    }
}
