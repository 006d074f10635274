//! # pmoradio - Contrôle de lecture de PMORadio
//!
//! Cette crate contient le cœur de contrôle de la radio une fois le réseau
//! établi :
//!
//! - [`command`] : interpréteur du protocole texte `ARGUMENT[=VALUE]`
//! - [`playback`] : [`PlaybackController`], seul propriétaire du volume et de
//!   la station courante
//! - [`radio`] : boucle de contrôle coopérative ([`Radio::tick`], [`Radio::run`])
//! - [`serial`] : assemblage des lignes du canal série
//! - [`http`] : formulaire de commandes `/command` et état `/api/status`
//! - [`capabilities`] : traits des collaborateurs (audio, affichage,
//!   encodeur, liaison série) et [`host`] leurs implémentations hôte
//!
//! ## Exemple
//!
//! ```
//! use pmoradio::{PlaybackController, RadioSettings, command::interpret, host::LogAudioEngine};
//! use pmostations::StationCatalog;
//!
//! let catalog = StationCatalog::from_pairs([("Jazz", "http://jazz"), ("Rock", "http://rock")]);
//! let mut playback =
//!     PlaybackController::new(catalog, Box::new(LogAudioEngine::new()), &RadioSettings::default());
//!
//! assert_eq!(interpret("volume=15", &mut playback), "Volume is now 15");
//! assert_eq!(interpret("preset=down", &mut playback), "Preset set to 2. Rock");
//! ```

pub mod capabilities;
pub mod command;
pub mod config_ext;
pub mod error;
pub mod host;
pub mod http;
pub mod playback;
pub mod radio;
pub mod serial;

pub use capabilities::{AudioEngine, AudioEvent, RotaryEncoder, SerialPort, StatusDisplay};
pub use config_ext::{RadioConfigExt, RadioSettings};
pub use error::{RadioError, Result};
pub use http::command_router;
pub use playback::{MAX_VOLUME, PlaybackController, PlaybackStatus};
pub use radio::{Radio, RadioHandle};
pub use serial::LineReader;
