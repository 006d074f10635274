//! Extension pour intégrer la configuration de lecture dans pmoconfig
//!
//! Ce module fournit [`RadioSettings`] et le trait `RadioConfigExt` :
//! volume et station par défaut, cadence de la boucle de contrôle,
//! rafraîchissement de l'affichage, tampon série, anti-rebond du bouton
//! et persistance optionnelle de l'état de lecture.
//!
//! # Exemple
//!
//! ```no_run
//! use pmoconfig::get_config;
//! use pmoradio::RadioConfigExt;
//!
//! # fn main() -> anyhow::Result<()> {
//! let settings = get_config().get_radio_settings()?;
//! println!("Starting at volume {}", settings.default_volume);
//! # Ok(())
//! # }
//! ```

use crate::playback::MAX_VOLUME;
use anyhow::Result;
use pmoconfig::Config;
use serde_yaml::Value;
use std::time::Duration;

pub const DEFAULT_VOLUME: u8 = 17;
pub const DEFAULT_STATION: usize = 1;
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(5);
pub const DEFAULT_DISPLAY_REFRESH: Duration = Duration::from_millis(200);
/// 128 usable characters plus terminator slack
pub const DEFAULT_SERIAL_BUFFER: usize = 130;
pub const DEFAULT_CLICK_DEBOUNCE: Duration = Duration::from_millis(200);

/// Playback and control loop settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioSettings {
    pub default_volume: u8,
    pub default_station: usize,
    pub tick_interval: Duration,
    pub display_refresh: Duration,
    pub serial_buffer: usize,
    pub click_debounce: Duration,
    pub persist_playback: bool,
}

impl Default for RadioSettings {
    fn default() -> Self {
        Self {
            default_volume: DEFAULT_VOLUME,
            default_station: DEFAULT_STATION,
            tick_interval: DEFAULT_TICK_INTERVAL,
            display_refresh: DEFAULT_DISPLAY_REFRESH,
            serial_buffer: DEFAULT_SERIAL_BUFFER,
            click_debounce: DEFAULT_CLICK_DEBOUNCE,
            persist_playback: false,
        }
    }
}

/// Trait d'extension pour la configuration de lecture
///
/// Les getters persistent automatiquement les valeurs par défaut dans la
/// configuration si elles n'existent pas encore.
pub trait RadioConfigExt {
    /// Volume au démarrage, borné à `0..=21` (défaut : 17)
    fn get_radio_default_volume(&self) -> Result<u8>;

    /// Station au démarrage, index 1-based (défaut : 1)
    fn get_radio_default_station(&self) -> Result<usize>;

    /// Période de la boucle de contrôle (défaut : 5 ms)
    fn get_radio_tick_interval(&self) -> Result<Duration>;

    /// Période de rafraîchissement de l'affichage (défaut : 200 ms)
    fn get_radio_display_refresh(&self) -> Result<Duration>;

    /// Taille du tampon de la ligne série (défaut : 130)
    fn get_radio_serial_buffer(&self) -> Result<usize>;

    /// Anti-rebond du bouton de l'encodeur (défaut : 200 ms)
    fn get_radio_click_debounce(&self) -> Result<Duration>;

    /// Persistance du volume et de la station (défaut : désactivée)
    fn get_radio_persist_playback(&self) -> Result<bool>;
    fn set_radio_persist_playback(&self, enabled: bool) -> Result<()>;

    /// Tous les réglages de lecture
    fn get_radio_settings(&self) -> Result<RadioSettings> {
        Ok(RadioSettings {
            default_volume: self.get_radio_default_volume()?,
            default_station: self.get_radio_default_station()?,
            tick_interval: self.get_radio_tick_interval()?,
            display_refresh: self.get_radio_display_refresh()?,
            serial_buffer: self.get_radio_serial_buffer()?,
            click_debounce: self.get_radio_click_debounce()?,
            persist_playback: self.get_radio_persist_playback()?,
        })
    }
}

fn duration_ms(config: &Config, key: &str, default: Duration) -> Result<Duration> {
    let ms = config.get_u64_or(&["radio", key], default.as_millis() as u64)?;
    Ok(Duration::from_millis(ms))
}

impl RadioConfigExt for Config {
    fn get_radio_default_volume(&self) -> Result<u8> {
        let volume = self.get_u64_or(&["radio", "default_volume"], DEFAULT_VOLUME as u64)?;
        Ok(volume.min(MAX_VOLUME as u64) as u8)
    }

    fn get_radio_default_station(&self) -> Result<usize> {
        let station = self.get_u64_or(&["radio", "default_station"], DEFAULT_STATION as u64)?;
        Ok((station as usize).max(1))
    }

    fn get_radio_tick_interval(&self) -> Result<Duration> {
        let tick = duration_ms(self, "tick_ms", DEFAULT_TICK_INTERVAL)?;
        Ok(tick.max(Duration::from_millis(1)))
    }

    fn get_radio_display_refresh(&self) -> Result<Duration> {
        duration_ms(self, "display_refresh_ms", DEFAULT_DISPLAY_REFRESH)
    }

    fn get_radio_serial_buffer(&self) -> Result<usize> {
        let size = self.get_u64_or(&["radio", "serial_buffer"], DEFAULT_SERIAL_BUFFER as u64)?;
        // au moins un caractère utile
        Ok((size as usize).max(3))
    }

    fn get_radio_click_debounce(&self) -> Result<Duration> {
        duration_ms(self, "click_debounce_ms", DEFAULT_CLICK_DEBOUNCE)
    }

    fn get_radio_persist_playback(&self) -> Result<bool> {
        self.get_bool_or(&["radio", "persist_playback"], false)
    }

    fn set_radio_persist_playback(&self, enabled: bool) -> Result<()> {
        self.set_value(&["radio", "persist_playback"], Value::Bool(enabled))
    }
}
