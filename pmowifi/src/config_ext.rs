//! Extension pour intégrer la configuration réseau dans pmoconfig
//!
//! Ce module fournit le trait `WifiConfigExt` : délai de connexion,
//! intervalle de vérification du lien, nom du point d'accès de
//! provisioning et délai avant redémarrage.
//!
//! # Exemple
//!
//! ```no_run
//! use pmoconfig::get_config;
//! use pmowifi::WifiConfigExt;
//!
//! # fn main() -> anyhow::Result<()> {
//! let settings = get_config().get_wifi_settings()?;
//! println!("Provisioning AP: {}", settings.ap_name);
//! # Ok(())
//! # }
//! ```

use crate::manager::{
    DEFAULT_AP_NAME, DEFAULT_CONNECT_TIMEOUT, DEFAULT_POLL_INTERVAL, DEFAULT_RESTART_DELAY,
    WifiSettings,
};
use anyhow::Result;
use pmoconfig::Config;
use serde_yaml::{Number, Value};
use std::time::Duration;

/// Trait d'extension pour la configuration réseau
///
/// Les getters persistent automatiquement les valeurs par défaut dans la
/// configuration si elles n'existent pas encore.
pub trait WifiConfigExt {
    /// Délai maximal d'attente du lien (défaut : 10 s)
    fn get_wifi_connect_timeout(&self) -> Result<Duration>;
    fn set_wifi_connect_timeout(&self, timeout: Duration) -> Result<()>;

    /// Intervalle entre deux vérifications du lien (défaut : 100 ms)
    fn get_wifi_poll_interval(&self) -> Result<Duration>;

    /// Nom du point d'accès de provisioning (défaut : `WEBRADIO-SETUP`)
    fn get_wifi_ap_name(&self) -> Result<String>;
    fn set_wifi_ap_name(&self, name: &str) -> Result<()>;

    /// Délai entre la réponse du formulaire et le redémarrage (défaut : 3 s)
    fn get_wifi_restart_delay(&self) -> Result<Duration>;

    /// Tous les réglages réseau
    fn get_wifi_settings(&self) -> Result<WifiSettings> {
        Ok(WifiSettings {
            connect_timeout: self.get_wifi_connect_timeout()?,
            poll_interval: self.get_wifi_poll_interval()?,
            ap_name: self.get_wifi_ap_name()?,
            restart_delay: self.get_wifi_restart_delay()?,
        })
    }
}

fn millis(default: Duration) -> u64 {
    default.as_millis() as u64
}

impl WifiConfigExt for Config {
    fn get_wifi_connect_timeout(&self) -> Result<Duration> {
        let ms = self.get_u64_or(
            &["wifi", "connect_timeout_ms"],
            millis(DEFAULT_CONNECT_TIMEOUT),
        )?;
        Ok(Duration::from_millis(ms))
    }

    fn set_wifi_connect_timeout(&self, timeout: Duration) -> Result<()> {
        self.set_value(
            &["wifi", "connect_timeout_ms"],
            Value::Number(Number::from(millis(timeout))),
        )
    }

    fn get_wifi_poll_interval(&self) -> Result<Duration> {
        // un intervalle nul ferait tourner la boucle d'attente à vide
        let ms = self
            .get_u64_or(&["wifi", "poll_interval_ms"], millis(DEFAULT_POLL_INTERVAL))?
            .max(1);
        Ok(Duration::from_millis(ms))
    }

    fn get_wifi_ap_name(&self) -> Result<String> {
        match self.get_value(&["wifi", "ap_name"]) {
            Ok(Value::String(s)) if !s.trim().is_empty() => Ok(s),
            _ => {
                self.set_wifi_ap_name(DEFAULT_AP_NAME)?;
                Ok(DEFAULT_AP_NAME.to_string())
            }
        }
    }

    fn set_wifi_ap_name(&self, name: &str) -> Result<()> {
        self.set_value(&["wifi", "ap_name"], Value::String(name.to_string()))
    }

    fn get_wifi_restart_delay(&self) -> Result<Duration> {
        let ms = self.get_u64_or(&["wifi", "restart_delay_ms"], millis(DEFAULT_RESTART_DELAY))?;
        Ok(Duration::from_millis(ms))
    }
}
