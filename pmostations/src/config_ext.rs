//! Extension pour intégrer le catalogue de stations dans pmoconfig
//!
//! Ce module fournit le trait `StationsConfigExt` qui ajoute à
//! `pmoconfig::Config` l'emplacement du fichier de stations et l'URL du flux
//! de secours.
//!
//! # Exemple
//!
//! ```no_run
//! use pmoconfig::get_config;
//! use pmostations::{StationCatalog, StationsConfigExt};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = get_config();
//!
//! let mut catalog = StationCatalog::new();
//! if catalog.load_from_path(config.get_stations_file()?).is_err() {
//!     println!("Falling back to {}", config.get_fallback_url()?);
//! }
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use pmoconfig::Config;
use serde_yaml::Value;
use std::path::PathBuf;

/// Default name of the station table, relative to the config directory
pub const DEFAULT_STATIONS_FILE: &str = "stations.csv";

/// Default stream played when no catalog could be loaded
pub const DEFAULT_FALLBACK_URL: &str = "live.pieci.lv/live19-hq.mp3";

/// Trait d'extension pour la configuration du catalogue de stations
///
/// # Auto-persist des valeurs par défaut
///
/// Les getters persistent automatiquement les valeurs par défaut dans la
/// configuration si elles n'existent pas encore.
pub trait StationsConfigExt {
    /// Chemin du fichier CSV des stations
    ///
    /// Un chemin relatif est résolu par rapport au répertoire de configuration.
    fn get_stations_file(&self) -> Result<PathBuf>;

    /// Définit le fichier CSV des stations
    fn set_stations_file(&self, path: &str) -> Result<()>;

    /// URL du flux joué quand aucune station n'est chargée
    fn get_fallback_url(&self) -> Result<String>;

    /// Définit l'URL du flux de secours
    fn set_fallback_url(&self, url: &str) -> Result<()>;
}

impl StationsConfigExt for Config {
    fn get_stations_file(&self) -> Result<PathBuf> {
        let file = self.get_string_or(&["stations", "file"], DEFAULT_STATIONS_FILE)?;
        Ok(self.resolve_path(&file))
    }

    fn set_stations_file(&self, path: &str) -> Result<()> {
        self.set_value(&["stations", "file"], Value::String(path.to_string()))
    }

    fn get_fallback_url(&self) -> Result<String> {
        match self.get_value(&["stations", "fallback_url"]) {
            Ok(Value::String(s)) if !s.trim().is_empty() => Ok(s),
            _ => {
                self.set_fallback_url(DEFAULT_FALLBACK_URL)?;
                Ok(DEFAULT_FALLBACK_URL.to_string())
            }
        }
    }

    fn set_fallback_url(&self, url: &str) -> Result<()> {
        self.set_value(&["stations", "fallback_url"], Value::String(url.to_string()))
    }
}
