//! # pmoconfig - Configuration de PMORadio
//!
//! Deux niveaux de configuration coexistent :
//!
//! - [`Config`] : le fichier `config.yaml` de l'application (ports, délais,
//!   fichiers), fusionné avec les valeurs par défaut embarquées et surchargeable
//!   par variables d'environnement `PMORADIO_CONFIG__SECTION__CLE`.
//! - [`store`] : le magasin clé→valeur à plat qui contient les identifiants
//!   WiFi saisis par l'utilisateur (et, en option, l'état de lecture).
//!
//! Les autres crates du workspace ajoutent leurs accesseurs typés par des
//! traits d'extension (`WifiConfigExt`, `StationsConfigExt`, `RadioConfigExt`)
//! construits sur [`Config::get_u64_or`] et consorts.
//!
//! ```no_run
//! use pmoconfig::get_config;
//!
//! let config = get_config();
//! let port = config.get_http_port();
//! let settings_dir = config.get_storage_dir()?;
//! config.set_http_port(8080)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result, bail};
use dirs::home_dir;
use lazy_static::lazy_static;
use pmoutils::guess_local_ip;
use serde_yaml::Value;
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tracing::{info, warn};

pub mod store;
mod tree;

pub use store::{ConfigStore, FileConfigStore, MemoryConfigStore, SettingKey, StoreError};

const DEFAULT_CONFIG: &str = include_str!("pmoradio.yaml");

lazy_static! {
    static ref CONFIG: Arc<Config> =
        Arc::new(Config::load_config("").expect("Failed to load PMORadio configuration"));
}

const ENV_CONFIG_DIR: &str = "PMORADIO_CONFIG";
const ENV_PREFIX: &str = "PMORADIO_CONFIG__";
const LOCAL_DIR: &str = ".pmoradio";
const CONFIG_FILE: &str = "config.yaml";

const DEFAULT_HTTP_PORT: u16 = 80;
const DEFAULT_LOG_BUFFER_CAPACITY: u64 = 1000;
const DEFAULT_LOG_MIN_LEVEL: &str = "INFO";
const DEFAULT_LOG_ENABLE_CONSOLE: bool = true;
const DEFAULT_STORAGE_DIR: &str = "settings";

/// Configuration de l'application, persistée dans `config.yaml`.
///
/// Toute écriture est immédiatement sauvegardée sur disque.
#[derive(Debug)]
pub struct Config {
    dir: PathBuf,
    file: PathBuf,
    data: Mutex<Value>,
}

impl Config {
    /// Charge la configuration du répertoire `directory`.
    ///
    /// Un `directory` vide est résolu dans cet ordre : variable
    /// `PMORADIO_CONFIG`, `./.pmoradio` s'il existe, `~/.pmoradio` s'il existe,
    /// puis `./.pmoradio`. Le répertoire est créé au besoin.
    pub fn load_config(directory: &str) -> Result<Self> {
        let dir = Self::locate(directory);
        Self::prepare_dir(&dir)?;
        info!(config_dir=%dir.display(), "Using config directory");

        let file = dir.join(CONFIG_FILE);
        let mut data: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;

        match fs::read_to_string(&file) {
            Ok(text) => {
                info!(config_file=%file.display(), "Loaded config file");
                let user: Value = serde_yaml::from_str(&text)
                    .with_context(|| format!("invalid YAML in {}", file.display()))?;
                tree::overlay(&mut data, &user);
            }
            Err(_) => {
                info!(config_file=%file.display(), "No config file, using embedded defaults")
            }
        }

        let mut data = tree::lowercase_keys(data);
        tree::apply_env(&mut data, ENV_PREFIX, env::vars());

        let config = Self {
            dir,
            file,
            data: Mutex::new(data),
        };
        config.save()?;
        Ok(config)
    }

    fn locate(directory: &str) -> PathBuf {
        if !directory.is_empty() {
            return PathBuf::from(directory);
        }
        if let Ok(from_env) = env::var(ENV_CONFIG_DIR) {
            info!(env_var = ENV_CONFIG_DIR, path=%from_env, "Config directory from environment");
            return PathBuf::from(from_env);
        }
        if Path::new(LOCAL_DIR).exists() {
            return PathBuf::from(LOCAL_DIR);
        }
        home_dir()
            .map(|home| home.join(LOCAL_DIR))
            .filter(|candidate| candidate.exists())
            .unwrap_or_else(|| PathBuf::from(LOCAL_DIR))
    }

    fn prepare_dir(dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("cannot create config directory {}", dir.display()))?;
        if !dir.is_dir() {
            bail!("{} is not a directory", dir.display());
        }
        Ok(())
    }

    fn data(&self) -> MutexGuard<'_, Value> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Répertoire contenant `config.yaml`
    pub fn directory(&self) -> &Path {
        &self.dir
    }

    pub fn save(&self) -> Result<()> {
        let yaml = serde_yaml::to_string(&*self.data())?;
        fs::write(&self.file, yaml)
            .with_context(|| format!("cannot write {}", self.file.display()))?;
        Ok(())
    }

    /// Valeur au chemin `path` (ex. `&["wifi", "ap_name"]`)
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        tree::lookup(&self.data(), path).cloned()
    }

    /// Écrit `value` au chemin `path` puis sauvegarde
    pub fn set_value(&self, path: &[&str], value: Value) -> Result<()> {
        tree::insert(&mut self.data(), path, value)?;
        self.save()
    }

    /// Entier non signé ; `default` est écrit dans la configuration quand la
    /// valeur manque ou n'est pas un entier.
    pub fn get_u64_or(&self, path: &[&str], default: u64) -> Result<u64> {
        let found = match self.get_value(path) {
            Ok(Value::Number(n)) => n.as_u64(),
            Ok(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        match found {
            Some(value) => Ok(value),
            None => {
                self.set_value(path, Value::from(default))?;
                Ok(default)
            }
        }
    }

    pub fn get_string_or(&self, path: &[&str], default: &str) -> Result<String> {
        match self.get_value(path) {
            Ok(Value::String(s)) => Ok(s),
            Ok(Value::Number(n)) => Ok(n.to_string()),
            _ => {
                self.set_value(path, Value::from(default))?;
                Ok(default.to_string())
            }
        }
    }

    pub fn get_bool_or(&self, path: &[&str], default: bool) -> Result<bool> {
        match self.get_value(path) {
            Ok(Value::Bool(b)) => Ok(b),
            _ => {
                self.set_value(path, Value::Bool(default))?;
                Ok(default)
            }
        }
    }

    /// Chemin absolu conservé, chemin relatif rattaché au répertoire de
    /// configuration.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.dir.join(path)
        }
    }

    /// Répertoire géré par la configuration, créé s'il n'existe pas.
    pub fn get_managed_dir(&self, path: &[&str], default: &str) -> Result<String> {
        let configured = self.get_string_or(path, default)?;
        let dir = self.resolve_path(&configured);
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            info!(directory=%dir.display(), "Created directory");
        }
        Ok(dir.to_string_lossy().into_owned())
    }

    /// Répertoire du magasin clé→valeur (identifiants, état de lecture)
    pub fn get_storage_dir(&self) -> Result<String> {
        self.get_managed_dir(&["storage", "directory"], DEFAULT_STORAGE_DIR)
    }

    /// Adresse annoncée par le serveur HTTP ; devinée si non configurée.
    pub fn get_base_url(&self) -> String {
        match self.get_value(&["host", "base_url"]) {
            Ok(Value::String(s)) if !s.is_empty() => s,
            _ => guess_local_ip(),
        }
    }

    /// Port HTTP ; 80 si absent ou invalide.
    pub fn get_http_port(&self) -> u16 {
        let configured = match self.get_value(&["host", "http_port"]) {
            Ok(Value::Number(n)) => n.as_u64().and_then(|p| u16::try_from(p).ok()),
            Ok(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        configured.unwrap_or_else(|| {
            warn!("Invalid or missing HTTP port, using {}", DEFAULT_HTTP_PORT);
            DEFAULT_HTTP_PORT
        })
    }

    pub fn set_http_port(&self, port: u16) -> Result<()> {
        self.set_value(&["host", "http_port"], Value::from(port))
    }

    /// Nombre d'entrées du buffer circulaire des logs
    pub fn get_log_cache_size(&self) -> Result<usize> {
        let size = self.get_u64_or(&["host", "logger", "buffer_capacity"], DEFAULT_LOG_BUFFER_CAPACITY)?;
        Ok(usize::try_from(size).unwrap_or(usize::MAX))
    }

    pub fn get_log_enable_console(&self) -> Result<bool> {
        self.get_bool_or(&["host", "logger", "enable_console"], DEFAULT_LOG_ENABLE_CONSOLE)
    }

    pub fn get_log_min_level(&self) -> Result<String> {
        self.get_string_or(&["host", "logger", "min_level"], DEFAULT_LOG_MIN_LEVEL)
    }
}

/// Instance globale, chargée au premier accès.
pub fn get_config() -> Arc<Config> {
    CONFIG.clone()
}
