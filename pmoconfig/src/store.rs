//! Flat key→value settings store.
//!
//! Each [`SettingKey`] maps to exactly one record. Reading never fails: a
//! missing or unreadable record reads as an empty string. Writing reports
//! failure through [`StoreError`] and, for the file-backed store, is durable
//! (synced to disk) before returning.
//!
//! ```no_run
//! use pmoconfig::{ConfigStore, FileConfigStore, SettingKey};
//!
//! let store = FileConfigStore::new("/var/lib/pmoradio/settings");
//! if store.read(SettingKey::Ssid).is_empty() {
//!     println!("No network configured yet");
//! }
//! store.write(SettingKey::Ssid, "home-network")?;
//! # Ok::<(), pmoconfig::StoreError>(())
//! ```

use std::{
    collections::HashMap,
    fmt, fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};
use tracing::{debug, warn};

/// Keys of the settings store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Ssid,
    Password,
    StaticIp,
    Volume,
    Station,
}

impl SettingKey {
    pub const ALL: [SettingKey; 5] = [
        SettingKey::Ssid,
        SettingKey::Password,
        SettingKey::StaticIp,
        SettingKey::Volume,
        SettingKey::Station,
    ];

    /// Name of the record backing this key.
    pub fn file_name(self) -> &'static str {
        match self {
            SettingKey::Ssid => "ssid.txt",
            SettingKey::Password => "pass.txt",
            SettingKey::StaticIp => "ip.txt",
            SettingKey::Volume => "volume.txt",
            SettingKey::Station => "station.txt",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Failure of a settings write.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to open {key} for writing: {source}")]
    Open {
        key: SettingKey,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {key}: {source}")]
    Write {
        key: SettingKey,
        #[source]
        source: io::Error,
    },

    #[error("settings medium is read-only")]
    ReadOnly,
}

/// Key→value persistence of the appliance settings.
pub trait ConfigStore: Send + Sync {
    /// Stored value, or an empty string if absent.
    fn read(&self, key: SettingKey) -> String;

    /// Persists `value` under `key`.
    fn write(&self, key: SettingKey, value: &str) -> Result<(), StoreError>;
}

/// Keeps only the first line of a record, without its line terminator.
fn first_line(content: &str) -> &str {
    content.split('\n').next().unwrap_or("").trim_end_matches('\r')
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    directory: PathBuf,
}

impl FileConfigStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_of(&self, key: SettingKey) -> PathBuf {
        self.directory.join(key.file_name())
    }
}

impl ConfigStore for FileConfigStore {
    fn read(&self, key: SettingKey) -> String {
        let path = self.path_of(key);
        debug!(file=%path.display(), "Reading setting");

        match fs::read_to_string(&path) {
            Ok(content) => first_line(&content).to_string(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                warn!(file=%path.display(), error=%e, "Failed to open setting for reading");
                String::new()
            }
        }
    }

    fn write(&self, key: SettingKey, value: &str) -> Result<(), StoreError> {
        let path = self.path_of(key);
        debug!(file=%path.display(), "Writing setting");

        fs::create_dir_all(&self.directory).map_err(|source| StoreError::Open { key, source })?;
        let mut file = fs::File::create(&path).map_err(|source| StoreError::Open { key, source })?;
        file.write_all(value.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|source| StoreError::Write { key, source })?;

        Ok(())
    }
}

/// Volatile store, used by tests and by devices without a settings medium.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    values: Mutex<HashMap<SettingKey, String>>,
    read_only: bool,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `values`.
    pub fn with_values<'a>(values: impl IntoIterator<Item = (SettingKey, &'a str)>) -> Self {
        let values = values
            .into_iter()
            .map(|(k, v)| (k, v.to_string()))
            .collect();
        Self {
            values: Mutex::new(values),
            read_only: false,
        }
    }

    /// Makes every subsequent write fail, as an unmounted medium would.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

impl ConfigStore for MemoryConfigStore {
    fn read(&self, key: SettingKey) -> String {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values
            .get(&key)
            .map(|v| first_line(v).to_string())
            .unwrap_or_default()
    }

    fn write(&self, key: SettingKey, value: &str) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("home\r\nignored"), "home");
        assert_eq!(first_line("home"), "home");
        assert_eq!(first_line(""), "");
    }

    #[test]
    fn test_memory_store_missing_key_reads_empty() {
        let store = MemoryConfigStore::new();
        for key in SettingKey::ALL {
            assert_eq!(store.read(key), "");
        }
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryConfigStore::new();
        store.write(SettingKey::Ssid, "home").unwrap();
        assert_eq!(store.read(SettingKey::Ssid), "home");
        assert_eq!(store.read(SettingKey::Password), "");
    }

    #[test]
    fn test_memory_store_read_only() {
        let store = MemoryConfigStore::with_values([(SettingKey::Ssid, "home")]).read_only();
        assert!(matches!(
            store.write(SettingKey::Ssid, "other"),
            Err(StoreError::ReadOnly)
        ));
        assert_eq!(store.read(SettingKey::Ssid), "home");
    }
}
