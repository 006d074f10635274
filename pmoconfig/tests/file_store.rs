use pmoconfig::{ConfigStore, FileConfigStore, SettingKey};
use tempfile::TempDir;

fn create_test_store() -> (TempDir, FileConfigStore) {
    let temp_dir = tempfile::tempdir().unwrap();
    let store = FileConfigStore::new(temp_dir.path().join("settings"));
    (temp_dir, store)
}

#[test]
fn test_missing_file_reads_empty() {
    let (_temp_dir, store) = create_test_store();
    assert_eq!(store.read(SettingKey::Ssid), "");
    assert_eq!(store.read(SettingKey::StaticIp), "");
}

#[test]
fn test_write_creates_directory_and_file() {
    let (_temp_dir, store) = create_test_store();
    store.write(SettingKey::Ssid, "home-network").unwrap();

    let path = store.directory().join("ssid.txt");
    assert!(path.exists());
    assert_eq!(std::fs::read_to_string(path).unwrap(), "home-network");
    assert_eq!(store.read(SettingKey::Ssid), "home-network");
}

#[test]
fn test_read_returns_first_line_only() {
    let (_temp_dir, store) = create_test_store();
    std::fs::create_dir_all(store.directory()).unwrap();
    std::fs::write(store.directory().join("pass.txt"), "secret\r\nsecond line\n").unwrap();

    assert_eq!(store.read(SettingKey::Password), "secret");
}

#[test]
fn test_write_overwrites_previous_value() {
    let (_temp_dir, store) = create_test_store();
    store.write(SettingKey::StaticIp, "192.168.1.200").unwrap();
    store.write(SettingKey::StaticIp, "").unwrap();

    assert_eq!(store.read(SettingKey::StaticIp), "");
}

#[test]
fn test_keys_are_independent() {
    let (_temp_dir, store) = create_test_store();
    store.write(SettingKey::Ssid, "home").unwrap();
    store.write(SettingKey::Password, "secret").unwrap();

    assert_eq!(store.read(SettingKey::Ssid), "home");
    assert_eq!(store.read(SettingKey::Password), "secret");
    assert_eq!(store.read(SettingKey::Volume), "");
}

#[test]
fn test_write_fails_when_directory_is_a_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let blocker = temp_dir.path().join("settings");
    std::fs::write(&blocker, "not a directory").unwrap();

    let store = FileConfigStore::new(&blocker);
    assert!(store.write(SettingKey::Ssid, "home").is_err());
    assert_eq!(store.read(SettingKey::Ssid), "");
}
