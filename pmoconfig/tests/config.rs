use pmoconfig::Config;

fn load_in(dir: &tempfile::TempDir) -> Config {
    Config::load_config(dir.path().to_str().unwrap()).unwrap()
}

#[test]
fn test_defaults_are_loaded_and_saved() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_in(&dir);

    assert_eq!(config.get_value(&["wifi", "ap_name"]).unwrap(), "WEBRADIO-SETUP");
    assert!(dir.path().join("config.yaml").exists());
}

#[test]
fn test_external_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.yaml"),
        "host:\n  http_port: 8081\nradio:\n  Default_Volume: 5\n",
    )
    .unwrap();

    let config = load_in(&dir);
    assert_eq!(config.get_http_port(), 8081);
    assert_eq!(config.get_u64_or(&["radio", "default_volume"], 17).unwrap(), 5);
    // les valeurs non surchargées restent celles par défaut
    assert_eq!(config.get_u64_or(&["radio", "tick_ms"], 99).unwrap(), 5);
}

#[test]
fn test_missing_values_are_persisted_with_default() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_in(&dir);

    assert_eq!(config.get_u64_or(&["custom", "answer"], 42).unwrap(), 42);
    assert_eq!(config.get_string_or(&["custom", "name"], "radio").unwrap(), "radio");
    assert!(config.get_bool_or(&["custom", "flag"], true).unwrap());

    let reloaded = load_in(&dir);
    assert_eq!(reloaded.get_u64_or(&["custom", "answer"], 0).unwrap(), 42);
}

#[test]
fn test_storage_dir_is_created_relative_to_config_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_in(&dir);

    let storage = config.get_storage_dir().unwrap();
    assert_eq!(std::path::Path::new(&storage), dir.path().join("settings"));
    assert!(std::path::Path::new(&storage).is_dir());
}
