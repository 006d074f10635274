use pmowifi::{WifiConfigExt, WifiSettings};
use std::time::Duration;

#[test]
fn test_wifi_settings_defaults_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = pmoconfig::Config::load_config(dir.path().to_str().unwrap()).unwrap();

    assert_eq!(config.get_wifi_settings().unwrap(), WifiSettings::default());
}

#[test]
fn test_wifi_settings_overrides() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.yaml"),
        "wifi:\n  connect_timeout_ms: 2500\n  poll_interval_ms: 0\n  ap_name: ''\n",
    )
    .unwrap();
    let config = pmoconfig::Config::load_config(dir.path().to_str().unwrap()).unwrap();

    assert_eq!(
        config.get_wifi_connect_timeout().unwrap(),
        Duration::from_millis(2500)
    );
    assert_eq!(config.get_wifi_poll_interval().unwrap(), Duration::from_millis(1));
    assert_eq!(config.get_wifi_ap_name().unwrap(), "WEBRADIO-SETUP");

    config.set_wifi_ap_name("RADIO-KITCHEN").unwrap();
    assert_eq!(config.get_wifi_ap_name().unwrap(), "RADIO-KITCHEN");
}
