use std::{fs, path::PathBuf};

use formwright_config::{Config, ConfigError, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_has_sensible_values() {
    let cfg = Config::default();

    assert_eq!(cfg.default_form_name, "Untitled Form");
    assert!(cfg.notice_timeout_secs > 0);
    assert!(cfg.share_base_url.starts_with("https://"));
    assert!(cfg.resolve_data_dir().ends_with(".formwright"));
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().join("home")).expect("manager");

    let mut cfg = Config::default();
    cfg.default_form_name = "Intake".to_string();
    cfg.notice_timeout_secs = 10;
    cfg.data_dir = Some(PathBuf::from("/tmp/forms"));

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert_eq!(loaded.resolve_data_dir(), PathBuf::from("/tmp/forms"));
}

#[test]
fn missing_config_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));
    assert_eq!(manager.load().expect("load"), Config::default());
}

#[test]
fn partial_config_fills_in_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"ui_color_enabled": false}"#).expect("write");

    let loaded = ConfigManager::new(path).load().expect("load");
    assert!(!loaded.ui_color_enabled);
    assert!(loaded.confirm_destructive);
    assert_eq!(loaded.notice_timeout_secs, Config::default_notice_timeout());
}

#[test]
fn settings_can_be_set_by_name() {
    let mut cfg = Config::default();
    cfg.set("confirm_destructive", "no").expect("flag");
    cfg.set("share_base_url", "https://forms.example/f/").expect("url");
    cfg.set("notice_timeout_secs", "5").expect("number");

    assert!(!cfg.confirm_destructive);
    assert_eq!(cfg.get("share_base_url").unwrap(), "https://forms.example/f");
    assert_eq!(cfg.notice_timeout_secs, 5);

    assert!(matches!(
        cfg.set("colour", "true"),
        Err(ConfigError::UnknownKey(_))
    ));
    assert!(matches!(
        cfg.set("notice_timeout_secs", "soon"),
        Err(ConfigError::InvalidValue { .. })
    ));
}
