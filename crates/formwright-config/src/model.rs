use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ConfigError;

const DATA_DIR_NAME: &str = ".formwright";

/// Stores user-configurable CLI preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for drafts, forms and responses. Defaults to `~/.formwright`.
    pub data_dir: Option<PathBuf>,
    #[serde(default = "Config::default_form_name_value")]
    pub default_form_name: String,
    /// Seconds the "form saved" notice stays visible.
    #[serde(default = "Config::default_notice_timeout")]
    pub notice_timeout_secs: u64,
    #[serde(default = "Config::default_true")]
    pub ui_color_enabled: bool,
    /// Ask before deleting steps, fields or saved forms.
    #[serde(default = "Config::default_true")]
    pub confirm_destructive: bool,
    #[serde(default = "Config::default_share_base_url")]
    pub share_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            default_form_name: Self::default_form_name_value(),
            notice_timeout_secs: Self::default_notice_timeout(),
            ui_color_enabled: true,
            confirm_destructive: true,
            share_base_url: Self::default_share_base_url(),
        }
    }
}

impl Config {
    /// Setting names accepted by [`Config::set`].
    pub const KEYS: [&'static str; 6] = [
        "data_dir",
        "default_form_name",
        "notice_timeout_secs",
        "ui_color_enabled",
        "confirm_destructive",
        "share_base_url",
    ];

    pub fn default_form_name_value() -> String {
        "Untitled Form".into()
    }

    pub fn default_notice_timeout() -> u64 {
        3
    }

    pub fn default_share_base_url() -> String {
        "https://formwright.app/form".into()
    }

    fn default_true() -> bool {
        true
    }

    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(path) = &self.data_dir {
            return path.clone();
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DATA_DIR_NAME)
    }

    /// Current value of `key` rendered for display.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "data_dir" => self
                .data_dir
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
            "default_form_name" => self.default_form_name.clone(),
            "notice_timeout_secs" => self.notice_timeout_secs.to_string(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            "confirm_destructive" => self.confirm_destructive.to_string(),
            "share_base_url" => self.share_base_url.clone(),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }

    /// Parses `value` into the setting named `key`. An empty `data_dir` resets it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "data_dir" => {
                self.data_dir = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            "default_form_name" => {
                if value.is_empty() {
                    return Err(invalid(key, value, "name cannot be empty"));
                }
                self.default_form_name = value.to_string();
            }
            "notice_timeout_secs" => {
                self.notice_timeout_secs = value
                    .parse()
                    .map_err(|_| invalid(key, value, "expected a whole number of seconds"))?;
            }
            "ui_color_enabled" => self.ui_color_enabled = parse_flag(key, value)?,
            "confirm_destructive" => self.confirm_destructive = parse_flag(key, value)?,
            "share_base_url" => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(invalid(key, value, "expected an http(s) URL"));
                }
                self.share_base_url = value.trim_end_matches('/').to_string();
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(invalid(key, value, "expected true or false")),
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
