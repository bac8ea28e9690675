use std::path::PathBuf;

use formwright_config::Config;

/// Overrides both the config location and the data directory.
pub const HOME_ENV: &str = "FORMWRIGHT_HOME";

/// Directory holding `config.json`.
pub fn config_home() -> PathBuf {
    env_home().unwrap_or_else(|| Config::default().resolve_data_dir())
}

/// Directory holding drafts, saved forms and responses: `FORMWRIGHT_HOME`,
/// then the configured `data_dir`, then `~/.formwright`.
pub fn resolve_data_dir(config: &Config) -> PathBuf {
    env_home().unwrap_or_else(|| config.resolve_data_dir())
}

fn env_home() -> Option<PathBuf> {
    std::env::var_os(HOME_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
