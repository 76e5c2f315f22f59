use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

const APP_DIR: &str = "tally";

/// Config file looked up in the working directory first
pub const LOCAL_CONFIG_NAME: &str = "tally.toml";

/// List file used when neither the command line nor the config names one
pub const DEFAULT_LIST_NAME: &str = "todo.txt";

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// `$XDG_CONFIG_HOME/tally`, else `~/.config/tally` (`%APPDATA%\tally` on
/// Windows)
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        dirs::config_dir().map(|dir| dir.join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// Directory for the TUI's rotating log files
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

/// The config file that applies in `cwd`, if any exists
pub fn find_config(cwd: &Path) -> Option<PathBuf> {
    let local = cwd.join(LOCAL_CONFIG_NAME);
    if local.is_file() {
        return Some(local);
    }
    config_dir()
        .map(|dir| dir.join("config.toml"))
        .filter(|p| p.is_file())
}

/// Load configuration for `cwd`. No config file means defaults; a config
/// file that cannot be read or parsed is an error.
pub fn load_config(cwd: &Path) -> Result<Config, ConfigError> {
    match find_config(cwd) {
        Some(path) => read_config(&path),
        None => Ok(Config::default()),
    }
}

pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    // Relative paths in a config file are relative to that file
    if let Some(base) = path.parent() {
        config.file = config.file.map(|f| base.join(f));
        config.done_file = config.done_file.map(|f| base.join(f));
    }
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// The list file to open: `--file`, then the config, then `todo.txt` in `cwd`
pub fn resolve_list_path(cli_file: Option<&Path>, config: &Config, cwd: &Path) -> PathBuf {
    match cli_file.or(config.file.as_deref()) {
        Some(path) => cwd.join(path),
        None => cwd.join(DEFAULT_LIST_NAME),
    }
}
