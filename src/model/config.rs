use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration from tally.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// The todo.txt file to open when none is given on the command line
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Where archived records are appended (default: done.txt next to `file`)
    #[serde(default)]
    pub done_file: Option<PathBuf>,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Rows moved by page up / page down
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Show the creation date in list rows
    #[serde(default)]
    pub show_creation_date: bool,
    /// Delay before a terminal resize rebuilds the rows
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,
    /// Hex color overrides, e.g. `red = "#FF0000"` or `priority_a = "#FF8800"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            page_size: default_page_size(),
            show_creation_date: false,
            resize_debounce_ms: default_resize_debounce_ms(),
            colors: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Reload on external changes
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Window used to coalesce bursts of file events into one reload
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        WatchConfig {
            enabled: true,
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_page_size() -> usize {
    5
}

fn default_resize_debounce_ms() -> u64 {
    200
}

fn default_debounce_ms() -> u64 {
    500
}
