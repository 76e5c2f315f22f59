use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::record::Fingerprint;

/// Persisted TUI state (written to `.<file>.state.json`)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UiState {
    /// Fingerprint of the record selected when the TUI last exited
    #[serde(default)]
    pub selected: Option<Fingerprint>,
}

/// Read UI state. Missing or malformed files read as `None`.
pub fn read_ui_state(path: &Path) -> Option<UiState> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

pub fn write_ui_state(path: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let content = serde_json::to_string_pretty(state)?;
    fs::write(path, content)
}
