//! Hotkey tables from JSON.
//!
//! A table maps gesture sequences to command names:
//!
//! ```json
//! { "ctrl+s": "save", "ctrl+k, ctrl+c": "comment_selection" }
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::gesture::{parse_sequence, GestureParseError};
use super::group::HotkeyGroup;

/// Errors from loading a hotkey table.
#[derive(Debug, thiserror::Error)]
pub enum HotkeyConfigError {
    #[error("hotkey table must map gesture sequences to command names: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid hotkey `{sequence}`: {source}")]
    Gesture {
        sequence: String,
        #[source]
        source: GestureParseError,
    },
    #[error("hotkey `{sequence}` conflicts with another entry of the table")]
    Conflict { sequence: String },
}

/// Build a group from a JSON object of `"sequence": "command"` pairs.
///
/// Entries are registered in key order, so of two conflicting entries the
/// one that sorts later is reported.
pub fn group_from_json(value: &Value) -> Result<HotkeyGroup<String>, HotkeyConfigError> {
    let table = BTreeMap::<String, String>::deserialize(value)?;
    build_group(table)
}

/// Like [`group_from_json`], from JSON text.
pub fn group_from_str(text: &str) -> Result<HotkeyGroup<String>, HotkeyConfigError> {
    let table: BTreeMap<String, String> = serde_json::from_str(text)?;
    build_group(table)
}

fn build_group(table: BTreeMap<String, String>) -> Result<HotkeyGroup<String>, HotkeyConfigError> {
    let mut group = HotkeyGroup::new();
    for (sequence, command) in table {
        let gestures = match parse_sequence(&sequence) {
            Ok(gestures) => gestures,
            Err(source) => return Err(HotkeyConfigError::Gesture { sequence, source }),
        };
        if !group.register_hotkey(&gestures, command) {
            return Err(HotkeyConfigError::Conflict { sequence });
        }
    }
    debug!(hotkeys = group.len(), "hotkey table loaded");
    Ok(group)
}
