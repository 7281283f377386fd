//! Hotkeys: gesture notation, gesture tries, command registry, and the
//! manager matching key presses against the active scopes.

pub mod command;
pub mod config;
pub mod gesture;
pub mod group;
pub mod manager;

pub use command::{Command, CommandRegistry};
pub use config::{group_from_json, group_from_str, HotkeyConfigError};
pub use gesture::{format_sequence, parse_gesture, parse_sequence, GestureParseError};
pub use group::{HotkeyGroup, State};
pub use manager::{intercepts, ChainInterruptedInfo, SubscriptionId, TriggeredInfo, WindowHotkeyManager};
