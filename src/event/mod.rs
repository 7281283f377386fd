//! Input and deferred actions: keys, modifiers and gestures converted from
//! crossterm events, and the queue commands use to change the host.

pub mod action;
pub mod input;

pub use action::{ActionQueue, HostAction};
pub use input::{Key, KeyGesture, Modifiers};
