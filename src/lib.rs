//! # gilt-bind
//!
//! Keyboard hotkeys and property animation for a retained element tree.
//!
//! Elements live in a slotmap arena; each may carry a hotkey scope and an
//! animatable property record. Key presses are matched against the scopes
//! along the focus path, and properties are animated by textual paths
//! resolved to typed accessors.
//!
//! ## Core Systems
//!
//! - **[`hotkey`]**: gesture notation, gesture tries, command registry, multi-scope manager
//! - **[`animation`]**: property paths, accessors, leaf value codecs, keyframe playback
//! - **[`dom`]**: slotmap-backed element tree with focus paths
//! - **[`visual`]**: the animatable element schema
//! - **[`event`]**: keys and gestures converted from crossterm, and the action queue commands use to change the host
//! - **[`app`]**: [`app::Host`] tying everything together
//! - **[`geometry`]**: vectors, colors, thickness and relative values

// Foundation
pub mod geometry;

// Input and hotkeys
pub mod event;
pub mod hotkey;

// Element tree and properties
pub mod dom;
pub mod visual;

// Animation
pub mod animation;

// Host
pub mod app;

pub use app::{Host, HostConfig};
