//! Key gesture types wrapping crossterm for decoupling.
//!
//! Defines [`Key`], [`Modifiers`] and [`KeyGesture`]. Crossterm key events are
//! converted via `From` impls so the rest of the crate never depends on
//! crossterm directly.

use std::fmt;
use std::ops::{BitAnd, BitOr};

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key, decoupled from crossterm.
///
/// Letters are stored lowercase; shift is carried by [`Modifiers::SHIFT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Char(char),
    Space,
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Insert,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    // Bare modifier keys, reported when a modifier is pressed on its own.
    Control,
    Shift,
    Alt,
    Super,
    /// A key this crate has no name for.
    Unknown,
}

impl Key {
    /// Whether this key is itself a modifier (control, shift, alt or super).
    pub fn is_modifier(self) -> bool {
        matches!(self, Key::Control | Key::Shift | Key::Alt | Key::Super)
    }

    /// Look up a key by its (case-insensitive) name, e.g. `"k"`, `"enter"`, `"f5"`.
    pub fn from_name(name: &str) -> Option<Key> {
        let lower = name.to_ascii_lowercase();
        let key = match lower.as_str() {
            "space" => Key::Space,
            "enter" | "return" => Key::Enter,
            "esc" | "escape" => Key::Escape,
            "tab" => Key::Tab,
            "backtab" => Key::BackTab,
            "backspace" => Key::Backspace,
            "insert" => Key::Insert,
            "delete" | "del" => Key::Delete,
            "left" => Key::Left,
            "right" => Key::Right,
            "up" => Key::Up,
            "down" => Key::Down,
            "home" => Key::Home,
            "end" => Key::End,
            "pageup" => Key::PageUp,
            "pagedown" => Key::PageDown,
            "plus" => Key::Char('+'),
            "comma" => Key::Char(','),
            "control" | "ctrl" => Key::Control,
            "shift" => Key::Shift,
            "alt" => Key::Alt,
            "super" => Key::Super,
            _ => {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    (Some('f'), Some(_)) => Key::F(lower[1..].parse().ok()?),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            Key::F(n) => write!(f, "F{n}"),
            Key::PageUp => write!(f, "PageUp"),
            Key::PageDown => write!(f, "PageDown"),
            Key::BackTab => write!(f, "BackTab"),
            other => write!(f, "{other:?}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);
    pub const SUPER: Modifiers = Modifiers(8);

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check whether no modifier bits are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// `self` with every bit of `other` cleared.
    pub fn without(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 & !other.0)
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;
    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// KeyGesture
// ---------------------------------------------------------------------------

/// A single key press with the modifiers held at the time.
///
/// Ordering compares the primary key first, then the modifier bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyGesture {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyGesture {
    /// Create a new gesture.
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// A gesture with no modifiers held.
    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// Shorthand for `Ctrl+<key>`.
    pub fn ctrl(key: Key) -> Self {
        Self::new(key, Modifiers::CTRL)
    }
}

impl fmt::Display for KeyGesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in [
            (Modifiers::CTRL, "Ctrl+"),
            (Modifiers::SHIFT, "Shift+"),
            (Modifiers::ALT, "Alt+"),
            (Modifiers::SUPER, "Super+"),
        ] {
            if self.modifiers.contains(flag) {
                f.write_str(name)?;
            }
        }
        write!(f, "{}", self.key)
    }
}

// ---------------------------------------------------------------------------
// From<crossterm> conversions
// ---------------------------------------------------------------------------

/// Convert crossterm key modifiers to our `Modifiers`.
fn convert_modifiers(m: crossterm::event::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if m.contains(crossterm::event::KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(crossterm::event::KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(crossterm::event::KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    if m.contains(crossterm::event::KeyModifiers::SUPER) {
        out = out | Modifiers::SUPER;
    }
    out
}

/// Convert a crossterm modifier key code to the matching bare modifier key.
fn convert_modifier_key(m: crossterm::event::ModifierKeyCode) -> Key {
    use crossterm::event::ModifierKeyCode as M;
    match m {
        M::LeftControl | M::RightControl => Key::Control,
        M::LeftShift | M::RightShift => Key::Shift,
        M::LeftAlt | M::RightAlt => Key::Alt,
        M::LeftSuper | M::RightSuper => Key::Super,
        _ => Key::Unknown,
    }
}

/// Convert a crossterm `KeyEvent` into a gesture.
///
/// Uppercase ASCII letters are folded to lowercase with shift added. For
/// other characters shift is already part of the character (`?`, `!`, `:`)
/// and is dropped, so they match bindings written without it.
impl From<crossterm::event::KeyEvent> for KeyGesture {
    fn from(ct: crossterm::event::KeyEvent) -> Self {
        let mut modifiers = convert_modifiers(ct.modifiers);
        let key = match ct.code {
            crossterm::event::KeyCode::Char(' ') => Key::Space,
            crossterm::event::KeyCode::Char(c) if c.is_ascii_uppercase() => {
                modifiers = modifiers | Modifiers::SHIFT;
                Key::Char(c.to_ascii_lowercase())
            }
            crossterm::event::KeyCode::Char(c) if !c.is_alphabetic() => {
                modifiers = modifiers.without(Modifiers::SHIFT);
                Key::Char(c)
            }
            crossterm::event::KeyCode::Char(c) => Key::Char(c),
            crossterm::event::KeyCode::Enter => Key::Enter,
            crossterm::event::KeyCode::Esc => Key::Escape,
            crossterm::event::KeyCode::Tab => Key::Tab,
            crossterm::event::KeyCode::BackTab => Key::BackTab,
            crossterm::event::KeyCode::Backspace => Key::Backspace,
            crossterm::event::KeyCode::Insert => Key::Insert,
            crossterm::event::KeyCode::Delete => Key::Delete,
            crossterm::event::KeyCode::Left => Key::Left,
            crossterm::event::KeyCode::Right => Key::Right,
            crossterm::event::KeyCode::Up => Key::Up,
            crossterm::event::KeyCode::Down => Key::Down,
            crossterm::event::KeyCode::Home => Key::Home,
            crossterm::event::KeyCode::End => Key::End,
            crossterm::event::KeyCode::PageUp => Key::PageUp,
            crossterm::event::KeyCode::PageDown => Key::PageDown,
            crossterm::event::KeyCode::F(n) => Key::F(n),
            crossterm::event::KeyCode::Modifier(m) => convert_modifier_key(m),
            _ => Key::Unknown,
        };
        KeyGesture { key, modifiers }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ── Modifiers ────────────────────────────────────────────────────

    #[test]
    fn modifiers_none_is_empty() {
        assert!(Modifiers::NONE.is_empty());
    }

    #[test]
    fn modifiers_combined() {
        let mods = Modifiers::CTRL | Modifiers::ALT;
        assert!(mods.contains(Modifiers::CTRL));
        assert!(mods.contains(Modifiers::ALT));
        assert!(!mods.contains(Modifiers::SHIFT));
        assert_eq!(mods & Modifiers::CTRL, Modifiers::CTRL);
    }

    // ── Key ──────────────────────────────────────────────────────────

    #[test]
    fn bare_modifier_keys() {
        for key in [Key::Control, Key::Shift, Key::Alt, Key::Super] {
            assert!(key.is_modifier());
        }
        assert!(!Key::Char('k').is_modifier());
        assert!(!Key::F(1).is_modifier());
    }

    #[test]
    fn key_from_name() {
        assert_eq!(Key::from_name("K"), Some(Key::Char('k')));
        assert_eq!(Key::from_name("enter"), Some(Key::Enter));
        assert_eq!(Key::from_name("F12"), Some(Key::F(12)));
        assert_eq!(Key::from_name("ctrl"), Some(Key::Control));
        assert_eq!(Key::from_name("plus"), Some(Key::Char('+')));
        assert_eq!(Key::from_name("fx"), None);
        assert_eq!(Key::from_name("nonsense"), None);
    }

    // ── KeyGesture ordering ──────────────────────────────────────────

    #[test]
    fn gesture_orders_by_key_then_modifiers() {
        let a_ctrl = KeyGesture::ctrl(Key::Char('a'));
        let a_shift = KeyGesture::new(Key::Char('a'), Modifiers::SHIFT);
        let b_plain = KeyGesture::plain(Key::Char('b'));
        assert!(a_shift < a_ctrl);
        assert!(a_ctrl < b_plain);
    }

    #[test]
    fn gesture_display() {
        let g = KeyGesture::new(Key::Char('k'), Modifiers::CTRL | Modifiers::SHIFT);
        insta::assert_snapshot!(g.to_string(), @"Ctrl+Shift+K");
        assert_eq!(KeyGesture::plain(Key::F(5)).to_string(), "F5");
    }

    // ── From<crossterm::event::KeyEvent> ─────────────────────────────

    #[test]
    fn from_crossterm_ctrl_char() {
        let ct = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('c'),
            crossterm::event::KeyModifiers::CONTROL,
        );
        assert_eq!(KeyGesture::from(ct), KeyGesture::ctrl(Key::Char('c')));
    }

    #[test]
    fn from_crossterm_uppercase_folds_to_shift() {
        let ct = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('K'),
            crossterm::event::KeyModifiers::NONE,
        );
        let g = KeyGesture::from(ct);
        assert_eq!(g.key, Key::Char('k'));
        assert!(g.modifiers.contains(Modifiers::SHIFT));
    }

    #[test]
    fn from_crossterm_shifted_punctuation_drops_shift() {
        let question = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('?'),
            crossterm::event::KeyModifiers::SHIFT,
        );
        assert_eq!(KeyGesture::from(question), KeyGesture::plain(Key::Char('?')));

        let ctrl_bang = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('!'),
            crossterm::event::KeyModifiers::SHIFT | crossterm::event::KeyModifiers::CONTROL,
        );
        assert_eq!(KeyGesture::from(ctrl_bang), KeyGesture::ctrl(Key::Char('!')));

        // Lowercase letters reported with shift keep it.
        let shift_a = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('a'),
            crossterm::event::KeyModifiers::SHIFT,
        );
        assert_eq!(KeyGesture::from(shift_a), KeyGesture::new(Key::Char('a'), Modifiers::SHIFT));
    }

    #[test]
    fn modifiers_without() {
        let m = Modifiers::CTRL | Modifiers::SHIFT;
        assert_eq!(m.without(Modifiers::SHIFT), Modifiers::CTRL);
        assert_eq!(m.without(Modifiers::ALT), m);
        assert!(Modifiers::SHIFT.without(Modifiers::SHIFT).is_empty());
    }

    #[test]
    fn from_crossterm_bare_modifier() {
        let ct = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Modifier(crossterm::event::ModifierKeyCode::LeftControl),
            crossterm::event::KeyModifiers::CONTROL,
        );
        let g = KeyGesture::from(ct);
        assert_eq!(g.key, Key::Control);
        assert!(g.key.is_modifier());
    }

    #[test]
    fn from_crossterm_navigation() {
        for (ct_code, expected) in [
            (crossterm::event::KeyCode::Home, Key::Home),
            (crossterm::event::KeyCode::End, Key::End),
            (crossterm::event::KeyCode::PageUp, Key::PageUp),
            (crossterm::event::KeyCode::Delete, Key::Delete),
            (crossterm::event::KeyCode::Esc, Key::Escape),
            (crossterm::event::KeyCode::Char(' '), Key::Space),
        ] {
            let ct = crossterm::event::KeyEvent::new(ct_code, crossterm::event::KeyModifiers::NONE);
            assert_eq!(KeyGesture::from(ct).key, expected);
        }
    }
}
