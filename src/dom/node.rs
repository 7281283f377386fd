//! Element nodes: ElementId, ElementNode.

use std::rc::Rc;

use slotmap::new_key_type;

use crate::hotkey::HotkeyGroup;
use crate::visual::Element;

new_key_type! {
    /// Handle to an element in the [`Dom`](super::Dom). Copy, generational.
    pub struct ElementId;
}

/// An element of the host tree.
///
/// Holds the element's animatable properties and, optionally, the hotkey
/// scope that becomes active while the element (or a descendant) has focus.
#[derive(Debug, Clone, Default)]
pub struct ElementNode {
    /// Debug name, also used by [`Dom::find_by_name`](super::Dom::find_by_name).
    pub name: String,
    /// Whether this element can take keyboard focus.
    pub focusable: bool,
    /// Hotkeys mapped to command names, shared with the hotkey manager.
    pub hotkeys: Option<Rc<HotkeyGroup<String>>>,
    /// The animatable properties.
    pub properties: Element,
}

impl ElementNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set whether this element can take focus (builder).
    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    /// Attach a hotkey scope (builder).
    pub fn with_hotkeys(mut self, group: Rc<HotkeyGroup<String>>) -> Self {
        self.hotkeys = Some(group);
        self
    }

    /// Replace the initial properties (builder).
    pub fn with_properties(mut self, properties: Element) -> Self {
        self.properties = properties;
        self
    }
}
