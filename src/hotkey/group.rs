//! Gesture trie: [`HotkeyGroup`] and its matcher [`State`].
//!
//! A group maps prefix-free gesture sequences to payloads. Nodes live in a
//! slotmap arena; internal nodes hold an ordered map of children, leaves hold
//! the payload. The root is always internal and is never removed.
//!
//! Matching is driven from outside: the caller keeps a [`State`] and feeds it
//! back through [`HotkeyGroup::update_state`] with every key press.

use std::collections::BTreeMap;

use slotmap::{new_key_type, SlotMap};
use tracing::{debug, warn};

use crate::event::input::KeyGesture;

new_key_type! {
    /// Identifier of a trie node. Generational, so stale handles are detectable.
    pub struct NodeKey;
}

/// A trie node: either a branch on the next gesture or a completed hotkey.
#[derive(Debug, Clone)]
enum Node<T> {
    Internal(BTreeMap<KeyGesture, NodeKey>),
    Leaf(T),
}

impl<T> Node<T> {
    fn empty() -> Self {
        Node::Internal(BTreeMap::new())
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Cursor into a [`HotkeyGroup`] while a gesture sequence is being typed.
///
/// The default state is empty: the cursor sits at the root. A state only
/// makes sense for the group that produced it; it is invalidated by any
/// registration or removal on that group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct State {
    node: Option<NodeKey>,
    trigger: bool,
}

impl State {
    /// The empty state (not in the middle of a sequence).
    pub const fn empty() -> Self {
        Self { node: None, trigger: false }
    }

    /// Whether no gesture has been matched yet.
    pub fn is_empty(&self) -> bool {
        self.node.is_none()
    }

    /// Whether the state sits on a leaf, i.e. a full hotkey has been typed.
    pub fn is_trigger(&self) -> bool {
        self.trigger
    }
}

// ---------------------------------------------------------------------------
// HotkeyGroup
// ---------------------------------------------------------------------------

/// A prefix tree of gesture sequences.
///
/// No registered sequence is ever a prefix of another one: both the extension
/// and the prefix of an existing sequence are rejected on registration.
#[derive(Debug, Clone)]
pub struct HotkeyGroup<T> {
    nodes: SlotMap<NodeKey, Node<T>>,
    root: NodeKey,
    count: usize,
}

impl<T> HotkeyGroup<T> {
    /// Create an empty group.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::empty());
        Self { nodes, root, count: 0 }
    }

    /// Number of registered sequences.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether no sequence is registered.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn children(&self, key: NodeKey) -> Option<&BTreeMap<KeyGesture, NodeKey>> {
        match self.nodes.get(key) {
            Some(Node::Internal(children)) => Some(children),
            _ => None,
        }
    }

    fn children_mut(&mut self, key: NodeKey) -> Option<&mut BTreeMap<KeyGesture, NodeKey>> {
        match self.nodes.get_mut(key) {
            Some(Node::Internal(children)) => Some(children),
            _ => None,
        }
    }

    /// Register `sequence` with the given payload.
    ///
    /// Returns `false` without touching the trie if the sequence is empty,
    /// already registered, a prefix of a registered sequence, or an extension
    /// of one.
    pub fn register_hotkey(&mut self, sequence: &[KeyGesture], payload: T) -> bool {
        if sequence.is_empty() {
            warn!("refusing to register an empty hotkey sequence");
            return false;
        }

        // Walk the existing branch as far as it goes.
        let mut current = self.root;
        let mut matched = 0;
        for gesture in sequence {
            match &self.nodes[current] {
                Node::Leaf(_) => {
                    debug!(matched, "hotkey extends an existing one");
                    return false;
                }
                Node::Internal(children) => match children.get(gesture) {
                    Some(&child) => {
                        current = child;
                        matched += 1;
                    }
                    None => break,
                },
            }
        }
        if matched == sequence.len() {
            debug!("hotkey is a duplicate or a prefix of an existing one");
            return false;
        }

        // Everything from here on is new.
        let (last, middle) = match sequence[matched..].split_last() {
            Some(split) => split,
            None => return false,
        };
        for gesture in middle {
            let child = self.nodes.insert(Node::empty());
            if let Some(children) = self.children_mut(current) {
                children.insert(*gesture, child);
            }
            current = child;
        }
        let leaf = self.nodes.insert(Node::Leaf(payload));
        if let Some(children) = self.children_mut(current) {
            children.insert(*last, leaf);
        }
        self.count += 1;
        true
    }

    /// Remove a registered sequence and prune the branch that only led to it.
    ///
    /// # Panics
    ///
    /// Panics if `sequence` is not registered in this group.
    pub fn unregister_hotkey(&mut self, sequence: &[KeyGesture]) -> T {
        // (parent, gesture leading to child) for every step of the walk.
        let mut path: Vec<(NodeKey, KeyGesture)> = Vec::with_capacity(sequence.len());
        let mut current = self.root;
        for gesture in sequence {
            let child = self
                .children(current)
                .and_then(|children| children.get(gesture).copied())
                .unwrap_or_else(|| panic!("unregistering a hotkey that was never registered"));
            path.push((current, *gesture));
            current = child;
        }
        if !matches!(self.nodes.get(current), Some(Node::Leaf(_))) {
            panic!("unregistering a prefix of a hotkey, not a hotkey");
        }
        let payload = match self.nodes.remove(current) {
            Some(Node::Leaf(payload)) => payload,
            _ => unreachable!(),
        };
        self.count -= 1;

        // Detach from the deepest parent, then walk up dropping every
        // internal node left without children.
        while let Some((parent, gesture)) = path.pop() {
            let remaining = match self.children_mut(parent) {
                Some(children) => {
                    children.remove(&gesture);
                    children.len()
                }
                None => break,
            };
            if remaining > 0 || parent == self.root {
                break;
            }
            self.nodes.remove(parent);
        }
        payload
    }

    /// Look up the payload of an exact registered sequence.
    pub fn find(&self, sequence: &[KeyGesture]) -> Option<&T> {
        let mut current = self.root;
        for gesture in sequence {
            current = *self.children(current)?.get(gesture)?;
        }
        match self.nodes.get(current) {
            Some(Node::Leaf(payload)) => Some(payload),
            _ => None,
        }
    }

    /// Advance `state` by one gesture.
    ///
    /// Bare modifier presses leave the state untouched. A gesture that does
    /// not continue the current branch resets to the empty state. Reaching a
    /// leaf yields a trigger state; it is up to the caller to reset it.
    pub fn update_state(&self, gesture: KeyGesture, state: State) -> State {
        if gesture.key.is_modifier() {
            return state;
        }
        let current = match state.node {
            Some(node) if self.nodes.contains_key(node) => node,
            Some(_) => {
                warn!("hotkey state outlived a change to its group; resetting");
                return State::empty();
            }
            None => self.root,
        };
        let Some(&next) = self.children(current).and_then(|children| children.get(&gesture)) else {
            return State::empty();
        };
        State {
            node: Some(next),
            trigger: matches!(self.nodes.get(next), Some(Node::Leaf(_))),
        }
    }

    /// The payload of a trigger state.
    ///
    /// # Panics
    ///
    /// Panics if `state` is not a trigger state of this group.
    pub fn get_data(&self, state: &State) -> &T {
        match state.node.and_then(|node| self.nodes.get(node)) {
            Some(Node::Leaf(payload)) if state.trigger => payload,
            _ => panic!("hotkey state is not a trigger of this group"),
        }
    }
}

impl<T> Default for HotkeyGroup<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::input::{Key, Modifiers};
    use crate::hotkey::gesture::parse_sequence;

    fn seq(text: &str) -> Vec<KeyGesture> {
        parse_sequence(text).unwrap()
    }

    fn replay<T>(group: &HotkeyGroup<T>, sequence: &[KeyGesture]) -> State {
        sequence
            .iter()
            .fold(State::empty(), |state, g| group.update_state(*g, state))
    }

    // ── Registration ─────────────────────────────────────────────────

    #[test]
    fn new_group_is_empty() {
        let group: HotkeyGroup<&str> = HotkeyGroup::new();
        assert!(group.is_empty());
        assert_eq!(group.nodes.len(), 1);
    }

    #[test]
    fn register_and_round_trip() {
        let mut group = HotkeyGroup::new();
        let s = seq("ctrl+k, ctrl+c");
        assert!(group.register_hotkey(&s, "comment"));
        assert_eq!(group.len(), 1);

        let state = replay(&group, &s);
        assert!(state.is_trigger());
        assert_eq!(*group.get_data(&state), "comment");
    }

    #[test]
    fn reject_empty_sequence() {
        let mut group = HotkeyGroup::new();
        assert!(!group.register_hotkey(&[], 1));
        assert!(group.is_empty());
    }

    #[test]
    fn reject_duplicate() {
        let mut group = HotkeyGroup::new();
        assert!(group.register_hotkey(&seq("ctrl+s"), 1));
        assert!(!group.register_hotkey(&seq("ctrl+s"), 2));
        assert_eq!(group.find(&seq("ctrl+s")), Some(&1));
    }

    #[test]
    fn reject_extension_of_existing() {
        let mut group = HotkeyGroup::new();
        assert!(group.register_hotkey(&seq("ctrl+k"), 1));
        let before = group.nodes.len();
        assert!(!group.register_hotkey(&seq("ctrl+k, ctrl+c"), 2));
        assert_eq!(group.nodes.len(), before);
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn reject_prefix_of_existing() {
        let mut group = HotkeyGroup::new();
        assert!(group.register_hotkey(&seq("ctrl+k, ctrl+c, x"), 1));
        let before = group.nodes.len();
        assert!(!group.register_hotkey(&seq("ctrl+k, ctrl+c"), 2));
        assert!(!group.register_hotkey(&seq("ctrl+k"), 3));
        assert_eq!(group.nodes.len(), before);
    }

    #[test]
    fn siblings_share_prefix() {
        let mut group = HotkeyGroup::new();
        assert!(group.register_hotkey(&seq("ctrl+k, ctrl+c"), "comment"));
        assert!(group.register_hotkey(&seq("ctrl+k, ctrl+u"), "uncomment"));
        // root + ctrl+k + two leaves
        assert_eq!(group.nodes.len(), 4);
        assert_eq!(group.find(&seq("ctrl+k, ctrl+u")), Some(&"uncomment"));
    }

    // ── Removal ──────────────────────────────────────────────────────

    #[test]
    fn unregister_prunes_to_branching_ancestor() {
        let mut group = HotkeyGroup::new();
        group.register_hotkey(&seq("ctrl+k, ctrl+c"), "comment");
        group.register_hotkey(&seq("ctrl+k, ctrl+x, y"), "other");
        assert_eq!(group.nodes.len(), 5);

        assert_eq!(group.unregister_hotkey(&seq("ctrl+k, ctrl+x, y")), "other");
        // ctrl+x branch is gone, ctrl+k stays because it still has a child.
        assert_eq!(group.nodes.len(), 3);
        assert!(!replay(&group, &seq("ctrl+k, ctrl+x, y")).is_trigger());
        assert!(replay(&group, &seq("ctrl+k, ctrl+c")).is_trigger());
    }

    #[test]
    fn unregister_last_hotkey_leaves_bare_root() {
        let mut group = HotkeyGroup::new();
        group.register_hotkey(&seq("a, b, c"), 1);
        group.unregister_hotkey(&seq("a, b, c"));
        assert!(group.is_empty());
        assert_eq!(group.nodes.len(), 1);
        assert!(group.children(group.root).unwrap().is_empty());
    }

    #[test]
    fn removal_restores_freedom() {
        let mut group = HotkeyGroup::new();
        group.register_hotkey(&seq("ctrl+k"), 1);
        assert!(!group.register_hotkey(&seq("ctrl+k, ctrl+c"), 2));

        group.unregister_hotkey(&seq("ctrl+k"));
        assert!(!replay(&group, &seq("ctrl+k")).is_trigger());
        assert!(group.register_hotkey(&seq("ctrl+k, ctrl+c"), 2));
    }

    #[test]
    #[should_panic(expected = "never registered")]
    fn unregister_unknown_panics() {
        let mut group: HotkeyGroup<i32> = HotkeyGroup::new();
        group.unregister_hotkey(&seq("ctrl+q"));
    }

    #[test]
    #[should_panic(expected = "not a hotkey")]
    fn unregister_prefix_panics() {
        let mut group = HotkeyGroup::new();
        group.register_hotkey(&seq("a, b"), 1);
        group.unregister_hotkey(&seq("a"));
    }

    // ── Matching ─────────────────────────────────────────────────────

    #[test]
    fn modifier_only_presses_are_ignored() {
        let mut group = HotkeyGroup::new();
        group.register_hotkey(&seq("ctrl+k, ctrl+c"), 1);
        let mid = group.update_state(KeyGesture::ctrl(Key::Char('k')), State::empty());
        assert!(!mid.is_empty());

        for key in [Key::Control, Key::Shift, Key::Alt] {
            let g = KeyGesture::new(key, Modifiers::CTRL);
            assert_eq!(group.update_state(g, mid), mid);
            assert_eq!(group.update_state(g, State::empty()), State::empty());
        }
    }

    #[test]
    fn mismatch_resets_to_empty() {
        let mut group = HotkeyGroup::new();
        group.register_hotkey(&seq("ctrl+k, ctrl+c"), 1);
        let mid = group.update_state(KeyGesture::ctrl(Key::Char('k')), State::empty());
        let reset = group.update_state(KeyGesture::plain(Key::Char('a')), mid);
        assert!(reset.is_empty());
        assert!(group
            .update_state(KeyGesture::plain(Key::Char('z')), State::empty())
            .is_empty());
    }

    #[test]
    fn trigger_state_is_not_auto_reset() {
        let mut group = HotkeyGroup::new();
        group.register_hotkey(&seq("a"), 1);
        let trig = group.update_state(KeyGesture::plain(Key::Char('a')), State::empty());
        assert!(trig.is_trigger());
        // A leaf has no children, so the next key resets.
        let next = group.update_state(KeyGesture::plain(Key::Char('a')), trig);
        assert!(next.is_empty());
    }

    #[test]
    fn state_equality_is_node_identity() {
        let mut group = HotkeyGroup::new();
        group.register_hotkey(&seq("a, b"), 1);
        let s1 = group.update_state(KeyGesture::plain(Key::Char('a')), State::empty());
        let s2 = group.update_state(KeyGesture::plain(Key::Char('a')), State::empty());
        assert_eq!(s1, s2);
        assert_ne!(s1, State::empty());
    }

    #[test]
    fn stale_state_resets_after_mutation() {
        let mut group = HotkeyGroup::new();
        group.register_hotkey(&seq("a, b"), 1);
        let mid = group.update_state(KeyGesture::plain(Key::Char('a')), State::empty());
        group.unregister_hotkey(&seq("a, b"));
        group.register_hotkey(&seq("a, b"), 2);
        // The old node key is gone even though an equivalent branch exists again.
        assert!(group
            .update_state(KeyGesture::plain(Key::Char('b')), mid)
            .is_empty());
    }

    #[test]
    #[should_panic(expected = "not a trigger")]
    fn get_data_on_non_trigger_panics() {
        let mut group = HotkeyGroup::new();
        group.register_hotkey(&seq("a, b"), 1);
        let mid = group.update_state(KeyGesture::plain(Key::Char('a')), State::empty());
        group.get_data(&mid);
    }
}
