//! Matching key presses against every active hotkey scope at once.
//!
//! [`WindowHotkeyManager`] keeps one matcher [`State`] per active group. The
//! active groups are normally the hotkey scopes of the focused element and
//! its ancestors, innermost first. Gestures typed as part of an unfinished
//! chain are kept as the pending chain.

use std::rc::Rc;

use tracing::{debug, warn};

use super::command::CommandRegistry;
use super::gesture::format_sequence;
use super::group::{HotkeyGroup, State};
use crate::dom::ElementId;
use crate::event::input::KeyGesture;

/// Whether a key press counts as handled by one group.
///
/// A group intercepts when its state changes. On a continuation of a chain
/// (`first == false`) a group that was mid-chain also intercepts when its
/// state does not change, so that a modifier press inside a chain is
/// swallowed. A group that was already off-track when the chain started
/// never intercepts.
pub fn intercepts(first: bool, old: State, new: State) -> bool {
    old != new || (!first && !old.is_empty())
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Passed to `triggered` handlers. Cancelling it skips the command.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggeredInfo {
    /// Name of the command bound to the completed sequence.
    pub command: String,
    /// Element owning the group that matched.
    pub element: ElementId,
    /// The full gesture sequence, ending with the triggering gesture.
    pub gestures: Vec<KeyGesture>,
    cancelled: bool,
}

impl TriggeredInfo {
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Passed to `chain_interrupted` handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainInterruptedInfo {
    /// The gestures of the chain that was abandoned.
    pub gestures: Vec<KeyGesture>,
}

/// Handle returned by the `on_*` subscription methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscribers<A> {
    handlers: Vec<(SubscriptionId, Box<dyn FnMut(&mut A)>)>,
}

impl<A> Subscribers<A> {
    fn new() -> Self {
        Self { handlers: Vec::new() }
    }

    fn emit(&mut self, args: &mut A) {
        for (_, handler) in &mut self.handlers {
            handler(args);
        }
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sid, _)| *sid != id);
        self.handlers.len() != before
    }
}

// ---------------------------------------------------------------------------
// WindowHotkeyManager
// ---------------------------------------------------------------------------

struct ActiveGroup {
    group: Rc<HotkeyGroup<String>>,
    element: ElementId,
    state: State,
}

/// Matches gestures against a set of simultaneously active hotkey groups.
pub struct WindowHotkeyManager {
    groups: Vec<ActiveGroup>,
    pending: Vec<KeyGesture>,
    triggered: Subscribers<TriggeredInfo>,
    chain_interrupted: Subscribers<ChainInterruptedInfo>,
    next_subscription: u64,
}

impl WindowHotkeyManager {
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            pending: Vec::new(),
            triggered: Subscribers::new(),
            chain_interrupted: Subscribers::new(),
            next_subscription: 0,
        }
    }

    fn subscription(&mut self) -> SubscriptionId {
        self.next_subscription += 1;
        SubscriptionId(self.next_subscription)
    }

    /// Call `handler` whenever a hotkey completes, before its command runs.
    pub fn on_triggered(&mut self, handler: impl FnMut(&mut TriggeredInfo) + 'static) -> SubscriptionId {
        let id = self.subscription();
        self.triggered.handlers.push((id, Box::new(handler)));
        id
    }

    /// Call `handler` whenever a chain of gestures is abandoned.
    pub fn on_chain_interrupted(
        &mut self,
        handler: impl FnMut(&mut ChainInterruptedInfo) + 'static,
    ) -> SubscriptionId {
        let id = self.subscription();
        self.chain_interrupted.handlers.push((id, Box::new(handler)));
        id
    }

    /// Remove a handler added with `on_triggered` or `on_chain_interrupted`.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.triggered.remove(id) || self.chain_interrupted.remove(id)
    }

    /// Gestures of the chain typed so far.
    pub fn pending_gestures(&self) -> &[KeyGesture] {
        &self.pending
    }

    pub fn active_group_count(&self) -> usize {
        self.groups.len()
    }

    /// Owning element and matcher state of every active group, in order.
    pub fn states(&self) -> impl Iterator<Item = (ElementId, State)> + '_ {
        self.groups.iter().map(|entry| (entry.element, entry.state))
    }

    fn interrupt_chain(&mut self) {
        let mut info = ChainInterruptedInfo { gestures: std::mem::take(&mut self.pending) };
        debug!(chain = %format_sequence(&info.gestures), "hotkey chain interrupted");
        self.chain_interrupted.emit(&mut info);
    }

    /// Replace the active groups. Entries without a group are skipped, and
    /// a chain in progress is abandoned.
    pub fn reset_groups<I>(&mut self, groups: I)
    where
        I: IntoIterator<Item = (Option<Rc<HotkeyGroup<String>>>, ElementId)>,
    {
        self.groups = groups
            .into_iter()
            .filter_map(|(group, element)| {
                group.map(|group| ActiveGroup { group, element, state: State::empty() })
            })
            .collect();
        if !self.pending.is_empty() {
            self.interrupt_chain();
        }
        debug!(groups = self.groups.len(), "active hotkey groups reset");
    }

    /// Feed one key press. Returns `true` if the press was used by hotkey
    /// matching and should not be handled as ordinary input.
    pub fn on_key_down(&mut self, gesture: KeyGesture, commands: &CommandRegistry) -> bool {
        let first = self.pending.is_empty();
        let mut intercepted = false;
        let mut trigger = None;
        for (index, entry) in self.groups.iter_mut().enumerate() {
            let new = entry.group.update_state(gesture, entry.state);
            intercepted |= intercepts(first, entry.state, new);
            entry.state = new;
            if new.is_trigger() && trigger.is_none() {
                trigger = Some(index);
            }
        }

        if let Some(index) = trigger {
            self.fire(index, gesture, commands);
            return true;
        }

        if self.groups.iter().all(|entry| entry.state.is_empty()) {
            if self.pending.len() > 1 {
                self.interrupt_chain();
            }
            self.pending.clear();
        } else {
            self.pending.push(gesture);
        }
        intercepted
    }

    fn fire(&mut self, index: usize, gesture: KeyGesture, commands: &CommandRegistry) {
        let entry = &mut self.groups[index];
        let command = entry.group.get_data(&entry.state).clone();
        let element = entry.element;
        entry.state = State::empty();

        for (other_index, other) in self.groups.iter_mut().enumerate() {
            if other_index != index && !other.state.is_empty() {
                warn!(
                    %command,
                    ?element,
                    other = ?other.element,
                    "hotkey conflict between active groups; clearing the other group"
                );
                other.state = State::empty();
            }
        }

        let mut gestures = std::mem::take(&mut self.pending);
        gestures.push(gesture);
        let mut info = TriggeredInfo { command, element, gestures, cancelled: false };
        debug!(command = %info.command, chain = %format_sequence(&info.gestures), "hotkey triggered");
        self.triggered.emit(&mut info);
        if info.cancelled {
            debug!(command = %info.command, "hotkey command cancelled by handler");
            return;
        }
        match commands.find_command(&info.command) {
            Some(callback) => callback(element),
            None => warn!(command = %info.command, "hotkey bound to an unregistered command"),
        }
    }
}

impl Default for WindowHotkeyManager {
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
    use pretty_assertions::assert_eq;
    use slotmap::SlotMap;
    use std::cell::RefCell;

    use crate::event::input::{Key, Modifiers};
    use crate::hotkey::gesture::{parse_gesture, parse_sequence};

    fn g(text: &str) -> KeyGesture {
        parse_gesture(text).unwrap()
    }

    /// Ctrl pressed on its own.
    fn ctrl_alone() -> KeyGesture {
        KeyGesture::new(Key::Control, Modifiers::CTRL)
    }

    fn group(bindings: &[(&str, &str)]) -> Rc<HotkeyGroup<String>> {
        let mut group = HotkeyGroup::new();
        for (sequence, command) in bindings {
            assert!(group.register_hotkey(&parse_sequence(sequence).unwrap(), command.to_string()));
        }
        Rc::new(group)
    }

    fn elements(n: usize) -> Vec<ElementId> {
        let mut map = SlotMap::<ElementId, ()>::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    /// Registry whose commands log `(name, element)`.
    fn logging_registry(names: &[&str]) -> (CommandRegistry, Rc<RefCell<Vec<(String, ElementId)>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let registry = CommandRegistry::new();
        for name in names {
            let log = Rc::clone(&log);
            let owned = name.to_string();
            registry.register_command(*name, move |element| log.borrow_mut().push((owned.clone(), element)));
        }
        (registry, log)
    }

    fn interruptions(manager: &mut WindowHotkeyManager) -> Rc<RefCell<Vec<Vec<KeyGesture>>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        manager.on_chain_interrupted(move |info| sink.borrow_mut().push(info.gestures.clone()));
        log
    }

    // ── Predicate ────────────────────────────────────────────────────

    #[test]
    fn intercepts_predicate() {
        let mut trie = HotkeyGroup::new();
        trie.register_hotkey(&[g("ctrl+k"), g("ctrl+c")], ());
        let mid = trie.update_state(g("ctrl+k"), State::empty());
        let empty = State::empty();

        assert!(!intercepts(true, empty, empty));
        assert!(intercepts(true, empty, mid));
        assert!(intercepts(false, mid, empty));
        // Mid-chain and unchanged (a modifier press) still counts.
        assert!(intercepts(false, mid, mid));
        // Off-track since the start of the chain.
        assert!(!intercepts(false, empty, empty));
    }

    // ── Triggering ───────────────────────────────────────────────────

    #[test]
    fn single_gesture_triggers_command() {
        let ids = elements(1);
        let (registry, log) = logging_registry(&["save"]);
        let mut manager = WindowHotkeyManager::new();
        manager.reset_groups([(Some(group(&[("ctrl+s", "save")])), ids[0])]);

        assert!(manager.on_key_down(g("ctrl+s"), &registry));
        assert_eq!(*log.borrow(), vec![("save".to_string(), ids[0])]);
        assert!(manager.pending_gestures().is_empty());
        assert!(manager.states().all(|(_, state)| state.is_empty()));
    }

    #[test]
    fn chord_chain_triggers_on_last_gesture() {
        let ids = elements(1);
        let (registry, log) = logging_registry(&["comment"]);
        let mut manager = WindowHotkeyManager::new();
        manager.reset_groups([(Some(group(&[("ctrl+k, ctrl+c", "comment")])), ids[0])]);

        assert!(manager.on_key_down(g("ctrl+k"), &registry));
        assert_eq!(manager.pending_gestures(), &[g("ctrl+k")]);
        assert!(log.borrow().is_empty());

        assert!(manager.on_key_down(g("ctrl+c"), &registry));
        assert_eq!(log.borrow().len(), 1);
        assert!(manager.pending_gestures().is_empty());
    }

    #[test]
    fn unrelated_key_is_not_intercepted() {
        let ids = elements(1);
        let (registry, log) = logging_registry(&["save"]);
        let mut manager = WindowHotkeyManager::new();
        manager.reset_groups([(Some(group(&[("ctrl+s", "save")])), ids[0])]);

        assert!(!manager.on_key_down(g("a"), &registry));
        assert!(!manager.on_key_down(ctrl_alone(), &registry));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn modifier_press_inside_chain_is_swallowed() {
        let ids = elements(1);
        let (registry, log) = logging_registry(&["comment"]);
        let mut manager = WindowHotkeyManager::new();
        manager.reset_groups([(Some(group(&[("ctrl+k, ctrl+c", "comment")])), ids[0])]);

        manager.on_key_down(g("ctrl+k"), &registry);
        assert!(manager.on_key_down(ctrl_alone(), &registry));
        assert_eq!(manager.pending_gestures(), &[g("ctrl+k"), ctrl_alone()]);
        assert!(manager.on_key_down(g("ctrl+c"), &registry));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn triggered_info_carries_chain_and_can_cancel() {
        let ids = elements(1);
        let (registry, log) = logging_registry(&["comment"]);
        let mut manager = WindowHotkeyManager::new();
        manager.reset_groups([(Some(group(&[("ctrl+k, ctrl+c", "comment")])), ids[0])]);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = manager.on_triggered(move |info| {
            sink.borrow_mut().push(info.clone());
            info.cancel();
        });

        manager.on_key_down(g("ctrl+k"), &registry);
        assert!(manager.on_key_down(g("ctrl+c"), &registry));
        assert!(log.borrow().is_empty());
        {
            let seen = seen.borrow();
            assert_eq!(seen.len(), 1);
            assert_eq!(seen[0].command, "comment");
            assert_eq!(seen[0].element, ids[0]);
            assert_eq!(seen[0].gestures, vec![g("ctrl+k"), g("ctrl+c")]);
        }

        assert!(manager.unsubscribe(sub));
        assert!(!manager.unsubscribe(sub));
        manager.on_key_down(g("ctrl+k"), &registry);
        manager.on_key_down(g("ctrl+c"), &registry);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn missing_command_is_consumed() {
        let ids = elements(1);
        let registry = CommandRegistry::new();
        let mut manager = WindowHotkeyManager::new();
        manager.reset_groups([(Some(group(&[("f5", "run")])), ids[0])]);
        assert!(manager.on_key_down(g("f5"), &registry));
        assert!(manager.pending_gestures().is_empty());
    }

    #[test]
    fn command_receives_owning_element() {
        let ids = elements(2);
        let (registry, log) = logging_registry(&["inner", "outer"]);
        let mut manager = WindowHotkeyManager::new();
        manager.reset_groups([
            (Some(group(&[("ctrl+i", "inner")])), ids[0]),
            (None, ids[0]),
            (Some(group(&[("ctrl+o", "outer")])), ids[1]),
        ]);
        assert_eq!(manager.active_group_count(), 2);

        manager.on_key_down(g("ctrl+o"), &registry);
        manager.on_key_down(g("ctrl+i"), &registry);
        assert_eq!(
            *log.borrow(),
            vec![("outer".to_string(), ids[1]), ("inner".to_string(), ids[0])]
        );
    }

    #[test]
    fn first_triggering_group_wins_and_clears_others() {
        let ids = elements(2);
        let (registry, log) = logging_registry(&["inner", "outer"]);
        let mut manager = WindowHotkeyManager::new();
        manager.reset_groups([
            (Some(group(&[("ctrl+k", "inner")])), ids[0]),
            (Some(group(&[("ctrl+k, x", "outer")])), ids[1]),
        ]);

        assert!(manager.on_key_down(g("ctrl+k"), &registry));
        assert_eq!(*log.borrow(), vec![("inner".to_string(), ids[0])]);
        assert!(manager.states().all(|(_, state)| state.is_empty()));

        // The outer chain was cleared, so `x` alone does nothing.
        assert!(!manager.on_key_down(g("x"), &registry));
        assert_eq!(log.borrow().len(), 1);
    }

    // ── Chain interruption ───────────────────────────────────────────

    #[test]
    fn broken_chain_after_one_gesture_is_silent() {
        let ids = elements(1);
        let registry = CommandRegistry::new();
        let mut manager = WindowHotkeyManager::new();
        let interrupted = interruptions(&mut manager);
        manager.reset_groups([(Some(group(&[("ctrl+k, ctrl+c", "comment")])), ids[0])]);

        manager.on_key_down(g("ctrl+k"), &registry);
        // The group was mid-chain and got reset: intercepted.
        assert!(manager.on_key_down(g("z"), &registry));
        assert!(manager.pending_gestures().is_empty());
        assert!(interrupted.borrow().is_empty());
    }

    #[test]
    fn broken_longer_chain_notifies() {
        let ids = elements(1);
        let registry = CommandRegistry::new();
        let mut manager = WindowHotkeyManager::new();
        let interrupted = interruptions(&mut manager);
        manager.reset_groups([(Some(group(&[("a, b, c", "abc")])), ids[0])]);

        manager.on_key_down(g("a"), &registry);
        manager.on_key_down(g("b"), &registry);
        assert!(manager.on_key_down(g("z"), &registry));
        assert_eq!(*interrupted.borrow(), vec![vec![g("a"), g("b")]]);
        assert!(manager.pending_gestures().is_empty());
    }

    #[test]
    fn off_track_group_does_not_intercept() {
        let ids = elements(2);
        let registry = CommandRegistry::new();
        let mut manager = WindowHotkeyManager::new();
        manager.reset_groups([
            (Some(group(&[("ctrl+k, ctrl+c", "comment")])), ids[0]),
            (Some(group(&[("ctrl+x, y", "cut")])), ids[1]),
        ]);

        assert!(manager.on_key_down(g("ctrl+k"), &registry));
        let states: Vec<_> = manager.states().map(|(_, s)| s.is_empty()).collect();
        assert_eq!(states, vec![false, true]);

        // Only the first group was tracking; it breaks, the second stays idle.
        assert!(manager.on_key_down(g("q"), &registry));
        // With no chain in progress, `q` again is not intercepted.
        assert!(!manager.on_key_down(g("q"), &registry));
    }

    #[test]
    fn reset_groups_interrupts_pending_chain() {
        let ids = elements(2);
        let registry = CommandRegistry::new();
        let mut manager = WindowHotkeyManager::new();
        let interrupted = interruptions(&mut manager);
        manager.reset_groups([(Some(group(&[("ctrl+k, ctrl+c", "comment")])), ids[0])]);
        manager.on_key_down(g("ctrl+k"), &registry);

        manager.reset_groups([(Some(group(&[("ctrl+c", "copy")])), ids[1])]);
        assert_eq!(*interrupted.borrow(), vec![vec![g("ctrl+k")]]);
        assert!(manager.pending_gestures().is_empty());

        // A reset without a chain in progress is silent.
        manager.reset_groups(Vec::new());
        assert_eq!(interrupted.borrow().len(), 1);
        assert_eq!(manager.active_group_count(), 0);
    }

    #[test]
    fn command_may_change_registry() {
        let ids = elements(1);
        let registry = Rc::new(CommandRegistry::new());
        let inner = Rc::clone(&registry);
        registry.register_command("once", move |_| {
            inner.unregister_command("once");
        });
        let mut manager = WindowHotkeyManager::new();
        manager.reset_groups([(Some(group(&[("f1", "once")])), ids[0])]);
        manager.on_key_down(g("f1"), &registry);
        assert!(registry.find_command("once").is_none());
    }
}
