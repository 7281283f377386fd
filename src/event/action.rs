//! Deferred host actions.
//!
//! Commands run while the hotkey manager is iterating its scopes, so they
//! cannot borrow the [`Host`](crate::app::Host) mutably. Instead they capture
//! a clone of the host's [`ActionQueue`] and push [`HostAction`]s onto it; the
//! host drains and applies the queue once key matching has returned.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde_json::Value;

use crate::dom::ElementId;

// ---------------------------------------------------------------------------
// HostAction
// ---------------------------------------------------------------------------

/// A change to the host requested from inside a command.
#[derive(Debug, Clone, PartialEq)]
pub enum HostAction {
    /// Move focus to an element, or clear it.
    Focus(Option<ElementId>),
    /// Remove an element and its subtree.
    Remove(ElementId),
    /// Re-read the hotkey groups along the focus path.
    RefreshHotkeys,
    /// Write a property immediately.
    SetProperty {
        element: ElementId,
        path: String,
        value: Value,
    },
    /// Start an animation from a JSON definition.
    Animate {
        element: ElementId,
        path: String,
        definition: Value,
    },
}

// ---------------------------------------------------------------------------
// ActionQueue
// ---------------------------------------------------------------------------

/// Shared FIFO of [`HostAction`]s.
///
/// Clones share the same queue, so a command closure can hold one while the
/// host holds another.
#[derive(Debug, Clone, Default)]
pub struct ActionQueue {
    queue: Rc<RefCell<VecDeque<HostAction>>>,
}

impl ActionQueue {
    /// Create a new, empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an action for the host to apply later.
    pub fn push(&self, action: HostAction) {
        self.queue.borrow_mut().push_back(action);
    }

    /// Take every pending action in the order it was pushed.
    ///
    /// The queue is empty after this call.
    pub fn drain(&self) -> Vec<HostAction> {
        self.queue.borrow_mut().drain(..).collect()
    }

    /// Number of pending actions.
    pub fn pending_count(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
