//! Named commands invoked by hotkeys.
//!
//! [`CommandRegistry`] maps command names to callbacks that receive the element
//! owning the hotkey group that fired. The registry is an ordinary value owned
//! by the application root and handed to whoever dispatches hotkeys; there is
//! no process-wide instance.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::dom::node::ElementId;

/// A command callback.
pub type Command = Rc<dyn Fn(ElementId)>;

/// Registry of named commands.
///
/// Uses interior mutability so that a command may register or unregister
/// commands while it is running.
#[derive(Default)]
pub struct CommandRegistry {
    commands: RefCell<HashMap<String, Command>>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Returns `false` if the name is already taken.
    pub fn register_command(&self, name: impl Into<String>, callback: impl Fn(ElementId) + 'static) -> bool {
        let name = name.into();
        let mut commands = self.commands.borrow_mut();
        if commands.contains_key(&name) {
            debug!(%name, "command already registered");
            return false;
        }
        commands.insert(name, Rc::new(callback));
        true
    }

    /// Remove a command. Returns `false` if no command has that name.
    pub fn unregister_command(&self, name: &str) -> bool {
        self.commands.borrow_mut().remove(name).is_some()
    }

    /// Look up a command by name.
    ///
    /// The returned handle is detached from the registry, so invoking it does
    /// not hold any borrow on the registry.
    pub fn find_command(&self, name: &str) -> Option<Command> {
        self.commands.borrow().get(name).cloned()
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.borrow().len()
    }

    /// Whether no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.commands.borrow().is_empty()
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let commands = self.commands.borrow();
        let mut names: Vec<&String> = commands.keys().collect();
        names.sort();
        f.debug_struct("CommandRegistry").field("commands", &names).finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
