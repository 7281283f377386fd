//! Host: owns the element tree and routes keys and animations through it.
//!
//! [`Host`] ties together the [`Dom`], the [`CommandRegistry`], the
//! [`WindowHotkeyManager`] and the [`AnimationScheduler`]. It needs no
//! terminal: crossterm events are converted and fed in by whoever owns the
//! event loop, and animations are driven either by explicit [`Host::tick`]
//! calls or by the async [`Host::run_animations`] loop.
//!
//! Commands change the host through its [`ActionQueue`]: the queue is
//! drained after every key press, once hotkey matching has returned.

use std::rc::Rc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, warn};

use crate::animation::{resolve_path, AnimationError, AnimationId, AnimationScheduler};
use crate::dom::{Dom, ElementId};
use crate::event::action::{ActionQueue, HostAction};
use crate::event::input::KeyGesture;
use crate::hotkey::{CommandRegistry, HotkeyGroup, WindowHotkeyManager};
use crate::visual::Element;

// ---------------------------------------------------------------------------
// HostConfig
// ---------------------------------------------------------------------------

/// Configuration for the host.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Target frames per second for animation updates.
    pub fps: u32,
    /// When `false`, animations jump straight to their final keyframe.
    pub animations_enabled: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            animations_enabled: true,
        }
    }
}

impl HostConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target FPS (builder).
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Enable or disable animations (builder).
    pub fn with_animations(mut self, enabled: bool) -> Self {
        self.animations_enabled = enabled;
        self
    }

    /// Shortest pause between two animation updates. A zero FPS is treated
    /// as one frame per second.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

/// The root object of an application.
pub struct Host {
    /// The element tree.
    pub dom: Dom,
    /// Commands that hotkeys invoke by name.
    pub commands: CommandRegistry,
    /// Hotkey matching against the focused element's scopes.
    pub hotkeys: WindowHotkeyManager,
    /// Running animations.
    pub animations: AnimationScheduler,
    /// Host configuration.
    pub config: HostConfig,
    /// Actions queued by commands, applied after each key press.
    pub actions: ActionQueue,
    focused: Option<ElementId>,
}

impl Host {
    /// Create a host with an empty tree.
    pub fn new(config: HostConfig) -> Self {
        Self {
            dom: Dom::new(),
            commands: CommandRegistry::new(),
            hotkeys: WindowHotkeyManager::new(),
            animations: AnimationScheduler::new(),
            config,
            actions: ActionQueue::new(),
            focused: None,
        }
    }

    /// The focused element, if any.
    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    /// Move focus to `id`, or clear it with `None`.
    ///
    /// The active hotkey groups become those along the focus path, innermost
    /// first. Returns `false` and leaves focus untouched if `id` is not in
    /// the tree.
    pub fn set_focus(&mut self, id: Option<ElementId>) -> bool {
        if let Some(id) = id {
            if !self.dom.contains(id) {
                warn!(?id, "cannot focus an element that is not in the tree");
                return false;
            }
        }
        self.focused = id;
        self.refresh_hotkeys();
        true
    }

    /// Re-read the hotkey groups along the focus path. Call after changing
    /// the hotkeys of a focused element or one of its ancestors.
    pub fn refresh_hotkeys(&mut self) {
        let groups: Vec<(Option<Rc<HotkeyGroup<String>>>, ElementId)> = match self.focused {
            Some(focused) => self
                .dom
                .focus_path(focused)
                .into_iter()
                .map(|id| (self.dom.get(id).and_then(|node| node.hotkeys.clone()), id))
                .collect(),
            None => Vec::new(),
        };
        debug!(focused = ?self.focused, "refreshing hotkey scopes");
        self.hotkeys.reset_groups(groups);
    }

    /// Remove `id` and its subtree, stopping their animations. Focus inside
    /// the removed subtree moves to the parent of `id`, or is cleared when
    /// `id` was a root.
    pub fn remove_element(&mut self, id: ElementId) -> bool {
        let subtree = if self.dom.contains(id) {
            self.dom.walk_depth_first(id)
        } else {
            return false;
        };
        let parent = self.dom.parent(id);
        for element in &subtree {
            self.animations.cancel_element(*element);
        }
        self.dom.remove(id);
        if self.focused.is_some_and(|focused| subtree.contains(&focused)) {
            self.set_focus(parent);
        }
        true
    }

    /// Feed a key press to the hotkey manager, then apply whatever actions
    /// the invoked command queued. Returns `true` if the key was consumed by
    /// hotkey matching.
    pub fn handle_key(&mut self, gesture: KeyGesture) -> bool {
        let consumed = self.hotkeys.on_key_down(gesture, &self.commands);
        self.process_actions(Instant::now());
        consumed
    }

    /// Apply every queued [`HostAction`] in order. Actions that fail are
    /// logged and skipped. Returns how many were taken from the queue.
    pub fn process_actions(&mut self, now: Instant) -> usize {
        let actions = self.actions.drain();
        let count = actions.len();
        for action in actions {
            self.apply_action(action, now);
        }
        count
    }

    fn apply_action(&mut self, action: HostAction, now: Instant) {
        debug!(?action, "applying host action");
        match action {
            HostAction::Focus(id) => {
                self.set_focus(id);
            }
            HostAction::Remove(id) => {
                if !self.remove_element(id) {
                    warn!(?id, "cannot remove an element that is not in the tree");
                }
            }
            HostAction::RefreshHotkeys => self.refresh_hotkeys(),
            HostAction::SetProperty { element, path, value } => {
                if let Err(error) = self.set_property(element, &path, &value) {
                    warn!(?element, %path, %error, "queued property write failed");
                }
            }
            HostAction::Animate { element, path, definition } => {
                if let Err(error) = self.animate(element, &path, &definition, now) {
                    warn!(?element, %path, %error, "queued animation failed to start");
                }
            }
        }
    }

    /// Feed a raw terminal event. Only key presses and repeats reach the
    /// hotkey manager; everything else is reported as not consumed.
    pub fn handle_event(&mut self, event: &crossterm::event::Event) -> bool {
        use crossterm::event::{Event, KeyEventKind};
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(KeyGesture::from(*key)),
            _ => false,
        }
    }

    /// Write `value` into the property at `path` of `element` immediately.
    pub fn set_property(&mut self, element: ElementId, path: &str, value: &Value) -> Result<(), AnimationError> {
        let subject = resolve_path::<Element>(path)?;
        let properties = self
            .dom
            .properties_mut(element)
            .ok_or_else(|| AnimationError::Unreachable("<removed element>".to_owned()))?;
        subject.apply(properties, value)
    }

    /// Animate the property at `path` of `element` with a JSON definition.
    ///
    /// Returns the running animation's handle, or `None` when nothing was
    /// left to schedule: animations are disabled and the final keyframe was
    /// applied right away, or the animation finished on its first frame.
    pub fn animate(
        &mut self,
        element: ElementId,
        path: &str,
        definition: &Value,
        now: Instant,
    ) -> Result<Option<AnimationId>, AnimationError> {
        let clip = resolve_path::<Element>(path)?.bind(definition)?;
        if !self.config.animations_enabled {
            let properties = self
                .dom
                .properties_mut(element)
                .ok_or_else(|| AnimationError::Unreachable("<removed element>".to_owned()))?;
            clip.jump_to_end(properties)?;
            return Ok(None);
        }
        self.animations.start(&mut self.dom, element, clip.as_ref(), now)
    }

    /// Advance every animation to `now`. Returns the time until the next
    /// one is due, or `None` once all have finished.
    pub fn tick(&mut self, now: Instant) -> Option<Duration> {
        self.animations.tick(&mut self.dom, now)
    }

    /// Drive animations in real time until none are left, never updating
    /// faster than the configured FPS.
    pub async fn run_animations(&mut self) {
        let frame = self.config.frame_interval();
        while let Some(delay) = self.tick(Instant::now()) {
            tokio::time::sleep(delay.max(frame)).await;
        }
        debug!("all animations finished");
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new(HostConfig::default())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
