//! Drives every playing animation of a [`Dom`].

use std::time::{Duration, Instant};

use slotmap::{new_key_type, SlotMap};
use tracing::debug;

use super::keyframe::{AnimationError, Playing};
use super::subject::AnimationClip;
use crate::dom::{Dom, ElementId};
use crate::visual::Element;

new_key_type! {
    /// Handle to an animation started on a [`AnimationScheduler`].
    pub struct AnimationId;
}

struct Entry {
    element: ElementId,
    animation: Box<dyn Playing<Element>>,
    wake_at: Instant,
}

/// The set of running animations, keyed by [`AnimationId`].
///
/// Each animation is bound to one element. Animations whose element has
/// been removed from the tree are dropped on the next tick; starting an
/// animation on a property that is already animated replaces the old one.
#[derive(Default)]
pub struct AnimationScheduler {
    entries: SlotMap<AnimationId, Entry>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `clip` on `element` at `now`, and apply its first frame.
    ///
    /// Returns `None` when that first update already finished the animation;
    /// nothing is scheduled then.
    pub fn start(
        &mut self,
        dom: &mut Dom,
        element: ElementId,
        clip: &dyn AnimationClip<Element>,
        now: Instant,
    ) -> Result<Option<AnimationId>, AnimationError> {
        let properties = dom
            .properties_mut(element)
            .ok_or_else(|| AnimationError::Unreachable("<removed element>".to_owned()))?;
        let mut animation = clip.play(properties, now)?;

        self.entries
            .retain(|_, entry| entry.element != element || entry.animation.steps() != clip.steps());

        let Some(delay) = animation.update(properties, now) else {
            debug!(?element, "animation finished on its first frame");
            return Ok(None);
        };
        let wake_at = now + delay;
        debug!(?element, running = self.entries.len() + 1, "animation scheduled");
        Ok(Some(self.entries.insert(Entry { element, animation, wake_at })))
    }

    /// Stop one animation, leaving its property as it is. Returns whether it
    /// was running.
    pub fn cancel(&mut self, id: AnimationId) -> bool {
        self.entries.remove(id).is_some()
    }

    /// Stop every animation of `element`. Returns how many were stopped.
    pub fn cancel_element(&mut self, element: ElementId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.element != element);
        before - self.entries.len()
    }

    pub fn is_running(&self, id: AnimationId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Update every animation that is due at `now`, dropping the finished
    /// ones. Returns the time until the next animation is due, or `None`
    /// once nothing is left to play.
    pub fn tick(&mut self, dom: &mut Dom, now: Instant) -> Option<Duration> {
        self.entries.retain(|id, entry| {
            let Some(properties) = dom.properties_mut(entry.element) else {
                debug!(?id, "element removed; dropping its animation");
                return false;
            };
            if entry.wake_at > now {
                return true;
            }
            match entry.animation.update(properties, now) {
                Some(delay) => {
                    entry.wake_at = now + delay;
                    true
                }
                None => {
                    debug!(?id, "animation finished");
                    false
                }
            }
        });
        self.entries
            .values()
            .map(|entry| entry.wake_at.saturating_duration_since(now))
            .min()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
