//! Type-erased animation subjects.
//!
//! Path resolution ends on an [`Accessor<R, L>`] whose leaf type `L` is only
//! known inside the resolver. [`AnimationSubject`] erases `L`: it decodes
//! JSON through `L`'s codec and binds definitions to the accessor, so the
//! caller only ever deals with the root type `R`.

use std::rc::Rc;
use std::time::Instant;

use serde_json::Value;

use super::accessor::{describe_steps, Accessor, ProjectionStep};
use super::keyframe::{AnimationDefinition, AnimationError, Playing, PlayingAnimation};
use super::value::Animatable;

/// A resolved property of `R` with its leaf type erased.
pub trait AnimationSubject<R> {
    /// Type name of the leaf value.
    fn leaf_type(&self) -> &'static str;

    /// The projection from the root to the leaf.
    fn steps(&self) -> &[ProjectionStep];

    /// Decode an animation definition for this property and bind it.
    fn bind(&self, definition: &Value) -> Result<Rc<dyn AnimationClip<R>>, AnimationError>;

    /// Decode `value` and write it into `root` right away.
    fn apply(&self, root: &mut R, value: &Value) -> Result<(), AnimationError>;
}

/// What the resolver hands out.
pub type SubjectCreator<R> = Box<dyn AnimationSubject<R>>;

impl<R: 'static, L: Animatable> AnimationSubject<R> for Accessor<R, L> {
    fn leaf_type(&self) -> &'static str {
        L::TYPE_NAME
    }

    fn steps(&self) -> &[ProjectionStep] {
        Accessor::steps(self)
    }

    fn bind(&self, definition: &Value) -> Result<Rc<dyn AnimationClip<R>>, AnimationError> {
        let definition = AnimationDefinition::<L>::from_json(definition)?;
        Ok(Rc::new(BoundAnimation::new(Rc::new(definition), self.clone())))
    }

    fn apply(&self, root: &mut R, value: &Value) -> Result<(), AnimationError> {
        let value = L::from_json(value)?;
        if self.set(root, value) {
            Ok(())
        } else {
            Err(AnimationError::Unreachable(describe_steps(Accessor::steps(self))))
        }
    }
}

/// A definition bound to a property, ready to be played any number of times.
pub trait AnimationClip<R> {
    fn steps(&self) -> &[ProjectionStep];

    /// Start a fresh playback against `root` at `now`.
    fn play(&self, root: &mut R, now: Instant) -> Result<Box<dyn Playing<R>>, AnimationError>;

    /// Write the final keyframe's value without playing.
    fn jump_to_end(&self, root: &mut R) -> Result<(), AnimationError>;
}

/// The typed [`AnimationClip`].
pub struct BoundAnimation<R, L> {
    definition: Rc<AnimationDefinition<L>>,
    subject: Accessor<R, L>,
}

impl<R, L> BoundAnimation<R, L> {
    pub fn new(definition: Rc<AnimationDefinition<L>>, subject: Accessor<R, L>) -> Self {
        Self { definition, subject }
    }

    pub fn definition(&self) -> &AnimationDefinition<L> {
        &self.definition
    }
}

impl<R: 'static, L: Animatable> AnimationClip<R> for BoundAnimation<R, L> {
    fn steps(&self) -> &[ProjectionStep] {
        self.subject.steps()
    }

    fn play(&self, root: &mut R, now: Instant) -> Result<Box<dyn Playing<R>>, AnimationError> {
        let playing = PlayingAnimation::start(Rc::clone(&self.definition), self.subject.clone(), root, now)?;
        Ok(Box::new(playing))
    }

    fn jump_to_end(&self, root: &mut R) -> Result<(), AnimationError> {
        let last = self.definition.keyframes.last().ok_or(AnimationError::NoKeyframes)?;
        if self.subject.set(root, last.target.clone()) {
            Ok(())
        } else {
            Err(AnimationError::Unreachable(describe_steps(self.subject.steps())))
        }
    }
}
