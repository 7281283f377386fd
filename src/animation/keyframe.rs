//! Keyframe animations: definitions and the per-instance state machine.
//!
//! An [`AnimationDefinition`] is a list of [`Keyframe`]s plus a repeat count
//! (`0` repeats forever). A [`PlayingAnimation`] drives one definition
//! through an [`Accessor`]: each [`update`](PlayingAnimation::update) call
//! writes the value for `now` into the root object and says when it wants
//! to be called again.

use std::rc::Rc;
use std::time::{Duration, Instant};

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::accessor::{describe_steps, Accessor, ProjectionStep};
use super::path::PathParseError;
use super::transition::{self, TransitionFn};
use super::value::{Animatable, ValueError};

/// Upper bound on state transitions within one `update` call.
///
/// Keyframes with zero duration would otherwise let a repeating animation
/// cycle forever without time advancing.
pub const MAX_ITERATIONS_PER_UPDATE: usize = 1000;

/// Errors from building or starting an animation.
#[derive(Debug, thiserror::Error)]
pub enum AnimationError {
    #[error("malformed animation definition: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("animation has no keyframes")]
    NoKeyframes,
    #[error("keyframe {index}: {source}")]
    Value {
        index: usize,
        #[source]
        source: ValueError,
    },
    #[error("keyframe {index}: invalid duration {seconds}")]
    Duration { index: usize, seconds: f64 },
    #[error("keyframe {index}: unknown transition `{name}`")]
    UnknownTransition { index: usize, name: String },
    #[error("invalid value: {0}")]
    Decode(#[from] ValueError),
    #[error(transparent)]
    Path(#[from] PathParseError),
    #[error("property path `{0}` does not resolve to an animatable value")]
    Unresolved(String),
    #[error("animated property `{0}` is not reachable")]
    Unreachable(String),
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// One step of an animation.
#[derive(Debug, Clone)]
pub struct Keyframe<L> {
    /// Value reached at the end of the keyframe.
    pub target: L,
    pub duration: Duration,
    /// Easing for the blend towards `target`. Without one the value jumps
    /// to `target` as soon as the keyframe begins.
    pub transition: Option<TransitionFn>,
}

impl<L> Keyframe<L> {
    /// A keyframe that jumps to `target` and holds it for `duration`.
    pub fn hold(target: L, duration: Duration) -> Self {
        Self { target, duration, transition: None }
    }

    /// A keyframe that blends to `target` over `duration`.
    pub fn blend(target: L, duration: Duration, transition: TransitionFn) -> Self {
        Self { target, duration, transition: Some(transition) }
    }
}

/// Keyframes played in order, `repeat_times` times (`0` = forever).
#[derive(Debug, Clone)]
pub struct AnimationDefinition<L> {
    pub keyframes: Vec<Keyframe<L>>,
    pub repeat_times: usize,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawKeyframe {
    to: Value,
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    transition: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDefinition {
    keyframes: Vec<RawKeyframe>,
    #[serde(default = "play_once")]
    repeat: usize,
}

fn play_once() -> usize {
    1
}

impl<L: Animatable> AnimationDefinition<L> {
    pub fn new(keyframes: Vec<Keyframe<L>>, repeat_times: usize) -> Self {
        Self { keyframes, repeat_times }
    }

    /// Decode a definition of the form
    /// `{"keyframes": [{"to": v, "duration": secs, "transition": name}], "repeat": n}`.
    ///
    /// `repeat` defaults to 1, `duration` to 0, and a missing `transition`
    /// makes the keyframe a hold. Target values are decoded by `L`'s codec.
    pub fn from_json(value: &Value) -> Result<Self, AnimationError> {
        let raw = RawDefinition::deserialize(value)?;
        if raw.keyframes.is_empty() {
            return Err(AnimationError::NoKeyframes);
        }
        let keyframes = raw
            .keyframes
            .into_iter()
            .enumerate()
            .map(|(index, frame)| -> Result<Keyframe<L>, AnimationError> {
                let target =
                    L::from_json(&frame.to).map_err(|source| AnimationError::Value { index, source })?;
                let duration = Duration::try_from_secs_f64(frame.duration)
                    .map_err(|_| AnimationError::Duration { index, seconds: frame.duration })?;
                let transition = frame
                    .transition
                    .map(|name| {
                        transition::by_name(&name)
                            .ok_or(AnimationError::UnknownTransition { index, name })
                    })
                    .transpose()?;
                Ok(Keyframe { target, duration, transition })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(keyframes, raw.repeat))
    }

    /// Length of one pass over all keyframes.
    pub fn pass_duration(&self) -> Duration {
        self.keyframes.iter().map(|frame| frame.duration).sum()
    }
}

// ---------------------------------------------------------------------------
// Playback
// ---------------------------------------------------------------------------

/// A running animation with its leaf type erased.
pub trait Playing<R> {
    /// Advance to `now`. `Some(delay)` asks to be updated again after
    /// `delay`; `None` means the animation is over and can be dropped.
    fn update(&mut self, root: &mut R, now: Instant) -> Option<Duration>;

    /// The projection the animation writes through.
    fn steps(&self) -> &[ProjectionStep];
}

/// One playback of a definition against one subject.
pub struct PlayingAnimation<R, L> {
    definition: Rc<AnimationDefinition<L>>,
    subject: Accessor<R, L>,
    from: L,
    pass_start: Instant,
    keyframe_start: Instant,
    current_frame: usize,
    repeated: usize,
}

impl<R: 'static, L: Animatable> PlayingAnimation<R, L> {
    /// Begin playback at `now`, blending from the subject's current value.
    pub fn start(
        definition: Rc<AnimationDefinition<L>>,
        subject: Accessor<R, L>,
        root: &mut R,
        now: Instant,
    ) -> Result<Self, AnimationError> {
        if definition.keyframes.is_empty() {
            return Err(AnimationError::NoKeyframes);
        }
        let from = subject
            .get(root)
            .ok_or_else(|| AnimationError::Unreachable(describe_steps(subject.steps())))?;
        debug!(subject = %describe_steps(subject.steps()), leaf = L::TYPE_NAME, "animation started");
        Ok(Self {
            definition,
            subject,
            from,
            pass_start: now,
            keyframe_start: now,
            current_frame: 0,
            repeated: 0,
        })
    }

    /// Index of the keyframe currently playing.
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Number of completed passes.
    pub fn repeated(&self) -> usize {
        self.repeated
    }

    fn write(&self, root: &mut R, value: L) -> bool {
        let written = self.subject.set(root, value);
        if !written {
            warn!(
                subject = %describe_steps(self.subject.steps()),
                "animated property is no longer reachable; stopping animation"
            );
        }
        written
    }

    /// Write the last target and park past the final keyframe, so later
    /// updates keep returning `None`.
    fn finish(&mut self, root: &mut R) {
        self.current_frame = self.definition.keyframes.len();
        if let Some(last) = self.definition.keyframes.last() {
            self.write(root, last.target.clone());
        }
    }

    /// Jump over every pass that ended before `now` without stepping through
    /// its keyframes. Returns `false` if that used up the repeat budget, in
    /// which case the final value has been written.
    fn skip_elapsed_passes(&mut self, root: &mut R, now: Instant) -> bool {
        let definition = Rc::clone(&self.definition);
        let pass = definition.pass_duration();
        let budget = definition.repeat_times;
        if self.current_frame >= definition.keyframes.len() {
            return true;
        }
        if pass.is_zero() {
            // Zero-length passes cannot be skipped by time; a finite budget
            // completes at once, an infinite one is left to the iteration cap.
            if budget != 0 {
                self.repeated = budget;
                self.finish(root);
                return false;
            }
            return true;
        }

        let passes = now.saturating_duration_since(self.pass_start).as_nanos() / pass.as_nanos();
        if passes == 0 {
            return true;
        }
        if budget != 0 && passes >= budget.saturating_sub(self.repeated) as u128 {
            self.repeated = budget;
            self.finish(root);
            return false;
        }
        let (Ok(skipped), Ok(count)) = (u64::try_from(passes * pass.as_nanos()), usize::try_from(passes)) else {
            return true;
        };
        self.pass_start += Duration::from_nanos(skipped);
        self.keyframe_start = self.pass_start;
        self.current_frame = 0;
        self.repeated += count;
        if let Some(last) = definition.keyframes.last() {
            self.from = last.target.clone();
        }
        true
    }

    pub fn update(&mut self, root: &mut R, now: Instant) -> Option<Duration> {
        if !self.skip_elapsed_passes(root, now) {
            return None;
        }
        let definition = Rc::clone(&self.definition);
        let keyframes = &definition.keyframes;

        for _ in 0..MAX_ITERATIONS_PER_UPDATE {
            let Some(frame) = keyframes.get(self.current_frame) else {
                self.finish(root);
                return None;
            };
            let frame_end = self.keyframe_start + frame.duration;

            if frame_end > now {
                return match frame.transition {
                    Some(transition) => {
                        let elapsed = now.saturating_duration_since(self.keyframe_start);
                        let t = (elapsed.as_secs_f64() / frame.duration.as_secs_f64()).clamp(0.0, 1.0);
                        let value = self.from.lerp(&frame.target, transition(t));
                        self.write(root, value).then_some(Duration::ZERO)
                    }
                    None => self
                        .write(root, frame.target.clone())
                        .then(|| frame_end - now),
                };
            }

            self.keyframe_start = frame_end;
            self.from = frame.target.clone();
            self.current_frame += 1;
            if self.current_frame == keyframes.len() {
                self.repeated += 1;
                if definition.repeat_times == 0 || self.repeated < definition.repeat_times {
                    self.current_frame = 0;
                    self.pass_start = self.keyframe_start;
                } else {
                    self.finish(root);
                    return None;
                }
            }
        }

        warn!(
            subject = %describe_steps(self.subject.steps()),
            limit = MAX_ITERATIONS_PER_UPDATE,
            "animation made no progress within the iteration limit; stopping it"
        );
        if definition.repeat_times != 0 {
            self.finish(root);
        }
        None
    }
}

impl<R: 'static, L: Animatable> Playing<R> for PlayingAnimation<R, L> {
    fn update(&mut self, root: &mut R, now: Instant) -> Option<Duration> {
        PlayingAnimation::update(self, root, now)
    }

    fn steps(&self) -> &[ProjectionStep] {
        self.subject.steps()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
