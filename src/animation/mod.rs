//! Property-path animation: path parsing, resolution to typed accessors,
//! leaf value codecs, keyframe playback and scheduling.

pub mod accessor;
pub mod keyframe;
pub mod path;
pub mod resolve;
pub mod scheduler;
pub mod subject;
pub mod transition;
pub mod value;

pub use accessor::{Accessor, ProjectionStep};
pub use keyframe::{
    AnimationDefinition, AnimationError, Keyframe, Playing, PlayingAnimation,
    MAX_ITERATIONS_PER_UPDATE,
};
pub use path::{parse_path, Component, ComponentList, PathParseError};
pub use resolve::{resolve, resolve_element_path, resolve_path, Resolvable};
pub use scheduler::{AnimationId, AnimationScheduler};
pub use subject::{AnimationClip, AnimationSubject, BoundAnimation, SubjectCreator};
pub use transition::TransitionFn;
pub use value::{Animatable, ValueError};
