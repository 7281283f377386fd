//! Composable projections from a root object down to one field.
//!
//! An [`Accessor<R, L>`] reaches an `L` inside an `R` through a chain of
//! member, variant and index steps. The chain is evaluated afresh on every
//! access, so it stays valid when intermediate containers reallocate; a
//! variant step fails (returns `None`) when another alternative has become
//! active, and an index step fails when the index is out of range.

use std::fmt;
use std::rc::Rc;

type Projector<R, L> = Rc<dyn for<'a> Fn(&'a mut R) -> Option<&'a mut L>>;

/// Pin down the higher-ranked signature of a projection closure.
fn projector<R, L, F>(f: F) -> Projector<R, L>
where
    F: for<'a> Fn(&'a mut R) -> Option<&'a mut L> + 'static,
{
    Rc::new(f)
}

/// One step of an accessor chain, kept for diagnostics and comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectionStep {
    /// A plain struct field.
    Member(&'static str),
    /// One alternative of a tagged union.
    Variant(&'static str),
    /// An element of an array field.
    Index { property: &'static str, index: usize },
}

impl fmt::Display for ProjectionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionStep::Member(name) => write!(f, ".{name}"),
            ProjectionStep::Variant(name) => write!(f, "<{name}>"),
            ProjectionStep::Index { property, index } => write!(f, ".{property}[{index}]"),
        }
    }
}

/// A typed path from `R` to a field of type `L`.
pub struct Accessor<R, L> {
    project: Projector<R, L>,
    steps: Vec<ProjectionStep>,
}

impl<R: 'static> Accessor<R, R> {
    /// The identity accessor: the root itself.
    pub fn root() -> Self {
        Self {
            project: projector(|root: &mut R| Some(root)),
            steps: Vec::new(),
        }
    }
}

impl<R: 'static, L: 'static> Accessor<R, L> {
    fn extend<C: 'static>(&self, step: ProjectionStep, project: Projector<R, C>) -> Accessor<R, C> {
        let mut steps = Vec::with_capacity(self.steps.len() + 1);
        steps.extend_from_slice(&self.steps);
        steps.push(step);
        Accessor { project, steps }
    }

    /// Project into a struct field.
    pub fn member<C: 'static>(&self, name: &'static str, field: fn(&mut L) -> &mut C) -> Accessor<R, C> {
        let parent = Rc::clone(&self.project);
        self.extend(
            ProjectionStep::Member(name),
            projector(move |root: &mut R| parent(root).map(field)),
        )
    }

    /// Project into one alternative of a tagged union.
    pub fn variant<C: 'static>(
        &self,
        name: &'static str,
        alternative: fn(&mut L) -> Option<&mut C>,
    ) -> Accessor<R, C> {
        let parent = Rc::clone(&self.project);
        self.extend(
            ProjectionStep::Variant(name),
            projector(move |root: &mut R| parent(root).and_then(alternative)),
        )
    }

    /// Project into element `index` of an array field.
    pub fn index<C: 'static>(
        &self,
        property: &'static str,
        index: usize,
        array: fn(&mut L) -> &mut Vec<C>,
    ) -> Accessor<R, C> {
        let parent = Rc::clone(&self.project);
        self.extend(
            ProjectionStep::Index { property, index },
            projector(move |root: &mut R| parent(root).and_then(|value| array(value).get_mut(index))),
        )
    }

    /// Walk the chain against `root`.
    pub fn project<'a>(&self, root: &'a mut R) -> Option<&'a mut L> {
        (self.project)(root)
    }

    /// Read the current value, if the chain is still reachable.
    pub fn get(&self, root: &mut R) -> Option<L>
    where
        L: Clone,
    {
        self.project(root).map(|value| value.clone())
    }

    /// Overwrite the value. Returns `false` if the chain is not reachable.
    pub fn set(&self, root: &mut R, value: L) -> bool {
        match self.project(root) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// The steps this accessor was built from.
    pub fn steps(&self) -> &[ProjectionStep] {
        &self.steps
    }
}

impl<R, L> Clone for Accessor<R, L> {
    fn clone(&self) -> Self {
        Self {
            project: Rc::clone(&self.project),
            steps: self.steps.clone(),
        }
    }
}

impl<R, L> fmt::Debug for Accessor<R, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor").field("steps", &self.steps).finish()
    }
}

/// Render steps as a compact string, e.g. `.visuals.transform<rotation>.angle`.
pub fn describe_steps(steps: &[ProjectionStep]) -> String {
    steps.iter().map(ToString::to_string).collect()
}

// ===========================================================================
// Tests
// ===========================================================================
