//! Brushes, pens, and the bitmap handle they may reference.

use std::fmt;
use std::rc::Rc;

use crate::geometry::{Colord, RelativeDouble, RelativeVec2d};
use crate::visual::transform::GenericTransform;

/// Opaque handle to an image owned by the renderer.
///
/// Only the source name is kept here; loading is the renderer's business.
/// Bitmaps cannot be interpolated.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Bitmap(Option<Rc<str>>);

impl Bitmap {
    /// A handle referring to the image loaded from `source`.
    pub fn from_source(source: &str) -> Self {
        Self(Some(Rc::from(source)))
    }

    /// The source name, if any image is referenced.
    pub fn source(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(source) => write!(f, "Bitmap({source:?})"),
            None => write!(f, "Bitmap(<empty>)"),
        }
    }
}

/// A single color at a position along a gradient.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GradientStop {
    pub color: Colord,
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SolidColor {
    pub color: Colord,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinearGradient {
    pub start_point: RelativeVec2d,
    pub end_point: RelativeVec2d,
    pub gradients: Vec<GradientStop>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RadialGradient {
    pub center: RelativeVec2d,
    pub radius: RelativeDouble,
    pub gradients: Vec<GradientStop>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BitmapPattern {
    pub image: Bitmap,
}

/// The paint of a brush.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Brush {
    #[default]
    None,
    SolidColor(SolidColor),
    LinearGradient(LinearGradient),
    RadialGradient(RadialGradient),
    BitmapPattern(BitmapPattern),
}

impl Brush {
    /// Name of the active alternative, as used in property paths.
    pub fn kind(&self) -> &'static str {
        match self {
            Brush::None => "none",
            Brush::SolidColor(_) => "solid_color",
            Brush::LinearGradient(_) => "linear_gradient",
            Brush::RadialGradient(_) => "radial_gradient",
            Brush::BitmapPattern(_) => "bitmap_pattern",
        }
    }
}

/// A brush together with the transform applied to its paint.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenericBrush {
    pub value: Brush,
    pub transform: GenericTransform,
}

impl GenericBrush {
    /// A solid color brush with no transform.
    pub fn solid(color: Colord) -> Self {
        Self {
            value: Brush::SolidColor(SolidColor { color }),
            transform: GenericTransform::Identity,
        }
    }
}

/// A brush used for outlines.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenericPen {
    pub value: GenericBrush,
    pub thickness: f64,
}
