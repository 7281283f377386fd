//! Geometries drawn as part of an element's visuals.

use crate::geometry::{RelativeDouble, RelativeVec2d};
use crate::visual::brush::{GenericBrush, GenericPen};
use crate::visual::transform::GenericTransform;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rectangle {
    pub top_left: RelativeVec2d,
    pub bottom_right: RelativeVec2d,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoundedRectangle {
    pub top_left: RelativeVec2d,
    pub bottom_right: RelativeVec2d,
    pub radiusx: RelativeDouble,
    pub radiusy: RelativeDouble,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ellipse {
    pub top_left: RelativeVec2d,
    pub bottom_right: RelativeVec2d,
}

/// The outline of a geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Rectangle(Rectangle),
    RoundedRectangle(RoundedRectangle),
    Ellipse(Ellipse),
}

impl Default for Geometry {
    fn default() -> Self {
        Geometry::Rectangle(Rectangle::default())
    }
}

impl Geometry {
    /// Name of the active alternative, as used in property paths.
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Rectangle(_) => "rectangle",
            Geometry::RoundedRectangle(_) => "rounded_rectangle",
            Geometry::Ellipse(_) => "ellipse",
        }
    }
}

/// A geometry with its fill, outline and transform.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenericVisualGeometry {
    pub value: Geometry,
    pub fill: GenericBrush,
    pub stroke: GenericPen,
    pub transform: GenericTransform,
}
