//! Animatable element schema: layout, visuals, transforms, brushes, geometries.
//!
//! Variant types (transforms, brushes, geometries) are tagged unions; every
//! alternative carries its own payload struct so that property paths can
//! project into it.

pub mod brush;
pub mod element;
pub mod shape;
pub mod transform;

pub use brush::{
    Bitmap, BitmapPattern, Brush, GenericBrush, GenericPen, GradientStop, LinearGradient,
    RadialGradient, SolidColor,
};
pub use element::{Anchor, Cursor, Element, ElementLayout, SizeAllocationType, Visibility};
pub use shape::{Ellipse, GenericVisualGeometry, Geometry, Rectangle, RoundedRectangle};
pub use transform::{Collection, GenericTransform, Rotation, Scale, Translation};

/// What an element draws.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Visuals {
    pub geometries: Vec<GenericVisualGeometry>,
    pub transform: GenericTransform,
}
