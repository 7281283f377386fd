//! Transforms applied to visuals and brushes.

use crate::geometry::{RelativeVec2d, Vec2d};

/// Move by a fixed offset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Translation {
    pub offset: Vec2d,
}

/// Scale around a center point.
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    pub center: RelativeVec2d,
    pub scale_factor: Vec2d,
}

impl Default for Scale {
    fn default() -> Self {
        Self {
            center: RelativeVec2d::default(),
            scale_factor: Vec2d::new(1.0, 1.0),
        }
    }
}

/// Rotate around a center point. `angle` is in radians, clockwise.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rotation {
    pub center: RelativeVec2d,
    pub angle: f64,
}

/// Several transforms applied in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Collection {
    pub components: Vec<GenericTransform>,
}

/// Any transform.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GenericTransform {
    #[default]
    Identity,
    Translation(Translation),
    Scale(Scale),
    Rotation(Rotation),
    Collection(Collection),
}

impl GenericTransform {
    /// Name of the active alternative, as used in property paths.
    pub fn kind(&self) -> &'static str {
        match self {
            GenericTransform::Identity => "identity",
            GenericTransform::Translation(_) => "translation",
            GenericTransform::Scale(_) => "scale",
            GenericTransform::Rotation(_) => "rotation",
            GenericTransform::Collection(_) => "collection",
        }
    }

    /// Shorthand for a rotation around the top-left corner.
    pub fn rotation(angle: f64) -> Self {
        GenericTransform::Rotation(Rotation { center: RelativeVec2d::default(), angle })
    }

    /// Shorthand for a translation.
    pub fn translation(offset: Vec2d) -> Self {
        GenericTransform::Translation(Translation { offset })
    }
}
