//! Element-level properties: layout box, visibility, cursor.

use serde::Deserialize;

use crate::geometry::{Thickness, Vec2d};
use crate::visual::Visuals;

/// Which sides of the parent an element sticks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    #[default]
    None,
    Left,
    Top,
    Right,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    All,
}

/// Whether an element is drawn and takes part in layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Visible,
    /// Not drawn but still occupies space.
    Hidden,
    /// Neither drawn nor laid out.
    Collapsed,
}

/// Mouse cursor shown over an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cursor {
    #[default]
    NotSpecified,
    Normal,
    Busy,
    Crosshair,
    Hand,
    Help,
    TextBeam,
    Denied,
    ArrowAll,
    ArrowNortheastSouthwest,
    ArrowNorthSouth,
    ArrowNorthwestSoutheast,
    ArrowEastWest,
}

/// How a size along one axis is distributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeAllocationType {
    /// The size is a fixed number of pixels.
    Fixed,
    /// The size is a share of the space left by fixed siblings.
    Proportion,
    /// The size is computed from the content.
    #[default]
    Automatic,
}

/// Box-model parameters of an element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementLayout {
    pub margin: Thickness,
    pub padding: Thickness,
    pub size: Vec2d,
    pub anchor: Anchor,
    pub width_alloc: SizeAllocationType,
    pub height_alloc: SizeAllocationType,
}

/// Every animatable property of an element.
///
/// This is the root type that property paths are resolved against.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub visibility: Visibility,
    pub cursor: Cursor,
    pub layout: ElementLayout,
    pub visuals: Visuals,
}
