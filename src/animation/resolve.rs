//! Property-path resolution against the element schema.
//!
//! Every schema node implements [`Resolvable`]: given the remaining path
//! components and an accessor that reaches the node, it either ends the walk
//! (a primitive leaf, producing a [`SubjectCreator`]) or projects one level
//! deeper and hands the rest of the path to the child's getter. The getters
//! are mutually recursive along the shape of the schema.
//!
//! For one component the getter:
//!
//! 1. fails if the path ended on a composite node, or succeeds if it ended on
//!    a leaf;
//! 2. compares the component's type hint with its own type name and only
//!    warns on a mismatch;
//! 3. tries its struct fields, then its variant alternatives (selected by the
//!    type hint, without consuming the component), then its array fields
//!    (which require an index);
//! 4. otherwise warns about an invalid property and fails.
//!
//! Pens, brushes and visual geometries wrap their payload in a `value`
//! field. A `value` component is consumed silently, and may be left out
//! entirely: `fill.solid_color:color` means `fill.value.solid_color:color`.

use tracing::warn;

use super::accessor::Accessor;
use super::keyframe::AnimationError;
use super::path::{format_path, parse_path, Component};
use super::subject::SubjectCreator;
use super::value::Animatable;
use crate::geometry::{Colord, RelativeDouble, RelativeVec2d, Thickness, Vec2d};
use crate::visual::{
    Anchor, Bitmap, BitmapPattern, Brush, Collection, Cursor, Element, ElementLayout, Ellipse,
    GenericBrush, GenericPen, GenericTransform, GenericVisualGeometry, Geometry, GradientStop,
    LinearGradient, RadialGradient, Rectangle, Rotation, RoundedRectangle, Scale,
    SizeAllocationType, SolidColor, Translation, Visibility, Visuals,
};

type Resolved<R> = Option<SubjectCreator<R>>;

/// A schema node that property paths can walk through.
pub trait Resolvable: Sized + 'static {
    /// Resolve `path` relative to the node reached by `at`.
    fn resolve<R: 'static>(path: &[Component], at: Accessor<R, Self>) -> Resolved<R>;
}

/// Resolve `path` starting at a `T`.
pub fn resolve<T: Resolvable>(path: &[Component]) -> Option<SubjectCreator<T>> {
    T::resolve(path, Accessor::root())
}

/// Resolve `path` starting at an [`Element`].
pub fn resolve_element_path(path: &[Component]) -> Option<SubjectCreator<Element>> {
    resolve::<Element>(path)
}

/// Parse and resolve a textual path such as `visuals.transform.rotation:angle`.
pub fn resolve_path<T: Resolvable>(path: &str) -> Result<SubjectCreator<T>, AnimationError> {
    let components = parse_path(path)?;
    resolve::<T>(&components).ok_or_else(|| AnimationError::Unresolved(format_path(&components)))
}

// ---------------------------------------------------------------------------
// Getter building blocks
// ---------------------------------------------------------------------------

/// The component this getter works on, or a failure if the path ended early.
fn head<'p>(path: &'p [Component], node: &'static str) -> Option<&'p Component> {
    let first = path.first();
    if first.is_none() {
        warn!(node, "property path ends on a composite value");
    }
    first
}

fn check_type(component: &Component, node: &'static str, alternatives: &[&str]) {
    let hint = component.type_hint.as_str();
    if !hint.is_empty() && hint != node && !alternatives.contains(&hint) {
        warn!(node, hint, property = %component.property, "type hint does not match the property's owner");
    }
}

fn invalid<R>(component: &Component, node: &'static str) -> Resolved<R> {
    warn!(node, component = %component, "invalid property");
    None
}

/// End of the path: wrap the accessor, or fail if components remain.
fn terminal<R: 'static, L: Animatable>(path: &[Component], at: Accessor<R, L>) -> Resolved<R> {
    match path.first() {
        None => Some(Box::new(at)),
        Some(extra) => {
            warn!(leaf = L::TYPE_NAME, component = %extra, "property path continues past a primitive value");
            None
        }
    }
}

/// Forward into a struct field, consuming the component.
fn member<R: 'static, P: 'static, C: Resolvable>(
    path: &[Component],
    at: &Accessor<R, P>,
    name: &'static str,
    field: fn(&mut P) -> &mut C,
) -> Resolved<R> {
    if let Some(index) = path[0].index {
        warn!(property = name, index, "index on a non-array property ignored");
    }
    C::resolve(&path[1..], at.member(name, field))
}

/// Forward into a variant alternative. The component is not consumed: the
/// alternative's getter reads the property from it.
fn variant<R: 'static, P: 'static, C: Resolvable>(
    path: &[Component],
    at: &Accessor<R, P>,
    name: &'static str,
    alternative: fn(&mut P) -> Option<&mut C>,
) -> Resolved<R> {
    C::resolve(path, at.variant(name, alternative))
}

/// Forward into an array element, consuming the component.
fn array<R: 'static, P: 'static, C: Resolvable>(
    path: &[Component],
    at: &Accessor<R, P>,
    name: &'static str,
    field: fn(&mut P) -> &mut Vec<C>,
) -> Resolved<R> {
    match path[0].index {
        Some(index) => C::resolve(&path[1..], at.index(name, index, field)),
        None => {
            warn!(property = name, "array property needs an index");
            None
        }
    }
}

/// Drop a leading `value` component.
fn skip_value(path: &[Component]) -> &[Component] {
    match path.first() {
        Some(c) if c.property == "value" && c.index.is_none() => &path[1..],
        _ => path,
    }
}

// ---------------------------------------------------------------------------
// Leaves
// ---------------------------------------------------------------------------

macro_rules! terminal_leaves {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Resolvable for $ty {
                fn resolve<R: 'static>(path: &[Component], at: Accessor<R, Self>) -> Resolved<R> {
                    terminal(path, at)
                }
            }
        )*
    };
}

terminal_leaves!(f64, bool, Anchor, Visibility, Cursor, SizeAllocationType, Bitmap);

/// Leaves whose fields can also be addressed one by one.
macro_rules! leaf_with_fields {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl Resolvable for $ty {
            fn resolve<R: 'static>(path: &[Component], at: Accessor<R, Self>) -> Resolved<R> {
                let Some(c) = path.first() else {
                    return terminal(path, at);
                };
                let node = <$ty as Animatable>::TYPE_NAME;
                check_type(c, node, &[]);
                match c.property.as_str() {
                    $(stringify!($field) => member(path, &at, stringify!($field), |v| &mut v.$field),)*
                    _ => invalid(c, node),
                }
            }
        }
    };
}

leaf_with_fields!(Vec2d { x, y });
leaf_with_fields!(Colord { r, g, b, a });
leaf_with_fields!(Thickness { left, top, right, bottom });
leaf_with_fields!(RelativeDouble { relative, absolute });
leaf_with_fields!(RelativeVec2d { relative, absolute });

// ---------------------------------------------------------------------------
// Plain structs
// ---------------------------------------------------------------------------

/// Structs made only of fields and array fields.
macro_rules! composite {
    (
        $ty:ty as $node:literal {
            $($field:ident),* $(,)?
        }
        $([$($array:ident),* $(,)?])?
    ) => {
        impl Resolvable for $ty {
            fn resolve<R: 'static>(path: &[Component], at: Accessor<R, Self>) -> Resolved<R> {
                let c = head(path, $node)?;
                check_type(c, $node, &[]);
                match c.property.as_str() {
                    $(stringify!($field) => member(path, &at, stringify!($field), |v| &mut v.$field),)*
                    $($(stringify!($array) => array(path, &at, stringify!($array), |v| &mut v.$array),)*)?
                    _ => invalid(c, $node),
                }
            }
        }
    };
}

composite!(Element as "element" { visibility, cursor, layout, visuals });
composite!(ElementLayout as "element_layout" {
    margin, padding, size, anchor, width_alloc, height_alloc
});
composite!(Visuals as "visuals" { transform } [geometries]);

composite!(Translation as "translation" { offset });
composite!(Scale as "scale" { center, scale_factor });
composite!(Rotation as "rotation" { center, angle });
composite!(Collection as "collection" {} [components]);

composite!(GradientStop as "gradient_stop" { color, position });
composite!(SolidColor as "solid_color" { color });
composite!(LinearGradient as "linear_gradient" { start_point, end_point } [gradients]);
composite!(RadialGradient as "radial_gradient" { center, radius } [gradients]);
composite!(BitmapPattern as "bitmap_pattern" { image });

composite!(Rectangle as "rectangle" { top_left, bottom_right });
composite!(RoundedRectangle as "rounded_rectangle" { top_left, bottom_right, radiusx, radiusy });
composite!(Ellipse as "ellipse" { top_left, bottom_right });

// ---------------------------------------------------------------------------
// Tagged unions
// ---------------------------------------------------------------------------

const TRANSFORM_KINDS: &[&str] = &["translation", "scale", "rotation", "collection"];
const BRUSH_KINDS: &[&str] = &["solid_color", "linear_gradient", "radial_gradient", "bitmap_pattern"];
const GEOMETRY_KINDS: &[&str] = &["rectangle", "rounded_rectangle", "ellipse"];

impl Resolvable for GenericTransform {
    fn resolve<R: 'static>(path: &[Component], at: Accessor<R, Self>) -> Resolved<R> {
        const NODE: &str = "generic_transform";
        let c = head(path, NODE)?;
        match c.type_hint.as_str() {
            "translation" => variant(path, &at, "translation", |t| match t {
                GenericTransform::Translation(v) => Some(v),
                _ => None,
            }),
            "scale" => variant(path, &at, "scale", |t| match t {
                GenericTransform::Scale(v) => Some(v),
                _ => None,
            }),
            "rotation" => variant(path, &at, "rotation", |t| match t {
                GenericTransform::Rotation(v) => Some(v),
                _ => None,
            }),
            "collection" => variant(path, &at, "collection", |t| match t {
                GenericTransform::Collection(v) => Some(v),
                _ => None,
            }),
            _ => {
                check_type(c, NODE, TRANSFORM_KINDS);
                invalid(c, NODE)
            }
        }
    }
}

impl Resolvable for Brush {
    fn resolve<R: 'static>(path: &[Component], at: Accessor<R, Self>) -> Resolved<R> {
        const NODE: &str = "brush";
        let c = head(path, NODE)?;
        match c.type_hint.as_str() {
            "solid_color" => variant(path, &at, "solid_color", |b| match b {
                Brush::SolidColor(v) => Some(v),
                _ => None,
            }),
            "linear_gradient" => variant(path, &at, "linear_gradient", |b| match b {
                Brush::LinearGradient(v) => Some(v),
                _ => None,
            }),
            "radial_gradient" => variant(path, &at, "radial_gradient", |b| match b {
                Brush::RadialGradient(v) => Some(v),
                _ => None,
            }),
            "bitmap_pattern" => variant(path, &at, "bitmap_pattern", |b| match b {
                Brush::BitmapPattern(v) => Some(v),
                _ => None,
            }),
            _ => {
                check_type(c, NODE, BRUSH_KINDS);
                invalid(c, NODE)
            }
        }
    }
}

impl Resolvable for Geometry {
    fn resolve<R: 'static>(path: &[Component], at: Accessor<R, Self>) -> Resolved<R> {
        const NODE: &str = "geometry";
        let c = head(path, NODE)?;
        match c.type_hint.as_str() {
            "rectangle" => variant(path, &at, "rectangle", |g| match g {
                Geometry::Rectangle(v) => Some(v),
                _ => None,
            }),
            "rounded_rectangle" => variant(path, &at, "rounded_rectangle", |g| match g {
                Geometry::RoundedRectangle(v) => Some(v),
                _ => None,
            }),
            "ellipse" => variant(path, &at, "ellipse", |g| match g {
                Geometry::Ellipse(v) => Some(v),
                _ => None,
            }),
            _ => {
                check_type(c, NODE, GEOMETRY_KINDS);
                invalid(c, NODE)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Wrappers with a `value` payload
// ---------------------------------------------------------------------------

impl Resolvable for GenericBrush {
    fn resolve<R: 'static>(path: &[Component], at: Accessor<R, Self>) -> Resolved<R> {
        const NODE: &str = "generic_brush";
        let c = head(path, NODE)?;
        check_type(c, NODE, BRUSH_KINDS);
        match c.property.as_str() {
            "transform" => member(path, &at, "transform", |b| &mut b.transform),
            _ => Brush::resolve(skip_value(path), at.member("value", |b| &mut b.value)),
        }
    }
}

impl Resolvable for GenericPen {
    fn resolve<R: 'static>(path: &[Component], at: Accessor<R, Self>) -> Resolved<R> {
        const NODE: &str = "generic_pen";
        const ACCEPTED: &[&str] = &[
            "generic_brush",
            "solid_color",
            "linear_gradient",
            "radial_gradient",
            "bitmap_pattern",
        ];
        let c = head(path, NODE)?;
        check_type(c, NODE, ACCEPTED);
        match c.property.as_str() {
            "thickness" => member(path, &at, "thickness", |p| &mut p.thickness),
            _ => GenericBrush::resolve(skip_value(path), at.member("value", |p| &mut p.value)),
        }
    }
}

impl Resolvable for GenericVisualGeometry {
    fn resolve<R: 'static>(path: &[Component], at: Accessor<R, Self>) -> Resolved<R> {
        const NODE: &str = "generic_visual_geometry";
        let c = head(path, NODE)?;
        check_type(c, NODE, GEOMETRY_KINDS);
        match c.property.as_str() {
            "fill" => member(path, &at, "fill", |g| &mut g.fill),
            "stroke" => member(path, &at, "stroke", |g| &mut g.stroke),
            "transform" => member(path, &at, "transform", |g| &mut g.transform),
            _ => Geometry::resolve(skip_value(path), at.member("value", |g| &mut g.value)),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
