//! Leaf values: decoding from JSON and interpolation.
//!
//! Every type a property path may end on implements [`Animatable`]. The
//! trait carries the type's name as used in path type hints, a decoder from
//! the JSON value found in animation definitions, and a blend function.
//! Types that cannot be interpolated (booleans, enums, bitmaps) keep the
//! default blend, which holds the starting value until the keyframe ends.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::geometry::{Colord, RelativeDouble, RelativeVec2d, Thickness, Vec2d};
use crate::visual::{Anchor, Bitmap, Cursor, SizeAllocationType, Visibility};

/// Errors from decoding a leaf value.
#[derive(Debug, thiserror::Error)]
pub enum ValueError {
    #[error("expected {expected}, found {found}")]
    Mismatch { expected: &'static str, found: String },
    #[error("invalid {expected}: {source}")]
    Malformed {
        expected: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ValueError {
    fn mismatch(expected: &'static str, found: &Value) -> Self {
        ValueError::Mismatch { expected, found: found.to_string() }
    }
}

/// A value that can sit at the end of a property path.
pub trait Animatable: Clone + fmt::Debug + 'static {
    /// Name used for this type in path type hints and diagnostics.
    const TYPE_NAME: &'static str;

    /// Decode a value from its JSON form.
    fn from_json(value: &Value) -> Result<Self, ValueError>;

    /// Blend from `self` towards `to` by `t` in `[0, 1]`.
    fn lerp(&self, to: &Self, t: f64) -> Self {
        let _ = (to, t);
        self.clone()
    }
}

fn from_serde<T: DeserializeOwned>(expected: &'static str, value: &Value) -> Result<T, ValueError> {
    T::deserialize(value).map_err(|source| ValueError::Malformed { expected, source })
}

fn number(expected: &'static str, value: &Value) -> Result<f64, ValueError> {
    value.as_f64().ok_or_else(|| ValueError::mismatch(expected, value))
}

/// Decode a JSON array of exactly `N` numbers.
fn numbers<const N: usize>(expected: &'static str, value: &Value) -> Option<Result<[f64; N], ValueError>> {
    let items = value.as_array()?;
    if items.len() != N {
        return Some(Err(ValueError::mismatch(expected, value)));
    }
    let mut out = [0.0; N];
    for (slot, item) in out.iter_mut().zip(items) {
        match item.as_f64() {
            Some(v) => *slot = v,
            None => return Some(Err(ValueError::mismatch(expected, value))),
        }
    }
    Some(Ok(out))
}

/// Parse `"50%"` into `0.5`.
fn percentage(text: &str) -> Option<f64> {
    let digits = text.trim().strip_suffix('%')?;
    digits.trim().parse::<f64>().ok().map(|v| v / 100.0)
}

// ---------------------------------------------------------------------------
// Interpolated leaves
// ---------------------------------------------------------------------------

impl Animatable for f64 {
    const TYPE_NAME: &'static str = "double";

    fn from_json(value: &Value) -> Result<Self, ValueError> {
        number(Self::TYPE_NAME, value)
    }

    fn lerp(&self, to: &Self, t: f64) -> Self {
        crate::geometry::lerp(*self, *to, t)
    }
}

impl Animatable for Vec2d {
    const TYPE_NAME: &'static str = "vec2d";

    /// `[x, y]` or `{"x": .., "y": ..}`.
    fn from_json(value: &Value) -> Result<Self, ValueError> {
        if let Some(parsed) = numbers::<2>(Self::TYPE_NAME, value) {
            let [x, y] = parsed?;
            return Ok(Vec2d::new(x, y));
        }
        from_serde(Self::TYPE_NAME, value)
    }

    fn lerp(&self, to: &Self, t: f64) -> Self {
        Vec2d::lerp(*self, *to, t)
    }
}

impl Animatable for Colord {
    const TYPE_NAME: &'static str = "colord";

    /// `"#rrggbb"`, `"#rrggbbaa"`, `[r, g, b]`, `[r, g, b, a]` or an object.
    fn from_json(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::String(hex) => {
                Colord::from_hex(hex).ok_or_else(|| ValueError::mismatch(Self::TYPE_NAME, value))
            }
            Value::Array(items) if items.len() == 3 => {
                let [r, g, b] = numbers::<3>(Self::TYPE_NAME, value).unwrap_or_else(|| {
                    Err(ValueError::mismatch(Self::TYPE_NAME, value))
                })?;
                Ok(Colord::new(r, g, b, 1.0))
            }
            Value::Array(_) => {
                let [r, g, b, a] = numbers::<4>(Self::TYPE_NAME, value).unwrap_or_else(|| {
                    Err(ValueError::mismatch(Self::TYPE_NAME, value))
                })?;
                Ok(Colord::new(r, g, b, a))
            }
            _ => from_serde(Self::TYPE_NAME, value),
        }
    }

    fn lerp(&self, to: &Self, t: f64) -> Self {
        Colord::lerp(*self, *to, t)
    }
}

impl Animatable for Thickness {
    const TYPE_NAME: &'static str = "thickness";

    /// A single number for all sides, `[left, top, right, bottom]`, or an object.
    fn from_json(value: &Value) -> Result<Self, ValueError> {
        if let Some(v) = value.as_f64() {
            return Ok(Thickness::uniform(v));
        }
        if let Some(parsed) = numbers::<4>(Self::TYPE_NAME, value) {
            let [left, top, right, bottom] = parsed?;
            return Ok(Thickness::new(left, top, right, bottom));
        }
        from_serde(Self::TYPE_NAME, value)
    }

    fn lerp(&self, to: &Self, t: f64) -> Self {
        Thickness::lerp(*self, *to, t)
    }
}

impl Animatable for RelativeDouble {
    const TYPE_NAME: &'static str = "relative_double";

    /// A number (absolute), `"N%"` (relative), or `{"relative", "absolute"}`.
    fn from_json(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Number(_) => Ok(RelativeDouble::new(0.0, number(Self::TYPE_NAME, value)?)),
            Value::String(text) => percentage(text)
                .map(|relative| RelativeDouble::new(relative, 0.0))
                .ok_or_else(|| ValueError::mismatch(Self::TYPE_NAME, value)),
            _ => from_serde(Self::TYPE_NAME, value),
        }
    }

    fn lerp(&self, to: &Self, t: f64) -> Self {
        RelativeDouble::lerp(*self, *to, t)
    }
}

impl Animatable for RelativeVec2d {
    const TYPE_NAME: &'static str = "relative_vec2d";

    /// `[x, y]` (absolute), `["N%", "M%"]` (relative), or an object.
    fn from_json(value: &Value) -> Result<Self, ValueError> {
        if let Some([x, y]) = value.as_array().and_then(|a| <&[Value; 2]>::try_from(a.as_slice()).ok()) {
            let x = RelativeDouble::from_json(x)?;
            let y = RelativeDouble::from_json(y)?;
            return Ok(RelativeVec2d::new(
                Vec2d::new(x.relative, y.relative),
                Vec2d::new(x.absolute, y.absolute),
            ));
        }
        if value.is_array() {
            return Err(ValueError::mismatch(Self::TYPE_NAME, value));
        }
        from_serde(Self::TYPE_NAME, value)
    }

    fn lerp(&self, to: &Self, t: f64) -> Self {
        RelativeVec2d::lerp(*self, *to, t)
    }
}

// ---------------------------------------------------------------------------
// Held leaves
// ---------------------------------------------------------------------------

impl Animatable for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_json(value: &Value) -> Result<Self, ValueError> {
        value.as_bool().ok_or_else(|| ValueError::mismatch(Self::TYPE_NAME, value))
    }
}

impl Animatable for Bitmap {
    const TYPE_NAME: &'static str = "bitmap";

    /// A source name, or `null` for no image.
    fn from_json(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::String(source) => Ok(Bitmap::from_source(source)),
            Value::Null => Ok(Bitmap::default()),
            _ => Err(ValueError::mismatch(Self::TYPE_NAME, value)),
        }
    }
}

macro_rules! held_enum {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Animatable for $ty {
                const TYPE_NAME: &'static str = $name;

                fn from_json(value: &Value) -> Result<Self, ValueError> {
                    from_serde(Self::TYPE_NAME, value)
                }
            }
        )*
    };
}

held_enum! {
    Anchor => "anchor",
    Visibility => "visibility",
    Cursor => "cursor",
    SizeAllocationType => "size_allocation_type",
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ── Decoding ─────────────────────────────────────────────────────

    #[test]
    fn decode_numbers_and_vectors() {
        assert_eq!(f64::from_json(&json!(1.5)).unwrap(), 1.5);
        assert!(f64::from_json(&json!("1.5")).is_err());
        assert_eq!(Vec2d::from_json(&json!([1, 2])).unwrap(), Vec2d::new(1.0, 2.0));
        assert_eq!(Vec2d::from_json(&json!({"x": 3, "y": 4})).unwrap(), Vec2d::new(3.0, 4.0));
        assert!(Vec2d::from_json(&json!([1, 2, 3])).is_err());
    }

    #[test]
    fn decode_colors() {
        assert_eq!(Colord::from_json(&json!("#ffffff")).unwrap(), Colord::WHITE);
        assert_eq!(Colord::from_json(&json!([0, 0, 0])).unwrap(), Colord::BLACK);
        assert_eq!(
            Colord::from_json(&json!([1, 0, 0, 0.5])).unwrap(),
            Colord::new(1.0, 0.0, 0.0, 0.5)
        );
        assert!(Colord::from_json(&json!("red")).is_err());
        assert!(Colord::from_json(&json!([1, 0])).is_err());
    }

    #[test]
    fn decode_thickness() {
        assert_eq!(Thickness::from_json(&json!(2)).unwrap(), Thickness::uniform(2.0));
        assert_eq!(
            Thickness::from_json(&json!([1, 2, 3, 4])).unwrap(),
            Thickness::new(1.0, 2.0, 3.0, 4.0)
        );
        assert_eq!(
            Thickness::from_json(&json!({"left": 1})).unwrap_err().to_string(),
            "invalid thickness: missing field `top`"
        );
    }

    #[test]
    fn decode_relative_values() {
        assert_eq!(RelativeDouble::from_json(&json!(4)).unwrap(), RelativeDouble::new(0.0, 4.0));
        assert_eq!(RelativeDouble::from_json(&json!("50%")).unwrap(), RelativeDouble::new(0.5, 0.0));
        assert_eq!(
            RelativeDouble::from_json(&json!({"relative": 1, "absolute": -2})).unwrap(),
            RelativeDouble::new(1.0, -2.0)
        );
        assert_eq!(
            RelativeVec2d::from_json(&json!(["100%", 3])).unwrap(),
            RelativeVec2d::new(Vec2d::new(1.0, 0.0), Vec2d::new(0.0, 3.0))
        );
        assert!(RelativeVec2d::from_json(&json!([1])).is_err());
    }

    #[test]
    fn decode_held_values() {
        assert!(bool::from_json(&json!(true)).unwrap());
        assert_eq!(Anchor::from_json(&json!("bottom_right")).unwrap(), Anchor::BottomRight);
        assert_eq!(Visibility::from_json(&json!("collapsed")).unwrap(), Visibility::Collapsed);
        assert_eq!(Bitmap::from_json(&json!("a.png")).unwrap().source(), Some("a.png"));
        assert_eq!(Bitmap::from_json(&json!(null)).unwrap(), Bitmap::default());
        assert!(Cursor::from_json(&json!(3)).is_err());
    }

    // ── Blending ─────────────────────────────────────────────────────

    #[test]
    fn interpolated_leaves_blend() {
        assert_eq!(Animatable::lerp(&0.0_f64, &10.0, 0.25), 2.5);
        assert_eq!(
            Animatable::lerp(&Colord::BLACK, &Colord::WHITE, 1.0),
            Colord::WHITE
        );
    }

    #[test]
    fn held_leaves_keep_start_value() {
        assert!(!Animatable::lerp(&false, &true, 0.99));
        assert_eq!(Animatable::lerp(&Anchor::Left, &Anchor::Right, 0.5), Anchor::Left);
    }

    #[test]
    fn mismatch_message() {
        let err = bool::from_json(&json!(1)).unwrap_err();
        assert_eq!(err.to_string(), "expected bool, found 1");
    }
}
