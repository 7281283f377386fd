//! Core geometry types: Vec2d, Colord, Thickness, RelativeDouble, RelativeVec2d.
//!
//! These are the leaf values that element properties are made of, and the
//! values keyframe animations interpolate between. All of them are plain
//! `Copy` data with a linear `lerp`.

use std::ops::{Add, Mul, Neg, Sub};

use serde::Deserialize;

/// Linearly interpolate two scalars.
///
/// `t = 0.0` returns `from`, `t = 1.0` returns `to`.
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

// ---------------------------------------------------------------------------
// Vec2d
// ---------------------------------------------------------------------------

/// A 2D vector or point in device-independent pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Vec2d {
    pub x: f64,
    pub y: f64,
}

impl Vec2d {
    /// The zero vector.
    pub const ZERO: Vec2d = Vec2d { x: 0.0, y: 0.0 };

    /// Create a new vector.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Linearly interpolate between `self` and `other` by `t`.
    #[inline]
    pub fn lerp(self, other: Vec2d, t: f64) -> Vec2d {
        Vec2d {
            x: lerp(self.x, other.x, t),
            y: lerp(self.y, other.y, t),
        }
    }

    /// Euclidean length.
    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl Add for Vec2d {
    type Output = Vec2d;
    #[inline]
    fn add(self, rhs: Vec2d) -> Vec2d {
        Vec2d { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Vec2d {
    type Output = Vec2d;
    #[inline]
    fn sub(self, rhs: Vec2d) -> Vec2d {
        Vec2d { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl Neg for Vec2d {
    type Output = Vec2d;
    #[inline]
    fn neg(self) -> Vec2d {
        Vec2d { x: -self.x, y: -self.y }
    }
}

impl Mul<f64> for Vec2d {
    type Output = Vec2d;
    #[inline]
    fn mul(self, rhs: f64) -> Vec2d {
        Vec2d { x: self.x * rhs, y: self.y * rhs }
    }
}

// ---------------------------------------------------------------------------
// Colord
// ---------------------------------------------------------------------------

/// An RGBA color with `f64` channels in `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
pub struct Colord {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "Colord::opaque_alpha")]
    pub a: f64,
}

impl Colord {
    /// Opaque black.
    pub const BLACK: Colord = Colord { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    /// Opaque white.
    pub const WHITE: Colord = Colord { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    /// Fully transparent black.
    pub const TRANSPARENT: Colord = Colord { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

    /// Create a color from four channels.
    #[inline]
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    fn opaque_alpha() -> f64 {
        1.0
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Option<Colord> {
        let digits = hex.strip_prefix('#')?;
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| -> Option<f64> {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .ok()
                .map(|v| f64::from(v) / 255.0)
        };
        let a = if digits.len() == 8 { channel(6)? } else { 1.0 };
        Some(Colord {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a,
        })
    }

    /// Channel-wise linear interpolation.
    #[inline]
    pub fn lerp(self, other: Colord, t: f64) -> Colord {
        Colord {
            r: lerp(self.r, other.r, t),
            g: lerp(self.g, other.g, t),
            b: lerp(self.b, other.b, t),
            a: lerp(self.a, other.a, t),
        }
    }
}

impl Default for Colord {
    fn default() -> Self {
        Colord::BLACK
    }
}

// ---------------------------------------------------------------------------
// Thickness
// ---------------------------------------------------------------------------

/// Widths of the four sides of a rectangle, used for margin and padding.
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Thickness {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Thickness {
    /// Zero on all sides.
    pub const ZERO: Thickness = Thickness { left: 0.0, top: 0.0, right: 0.0, bottom: 0.0 };

    /// Create a thickness with explicit values for each side.
    #[inline]
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }

    /// All four sides set to the same value.
    #[inline]
    pub const fn uniform(value: f64) -> Self {
        Self { left: value, top: value, right: value, bottom: value }
    }

    /// Total horizontal extent: `left + right`.
    #[inline]
    pub fn width(self) -> f64 {
        self.left + self.right
    }

    /// Total vertical extent: `top + bottom`.
    #[inline]
    pub fn height(self) -> f64 {
        self.top + self.bottom
    }

    #[inline]
    pub fn lerp(self, other: Thickness, t: f64) -> Thickness {
        Thickness {
            left: lerp(self.left, other.left, t),
            top: lerp(self.top, other.top, t),
            right: lerp(self.right, other.right, t),
            bottom: lerp(self.bottom, other.bottom, t),
        }
    }
}

// ---------------------------------------------------------------------------
// Relative values
// ---------------------------------------------------------------------------

/// A length made of a part relative to some reference size and an absolute part.
///
/// The resolved value is `reference * relative + absolute`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RelativeDouble {
    #[serde(default)]
    pub relative: f64,
    #[serde(default)]
    pub absolute: f64,
}

impl RelativeDouble {
    #[inline]
    pub const fn new(relative: f64, absolute: f64) -> Self {
        Self { relative, absolute }
    }

    /// Resolve against a reference length.
    #[inline]
    pub fn resolve(self, reference: f64) -> f64 {
        reference * self.relative + self.absolute
    }

    #[inline]
    pub fn lerp(self, other: RelativeDouble, t: f64) -> RelativeDouble {
        RelativeDouble {
            relative: lerp(self.relative, other.relative, t),
            absolute: lerp(self.absolute, other.absolute, t),
        }
    }
}

/// The 2D counterpart of [`RelativeDouble`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RelativeVec2d {
    #[serde(default)]
    pub relative: Vec2d,
    #[serde(default)]
    pub absolute: Vec2d,
}

impl RelativeVec2d {
    #[inline]
    pub const fn new(relative: Vec2d, absolute: Vec2d) -> Self {
        Self { relative, absolute }
    }

    /// Resolve against a reference size.
    #[inline]
    pub fn resolve(self, reference: Vec2d) -> Vec2d {
        Vec2d {
            x: reference.x * self.relative.x + self.absolute.x,
            y: reference.y * self.relative.y + self.absolute.y,
        }
    }

    #[inline]
    pub fn lerp(self, other: RelativeVec2d, t: f64) -> RelativeVec2d {
        RelativeVec2d {
            relative: self.relative.lerp(other.relative, t),
            absolute: self.absolute.lerp(other.absolute, t),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ── Vec2d ────────────────────────────────────────────────────────

    #[test]
    fn vec2d_arithmetic() {
        let a = Vec2d::new(1.0, 2.0);
        let b = Vec2d::new(3.0, 5.0);
        assert_eq!(a + b, Vec2d::new(4.0, 7.0));
        assert_eq!(b - a, Vec2d::new(2.0, 3.0));
        assert_eq!(-a, Vec2d::new(-1.0, -2.0));
        assert_eq!(a * 2.0, Vec2d::new(2.0, 4.0));
    }

    #[test]
    fn vec2d_lerp_endpoints_and_midpoint() {
        let a = Vec2d::new(0.0, 10.0);
        let b = Vec2d::new(10.0, 20.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Vec2d::new(5.0, 15.0));
    }

    #[test]
    fn vec2d_length() {
        assert_eq!(Vec2d::new(3.0, 4.0).length(), 5.0);
    }

    // ── Colord ───────────────────────────────────────────────────────

    #[test]
    fn colord_from_hex_rgb() {
        let c = Colord::from_hex("#ff0000").unwrap();
        assert_eq!(c, Colord::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn colord_from_hex_rgba() {
        let c = Colord::from_hex("#00000000").unwrap();
        assert_eq!(c, Colord::TRANSPARENT);
    }

    #[test]
    fn colord_from_hex_rejects_garbage() {
        assert!(Colord::from_hex("ff0000").is_none());
        assert!(Colord::from_hex("#ff00").is_none());
        assert!(Colord::from_hex("#gg0000").is_none());
    }

    #[test]
    fn colord_lerp() {
        let c = Colord::BLACK.lerp(Colord::WHITE, 0.5);
        assert_eq!(c, Colord::new(0.5, 0.5, 0.5, 1.0));
    }

    // ── Thickness ────────────────────────────────────────────────────

    #[test]
    fn thickness_extents() {
        let t = Thickness::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(t.width(), 4.0);
        assert_eq!(t.height(), 6.0);
        assert_eq!(Thickness::uniform(2.0).width(), 4.0);
    }

    #[test]
    fn thickness_lerp() {
        let t = Thickness::ZERO.lerp(Thickness::uniform(4.0), 0.25);
        assert_eq!(t, Thickness::uniform(1.0));
    }

    // ── Relative values ──────────────────────────────────────────────

    #[test]
    fn relative_double_resolve() {
        let r = RelativeDouble::new(0.5, 10.0);
        assert_eq!(r.resolve(100.0), 60.0);
    }

    #[test]
    fn relative_vec2d_resolve_and_lerp() {
        let r = RelativeVec2d::new(Vec2d::new(0.5, 1.0), Vec2d::new(1.0, -1.0));
        assert_eq!(r.resolve(Vec2d::new(10.0, 10.0)), Vec2d::new(6.0, 9.0));

        let l = RelativeVec2d::default().lerp(r, 1.0);
        assert_eq!(l, r);
    }

    #[test]
    fn deserialize_partial_relative() {
        let r: RelativeDouble = serde_json::from_str(r#"{"relative": 0.5}"#).unwrap();
        assert_eq!(r, RelativeDouble::new(0.5, 0.0));
    }

    #[test]
    fn deserialize_colord_default_alpha() {
        let c: Colord = serde_json::from_str(r#"{"r": 1, "g": 0, "b": 0}"#).unwrap();
        assert_eq!(c.a, 1.0);
    }
}
