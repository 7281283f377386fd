//! Transition functions: easing curves mapping progress `t` in `[0, 1]` to
//! a blend factor.

/// An easing curve. Must map `0.0` to `0.0` and `1.0` to `1.0`.
pub type TransitionFn = fn(f64) -> f64;

pub fn linear(t: f64) -> f64 {
    t
}

/// Hermite smoothstep: slow start and end.
pub fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

pub fn concave_quadratic(t: f64) -> f64 {
    t * t
}

pub fn convex_quadratic(t: f64) -> f64 {
    let u = 1.0 - t;
    1.0 - u * u
}

pub fn concave_cubic(t: f64) -> f64 {
    t * t * t
}

pub fn convex_cubic(t: f64) -> f64 {
    let u = 1.0 - t;
    1.0 - u * u * u
}

const NAMED: &[(&str, TransitionFn)] = &[
    ("linear", linear),
    ("smoothstep", smoothstep),
    ("concave_quadratic", concave_quadratic),
    ("convex_quadratic", convex_quadratic),
    ("concave_cubic", concave_cubic),
    ("convex_cubic", convex_cubic),
];

/// Look up a transition by name.
pub fn by_name(name: &str) -> Option<TransitionFn> {
    NAMED.iter().find(|(n, _)| *n == name).map(|&(_, f)| f)
}

/// Names accepted by [`by_name`].
pub fn names() -> impl Iterator<Item = &'static str> {
    NAMED.iter().map(|&(n, _)| n)
}
