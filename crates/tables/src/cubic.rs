//! Closed-form cubics through four equally spaced samples.
//!
//! The samples `f[0..4]` sit at `x₀, x₀ + dx, x₀ + 2dx, x₀ + 3dx`, and the
//! polynomial is expanded about the second sample:
//!
//! ```text
//! p(s) = a s³ + b s² + c s + d,    s = x − (x₀ + dx)
//! ```
//!
//! A negative `dx` describes samples stored in decreasing coordinate order.

/// Evaluates the interpolating cubic at offset `s` from the second sample.
#[inline]
pub(crate) fn cubic(f: &[f64; 4], dx: f64, s: f64) -> f64 {
    let [a, b, c, d] = coefficients(f, dx);
    ((a * s + b) * s + c) * s + d
}

/// Evaluates the derivative of the interpolating cubic at offset `s`.
#[inline]
pub(crate) fn cubic_deriv(f: &[f64; 4], dx: f64, s: f64) -> f64 {
    let [a, b, c, _] = coefficients(f, dx);
    (3.0 * a * s + 2.0 * b) * s + c
}

#[inline]
fn coefficients(f: &[f64; 4], dx: f64) -> [f64; 4] {
    let [f0, f1, f2, f3] = *f;

    let a = (3.0 * f1 - 3.0 * f2 + f3 - f0) / (6.0 * dx * dx * dx);
    let b = (-2.0 * f1 + f2 + f0) / (2.0 * dx * dx);
    let c = (-3.0 * f1 + 6.0 * f2 - f3 - 2.0 * f0) / (6.0 * dx);
    let d = f1;

    [a, b, c, d]
}
