//! Piecewise-linear membership curves sampled over a universe.

use num::Float;

/// Triangular membership curve with feet at `a` and `c` and its peak at `b`.
///
/// Requires `a <= b <= c`. When `a == b` (or `b == c`) the corresponding edge
/// collapses into a step. Samples equal to `b` always get a degree of exactly one.
pub fn trimf<F: Float>(universe: &[F], [a, b, c]: [F; 3]) -> Vec<F> {
    debug_assert!(a <= b && b <= c, "trimf requires a <= b <= c");

    universe
        .iter()
        .map(|&x| {
            if x == b {
                F::one()
            } else if a < x && x < b {
                (x - a) / (b - a)
            } else if b < x && x < c {
                (c - x) / (c - b)
            } else {
                F::zero()
            }
        })
        .collect()
}

/// Trapezoidal membership curve rising over `[a, b]`, flat at one over
/// `[b, c]` and falling over `[c, d]`.
///
/// Requires `a <= b <= c <= d`. The edges reuse [`trimf`] on `[a, b, b]` and
/// `[c, c, d]`.
pub fn trapmf<F: Float>(universe: &[F], [a, b, c, d]: [F; 4]) -> Vec<F> {
    debug_assert!(a <= b && b <= c && c <= d, "trapmf requires a <= b <= c <= d");

    let rising = trimf(universe, [a, b, b]);
    let falling = trimf(universe, [c, c, d]);

    universe
        .iter()
        .zip(rising.into_iter().zip(falling))
        .map(|(&x, (rise, fall))| {
            if x < a || x > d {
                F::zero()
            } else if x <= b {
                rise
            } else if x >= c {
                fall
            } else {
                F::one()
            }
        })
        .collect()
}
