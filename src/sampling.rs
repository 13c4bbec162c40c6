//! Branch-free Bernoulli sampling.
//!
//! Both units and bandits draw `y = ceil(p - u)` with `u ~ U[0, 1)`: the result
//! is `1` exactly when `p > u`, which happens with probability `p`.

use rand::Rng;

/// Draw one Bernoulli sample with success probability `p`.
///
/// `p` is clamped to `[0, 1]`; a non-finite `p` draws `0.0`.
#[inline]
pub fn bernoulli<R: Rng + ?Sized>(p: f64, rng: &mut R) -> f64 {
    let p = if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 };
    let u: f64 = rng.random();
    // ceil of a value in (-1, 0] is -0.0; normalize to +0.0.
    (p - u).ceil().max(0.0)
}

/// Draw one Bernoulli sample per entry of `ps`.
pub fn bernoulli_batch<R: Rng + ?Sized>(ps: &[f64], rng: &mut R) -> Vec<f64> {
    ps.iter().map(|&p| bernoulli(p, rng)).collect()
}
