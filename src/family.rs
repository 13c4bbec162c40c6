//! `UnitFamily`: the pluggable part of a stochastic semilinear unit.
//!
//! Every semilinear unit computes `s = dot(x, w)` the same way. What differs
//! between unit types is how `s` becomes a distribution parameter (`squash`),
//! how an output is drawn from that parameter (`sample`), and the
//! characteristic eligibility `d ln g / d w` of the resulting distribution.
//!
//! [`BernoulliLogistic`] is the family used throughout the crate: a logistic
//! squash, a Bernoulli draw, and eligibility `(y - p) * x`.

use rand::Rng;

use crate::sampling::bernoulli;

/// Capability set of a stochastic semilinear unit family.
///
/// # Example
///
/// ```rust
/// use rand::rngs::StdRng;
/// use rand::{Rng, SeedableRng};
/// use williams::{InputSize, StochasticUnit, UnitConfig, UnitFamily};
///
/// /// Always emits its (clamped) linear output; no noise.
/// #[derive(Debug, Clone, Copy, Default)]
/// struct Clamped;
///
/// impl UnitFamily for Clamped {
///     fn squash(&self, s: f64) -> f64 {
///         s.clamp(0.0, 1.0)
///     }
///     fn sample<R: Rng + ?Sized>(&self, p: f64, _rng: &mut R) -> f64 {
///         p
///     }
/// }
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let cfg = UnitConfig {
///     input_size: InputSize::vector(2).unwrap(),
///     weights_low: 0.25,
///     weights_high: 0.25,
/// };
/// let mut unit = StochasticUnit::with_family(cfg, Clamped, &mut rng).unwrap();
/// let y = unit.forward(None, &mut rng).unwrap();
/// assert_eq!(y, &[0.5]);
/// ```
pub trait UnitFamily {
    /// Map a linear output to this family's distribution parameter.
    fn squash(&self, s: f64) -> f64;

    /// Draw one output given parameter `p`.
    fn sample<R: Rng + ?Sized>(&self, p: f64, rng: &mut R) -> f64;

    /// Characteristic eligibility for one input row, written into `out`.
    ///
    /// The default is `(y - p) * x`, which is exact for Bernoulli units with a
    /// logistic squash.
    fn eligibility(&self, x: &[f64], p: f64, y: f64, out: &mut [f64]) {
        let g = y - p;
        for (o, &xi) in out.iter_mut().zip(x) {
            *o = g * xi;
        }
    }
}

/// Bernoulli-logistic unit: `p = 1 / (1 + e^-s)`, `y ~ Bernoulli(p)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BernoulliLogistic;

impl UnitFamily for BernoulliLogistic {
    fn squash(&self, s: f64) -> f64 {
        logistic(s)
    }

    fn sample<R: Rng + ?Sized>(&self, p: f64, rng: &mut R) -> f64 {
        bernoulli(p, rng)
    }
}

/// Numerically stable logistic function.
#[inline]
pub fn logistic(s: f64) -> f64 {
    if s >= 0.0 {
        1.0 / (1.0 + (-s).exp())
    } else {
        let e = s.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logistic_is_symmetric_and_bounded() {
        assert!((logistic(0.0) - 0.5).abs() < 1e-15);
        for &s in &[0.1, 1.0, 5.0, 40.0, 800.0] {
            let a = logistic(s);
            let b = logistic(-s);
            assert!((a + b - 1.0).abs() < 1e-12, "s={s}");
            assert!((0.0..=1.0).contains(&a));
            assert!((0.0..=1.0).contains(&b));
        }
        assert!(logistic(-800.0).is_finite());
    }

    #[test]
    fn default_eligibility_scales_input_by_residual() {
        let mut out = [0.0; 3];
        BernoulliLogistic.eligibility(&[1.0, 2.0, -1.0], 0.25, 1.0, &mut out);
        assert_eq!(out, [0.75, 1.5, -0.75]);

        BernoulliLogistic.eligibility(&[1.0, 2.0, -1.0], 0.25, 0.0, &mut out);
        assert_eq!(out, [-0.25, -0.5, 0.25]);
    }
}
