//! Stochastic semilinear unit (Williams 1992).
//!
//! A unit holds one weight per input element. `forward` computes
//! `s = dot(x, w)` for every row of the input batch, squashes `s` into a
//! distribution parameter `p`, and samples an output `y` from it. The last
//! `x / s / p / y` are kept so the characteristic eligibility can be computed
//! for the REINFORCE update.
//!
//! Notes:
//! - Randomness is always injected (`&mut impl Rng`), so a seeded
//!   [`StdRng`](rand::rngs::StdRng) makes runs reproducible.
//! - A freshly built unit is in the same all-zero state as after [`StochasticUnit::reset`].

use rand::Rng;
use rand_distr::{Distribution, Uniform};
use tracing::trace;

use crate::error::{Error, Result};
use crate::family::{BernoulliLogistic, UnitFamily};
use crate::shape::{dot, InputSize, Inputs};

/// Construction parameters for a [`StochasticUnit`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitConfig {
    /// Input shape, `(batch, len)`.
    pub input_size: InputSize,
    /// Lower bound of the uniform weight initialisation.
    pub weights_low: f64,
    /// Upper bound of the uniform weight initialisation (inclusive).
    pub weights_high: f64,
}

impl UnitConfig {
    /// Default weight bounds for an input of `len` elements (batch of one).
    pub fn vector(len: usize) -> Result<Self> {
        Ok(Self {
            input_size: InputSize::vector(len)?,
            ..Self::default()
        })
    }

    /// Default weight bounds for a `(batch, len)` input.
    pub fn batched(batch: usize, len: usize) -> Result<Self> {
        Ok(Self {
            input_size: InputSize::new(batch, len)?,
            ..Self::default()
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.weights_low.is_finite() && self.weights_high.is_finite()) {
            return Err(Error::invalid(format!(
                "weight bounds must be finite; got [{}, {}]",
                self.weights_low, self.weights_high
            )));
        }
        if self.weights_low > self.weights_high {
            return Err(Error::invalid(format!(
                "weights_low ({}) must not exceed weights_high ({})",
                self.weights_low, self.weights_high
            )));
        }
        Ok(())
    }
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            input_size: InputSize::default(),
            weights_low: -0.5,
            weights_high: 0.5,
        }
    }
}

/// A stochastic semilinear unit of family `F`.
#[derive(Debug, Clone)]
pub struct StochasticUnit<F = BernoulliLogistic> {
    family: F,
    input_size: InputSize,
    weights: Vec<f64>,
    input: Inputs,
    linear_output: Vec<f64>,
    p: Vec<f64>,
    y: Vec<f64>,
}

impl StochasticUnit<BernoulliLogistic> {
    /// Build a Bernoulli-logistic unit with weights drawn from `rng`.
    pub fn new<R: Rng + ?Sized>(cfg: UnitConfig, rng: &mut R) -> Result<Self> {
        Self::with_family(cfg, BernoulliLogistic, rng)
    }
}

impl<F: UnitFamily> StochasticUnit<F> {
    /// Build a unit of an arbitrary family.
    pub fn with_family<R: Rng + ?Sized>(cfg: UnitConfig, family: F, rng: &mut R) -> Result<Self> {
        cfg.validate()?;
        let dist = Uniform::new_inclusive(cfg.weights_low, cfg.weights_high)
            .map_err(|e| Error::invalid(format!("weight bounds: {e}")))?;
        let weights: Vec<f64> = (0..cfg.input_size.length()).map(|_| dist.sample(rng)).collect();
        Self::from_weights(cfg.input_size, weights, family)
    }

    /// Build a unit with explicit weights (`weights.len()` must equal the input length).
    pub fn from_weights(input_size: InputSize, weights: Vec<f64>, family: F) -> Result<Self> {
        if weights.len() != input_size.length() {
            return Err(Error::invalid(format!(
                "expected {} weights, got {}",
                input_size.length(),
                weights.len()
            )));
        }
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(Error::invalid("weights must be finite"));
        }
        let batch = input_size.batch();
        Ok(Self {
            family,
            input_size,
            weights,
            input: Inputs::zeros(input_size),
            linear_output: vec![0.0; batch],
            p: vec![0.0; batch],
            y: vec![0.0; batch],
        })
    }

    pub fn family(&self) -> &F {
        &self.family
    }

    pub fn input_size(&self) -> InputSize {
        self.input_size
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Last input seen by `forward` (zeros after `reset`).
    pub fn input(&self) -> &Inputs {
        &self.input
    }

    /// `dot(x_i, w)` for each row of the last input.
    pub fn linear_output(&self) -> &[f64] {
        &self.linear_output
    }

    /// Squashed distribution parameters from the last `forward`.
    pub fn p(&self) -> &[f64] {
        &self.p
    }

    /// Sampled outputs from the last `forward`.
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Forward pass: returns one sampled output per input row.
    ///
    /// `None` forwards a batch of ones of the configured shape, which is the
    /// input for non-associative tasks where reward is the only signal.
    pub fn forward<R: Rng + ?Sized>(&mut self, input: Option<&Inputs>, rng: &mut R) -> Result<&[f64]> {
        match input {
            Some(x) => {
                if x.shape() != self.input_size {
                    return Err(Error::ShapeMismatch {
                        expected: self.input_size.dims(),
                        actual: x.shape().dims(),
                    });
                }
                self.input.clone_from(x);
            }
            None => self.input = Inputs::ones(self.input_size),
        }

        for (i, row) in self.input.rows().enumerate() {
            let s = dot(row, &self.weights);
            let p = self.family.squash(s);
            let y = self.family.sample(p, rng);
            self.linear_output[i] = s;
            self.p[i] = p;
            self.y[i] = y;
        }
        trace!(p = ?self.p, y = ?self.y, "forward");
        Ok(&self.y)
    }

    /// Characteristic eligibility of the last `forward`, one row per input row.
    ///
    /// This is the zero matrix when nothing has been forwarded since the last
    /// `reset`.
    pub fn characteristic_eligibility(&self) -> Inputs {
        let mut e = Inputs::zeros(self.input_size);
        self.write_eligibility(&mut e);
        e
    }

    fn write_eligibility(&self, out: &mut Inputs) {
        for (i, (row, out_row)) in self.input.rows().zip(out.rows_mut()).enumerate() {
            self.family.eligibility(row, self.p[i], self.y[i], out_row);
        }
    }

    /// REINFORCE update: `w += alpha * sum_i rewards[i] * e_i`.
    ///
    /// Returns the applied weight change. `rewards` holds one reward per
    /// input row.
    pub fn reinforce(&mut self, alpha: f64, rewards: &[f64]) -> Result<Vec<f64>> {
        if !alpha.is_finite() {
            return Err(Error::invalid(format!("alpha must be finite; got {alpha}")));
        }
        if rewards.len() != self.input_size.batch() {
            return Err(Error::ShapeMismatch {
                expected: (self.input_size.batch(), 1),
                actual: (rewards.len(), 1),
            });
        }

        let e = self.characteristic_eligibility();
        let mut delta = vec![0.0; self.weights.len()];
        for (row, &r) in e.rows().zip(rewards) {
            for (d, &ei) in delta.iter_mut().zip(row) {
                *d += alpha * r * ei;
            }
        }
        for (w, d) in self.weights.iter_mut().zip(&delta) {
            *w += d;
        }
        Ok(delta)
    }

    /// Clear the stored `x / s / p / y` for a fresh episode. Weights are kept.
    pub fn reset(&mut self) {
        self.input = Inputs::zeros(self.input_size);
        self.linear_output.fill(0.0);
        self.p.fill(0.0);
        self.y.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn scalar_input_size_is_batch_of_one() {
        let unit = StochasticUnit::new(UnitConfig::vector(20).unwrap(), &mut rng(0)).unwrap();
        assert_eq!(unit.weights().len(), 20);
        assert_eq!(unit.input_size().dims(), (1, 20));
    }

    #[test]
    fn batched_input_size_keeps_weight_length() {
        let unit = StochasticUnit::new(UnitConfig::batched(10, 20).unwrap(), &mut rng(0)).unwrap();
        assert_eq!(unit.weights().len(), 20);
        assert_eq!(unit.input_size().dims(), (10, 20));
    }

    #[test]
    fn oversized_input_size_is_an_invalid_argument() {
        assert!(matches!(
            UnitConfig::batched(1 << (usize::BITS - 1), 2),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn weights_lie_within_bounds() {
        let cfg = UnitConfig {
            input_size: InputSize::vector(500).unwrap(),
            weights_low: -0.2,
            weights_high: 0.7,
        };
        let unit = StochasticUnit::new(cfg, &mut rng(11)).unwrap();
        assert!(unit.weights().iter().all(|w| (-0.2..=0.7).contains(w)));
    }

    #[test]
    fn bad_weight_bounds_are_rejected() {
        let mut cfg = UnitConfig::vector(3).unwrap();
        cfg.weights_low = 1.0;
        cfg.weights_high = 0.0;
        assert!(matches!(
            StochasticUnit::new(cfg, &mut rng(0)),
            Err(Error::InvalidArgument(_))
        ));
        cfg.weights_low = f64::NEG_INFINITY;
        assert!(matches!(
            StochasticUnit::new(cfg, &mut rng(0)),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn forward_returns_one_output_per_row() {
        let mut r = rng(5);
        let mut unit = StochasticUnit::new(UnitConfig::batched(10, 20).unwrap(), &mut r).unwrap();
        let y = unit.forward(None, &mut r).unwrap().to_vec();
        assert_eq!(y.len(), 10);
        assert!(y.iter().all(|&v| v == 0.0 || v == 1.0));
        assert_eq!(unit.p().len(), 10);
        for (s, p) in unit.linear_output().iter().zip(unit.p()) {
            assert!((crate::family::logistic(*s) - p).abs() < 1e-15);
        }
    }

    #[test]
    fn forward_rejects_wrong_shape() {
        let mut r = rng(0);
        let mut unit = StochasticUnit::new(UnitConfig::vector(4).unwrap(), &mut r).unwrap();
        let x = Inputs::ones(InputSize::new(2, 4).unwrap());
        assert_eq!(
            unit.forward(Some(&x), &mut r).unwrap_err(),
            Error::ShapeMismatch {
                expected: (1, 4),
                actual: (2, 4)
            }
        );
    }

    #[test]
    fn default_input_matches_explicit_ones() {
        let cfg = UnitConfig::batched(8, 3).unwrap();
        let mut a = StochasticUnit::new(cfg, &mut rng(1)).unwrap();
        let mut b = a.clone();
        let ones = Inputs::ones(cfg.input_size);

        let mut ra = rng(99);
        let mut rb = rng(99);
        for _ in 0..50 {
            let ya = a.forward(None, &mut ra).unwrap().to_vec();
            let yb = b.forward(Some(&ones), &mut rb).unwrap().to_vec();
            assert_eq!(ya, yb);
        }
    }

    #[test]
    fn eligibility_is_zero_after_reset() {
        let mut r = rng(2);
        let mut unit = StochasticUnit::new(UnitConfig::batched(3, 4).unwrap(), &mut r).unwrap();
        assert!(unit.characteristic_eligibility().is_zero());
        unit.forward(None, &mut r).unwrap();
        unit.reset();
        let e = unit.characteristic_eligibility();
        assert_eq!(e.shape().dims(), (3, 4));
        assert!(e.is_zero());
        assert!(unit.p().iter().all(|&p| p == 0.0));
        assert!(unit.y().iter().all(|&y| y == 0.0));
    }

    #[test]
    fn eligibility_is_residual_times_input() {
        let mut r = rng(4);
        let shape = InputSize::new(2, 2).unwrap();
        let mut unit = StochasticUnit::from_weights(shape, vec![0.0, 0.0], BernoulliLogistic).unwrap();
        let x = Inputs::from_rows(&[[1.0, -2.0], [0.5, 3.0]]).unwrap();
        unit.forward(Some(&x), &mut r).unwrap();
        let e = unit.characteristic_eligibility();
        for i in 0..2 {
            let g = unit.y()[i] - 0.5;
            let xr = x.row(i).unwrap();
            assert_eq!(e.row(i).unwrap(), &[g * xr[0], g * xr[1]]);
        }
    }

    #[test]
    fn reinforce_moves_weights_toward_rewarded_output() {
        let mut r = rng(8);
        let shape = InputSize::vector(3).unwrap();
        let mut unit = StochasticUnit::from_weights(shape, vec![0.0; 3], BernoulliLogistic).unwrap();
        let y = unit.forward(None, &mut r).unwrap()[0];
        let delta = unit.reinforce(0.1, &[1.0]).unwrap();
        // p = 0.5, so each weight moves by 0.1 * (y - 0.5).
        for (w, d) in unit.weights().iter().zip(&delta) {
            assert!((w - 0.1 * (y - 0.5)).abs() < 1e-15);
            assert_eq!(w, d);
        }
    }

    #[test]
    fn reinforce_with_zero_reward_leaves_weights() {
        let mut r = rng(8);
        let mut unit = StochasticUnit::new(UnitConfig::batched(4, 2).unwrap(), &mut r).unwrap();
        let before = unit.weights().to_vec();
        unit.forward(None, &mut r).unwrap();
        unit.reinforce(0.5, &[0.0; 4]).unwrap();
        assert_eq!(unit.weights(), &before[..]);
    }

    #[test]
    fn reinforce_checks_reward_batch() {
        let mut r = rng(0);
        let mut unit = StochasticUnit::new(UnitConfig::batched(4, 2).unwrap(), &mut r).unwrap();
        unit.forward(None, &mut r).unwrap();
        assert!(matches!(
            unit.reinforce(0.1, &[1.0, 0.0]),
            Err(Error::ShapeMismatch { .. })
        ));
        assert!(matches!(
            unit.reinforce(f64::NAN, &[1.0; 4]),
            Err(Error::InvalidArgument(_))
        ));
    }
}
