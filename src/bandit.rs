//! Multi-armed Bernoulli bandit.
//!
//! Each arm pays a reward of `1` with its own fixed probability and `0`
//! otherwise. The bandit is immutable after construction; `pull` is a pure
//! sampling function keyed by arm index.

use rand::Rng;

use crate::error::{Error, Result};
use crate::sampling::bernoulli_batch;

/// Bernoulli bandit with fixed per-arm reward probabilities.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiArmBandit {
    probabilities: Vec<f64>,
}

impl MultiArmBandit {
    /// Create a bandit; every probability must be finite and in `[0, 1]`.
    pub fn new(probabilities: Vec<f64>) -> Result<Self> {
        if probabilities.is_empty() {
            return Err(Error::invalid("bandit needs at least one arm"));
        }
        if let Some((i, p)) = probabilities
            .iter()
            .enumerate()
            .find(|(_, p)| !(p.is_finite() && (0.0..=1.0).contains(*p)))
        {
            return Err(Error::invalid(format!(
                "arm probabilities must be between 0 and 1; arm {i} has {p}"
            )));
        }
        Ok(Self { probabilities })
    }

    pub fn num_arms(&self) -> usize {
        self.probabilities.len()
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Index of the arm with the highest reward probability (lowest index on ties).
    pub fn best_arm(&self) -> usize {
        let mut best = 0;
        for (i, &p) in self.probabilities.iter().enumerate() {
            if p > self.probabilities[best] {
                best = i;
            }
        }
        best
    }

    pub fn best_probability(&self) -> f64 {
        self.probabilities[self.best_arm()]
    }

    /// Pull each arm in `arms` once; returns one `0.0` / `1.0` reward per index.
    pub fn pull<R: Rng + ?Sized>(&self, arms: &[usize], rng: &mut R) -> Result<Vec<f64>> {
        let ps = arms
            .iter()
            .map(|&arm| {
                self.probabilities.get(arm).copied().ok_or(Error::ArmOutOfRange {
                    arm,
                    num_arms: self.num_arms(),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        Ok(bernoulli_batch(&ps, rng))
    }
}
