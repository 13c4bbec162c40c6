//! REINFORCE training loop: one stochastic unit against a Bernoulli bandit.
//!
//! Each epoch runs `trials` trials. A trial forwards the unit on its default
//! all-ones input, reads every output as an arm index, pulls those arms, and
//! applies `w += alpha * r * e` using the characteristic eligibility `e`.
//! Per-epoch statistics are collected into a [`TrainingSummary`].
//!
//! The loop is strictly sequential and never retries: the first error ends
//! the run and is returned to the caller.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::bandit::MultiArmBandit;
use crate::error::{Error, Result};
use crate::family::{BernoulliLogistic, UnitFamily};
use crate::unit::StochasticUnit;

/// Configuration for [`Trainer`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrainerConfig {
    /// Learning rate.
    pub alpha: f64,
    /// Epochs run by [`Trainer::run`].
    pub epochs: usize,
    /// Forward/pull/update trials per epoch (must be >= 1).
    pub trials: usize,
    /// Seed for the trainer's RNG (unit sampling and bandit rewards).
    pub seed: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            alpha: 0.01,
            epochs: 100,
            trials: 100,
            seed: 0,
        }
    }
}

impl TrainerConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.alpha.is_finite() {
            return Err(Error::invalid(format!(
                "alpha must be finite; got {}",
                self.alpha
            )));
        }
        if self.trials == 0 {
            return Err(Error::invalid("trials per epoch must be >= 1"));
        }
        Ok(())
    }
}

/// Statistics recorded at the end of one epoch.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpochStats {
    /// Zero-based epoch index, counted across `train` calls.
    pub epoch: usize,
    /// Mean reward over every pull in the epoch.
    pub mean_reward: f64,
    /// Fraction of pulls that went to each arm (sums to 1).
    pub arm_frequency: Vec<f64>,
    /// Mean distribution parameter `p` over every forward in the epoch.
    pub mean_p: f64,
    /// Best arm probability minus `mean_reward`.
    pub gap_to_best: f64,
    /// `sum |w - w0|` where `w0` are the weights when the trainer was built.
    pub weight_drift: f64,
}

/// Scalar per-epoch metrics of a [`TrainingSummary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Metric {
    MeanReward,
    MeanP,
    GapToBest,
    WeightDrift,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::MeanReward,
        Metric::MeanP,
        Metric::GapToBest,
        Metric::WeightDrift,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::MeanReward => "mean_reward",
            Metric::MeanP => "mean_p",
            Metric::GapToBest => "gap_to_best",
            Metric::WeightDrift => "weight_drift",
        }
    }

    fn of(self, s: &EpochStats) -> f64 {
        match self {
            Metric::MeanReward => s.mean_reward,
            Metric::MeanP => s.mean_p,
            Metric::GapToBest => s.gap_to_best,
            Metric::WeightDrift => s.weight_drift,
        }
    }
}

/// Ordered per-epoch results of a training run.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrainingSummary {
    pub epochs: Vec<EpochStats>,
}

impl TrainingSummary {
    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    pub fn last(&self) -> Option<&EpochStats> {
        self.epochs.last()
    }

    /// One value of `metric` per epoch, in epoch order.
    pub fn series(&self, metric: Metric) -> Vec<f64> {
        self.epochs.iter().map(|s| metric.of(s)).collect()
    }

    /// Selection frequency of `arm` per epoch (0 for arms the bandit lacks).
    pub fn arm_frequency_series(&self, arm: usize) -> Vec<f64> {
        self.epochs
            .iter()
            .map(|s| s.arm_frequency.get(arm).copied().unwrap_or(0.0))
            .collect()
    }

    /// Metric name -> per-epoch values.
    ///
    /// Arm frequencies appear as `arm_frequency[k]`.
    pub fn to_map(&self) -> BTreeMap<String, Vec<f64>> {
        let mut out = BTreeMap::new();
        for m in Metric::ALL {
            out.insert(m.name().to_string(), self.series(m));
        }
        let arms = self
            .epochs
            .iter()
            .map(|s| s.arm_frequency.len())
            .max()
            .unwrap_or(0);
        for k in 0..arms {
            out.insert(format!("arm_frequency[{k}]"), self.arm_frequency_series(k));
        }
        out
    }
}

/// Drives a [`StochasticUnit`] against a [`MultiArmBandit`].
#[derive(Debug, Clone)]
pub struct Trainer<F = BernoulliLogistic> {
    unit: StochasticUnit<F>,
    bandit: MultiArmBandit,
    cfg: TrainerConfig,
    rng: StdRng,
    initial_weights: Vec<f64>,
    epochs_run: usize,
}

impl<F: UnitFamily> Trainer<F> {
    pub fn new(unit: StochasticUnit<F>, bandit: MultiArmBandit, cfg: TrainerConfig) -> Result<Self> {
        cfg.validate()?;
        let initial_weights = unit.weights().to_vec();
        Ok(Self {
            unit,
            bandit,
            rng: StdRng::seed_from_u64(cfg.seed),
            cfg,
            initial_weights,
            epochs_run: 0,
        })
    }

    pub fn unit(&self) -> &StochasticUnit<F> {
        &self.unit
    }

    pub fn bandit(&self) -> &MultiArmBandit {
        &self.bandit
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.cfg
    }

    /// Epochs completed across all `train` calls.
    pub fn epochs_run(&self) -> usize {
        self.epochs_run
    }

    /// Consume the trainer and return the trained unit.
    pub fn into_unit(self) -> StochasticUnit<F> {
        self.unit
    }

    /// Train for the configured number of epochs.
    pub fn run(&mut self) -> Result<TrainingSummary> {
        self.train(self.cfg.epochs)
    }

    /// Train for `epochs` epochs and return their statistics.
    pub fn train(&mut self, epochs: usize) -> Result<TrainingSummary> {
        info!(
            epochs,
            trials = self.cfg.trials,
            alpha = self.cfg.alpha,
            arms = self.bandit.num_arms(),
            "training started"
        );
        let mut summary = TrainingSummary {
            epochs: Vec::with_capacity(epochs),
        };
        for _ in 0..epochs {
            let stats = self.run_epoch()?;
            debug!(
                epoch = stats.epoch,
                gap_to_best = stats.gap_to_best,
                mean_p = stats.mean_p,
                weight_drift = stats.weight_drift,
                arm_frequency = ?stats.arm_frequency,
                mean_reward = stats.mean_reward,
                "epoch finished"
            );
            summary.epochs.push(stats);
        }
        if let Some(last) = summary.last() {
            info!(
                epochs = summary.len(),
                mean_reward = last.mean_reward,
                weight_drift = last.weight_drift,
                "training finished"
            );
        }
        Ok(summary)
    }

    fn run_epoch(&mut self) -> Result<EpochStats> {
        self.unit.reset();

        let num_arms = self.bandit.num_arms();
        let mut counts = vec![0u64; num_arms];
        let mut reward_sum = 0.0;
        let mut p_sum = 0.0;
        let mut pulls = 0u64;

        for _ in 0..self.cfg.trials {
            let arms: Vec<usize> = self
                .unit
                .forward(None, &mut self.rng)?
                .iter()
                .map(|&y| output_to_arm(y))
                .collect::<Result<_>>()?;
            let rewards = self.bandit.pull(&arms, &mut self.rng)?;
            self.unit.reinforce(self.cfg.alpha, &rewards)?;

            for &a in &arms {
                counts[a] += 1;
            }
            reward_sum += rewards.iter().sum::<f64>();
            p_sum += self.unit.p().iter().sum::<f64>();
            pulls += arms.len() as u64;
        }

        let n = pulls.max(1) as f64;
        let mean_reward = reward_sum / n;
        let stats = EpochStats {
            epoch: self.epochs_run,
            mean_reward,
            arm_frequency: counts.iter().map(|&c| c as f64 / n).collect(),
            mean_p: p_sum / n,
            gap_to_best: self.bandit.best_probability() - mean_reward,
            weight_drift: self.weight_drift(),
        };
        self.epochs_run += 1;
        Ok(stats)
    }

    /// `sum |w - w0|` relative to the weights at construction.
    pub fn weight_drift(&self) -> f64 {
        self.unit
            .weights()
            .iter()
            .zip(&self.initial_weights)
            .map(|(w, w0)| (w - w0).abs())
            .sum()
    }
}

/// Unit outputs index arms directly; they must be non-negative integers.
fn output_to_arm(y: f64) -> Result<usize> {
    if !y.is_finite() || y < 0.0 || y.fract() != 0.0 {
        return Err(Error::invalid(format!(
            "unit output {y} is not an arm index"
        )));
    }
    Ok(y as usize)
}
