//! `williams`: stochastic semilinear units trained with REINFORCE.
//!
//! A small implementation of the setting in Williams (1992), *Simple
//! statistical gradient-following algorithms for connectionist reinforcement
//! learning*: a single stochastic unit acts against a multi-armed Bernoulli
//! bandit, and its weights follow the reward-weighted characteristic
//! eligibility.
//!
//! - [`StochasticUnit`]: `s = dot(x, w)`, `p = squash(s)`, `y ~ sample(p)`.
//!   The squash/sample pair is a [`UnitFamily`]; [`BernoulliLogistic`] is the
//!   family used by default.
//! - [`MultiArmBandit`]: fixed per-arm reward probabilities, binary rewards.
//! - [`Trainer`]: epochs of forward / pull / `w += alpha * r * e`, with
//!   per-epoch statistics collected in a [`TrainingSummary`].
//!
//! **Goals:**
//! - **Deterministic by default**: all randomness comes from an injected or
//!   seeded RNG; same seed, same run.
//! - **Small**: one unit, one bandit, one loop.
//!
//! **Non-goals:**
//! - No CLI, no progress display, no epsilon-greedy wrappers.
//! - No multi-layer networks or non-binary rewards.
//!
//! # Example
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use williams::{MultiArmBandit, StochasticUnit, Trainer, TrainerConfig, UnitConfig};
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! let unit = StochasticUnit::new(UnitConfig::vector(4)?, &mut rng)?;
//! let bandit = MultiArmBandit::new(vec![0.1, 0.9])?;
//! let cfg = TrainerConfig { alpha: 0.1, trials: 20, ..TrainerConfig::default() };
//!
//! let mut trainer = Trainer::new(unit, bandit, cfg)?;
//! let summary = trainer.train(5)?;
//! assert_eq!(summary.len(), 5);
//! # Ok::<(), williams::Error>(())
//! ```
//!
//! # Logging
//!
//! The crate emits [`tracing`] events (`info` per run, `debug` per epoch,
//! `trace` per forward pass) and never installs a subscriber.

#![forbid(unsafe_code)]

mod error;
pub use error::{Error, Result};

mod shape;
pub use shape::{InputSize, Inputs};

mod sampling;
pub use sampling::{bernoulli, bernoulli_batch};

mod family;
pub use family::{logistic, BernoulliLogistic, UnitFamily};

mod unit;
pub use unit::{StochasticUnit, UnitConfig};

mod bandit;
pub use bandit::MultiArmBandit;

mod trainer;
pub use trainer::{EpochStats, Metric, Trainer, TrainerConfig, TrainingSummary};
