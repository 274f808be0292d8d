//! MCTS Hyperparameters Configuration
//!
//! This module defines all tunable parameters of the tree search. Values are
//! parsed by the caller (see `agent::config`) or loaded from a JSON tuning
//! file; the engine only ever sees the typed structure.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// MCTS hyperparameters configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MCTSHyperparameters {
    // ========== Selection ==========
    /// Exploration constant `c` in `sqrt(c · ln(N_parent + 1) / (N_child + 1))`
    /// Default: 2.0
    pub exploration_constant: f64,

    // ========== RAVE (Rapid Action Value Estimation) ==========
    /// Blend RAVE statistics into the exploitation term
    /// Default: true
    pub rave_enabled: bool,

    /// Bias constant `b` in
    /// `β = n_rave / (n + n_rave + 4·n·n_rave·b²)`
    /// Default: 0.025
    pub rave_bias: f64,

    /// RAVE visit count every new node starts with
    /// Default: 40
    pub rave_prior_visits: u32,

    /// RAVE reward total every new node starts with
    /// Default: 32.0
    pub rave_prior_reward: f64,

    // ========== Budget ==========
    /// Iteration cap per decision
    /// Default: 100
    pub max_iterations: usize,

    /// Wall-clock budget per decision, in seconds
    /// Default: 40.0
    pub max_seconds: f64,

    // ========== Parallelism ==========
    /// Number of independent trees (one worker thread each)
    /// Default: 1
    pub workers: usize,

    /// Base seed; tree `i` uses `seed + i`. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for MCTSHyperparameters {
    fn default() -> Self {
        Self {
            exploration_constant: 2.0,

            rave_enabled: true,
            rave_bias: 0.025,
            rave_prior_visits: 40,
            rave_prior_reward: 32.0,

            max_iterations: 100,
            max_seconds: 40.0,

            workers: 1,
            seed: None,
        }
    }
}

impl MCTSHyperparameters {
    /// Seed for the `index`-th tree, if seeding is deterministic.
    pub fn seed_for(&self, index: usize) -> Option<u64> {
        self.seed.map(|s| s.wrapping_add(index as u64))
    }

    /// Rejects values the search cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "exploration constant must be finite and >= 0, got {}",
                self.exploration_constant
            )));
        }
        if !self.rave_bias.is_finite() || self.rave_bias < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "RAVE bias must be finite and >= 0, got {}",
                self.rave_bias
            )));
        }
        if !self.rave_prior_reward.is_finite()
            || self.rave_prior_reward < 0.0
            || self.rave_prior_reward > self.rave_prior_visits as f64
        {
            return Err(Error::InvalidConfig(format!(
                "RAVE prior reward must lie in [0, {}], got {}",
                self.rave_prior_visits, self.rave_prior_reward
            )));
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidConfig("iteration cap must be at least 1".into()));
        }
        if !self.max_seconds.is_finite() || self.max_seconds <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "time budget must be positive, got {}",
                self.max_seconds
            )));
        }
        if self.workers == 0 {
            return Err(Error::InvalidConfig("worker count must be at least 1".into()));
        }
        Ok(())
    }

    /// Create a configuration string for logging
    pub fn to_config_string(&self) -> String {
        format!(
            "c[{:.2}]_rave[{},{:.3},{:.1}/{}]_budget[{},{:.1}s]_workers[{}]",
            self.exploration_constant,
            if self.rave_enabled { "on" } else { "off" },
            self.rave_bias,
            self.rave_prior_reward,
            self.rave_prior_visits,
            self.max_iterations,
            self.max_seconds,
            self.workers
        )
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let params: MCTSHyperparameters = serde_json::from_str(&text)?;
        params.validate()?;
        Ok(params)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }
}
