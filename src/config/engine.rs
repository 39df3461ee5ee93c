//! Orchestration tuning parameters
//!
//! The weighting base and the retrieval threshold are free parameters tuned
//! per deployment, so they live in configuration rather than in code.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Numeric tuning for the orchestration engine
#[derive(Debug, Clone, Deserialize)]
pub struct EngineTuning {
    /// Exponential base for temporal turn weighting (must exceed 1)
    #[serde(default = "default_weight_base")]
    pub weight_base: f64,

    /// Similarity threshold above which direct retrieval answers the turn
    #[serde(default = "default_gate_threshold")]
    pub gate_threshold: f64,

    /// How many closest claims the retrieval gate draws from
    #[serde(default = "default_gate_top_n")]
    pub gate_top_n: usize,

    /// Size of the top-scoring pool used to break selection ties
    #[serde(default = "default_tie_break_pool")]
    pub tie_break_pool: usize,

    /// Pacing delay in seconds before processing a non-opening turn
    #[serde(default)]
    pub reply_delay_secs: u64,
}

impl EngineTuning {
    /// Get the pacing delay as a Duration, if configured
    pub fn reply_delay(&self) -> Option<Duration> {
        (self.reply_delay_secs > 0).then(|| Duration::from_secs(self.reply_delay_secs))
    }

    /// Validate tuning parameters
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.weight_base <= 1.0 {
            return Err(ValidationError::InvalidWeightBase);
        }
        if self.gate_top_n == 0 {
            return Err(ValidationError::InvalidGateTopN);
        }
        if self.tie_break_pool < 2 {
            return Err(ValidationError::InvalidTieBreakPool);
        }
        Ok(())
    }
}

impl Default for EngineTuning {
    fn default() -> Self {
        Self {
            weight_base: default_weight_base(),
            gate_threshold: default_gate_threshold(),
            gate_top_n: default_gate_top_n(),
            tie_break_pool: default_tie_break_pool(),
            reply_delay_secs: 0,
        }
    }
}

fn default_weight_base() -> f64 {
    4.0
}

fn default_gate_threshold() -> f64 {
    7.0
}

fn default_gate_top_n() -> usize {
    3
}

fn default_tie_break_pool() -> usize {
    3
}
