//! Model tiers and their flat per-token rates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which hosted model a completion is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    /// Higher quality, higher cost.
    #[default]
    High,
    Standard,
}

impl ModelTier {
    pub fn model(&self) -> &'static str {
        match self {
            ModelTier::High => "gpt-4",
            ModelTier::Standard => "gpt-3.5-turbo",
        }
    }

    /// USD per 1,000 tokens, prompt and response alike.
    pub fn rate_per_1k(&self) -> f64 {
        match self {
            ModelTier::High => 0.06,
            ModelTier::Standard => 0.002,
        }
    }

    /// cost = (total_tokens / 1000) × rate
    pub fn cost_usd(&self, total_tokens: usize) -> f64 {
        (total_tokens as f64 / 1000.0) * self.rate_per_1k()
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelTier::High => f.write_str("high"),
            ModelTier::Standard => f.write_str("standard"),
        }
    }
}

impl FromStr for ModelTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" | "gpt-4" => Ok(ModelTier::High),
            "standard" | "gpt-3.5-turbo" => Ok(ModelTier::Standard),
            other => Err(format!(
                "unknown model tier '{other}' (expected 'high' or 'standard')"
            )),
        }
    }
}
