//! Protocol configuration.
//!
//! Every field has a default, so a JSON document only needs to name the
//! values it overrides.

use crate::core::errors::ConfigError;
use crate::protocols::qkd::eavesdropper::ResendStrategy;
use serde::{Deserialize, Serialize};

/// QBER above which a run is treated as eavesdropped.
pub const DEFAULT_QBER_THRESHOLD: f64 = 0.11;
/// Per-qubit bit-flip probability of the channel.
pub const DEFAULT_NOISE_PROBABILITY: f64 = 0.05;
/// Per-qubit probability that Eve intercepts, when present.
pub const DEFAULT_INTERCEPT_PROBABILITY: f64 = 1.0;
/// Upper bound on protocol runs in one key exchange.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;
pub const DEFAULT_QUBIT_COUNT: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    pub qubit_count: usize,
    pub eve_present: bool,
    pub intercept_probability: f64,
    pub noise_probability: f64,
    pub qber_threshold: f64,
    pub max_attempts: usize,
    pub resend: ResendStrategy,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            qubit_count: DEFAULT_QUBIT_COUNT,
            eve_present: true,
            intercept_probability: DEFAULT_INTERCEPT_PROBABILITY,
            noise_probability: DEFAULT_NOISE_PROBABILITY,
            qber_threshold: DEFAULT_QBER_THRESHOLD,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            resend: ResendStrategy::default(),
        }
    }
}

impl ProtocolConfig {
    /// Parses a JSON document; absent fields take their defaults.
    ///
    /// The result is validated before it is returned.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects probabilities and thresholds outside [0, 1], NaN included.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("intercept probability", self.intercept_probability)?;
        check_probability("noise probability", self.noise_probability)?;
        if !(0.0..=1.0).contains(&self.qber_threshold) {
            return Err(ConfigError::InvalidThreshold(self.qber_threshold));
        }
        Ok(())
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::InvalidProbability { name, value });
    }
    Ok(())
}
