//! Key exchange with retries.
//!
//! A key exchange repeats full BB84 runs until one passes eavesdropper
//! detection or the attempt budget is spent. Attempts run strictly one after
//! another and each draws all of its randomness afresh.

use super::bb84::{Link, RunRecord};
use crate::config::ProtocolConfig;
use crate::core::errors::ProtocolError;
use crate::key::AcceptedKey;
use rand::Rng;
use serde::Serialize;

/// Summary of one attempt, enough to plot errors and interference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptLog {
    /// 1-based attempt number.
    pub attempt: usize,
    pub qubit_count: usize,
    pub sifted_length: usize,
    pub errors: usize,
    pub qber: f64,
    pub eve_detected: bool,
    /// Positions within the sifted key where Alice and Bob disagree.
    pub mismatch_positions: Vec<usize>,
    /// Qubit indices Eve intercepted.
    pub attacked_indices: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    Established(AcceptedKey),
    /// Every attempt was flagged as eavesdropped.
    NoKeyEstablished,
}

impl KeyOutcome {
    pub fn key(&self) -> Option<&AcceptedKey> {
        match self {
            KeyOutcome::Established(key) => Some(key),
            KeyOutcome::NoKeyEstablished => None,
        }
    }

    pub fn into_key(self) -> Option<AcceptedKey> {
        match self {
            KeyOutcome::Established(key) => Some(key),
            KeyOutcome::NoKeyEstablished => None,
        }
    }

    pub fn is_established(&self) -> bool {
        matches!(self, KeyOutcome::Established(_))
    }
}

/// Result of a key exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyExchange {
    pub outcome: KeyOutcome,
    /// One entry per attempt made, in order.
    pub attempts: Vec<AttemptLog>,
    /// The record of the final attempt, if any attempt ran.
    pub last_run: Option<RunRecord>,
}

impl KeyExchange {
    pub fn attempt_count(&self) -> usize {
        self.attempts.len()
    }

    /// Mismatch positions from every attempt, concatenated.
    pub fn mismatch_histogram_input(&self) -> Vec<usize> {
        self.attempts
            .iter()
            .flat_map(|log| log.mismatch_positions.iter().copied())
            .collect()
    }
}

/// Runs BB84 until a run is not flagged, up to `max_attempts` runs.
///
/// Noise and threshold take their defaults.
pub fn run_with_retry<R: Rng + ?Sized>(
    qubit_count: usize,
    eve_present: bool,
    intercept_probability: f64,
    max_attempts: usize,
    rng: &mut R,
) -> Result<KeyExchange, ProtocolError> {
    let config = ProtocolConfig {
        qubit_count,
        eve_present,
        intercept_probability,
        max_attempts,
        ..ProtocolConfig::default()
    };
    exchange_key(&config, rng)
}

/// Runs the retry loop described by `config`.
///
/// Exhausting the attempts is reported as [`KeyOutcome::NoKeyEstablished`];
/// only invalid configuration and internal state errors are `Err`.
pub fn exchange_key<R: Rng + ?Sized>(
    config: &ProtocolConfig,
    rng: &mut R,
) -> Result<KeyExchange, ProtocolError> {
    let link = Link::from_config(config)?;
    let mut attempts = Vec::with_capacity(config.max_attempts.min(64));
    let mut last_run = None;

    for attempt in 1..=config.max_attempts {
        let record = link.run(config.qubit_count, rng)?;
        let sifted = record.sift();
        let verdict = sifted.verdict(config.qber_threshold);

        log::debug!(
            "attempt {}: sifted {} of {}, QBER {:.4}",
            attempt,
            sifted.len(),
            config.qubit_count,
            verdict.qber
        );

        attempts.push(AttemptLog {
            attempt,
            qubit_count: record.qubit_count(),
            sifted_length: sifted.len(),
            errors: sifted.errors(),
            qber: verdict.qber,
            eve_detected: verdict.eavesdropper_detected,
            mismatch_positions: sifted.mismatch_positions(),
            attacked_indices: record.attacked_indices(),
        });
        last_run = Some(record);

        if !verdict.eavesdropper_detected {
            log::info!(
                "key established after {} attempt(s): {} bits, QBER {:.4}",
                attempt,
                sifted.len(),
                verdict.qber
            );
            return Ok(KeyExchange {
                outcome: KeyOutcome::Established(AcceptedKey::new(sifted.alice)),
                attempts,
                last_run,
            });
        }

        log::warn!(
            "attempt {}: QBER {:.4} exceeds {:.4}, eavesdropper detected",
            attempt,
            verdict.qber,
            config.qber_threshold
        );
    }

    log::warn!(
        "no key established after {} attempt(s)",
        config.max_attempts
    );
    Ok(KeyExchange {
        outcome: KeyOutcome::NoKeyEstablished,
        attempts,
        last_run,
    })
}
