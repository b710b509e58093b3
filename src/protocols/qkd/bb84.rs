use super::eavesdropper::{Eavesdropper, ResendStrategy};
use super::link::Transit;
use crate::config::ProtocolConfig;
use crate::core::errors::{ConfigError, ProtocolError};
use crate::{Basis, QuantumChannel, errors::StateError};
use rand::Rng;
use serde::Serialize;

/// Everything observed in one BB84 run.
///
/// All vectors have one entry per transmitted qubit; index `i` refers to the
/// same qubit in every one of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRecord {
    pub alice_bits: Vec<bool>,
    pub alice_bases: Vec<Basis>,
    pub bob_bases: Vec<Basis>,
    pub bob_results: Vec<bool>,
    /// Eve's basis where she intercepted.
    pub eve_bases: Vec<Option<Basis>>,
    /// Eve's measured bit where she intercepted.
    pub eve_results: Vec<Option<bool>>,
    pub eve_attacks: Vec<bool>,
    pub noise_flips: Vec<bool>,
}

impl RunRecord {
    fn with_capacity(n: usize) -> Self {
        Self {
            alice_bits: Vec::with_capacity(n),
            alice_bases: Vec::with_capacity(n),
            bob_bases: Vec::with_capacity(n),
            bob_results: Vec::with_capacity(n),
            eve_bases: Vec::with_capacity(n),
            eve_results: Vec::with_capacity(n),
            eve_attacks: Vec::with_capacity(n),
            noise_flips: Vec::with_capacity(n),
        }
    }

    pub fn qubit_count(&self) -> usize {
        self.alice_bits.len()
    }

    /// Indices Eve intercepted.
    pub fn attacked_indices(&self) -> Vec<usize> {
        self.eve_attacks
            .iter()
            .enumerate()
            .filter_map(|(i, &hit)| hit.then_some(i))
            .collect()
    }

    /// Keeps the positions where Alice and Bob chose the same basis.
    pub fn sift(&self) -> SiftedKeyPair {
        let mut pair = SiftedKeyPair::default();

        for i in 0..self.qubit_count() {
            if self.alice_bases[i] == self.bob_bases[i] {
                pair.indices.push(i);
                pair.alice.push(self.alice_bits[i]);
                pair.bob.push(self.bob_results[i]);
            }
        }

        pair
    }
}

/// Alice's and Bob's bits at the positions that survived sifting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SiftedKeyPair {
    /// Positions in the run that were kept.
    pub indices: Vec<usize>,
    pub alice: Vec<bool>,
    pub bob: Vec<bool>,
}

impl SiftedKeyPair {
    pub fn len(&self) -> usize {
        self.alice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alice.is_empty()
    }

    /// Positions within the sifted key where Alice and Bob disagree.
    pub fn mismatch_positions(&self) -> Vec<usize> {
        self.alice
            .iter()
            .zip(&self.bob)
            .enumerate()
            .filter_map(|(i, (a, b))| (a != b).then_some(i))
            .collect()
    }

    pub fn errors(&self) -> usize {
        self.alice.iter().zip(&self.bob).filter(|(a, b)| a != b).count()
    }

    /// Quantum bit error rate; 0 for an empty key.
    pub fn qber(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.errors() as f64 / self.len() as f64
        }
    }

    pub fn verdict(&self, threshold: f64) -> DetectionVerdict {
        DetectionVerdict::new(self.qber(), threshold)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DetectionVerdict {
    pub qber: f64,
    pub threshold: f64,
    pub eavesdropper_detected: bool,
}

impl DetectionVerdict {
    /// Flags eavesdropping when `qber` is strictly above `threshold`.
    pub fn new(qber: f64, threshold: f64) -> Self {
        Self {
            qber,
            threshold,
            eavesdropper_detected: qber > threshold,
        }
    }
}

/// Runs BB84 once with the default resend strategy.
///
/// # Arguments
///
/// * `qubit_count` - Number of qubits Alice sends.
/// * `eve_present` - Whether an eavesdropper sits on the channel.
/// * `intercept_probability` - Per-qubit chance Eve intercepts.
/// * `noise_probability` - Per-qubit chance the channel flips the bit.
/// * `rng` - Source of every random choice in the run.
///
/// # Errors
///
/// `ProtocolError::Config` when a probability lies outside [0, 1].
pub fn run_protocol<R: Rng + ?Sized>(
    qubit_count: usize,
    eve_present: bool,
    intercept_probability: f64,
    noise_probability: f64,
    rng: &mut R,
) -> Result<RunRecord, ProtocolError> {
    let config = ProtocolConfig {
        qubit_count,
        eve_present,
        intercept_probability,
        noise_probability,
        ..ProtocolConfig::default()
    };
    run_configured(&config, rng)
}

/// Runs BB84 once as described by `config`.
pub fn run_configured<R: Rng + ?Sized>(
    config: &ProtocolConfig,
    rng: &mut R,
) -> Result<RunRecord, ProtocolError> {
    let link = Link::from_config(config)?;
    Ok(link.run(config.qubit_count, rng)?)
}

/// Validated channel between Alice and Bob, reused across attempts.
#[derive(Debug, Clone)]
pub(crate) struct Link {
    eve: Option<Eavesdropper>,
    noise: QuantumChannel,
}

impl Link {
    pub(crate) fn from_config(config: &ProtocolConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let eve = if config.eve_present {
            Some(eavesdropper(config.intercept_probability, config.resend)?)
        } else {
            None
        };
        let noise = QuantumChannel::bit_flip(config.noise_probability).map_err(|_| {
            ConfigError::InvalidProbability {
                name: "noise probability",
                value: config.noise_probability,
            }
        })?;

        Ok(Self { eve, noise })
    }

    pub(crate) fn run<R: Rng + ?Sized>(
        &self,
        qubit_count: usize,
        rng: &mut R,
    ) -> Result<RunRecord, StateError> {
        let mut record = RunRecord::with_capacity(qubit_count);

        for _ in 0..qubit_count {
            // Alice prepares qubits
            let a_bit = rng.random_bool(0.5);
            let a_basis = Basis::random(rng);

            let delivered = Transit::prepare(a_bit, a_basis)?
                .pass_eavesdropper(self.eve.as_ref(), rng)?
                .pass_noise(&self.noise, rng)?;

            // Bob measures
            let b_basis = Basis::random(rng);
            let (b_val, report) = delivered.measure(b_basis, rng)?;

            record.alice_bits.push(a_bit);
            record.alice_bases.push(a_basis);
            record.bob_bases.push(b_basis);
            record.bob_results.push(b_val);
            record.eve_bases.push(report.interception.map(|hit| hit.basis));
            record.eve_results.push(report.interception.map(|hit| hit.measured));
            record.eve_attacks.push(report.interception.is_some());
            record.noise_flips.push(report.noise_flipped);
        }

        log::debug!(
            "bb84 run: {} qubits, {} intercepted, {} noise flips",
            qubit_count,
            record.eve_attacks.iter().filter(|&&hit| hit).count(),
            record.noise_flips.iter().filter(|&&flip| flip).count()
        );

        Ok(record)
    }
}

fn eavesdropper(p: f64, resend: ResendStrategy) -> Result<Eavesdropper, ConfigError> {
    Eavesdropper::new(p, resend).map_err(|_| ConfigError::InvalidProbability {
        name: "intercept probability",
        value: p,
    })
}
