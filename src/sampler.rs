use crate::{Measurement, QuantumChannel, Qubit, errors::StateError};
use rand::Rng;
use std::collections::BTreeMap;

/// A simulator for sampling prepared qubits.
///
/// The `Sampler` allows running multiple shots of a quantum measurement on a qubit,
/// optionally applying a quantum channel before measurement.
#[derive(Debug, Clone, Default)]
pub struct Sampler {
    /// Optional quantum channel to apply to the qubit before measurement.
    pub channel: Option<QuantumChannel>,
}

impl Sampler {
    /// Creates a new `Sampler` instance with no channel (noise-free).
    pub fn new() -> Self {
        Self { channel: None }
    }

    /// sets the quantum channel for the sampler.
    ///
    /// # Arguments
    ///
    /// * `channel` - The `QuantumChannel` to apply.
    pub fn with_channel(mut self, channel: QuantumChannel) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Samples a `Qubit` multiple times using a specified `Measurement`.
    ///
    /// Every shot starts from a fresh copy of `qubit`. Without a channel the
    /// outcome distribution is computed once and sampled from its CDF; with a
    /// channel each shot runs its own trajectory through the channel first.
    ///
    /// # Arguments
    ///
    /// * `qubit` - The prepared qubit.
    /// * `measurement` - The measurement to apply.
    /// * `num_shots` - The number of times to repeat the measurement.
    /// * `rng` - Randomness source for every shot.
    ///
    /// # Returns
    ///
    /// A map from outcome index to the number of shots that produced it.
    pub fn run<R: Rng + ?Sized>(
        &self,
        qubit: &Qubit,
        measurement: &Measurement,
        num_shots: usize,
        rng: &mut R,
    ) -> Result<BTreeMap<usize, usize>, StateError> {
        let mut raw_counts = vec![0usize; measurement.num_outcomes()];

        match &self.channel {
            Some(chan) => {
                for _ in 0..num_shots {
                    let mut shot = qubit.clone();
                    shot.apply_channel(chan, rng)?;
                    raw_counts[shot.measure(measurement, rng)?.index] += 1;
                }
            }
            None => {
                let probs = qubit.probabilities(measurement)?;

                // Pre-calculate Cumulative Distribution Function (CDF) once.
                let mut cdf = Vec::with_capacity(probs.len());
                let mut current_sum = 0.0;
                for &p in &probs {
                    current_sum += p;
                    cdf.push(current_sum);
                }

                for _ in 0..num_shots {
                    let r: f64 = rng.random();
                    raw_counts[outcome_from_cdf(&cdf, &probs, r)] += 1;
                }
            }
        }

        Ok(raw_counts
            .into_iter()
            .enumerate()
            .filter(|&(_, count)| count > 0)
            .collect())
    }
}

/// Index of the first non-zero outcome whose CDF entry exceeds `r`.
///
/// Floating point rounding can leave `r` above the last entry; the last
/// outcome with weight is used then.
fn outcome_from_cdf(cdf: &[f64], probs: &[f64], r: f64) -> usize {
    cdf.iter()
        .zip(probs)
        .position(|(&c, &p)| p > 0.0 && r < c)
        .or_else(|| probs.iter().rposition(|&p| p > 0.0))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Basis;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn matching_basis_yields_single_outcome() {
        let mut rng = StdRng::seed_from_u64(21);
        let qubit = Qubit::prepare(true, Basis::Diagonal).unwrap();
        let counts = Sampler::new()
            .run(&qubit, &Measurement::x_basis(), 1_000, &mut rng)
            .unwrap();

        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get(&1), Some(&1_000));
    }

    #[test]
    fn bit_flip_channel_shifts_counts() {
        let mut rng = StdRng::seed_from_u64(22);
        let qubit = Qubit::prepare(false, Basis::Rectilinear).unwrap();
        let sampler = Sampler::new().with_channel(QuantumChannel::bit_flip(0.2).unwrap());
        let counts = sampler
            .run(&qubit, &Measurement::z_basis(), 10_000, &mut rng)
            .unwrap();

        let flipped = *counts.get(&1).unwrap_or(&0) as f64 / 10_000.0;
        // sigma = sqrt(0.2 * 0.8 / 10_000) = 0.004
        assert!((flipped - 0.2).abs() < 0.012, "flipped = {flipped}");
    }

    #[test]
    fn roll_past_cdf_lands_on_weighted_outcome() {
        let probs = [0.999_999_999, 0.0];
        let cdf = [0.999_999_999, 0.999_999_999];
        assert_eq!(outcome_from_cdf(&cdf, &probs, 0.999_999_9995), 0);
        assert_eq!(outcome_from_cdf(&cdf, &probs, 0.5), 0);

        let probs = [0.0, 0.5, 0.5];
        let cdf = [0.0, 0.5, 1.0];
        assert_eq!(outcome_from_cdf(&cdf, &probs, 0.0), 1);
        assert_eq!(outcome_from_cdf(&cdf, &probs, 0.7), 2);
    }

    #[test]
    fn zero_shots_is_empty() {
        let mut rng = StdRng::seed_from_u64(23);
        let counts = Sampler::new()
            .run(&Qubit::new(), &Measurement::z_basis(), 0, &mut rng)
            .unwrap();
        assert!(counts.is_empty());
    }
}
