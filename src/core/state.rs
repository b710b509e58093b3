use crate::core::channels::QuantumChannel;
use crate::core::errors::StateError;
use crate::core::gates::Gate;
use crate::core::measurements::{Basis, Measurement, MeasurementResult};
use crate::core::utils;
use ndarray::{Array1, Array2, array};
use num_complex::Complex64;
use rand::Rng;

/// A single two-level system stored as a pure state vector $\alpha|0\rangle + \beta|1\rangle$.
///
/// Qubits are independent of each other; nothing here models entanglement.
#[derive(Clone, Debug, PartialEq)]
pub struct Qubit {
    pub amplitudes: Array1<Complex64>,
}

impl Default for Qubit {
    fn default() -> Self {
        Self::new()
    }
}

impl Qubit {
    /// Creates a new qubit initialized to |0>.
    pub fn new() -> Self {
        Self {
            amplitudes: array![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
        }
    }

    /// Encodes `bit` in `basis`: X when the bit is set, then H for the diagonal basis.
    ///
    /// Yields |0>, |1>, |+> or |->.
    pub fn prepare(bit: bool, basis: Basis) -> Result<Self, StateError> {
        let mut qubit = Self::new();

        if bit {
            qubit.apply(&Gate::x())?;
        }
        if basis == Basis::Diagonal {
            qubit.apply(&Gate::h())?;
        }

        Ok(qubit)
    }

    /// Validates that the input vector is a valid single-qubit state.
    fn check_vector_state(vector: &Array1<Complex64>) -> Result<(), StateError> {
        if vector.len() != 2 {
            return Err(StateError::DimensionMismatch {
                expected: 2,
                got: vector.len(),
            });
        }

        // Sum of squared amplitudes must be 1.
        let norm_sqr = utils::norm_sqr(vector);

        if (norm_sqr - 1.0).abs() > 1e-12 {
            return Err(StateError::NotNormalized(norm_sqr));
        }

        Ok(())
    }

    /// Creates a qubit from explicit amplitudes.
    pub fn from_amplitudes(vector: Array1<Complex64>) -> Result<Self, StateError> {
        Self::check_vector_state(&vector)?;
        Ok(Self { amplitudes: vector })
    }

    /// Checks if the qubit is still a valid normalized state.
    pub fn is_valid(&self) -> Result<(), StateError> {
        Self::check_vector_state(&self.amplitudes)
    }

    /// Applies a unitary gate: $|\psi\rangle \to U|\psi\rangle$.
    pub fn apply(&mut self, gate: &Gate) -> Result<(), StateError> {
        if gate.num_qubits != 1 {
            return Err(StateError::DimensionMismatch {
                expected: 1,
                got: gate.num_qubits,
            });
        }

        self.amplitudes = gate.matrix.dot(&self.amplitudes);
        Ok(())
    }

    /// Checks the operator set acts on one qubit
    fn check_single_qubit_ops(num_qubits: usize) -> Result<(), StateError> {
        if num_qubits != 1 {
            return Err(StateError::DimensionMismatch {
                expected: 1,
                got: num_qubits,
            });
        }
        Ok(())
    }

    /// Born-rule probability of each measurement outcome, $p_k = \|M_k|\psi\rangle\|^2$.
    pub fn probabilities(&self, measurement: &Measurement) -> Result<Vec<f64>, StateError> {
        Self::check_single_qubit_ops(measurement.num_qubits)?;
        Ok(branch_probabilities(&measurement.operators, &self.amplitudes))
    }

    /// Phisical measurment which collapses the state irretrievably.
    pub fn measure<R: Rng + ?Sized>(
        &mut self,
        measurement: &Measurement,
        rng: &mut R,
    ) -> Result<MeasurementResult, StateError> {
        Self::check_single_qubit_ops(measurement.num_qubits)?;
        let index = self.collapse(&measurement.operators, rng);
        Ok(MeasurementResult { index })
    }

    /// Measures in a BB84 basis and returns the classical bit.
    pub fn measure_in<R: Rng + ?Sized>(
        &mut self,
        basis: Basis,
        rng: &mut R,
    ) -> Result<bool, StateError> {
        Ok(self.measure(&basis.measurement(), rng)?.bit())
    }

    /// Applies a channel by sampling one of its Kraus branches.
    ///
    /// Returns the index of the branch that acted on the qubit.
    pub fn apply_channel<R: Rng + ?Sized>(
        &mut self,
        channel: &QuantumChannel,
        rng: &mut R,
    ) -> Result<usize, StateError> {
        Self::check_single_qubit_ops(channel.num_qubits)?;
        Ok(self.collapse(&channel.kraus_ops, rng))
    }

    /// Samples a branch `k` with weight $\|K_k|\psi\rangle\|^2$ and sets
    /// $|\psi\rangle \to K_k|\psi\rangle / \sqrt{p_k}$.
    fn collapse<R: Rng + ?Sized>(&mut self, ops: &[Array2<Complex64>], rng: &mut R) -> usize {
        let mut branches: Vec<Array1<Complex64>> =
            ops.iter().map(|op| op.dot(&self.amplitudes)).collect();
        let probs: Vec<f64> = branches.iter().map(utils::norm_sqr).collect();

        let outcome_idx = pick_outcome(&probs, rng);
        let p_selected = probs[outcome_idx];

        let branch = branches.swap_remove(outcome_idx);
        // A branch carrying all the weight is already normalized.
        self.amplitudes = if (p_selected - 1.0).abs() < 1e-12 {
            branch
        } else {
            let scale = Complex64::new(1.0 / p_selected.sqrt(), 0.0);
            branch.mapv(|c| c * scale)
        };

        outcome_idx
    }
}

fn branch_probabilities(ops: &[Array2<Complex64>], amplitudes: &Array1<Complex64>) -> Vec<f64> {
    let mut probs: Vec<f64> = ops
        .iter()
        .map(|op| utils::norm_sqr(&op.dot(amplitudes)))
        .collect();

    // Due to float, renormalazation of probabilities to ensure completeness
    let sum: f64 = probs.iter().sum();
    for p in &mut probs {
        *p /= sum;
    }
    probs
}

/// Randomly selects operator index ponderating using `probs`.
///
/// Never returns an index whose weight is zero, even when rounding leaves the
/// roll above the cumulative total.
fn pick_outcome<R: Rng + ?Sized>(probs: &[f64], rng: &mut R) -> usize {
    let total: f64 = probs.iter().sum();
    let roll: f64 = rng.random::<f64>() * total;

    let mut cumulative = 0.0;
    for (i, &p) in probs.iter().enumerate() {
        cumulative += p;
        if p > 0.0 && roll < cumulative {
            return i;
        }
    }
    probs.iter().rposition(|&p| p > 0.0).unwrap_or(0)
}
