use crate::core::errors::GateError;
use crate::core::utils;
use ndarray::{Array2, arr2};
use num_complex::Complex64;

/// Represents a quantum gate.
///
/// A gate is defined by its unitary matrix and the number of qubits it acts on.
#[derive(Clone, Debug, PartialEq)]
pub struct Gate {
    /// The unitary matrix of the gate.
    pub matrix: Array2<Complex64>,
    /// The number of qubits the gate acts on.
    pub num_qubits: usize,
}

impl Gate {
    /// Creates a new `Gate` from a unitary matrix.
    ///
    /// # Arguments
    ///
    /// * `matrix` - A square, unitary `Array2<Complex64>`.
    ///
    /// # Errors
    ///
    /// Returns a `GateError` if:
    /// - The matrix is not square.
    /// - The matrix dimensions are not a power of 2.
    /// - The matrix is not unitary.
    pub fn new(matrix: Array2<Complex64>) -> Result<Self, GateError> {
        let (rows, cols) = matrix.dim();

        if rows != cols {
            return Err(GateError::NotSquareMatrix);
        }

        if !rows.is_power_of_two() {
            return Err(GateError::InvalidDimensions);
        }

        if !Self::check_unitary(&matrix) {
            return Err(GateError::NonUnitary);
        }

        let num_qubits = rows.trailing_zeros() as usize;

        Ok(Self { matrix, num_qubits })
    }

    /// Wraps a single-qubit matrix that is unitary by construction.
    fn single_qubit(matrix: Array2<Complex64>) -> Self {
        debug_assert!(Self::check_unitary(&matrix));
        Self {
            matrix,
            num_qubits: 1,
        }
    }

    /// Checks if a given matrix is unitary
    fn check_unitary(matrix: &Array2<Complex64>) -> bool {
        let (rows, _) = matrix.dim();
        let eye = Array2::<Complex64>::eye(rows);

        let product = matrix.dot(&utils::dagger(matrix));

        product
            .iter()
            .zip(eye.iter())
            .all(|(a, b)| (*a - *b).norm() < 1e-6)
    }

    /// Returns the gate applying `self` first and then `next`.
    ///
    /// The resulting matrix is `next · self`, matching the order in which
    /// the gates act on a column state vector.
    pub fn then(&self, next: &Gate) -> Result<Gate, GateError> {
        if self.num_qubits != next.num_qubits {
            return Err(GateError::InvalidDimensions);
        }
        Ok(Gate {
            matrix: next.matrix.dot(&self.matrix),
            num_qubits: self.num_qubits,
        })
    }

    // --- Standard Gates ---

    /// Creates an Identity gate.
    pub fn i() -> Gate {
        Gate::single_qubit(arr2(&[
            [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
            [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
        ]))
    }

    /// Creates a Pauli-X gate (NOT gate), the bit-flip.
    pub fn x() -> Gate {
        Gate::single_qubit(arr2(&[
            [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
            [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
        ]))
    }

    /// Creates a Hadamard gate, the rectilinear/diagonal basis change.
    pub fn h() -> Gate {
        let factor = 1.0 / 2.0_f64.sqrt();
        Gate::single_qubit(arr2(&[
            [Complex64::new(factor, 0.0), Complex64::new(factor, 0.0)],
            [Complex64::new(factor, 0.0), Complex64::new(-factor, 0.0)],
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: &Array2<Complex64>, b: &Array2<Complex64>) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).norm() < 1e-12)
    }

    #[test]
    fn rejects_non_unitary_matrix() {
        let m = arr2(&[
            [Complex64::new(1.0, 0.0), Complex64::new(1.0, 0.0)],
            [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
        ]);
        assert!(matches!(Gate::new(m), Err(GateError::NonUnitary)));
    }

    #[test]
    fn rejects_non_square_matrix() {
        let m = Array2::<Complex64>::zeros((2, 3));
        assert!(matches!(Gate::new(m), Err(GateError::NotSquareMatrix)));
    }

    #[test]
    fn hadamard_is_self_inverse() {
        let hh = Gate::h().then(&Gate::h()).unwrap();
        assert!(approx_eq(&hh.matrix, &Gate::i().matrix));
    }

    #[test]
    fn composition_follows_matrix_product_order() {
        // X then H is H·X, which differs from X·H.
        let xh = Gate::x().then(&Gate::h()).unwrap();
        let expected = Gate::h().matrix.dot(&Gate::x().matrix);
        let reversed = Gate::x().matrix.dot(&Gate::h().matrix);

        assert!(approx_eq(&xh.matrix, &expected));
        assert!(!approx_eq(&xh.matrix, &reversed));
    }

    #[test]
    fn standard_gates_validate() {
        for gate in [Gate::i(), Gate::x(), Gate::h()] {
            assert!(Gate::new(gate.matrix.clone()).is_ok());
            assert_eq!(gate.num_qubits, 1);
        }
    }
}
