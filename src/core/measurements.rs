use crate::core::errors::MeasurementError;
use crate::core::utils;
use ndarray::{Array1, Array2, array};
use num_complex::Complex64;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two conjugate BB84 bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Basis {
    /// Computational basis {|0>, |1>}, also called Z.
    Rectilinear,
    /// Hadamard basis {|+>, |->}, also called X.
    Diagonal,
}

impl Basis {
    /// Draws a basis uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Basis::Diagonal
        } else {
            Basis::Rectilinear
        }
    }

    /// Projective measurement in this basis.
    pub fn measurement(self) -> Measurement {
        match self {
            Basis::Rectilinear => Measurement::z_basis(),
            Basis::Diagonal => Measurement::x_basis(),
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Basis::Rectilinear => f.write_str("Z"),
            Basis::Diagonal => f.write_str("X"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Measurement {
    /// List of measurement operators, indexed by outcome
    pub operators: Vec<Array2<Complex64>>,
    /// Number of qubits which the measurment acts
    pub num_qubits: usize,
}

impl Measurement {
    pub fn new(operators: Vec<Array2<Complex64>>) -> Result<Self, MeasurementError> {
        if operators.is_empty() {
            return Err(MeasurementError::Empty);
        }

        let (rows, cols) = operators[0].dim();
        if rows != cols || !rows.is_power_of_two() {
            return Err(MeasurementError::InvalidDimensions);
        }
        // log_2 as rows is power of two
        let num_qubits = rows.trailing_zeros() as usize;

        for op in &operators {
            if op.dim() != (rows, cols) {
                return Err(MeasurementError::InvalidDimensions);
            }
        }

        if !utils::check_completeness(&operators, rows) {
            return Err(MeasurementError::NotComplete);
        }

        Ok(Self {
            operators,
            num_qubits,
        })
    }

    /// Builds the rank-one projective measurement onto an orthonormal pair.
    fn from_eigenstates(v0: &Array1<Complex64>, v1: &Array1<Complex64>) -> Self {
        let p0 = utils::outer_product(v0, v0);
        let p1 = utils::outer_product(v1, v1);
        debug_assert!(utils::check_completeness(&[p0.clone(), p1.clone()], 2));

        Self {
            operators: vec![p0, p1],
            num_qubits: 1,
        }
    }

    /// Measurement in the given BB84 basis.
    pub fn in_basis(basis: Basis) -> Measurement {
        basis.measurement()
    }

    /// Z basis (Computational) -> {|0>, |1>}.
    pub fn z_basis() -> Measurement {
        let v0: Array1<Complex64> = array![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)];
        let v1: Array1<Complex64> = array![Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)];

        Measurement::from_eigenstates(&v0, &v1)
    }

    /// X basis (Hadamard) -> {|+>, |->}.
    pub fn x_basis() -> Measurement {
        let inv_sqrt2 = Complex64::new(1.0 / 2.0_f64.sqrt(), 0.0);

        let v_plus: Array1<Complex64> = array![inv_sqrt2, inv_sqrt2];
        let v_minus: Array1<Complex64> = array![inv_sqrt2, -inv_sqrt2];

        Measurement::from_eigenstates(&v_plus, &v_minus)
    }

    /// Number of possible outcomes.
    pub fn num_outcomes(&self) -> usize {
        self.operators.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasurementResult {
    /// Applied measurment operator index
    pub index: usize,
}

impl MeasurementResult {
    /// Classical bit read out of a two-outcome measurement.
    pub fn bit(&self) -> bool {
        self.index == 1
    }
}
