//! Utility functions for single-qubit linear algebra.
//!
//! This module contains helper functions for:
//! - Outer products and conjugate transposes.
//! - Completeness checks for measurements and channels.
//! - Norms of state vectors.

use ndarray::{Array1, Array2};
use num_complex::Complex64;

/// Returns the conjugate transpose $M^\dagger$ of a matrix.
pub fn dagger(matrix: &Array2<Complex64>) -> Array2<Complex64> {
    matrix.t().mapv(|c| c.conj())
}

/// Computes the outer product of two vectors $|a\rangle\langle b|$.
pub fn outer_product(a: &Array1<Complex64>, b: &Array1<Complex64>) -> Array2<Complex64> {
    let n = a.len();
    let m = b.len();
    let mut res = Array2::zeros((n, m));

    for i in 0..n {
        for j in 0..m {
            res[[i, j]] = a[i] * b[j].conj();
        }
    }
    res
}

/// Squared Euclidean norm $\langle\psi|\psi\rangle$ of a state vector.
pub fn norm_sqr(vector: &Array1<Complex64>) -> f64 {
    vector.iter().map(|c| c.norm_sqr()).sum()
}

/// Checks completeness relation for measurement or Kraus operators.
///
/// Verifies if $\sum M_k^\dagger M_k = I$.
pub fn check_completeness(ops: &[Array2<Complex64>], dim: usize) -> bool {
    let eye = Array2::<Complex64>::eye(dim);
    let sum = ops
        .iter()
        .fold(Array2::<Complex64>::zeros((dim, dim)), |acc, op| {
            acc + dagger(op).dot(op)
        });
    sum.iter()
        .zip(eye.iter())
        .all(|(a, b)| (a - b).norm() < 1e-9)
}
