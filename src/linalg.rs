//! Shared linear algebra helpers for the ellipsoid engine.
//!
//! Thin wrappers over nalgebra that centralize the numerically delicate
//! pieces: metric (Mahalanobis-style) norms, sorted symmetric
//! eigen-decomposition, and the positive-definiteness guard applied after
//! every shape mutation.

use nalgebra::{Cholesky, DMatrix, DVector};

use crate::errors::{EngineError, Result};

/// Norms below this are treated as zero when normalizing.
pub(crate) const NORM_EPS: f64 = 1e-12;

/// Eigen-solver convergence tolerance and iteration cap.
const EIGEN_EPS: f64 = 1e-12;
const EIGEN_MAX_ITER: usize = 500;

/// Metric norm `sqrt(v' M v)` under a symmetric positive-(semi)definite
/// matrix `M`.
///
/// Returns the raw value; callers decide whether a non-finite or
/// non-positive result is an error (it indicates a degenerate metric).
pub(crate) fn metric_norm(v: &DVector<f64>, m: &DMatrix<f64>) -> f64 {
    v.dot(&(m * v)).sqrt()
}

/// Unit-normalize a vector. Returns `None` when the norm is numerically zero.
pub(crate) fn unit(v: &DVector<f64>) -> Option<DVector<f64>> {
    let norm = v.norm();
    if norm < NORM_EPS || !norm.is_finite() {
        None
    } else {
        Some(v / norm)
    }
}

/// Enforce exact symmetry: `(M + M') / 2`.
///
/// Floating-point drift accumulates off-symmetric noise in repeated
/// rank-1 updates; re-symmetrizing keeps the eigen-solver honest.
pub(crate) fn symmetrize(m: &DMatrix<f64>) -> DMatrix<f64> {
    (m + m.transpose()) * 0.5
}

/// `true` when `M` is symmetric positive-definite, checked by attempting a
/// Cholesky factorization.
pub(crate) fn is_positive_definite(m: &DMatrix<f64>) -> bool {
    m.iter().all(|v| v.is_finite()) && Cholesky::new(m.clone()).is_some()
}

/// Eigen-decomposition of a symmetric matrix with eigenpairs sorted by
/// eigenvalue, descending.
#[derive(Debug, Clone)]
pub(crate) struct SortedEigen {
    /// Eigenvalues, largest first.
    pub(crate) values: Vec<f64>,
    /// Unit eigenvectors, aligned with `values`.
    pub(crate) vectors: Vec<DVector<f64>>,
}

/// Decompose a symmetric matrix into sorted eigenpairs.
///
/// Fails with [`EngineError::Numerical`] when the iteration does not
/// converge or the input contains non-finite entries.
pub(crate) fn sorted_symmetric_eigen(m: &DMatrix<f64>) -> Result<SortedEigen> {
    if m.iter().any(|v| !v.is_finite()) {
        return Err(EngineError::numerical(
            "matrix contains non-finite entries",
        ));
    }
    let eigen = nalgebra::SymmetricEigen::try_new(m.clone(), EIGEN_EPS, EIGEN_MAX_ITER)
        .ok_or_else(|| EngineError::numerical("symmetric eigen-decomposition did not converge"))?;

    let n = eigen.eigenvalues.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[b]
            .partial_cmp(&eigen.eigenvalues[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let values = order.iter().map(|&i| eigen.eigenvalues[i]).collect();
    let vectors = order
        .iter()
        .map(|&i| eigen.eigenvectors.column(i).into_owned())
        .collect();
    Ok(SortedEigen { values, vectors })
}

/// The two eigenvectors with the largest eigenvalues (major axes of the
/// ellipsoid described by `M`).
pub(crate) fn top_two_directions(m: &DMatrix<f64>) -> Result<(DVector<f64>, DVector<f64>)> {
    let eigen = sorted_symmetric_eigen(m)?;
    if eigen.vectors.len() < 2 {
        return Err(EngineError::numerical(
            "matrix too small for a two-dimensional eigenspace",
        ));
    }
    Ok((eigen.vectors[0].clone(), eigen.vectors[1].clone()))
}

/// The eigenvector with the smallest eigenvalue of a symmetric matrix.
pub(crate) fn min_direction(m: &DMatrix<f64>) -> Result<DVector<f64>> {
    let eigen = sorted_symmetric_eigen(m)?;
    eigen
        .vectors
        .last()
        .cloned()
        .ok_or_else(|| EngineError::numerical("empty eigen-decomposition"))
}
