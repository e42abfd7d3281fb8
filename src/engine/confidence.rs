//! Statistical cut test.
//!
//! Computes the signed cut margin (alpha) bounding the risk of shrinking
//! the region incorrectly. The margin scales with elapsed rounds through
//! the environment's drift exponent and compares the candidate pair's
//! spread under the environment's uncertainty metric against the probe
//! direction's length under the region's own metric.

use nalgebra::{DMatrix, DVector};

use crate::errors::{EngineError, Result};
use crate::linalg;

/// Signed cut margin for a proposed candidate pair.
///
/// ```text
/// margin = - t^gamma * sqrt(2 ln(1/delta)) * ||left - right||_VInv / ||2g||_P
/// ```
///
/// `||v||_M = sqrt(v' M v)` is the metric norm; `v_inv` is the
/// environment's inverse-uncertainty matrix and `shape` the region's shape
/// matrix. The margin grows more negative while per-round evidence is
/// still thin; values closer to zero (or positive) license a cut.
///
/// Fails with [`EngineError::Numerical`] when either metric is degenerate
/// (non-invertible shape or uncertainty matrix shows up here as a
/// non-finite or non-positive norm); callers must not proceed to the cut
/// update in that case.
pub fn cut_margin(
    round: u64,
    gamma: f64,
    delta: f64,
    left: &DVector<f64>,
    right: &DVector<f64>,
    scale_direction: &DVector<f64>,
    v_inv: &DMatrix<f64>,
    shape: &DMatrix<f64>,
) -> Result<f64> {
    let pair_norm = linalg::metric_norm(&(left - right), v_inv);
    if !pair_norm.is_finite() {
        return Err(EngineError::numerical(
            "candidate spread is degenerate under the uncertainty metric",
        ));
    }

    let scale_norm = linalg::metric_norm(scale_direction, shape);
    if !scale_norm.is_finite() || scale_norm <= 0.0 {
        return Err(EngineError::numerical(
            "probe direction is degenerate under the region metric",
        ));
    }

    let confidence_width = (2.0 * (1.0 / delta).ln()).sqrt();
    let margin = -(round as f64).powf(gamma) * confidence_width * pair_norm / scale_norm;
    if !margin.is_finite() {
        return Err(EngineError::numerical("cut margin is non-finite"));
    }
    Ok(margin)
}

/// Decision rule: accept a cut iff `margin > -cut_sensitivity / dimension`.
///
/// Smaller sensitivity makes cuts more conservative.
pub fn accepts_cut(margin: f64, cut_sensitivity: f64, dimension: usize) -> bool {
    margin > -cut_sensitivity / dimension as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{DMatrix, DVector};

    fn basis(dim: usize, axis: usize) -> DVector<f64> {
        let mut v = DVector::zeros(dim);
        v[axis] = 1.0;
        v
    }

    #[test]
    fn test_margin_concrete_value() {
        // d=2, t=1, gamma=0, delta=0.2, identity metrics, g = e1:
        // left - right = 2 e1, scale direction = 2 e1, both norms 2, so
        // margin = -sqrt(2 ln 5).
        let g = basis(2, 0);
        let left = g.clone();
        let right = -g.clone();
        let scale = &g * 2.0;
        let id = DMatrix::identity(2, 2);

        let margin = cut_margin(1, 0.0, 0.2, &left, &right, &scale, &id, &id).unwrap();
        let expected = -(2.0 * 5.0_f64.ln()).sqrt();
        assert!(
            (margin - expected).abs() < 1e-12,
            "margin = {margin}, expected {expected}"
        );
    }

    #[test]
    fn test_margin_scales_with_round_exponent() {
        let g = basis(3, 1);
        let left = g.clone();
        let right = -g.clone();
        let scale = &g * 2.0;
        let id = DMatrix::identity(3, 3);

        let m1 = cut_margin(1, 0.5, 0.1, &left, &right, &scale, &id, &id).unwrap();
        let m100 = cut_margin(100, 0.5, 0.1, &left, &right, &scale, &id, &id).unwrap();
        assert!(
            (m100 - 10.0 * m1).abs() < 1e-9,
            "t^0.5 scaling violated: {m1} vs {m100}"
        );
    }

    #[test]
    fn test_margin_less_negative_as_uncertainty_shrinks() {
        // Shrinking VInv (more accumulated evidence) moves the margin
        // toward zero.
        let g = basis(2, 0);
        let left = g.clone();
        let right = -g.clone();
        let scale = &g * 2.0;
        let shape = DMatrix::identity(2, 2);

        let wide = DMatrix::identity(2, 2);
        let narrow = DMatrix::identity(2, 2) * 0.01;
        let m_wide = cut_margin(10, 0.2, 0.1, &left, &right, &scale, &wide, &shape).unwrap();
        let m_narrow = cut_margin(10, 0.2, 0.1, &left, &right, &scale, &narrow, &shape).unwrap();
        assert!(
            m_narrow > m_wide,
            "narrow {m_narrow} should beat wide {m_wide}"
        );
    }

    #[test]
    fn test_degenerate_shape_is_numerical_error() {
        let g = basis(2, 0);
        let left = g.clone();
        let right = -g.clone();
        let scale = &g * 2.0;
        let id = DMatrix::identity(2, 2);
        // Shape annihilates the probe direction: the region metric norm is 0.
        let singular = DMatrix::from_diagonal(&DVector::from_vec(vec![0.0, 1.0]));

        let err = cut_margin(1, 0.0, 0.1, &left, &right, &scale, &id, &singular).unwrap_err();
        assert!(matches!(err, EngineError::Numerical(_)));
    }

    #[test]
    fn test_decision_threshold() {
        // Accept iff margin > -cut_sensitivity / d.
        assert!(accepts_cut(-0.2, 1.0, 2));
        assert!(!accepts_cut(-0.5, 1.0, 2));
        assert!(!accepts_cut(-0.6, 1.0, 2));
        assert!(accepts_cut(0.1, 1.0, 2));
        // Smaller sensitivity is more conservative.
        assert!(!accepts_cut(-0.2, 0.5, 4));
        assert!(accepts_cut(-0.2, 1.0, 4));
    }
}
