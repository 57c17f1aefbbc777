//! Leverage (hat-matrix diagonal) of a regression design.
//!
//! With `X = QR`, the hat matrix is `H = Q Q'`, so
//! `h_ii = ‖x_i R⁻¹‖²`. Values lie in `[0, 1]` and sum to the number of
//! parameters.

use faer::{Col, Mat};

/// Leverage values for a design matrix (intercept column already included)
/// given the inverse of its QR triangular factor.
pub fn leverage_from_r_inverse(design: &Mat<f64>, r_inverse: &Mat<f64>) -> Col<f64> {
    // Rows of X R⁻¹ are the rows of the thin Q
    let q = design * r_inverse;
    Col::from_fn(q.nrows(), |i| q.row(i).iter().map(|v| v * v).sum())
}

/// Indices of observations whose leverage exceeds `threshold`
/// (default `2k / n`).
pub fn high_leverage_points(
    leverage: &Col<f64>,
    n_params: usize,
    threshold: Option<f64>,
) -> Vec<usize> {
    let n = leverage.nrows();
    if n == 0 {
        return Vec::new();
    }
    let cutoff = threshold.unwrap_or(2.0 * n_params as f64 / n as f64);
    (0..n).filter(|&i| leverage[i] > cutoff).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::{design_matrix, HouseholderQr, DEFAULT_RANK_TOLERANCE};

    fn leverage(x: &Mat<f64>) -> Col<f64> {
        let design = design_matrix(x, true);
        let qr = HouseholderQr::decompose(&design, DEFAULT_RANK_TOLERANCE).unwrap();
        leverage_from_r_inverse(&design, &qr.r_inverse())
    }

    #[test]
    fn test_simple_regression_leverage() {
        // h_ii = 1/n + (x_i - x̄)² / Sxx  for x = 1..5: [0.6, 0.3, 0.2, 0.3, 0.6]
        let x = Mat::from_fn(5, 1, |i, _| (i + 1) as f64);
        let h = leverage(&x);

        let expected = [0.6, 0.3, 0.2, 0.3, 0.6];
        for i in 0..5 {
            assert!((h[i] - expected[i]).abs() < 1e-12, "h[{}] = {}", i, h[i]);
        }
    }

    #[test]
    fn test_leverage_sums_to_rank() {
        let x = Mat::from_fn(12, 2, |i, j| ((i * (j + 2)) % 7) as f64 + 0.5 * j as f64);
        let h = leverage(&x);
        let total: f64 = h.iter().sum();
        assert!((total - 3.0).abs() < 1e-10);
        assert!(h.iter().all(|&v| (0.0..=1.0 + 1e-12).contains(&v)));
    }

    #[test]
    fn test_high_leverage_points() {
        let h = Col::from_fn(5, |i| [0.6, 0.3, 0.2, 0.3, 0.6][i]);
        assert_eq!(high_leverage_points(&h, 2, None), Vec::<usize>::new());
        assert_eq!(high_leverage_points(&h, 2, Some(0.5)), vec![0, 4]);
    }

    #[test]
    fn test_outlying_predictor_flagged() {
        let x = Mat::from_fn(10, 1, |i, _| if i == 9 { 40.0 } else { i as f64 });
        let h = leverage(&x);
        assert_eq!(high_leverage_points(&h, 2, None), vec![9]);
    }
}
