//! QR factorization for least-squares problems, on top of faer's Householder QR.
//!
//! Factorizes a tall design matrix `X = QR` with `R` upper triangular. The
//! least-squares solution `β = R⁻¹ Q'y` avoids forming `X'X`, so its accuracy
//! depends on κ(X) rather than κ(X)².
//!
//! Rank deficiency is detected column by column: column `j` is flagged when
//! `|R_jj|` falls below `tolerance · ‖X_j‖`, i.e. when almost nothing of the
//! column survives projection onto the complement of the previous columns.

use crate::solvers::traits::RegressionError;
use faer::{Col, Mat};

/// Default relative tolerance for the rank check.
pub const DEFAULT_RANK_TOLERANCE: f64 = 1e-10;

/// A thin QR factorization of a full-column-rank design.
#[derive(Debug, Clone)]
pub struct HouseholderQr {
    /// First `k` columns of Q (n × k).
    thin_q: Mat<f64>,
    /// Upper-triangular factor R (k × k).
    r: Mat<f64>,
}

impl HouseholderQr {
    /// Factorize `x` (n × k, n ≥ k), failing if any column is numerically dependent.
    pub fn decompose(x: &Mat<f64>, tolerance: f64) -> Result<Self, RegressionError> {
        let n = x.nrows();
        let k = x.ncols();

        if n < k {
            return Err(RegressionError::InsufficientObservations { needed: k, got: n });
        }
        if let Some(j) = (0..k).find(|&j| (0..n).any(|i| !x[(i, j)].is_finite())) {
            return Err(RegressionError::NumericalError(format!(
                "non-finite value in design column {j}"
            )));
        }

        let qr = x.qr();
        let thin_r = qr.thin_R();
        let r = Mat::from_fn(k, k, |i, j| if i <= j { thin_r[(i, j)] } else { 0.0 });

        // |R_jj| is the norm of what is left of column j after projecting out columns 0..j
        for j in 0..k {
            let column_norm = x.col(j).norm_l2();
            if column_norm == 0.0 || r[(j, j)].abs() <= tolerance * column_norm {
                return Err(RegressionError::RankDeficient { column: j });
            }
        }

        Ok(Self {
            thin_q: qr.compute_thin_Q(),
            r,
        })
    }

    /// Number of columns of the factorized matrix.
    pub fn ncols(&self) -> usize {
        self.r.ncols()
    }

    /// Least-squares solution of `X β ≈ y`.
    pub fn solve_least_squares(&self, y: &Col<f64>) -> Result<Col<f64>, RegressionError> {
        if y.nrows() != self.thin_q.nrows() {
            return Err(RegressionError::DimensionMismatch {
                x_rows: self.thin_q.nrows(),
                y_len: y.nrows(),
            });
        }

        let qty: Col<f64> = self.thin_q.transpose() * y;
        let k = self.ncols();

        // Back substitution: R β = Q'y
        let mut beta = Col::zeros(k);
        for i in (0..k).rev() {
            let mut sum = qty[i];
            for j in (i + 1)..k {
                sum -= self.r[(i, j)] * beta[j];
            }
            beta[i] = sum / self.r[(i, i)];
        }
        Ok(beta)
    }

    /// Inverse of the triangular factor, R⁻¹ (upper triangular).
    pub fn r_inverse(&self) -> Mat<f64> {
        let k = self.ncols();
        let mut inv = Mat::zeros(k, k);
        for col in 0..k {
            // Solve R z = e_col
            for i in (0..=col).rev() {
                let mut sum = if i == col { 1.0 } else { 0.0 };
                for j in (i + 1)..=col {
                    sum -= self.r[(i, j)] * inv[(j, col)];
                }
                inv[(i, col)] = sum / self.r[(i, i)];
            }
        }
        inv
    }

    /// `(X'X)⁻¹ = R⁻¹ R⁻ᵀ`.
    pub fn xtx_inverse(&self) -> Mat<f64> {
        let r_inv = self.r_inverse();
        &r_inv * r_inv.transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_solution() {
        // y = 1 + 2x, no noise
        let x = Mat::from_fn(6, 2, |i, j| if j == 0 { 1.0 } else { i as f64 });
        let y = Col::from_fn(6, |i| 1.0 + 2.0 * i as f64);

        let qr = HouseholderQr::decompose(&x, DEFAULT_RANK_TOLERANCE).unwrap();
        let beta = qr.solve_least_squares(&y).unwrap();

        assert!((beta[0] - 1.0).abs() < 1e-12);
        assert!((beta[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_xtx_inverse_matches_normal_equations() {
        let x = Mat::from_fn(5, 2, |i, j| if j == 0 { 1.0 } else { (i + 1) as f64 });
        let qr = HouseholderQr::decompose(&x, DEFAULT_RANK_TOLERANCE).unwrap();
        let inv = qr.xtx_inverse();

        // X'X = [[5, 15], [15, 55]], det = 50
        assert!((inv[(0, 0)] - 55.0 / 50.0).abs() < 1e-12);
        assert!((inv[(0, 1)] + 15.0 / 50.0).abs() < 1e-12);
        assert!((inv[(1, 0)] + 15.0 / 50.0).abs() < 1e-12);
        assert!((inv[(1, 1)] - 5.0 / 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_collinear_column_rejected() {
        let x = Mat::from_fn(6, 3, |i, j| match j {
            0 => 1.0,
            1 => i as f64,
            _ => 3.0 * i as f64 - 2.0,
        });

        let err = HouseholderQr::decompose(&x, DEFAULT_RANK_TOLERANCE).unwrap_err();
        assert_eq!(err, RegressionError::RankDeficient { column: 2 });
    }

    #[test]
    fn test_zero_column_rejected() {
        let x = Mat::from_fn(4, 2, |_, j| if j == 0 { 1.0 } else { 0.0 });
        let err = HouseholderQr::decompose(&x, DEFAULT_RANK_TOLERANCE).unwrap_err();
        assert_eq!(err, RegressionError::RankDeficient { column: 1 });
    }

    #[test]
    fn test_non_finite_design_rejected() {
        let x = Mat::from_fn(4, 2, |i, j| if (i, j) == (2, 1) { f64::NAN } else { 1.0 + (i * j) as f64 });
        assert!(matches!(
            HouseholderQr::decompose(&x, DEFAULT_RANK_TOLERANCE),
            Err(RegressionError::NumericalError(_))
        ));
    }

    #[test]
    fn test_wide_matrix_rejected() {
        let x = Mat::from_fn(2, 3, |i, j| (i + j) as f64);
        assert!(matches!(
            HouseholderQr::decompose(&x, DEFAULT_RANK_TOLERANCE),
            Err(RegressionError::InsufficientObservations { needed: 3, got: 2 })
        ));
    }
}
