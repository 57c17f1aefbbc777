//! Statistical inference: coefficient covariance estimators and Wald intervals.

mod cluster_covariance;
mod coefficient;
mod robust_covariance;

pub use cluster_covariance::{compute_cluster_covariance, count_clusters};
pub use coefficient::{wald_interval, CoefficientInference, CriticalValue};
pub use robust_covariance::{compute_hc_covariance, HcType};

use crate::solvers::{FittedOls, FittedRegressor, RegressionError};
use faer::Mat;

/// Coefficient covariance estimator.
#[derive(Debug, Clone, PartialEq)]
pub enum CovarianceType {
    /// Classical `s² (X'X)^-1`, assuming homoskedastic independent errors.
    NonRobust,
    /// Heteroskedasticity-consistent sandwich.
    Hc(HcType),
    /// One-way cluster-robust sandwich; one label per observation.
    Cluster(Vec<u64>),
}

/// Covariance of the design coefficients of `fitted`, trained on features `x`.
pub fn compute_covariance(
    fitted: &FittedOls,
    x: &Mat<f64>,
    cov_type: &CovarianceType,
) -> Result<Mat<f64>, RegressionError> {
    match cov_type {
        CovarianceType::NonRobust => {
            let s2 = fitted.result().sigma_squared();
            if !s2.is_finite() {
                return Err(RegressionError::InsufficientObservations {
                    needed: fitted.result().n_parameters + 1,
                    got: fitted.result().n_observations,
                });
            }
            let xtx_inv = fitted.xtx_inverse();
            Ok(Mat::from_fn(xtx_inv.nrows(), xtx_inv.ncols(), |r, c| {
                s2 * xtx_inv[(r, c)]
            }))
        }
        CovarianceType::Hc(hc_type) => compute_hc_covariance(
            &fitted.design(x),
            fitted.residuals(),
            &fitted.leverage(x),
            fitted.xtx_inverse(),
            *hc_type,
        ),
        CovarianceType::Cluster(groups) => compute_cluster_covariance(
            &fitted.design(x),
            fitted.residuals(),
            fitted.xtx_inverse(),
            groups,
        ),
    }
}

/// `bread · meat · bread` for symmetric `bread`.
pub(crate) fn sandwich(bread: &Mat<f64>, meat: &Mat<f64>) -> Mat<f64> {
    bread * meat * bread
}
