//! Ordinary Least Squares solver.
//!
//! Fits `y = β₀ + Xβ + ε` by Householder QR of the design matrix. The
//! fitted model keeps `R⁻¹` so that `(X'X)⁻¹`, leverage values and every
//! sandwich covariance estimator can be derived without refactorizing.

use crate::core::RegressionResult;
use crate::diagnostics::leverage_from_r_inverse;
use crate::inference::{compute_covariance, CovarianceType};
use crate::solvers::qr::{HouseholderQr, DEFAULT_RANK_TOLERANCE};
use crate::solvers::traits::{FittedRegressor, RegressionError, Regressor};
use faer::{Col, Mat};

/// Build the design matrix, prepending a column of ones when `with_intercept`.
pub fn design_matrix(x: &Mat<f64>, with_intercept: bool) -> Mat<f64> {
    if !with_intercept {
        return x.clone();
    }
    let n = x.nrows();
    let p = x.ncols();
    let mut design = Mat::zeros(n, p + 1);
    for i in 0..n {
        design[(i, 0)] = 1.0;
        for j in 0..p {
            design[(i, j + 1)] = x[(i, j)];
        }
    }
    design
}

/// Ordinary Least Squares estimator.
///
/// # Example
///
/// ```rust,ignore
/// use ai_speedup::solvers::{FittedRegressor, OlsRegressor, Regressor};
/// use faer::{Col, Mat};
///
/// let x = Mat::from_fn(10, 1, |i, _| i as f64);
/// let y = Col::from_fn(10, |i| 1.0 + 2.0 * i as f64);
///
/// let fitted = OlsRegressor::builder().with_intercept(true).build().fit(&x, &y)?;
/// assert!((fitted.coefficients()[0] - 2.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct OlsRegressor {
    with_intercept: bool,
    rank_tolerance: f64,
}

impl OlsRegressor {
    /// Create a builder for configuring the regressor.
    pub fn builder() -> OlsRegressorBuilder {
        OlsRegressorBuilder::default()
    }
}

impl Default for OlsRegressor {
    fn default() -> Self {
        OlsRegressorBuilder::default().build()
    }
}

impl Regressor for OlsRegressor {
    type Fitted = FittedOls;

    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Self::Fitted, RegressionError> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.nrows() {
            return Err(RegressionError::DimensionMismatch {
                x_rows: n_samples,
                y_len: y.nrows(),
            });
        }

        let n_params = n_features + usize::from(self.with_intercept);
        if n_params == 0 {
            return Err(RegressionError::NumericalError(
                "model has no parameters".to_string(),
            ));
        }
        // At least one residual degree of freedom
        if n_samples <= n_params {
            return Err(RegressionError::InsufficientObservations {
                needed: n_params + 1,
                got: n_samples,
            });
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(RegressionError::NumericalError(
                "response contains non-finite values".to_string(),
            ));
        }

        let design = design_matrix(x, self.with_intercept);
        let qr = HouseholderQr::decompose(&design, self.rank_tolerance)?;
        let beta = qr.solve_least_squares(y)?;

        let mut fitted_values = Col::zeros(n_samples);
        let mut residuals = Col::zeros(n_samples);
        for i in 0..n_samples {
            let mut pred = 0.0;
            for j in 0..n_params {
                pred += design[(i, j)] * beta[j];
            }
            fitted_values[i] = pred;
            residuals[i] = y[i] - pred;
        }

        let rss: f64 = residuals.iter().map(|e| e * e).sum();
        let y_mean = if self.with_intercept {
            y.iter().sum::<f64>() / n_samples as f64
        } else {
            0.0
        };
        let tss: f64 = y.iter().map(|v| (v - y_mean) * (v - y_mean)).sum();
        let r_squared = if tss > 0.0 { 1.0 - rss / tss } else { f64::NAN };

        let offset = usize::from(self.with_intercept);
        let mut result = RegressionResult::empty(n_features, n_samples);
        result.coefficients = Col::from_fn(n_features, |j| beta[j + offset]);
        result.intercept = self.with_intercept.then(|| beta[0]);
        result.residuals = residuals;
        result.fitted_values = fitted_values;
        result.n_parameters = n_params;
        result.rss = rss;
        result.r_squared = r_squared;

        Ok(FittedOls {
            with_intercept: self.with_intercept,
            xtx_inverse: qr.xtx_inverse(),
            r_inverse: qr.r_inverse(),
            result,
        })
    }
}

/// A fitted OLS model.
#[derive(Debug, Clone)]
pub struct FittedOls {
    with_intercept: bool,
    /// `(X'X)⁻¹` in design-column order (intercept first when present).
    xtx_inverse: Mat<f64>,
    r_inverse: Mat<f64>,
    result: RegressionResult,
}

impl FittedOls {
    /// Whether the model includes an intercept.
    pub fn with_intercept(&self) -> bool {
        self.with_intercept
    }

    /// Position of feature `feature` in the design matrix (and covariance matrices).
    pub fn design_index(&self, feature: usize) -> usize {
        feature + usize::from(self.with_intercept)
    }

    /// `(X'X)⁻¹` of the design matrix.
    pub fn xtx_inverse(&self) -> &Mat<f64> {
        &self.xtx_inverse
    }

    /// Inverse of the QR triangular factor.
    pub fn r_inverse(&self) -> &Mat<f64> {
        &self.r_inverse
    }

    /// Residuals of the fit.
    pub fn residuals(&self) -> &Col<f64> {
        &self.result.residuals
    }

    /// Residual degrees of freedom.
    pub fn residual_df(&self) -> usize {
        self.result.residual_df()
    }

    /// Design matrix for the given features, matching this model's intercept setting.
    pub fn design(&self, x: &Mat<f64>) -> Mat<f64> {
        design_matrix(x, self.with_intercept)
    }

    /// Leverage (hat) values `h_ii` of the training rows `x`.
    pub fn leverage(&self, x: &Mat<f64>) -> Col<f64> {
        leverage_from_r_inverse(&self.design(x), &self.r_inverse)
    }

    /// Coefficient covariance matrix under the chosen estimator.
    pub fn covariance(
        &self,
        x: &Mat<f64>,
        cov_type: &CovarianceType,
    ) -> Result<Mat<f64>, RegressionError> {
        compute_covariance(self, x, cov_type)
    }

    /// Standard errors of every design coefficient (intercept first when present).
    pub fn std_errors(
        &self,
        x: &Mat<f64>,
        cov_type: &CovarianceType,
    ) -> Result<Col<f64>, RegressionError> {
        let vcov = self.covariance(x, cov_type)?;
        Ok(Col::from_fn(vcov.nrows(), |j| {
            let var = vcov[(j, j)];
            if var >= 0.0 {
                var.sqrt()
            } else {
                f64::NAN
            }
        }))
    }
}

impl FittedRegressor for FittedOls {
    fn result(&self) -> &RegressionResult {
        &self.result
    }
}

/// Builder for [`OlsRegressor`].
#[derive(Debug, Clone)]
pub struct OlsRegressorBuilder {
    with_intercept: bool,
    rank_tolerance: f64,
}

impl Default for OlsRegressorBuilder {
    fn default() -> Self {
        Self {
            with_intercept: true,
            rank_tolerance: DEFAULT_RANK_TOLERANCE,
        }
    }
}

impl OlsRegressorBuilder {
    /// Set whether to include an intercept term.
    ///
    /// Default is true.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.with_intercept = include;
        self
    }

    /// Relative tolerance used to declare a design column linearly dependent.
    ///
    /// Default is 1e-10.
    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.rank_tolerance = tol;
        self
    }

    /// Build the regressor.
    pub fn build(self) -> OlsRegressor {
        OlsRegressor {
            with_intercept: self.with_intercept,
            rank_tolerance: self.rank_tolerance,
        }
    }
}
