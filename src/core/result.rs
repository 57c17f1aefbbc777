//! Result of a least-squares fit.

use faer::Col;

/// Coefficients, residuals and goodness-of-fit summary of a fitted model.
#[derive(Debug, Clone)]
pub struct RegressionResult {
    /// Feature coefficients (intercept excluded).
    pub coefficients: Col<f64>,
    /// Intercept, if the model has one.
    pub intercept: Option<f64>,
    /// Residuals `y - ŷ`.
    pub residuals: Col<f64>,
    /// Fitted values `ŷ`.
    pub fitted_values: Col<f64>,
    /// Number of estimated parameters, intercept included.
    pub n_parameters: usize,
    /// Number of observations used in the fit.
    pub n_observations: usize,
    /// Residual sum of squares.
    pub rss: f64,
    /// Coefficient of determination.
    pub r_squared: f64,
}

impl RegressionResult {
    /// An all-zero result sized for `n_features` and `n_observations`.
    pub fn empty(n_features: usize, n_observations: usize) -> Self {
        Self {
            coefficients: Col::zeros(n_features),
            intercept: None,
            residuals: Col::zeros(n_observations),
            fitted_values: Col::zeros(n_observations),
            n_parameters: 0,
            n_observations,
            rss: 0.0,
            r_squared: f64::NAN,
        }
    }

    /// Residual degrees of freedom, `n - k`.
    pub fn residual_df(&self) -> usize {
        self.n_observations.saturating_sub(self.n_parameters)
    }

    /// Residual variance `RSS / (n - k)`.
    pub fn sigma_squared(&self) -> f64 {
        match self.residual_df() {
            0 => f64::NAN,
            df => self.rss / df as f64,
        }
    }
}
