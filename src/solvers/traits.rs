//! Common traits and errors for regression solvers.

use crate::core::RegressionResult;
use faer::{Col, Mat};
use thiserror::Error;

/// Errors raised while fitting a regression model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegressionError {
    /// Number of rows in X differs from the length of y (or of a companion vector).
    #[error("dimension mismatch: X has {x_rows} rows but y has {y_len} elements")]
    DimensionMismatch { x_rows: usize, y_len: usize },

    /// Fewer observations than the model needs.
    #[error("insufficient observations: need at least {needed}, got {got}")]
    InsufficientObservations { needed: usize, got: usize },

    /// A design column is (numerically) a linear combination of the previous ones.
    ///
    /// `column` indexes the design matrix including the intercept column.
    #[error("design matrix is rank deficient at column {column}")]
    RankDeficient { column: usize },

    /// Any other numerical failure.
    #[error("numerical error: {0}")]
    NumericalError(String),
}

/// An unfitted regression estimator.
pub trait Regressor {
    /// The fitted model type.
    type Fitted: FittedRegressor;

    /// Fit the model to a feature matrix (without intercept column) and response.
    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Self::Fitted, RegressionError>;
}

/// A fitted regression model.
pub trait FittedRegressor {
    /// Full fit result.
    fn result(&self) -> &RegressionResult;

    /// Feature coefficients (intercept excluded).
    fn coefficients(&self) -> &Col<f64> {
        &self.result().coefficients
    }

    /// Intercept, if the model has one.
    fn intercept(&self) -> Option<f64> {
        self.result().intercept
    }
}
