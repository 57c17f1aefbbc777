//! Least-squares solvers.

mod ols;
mod qr;
mod traits;

pub use ols::{design_matrix, FittedOls, OlsRegressor, OlsRegressorBuilder};
pub use qr::{HouseholderQr, DEFAULT_RANK_TOLERANCE};
pub use traits::{FittedRegressor, RegressionError, Regressor};
