//! Regression diagnostics.
//!
//! - **Leverage**: hat values used by the HC2/HC3 covariance estimators and
//!   to flag observations with unusual predictor values.
//! - **Condition number**: how close the design is to being singular.

mod condition_number;
mod leverage;

pub use condition_number::{condition_diagnostic, ConditionDiagnostic, ConditionSeverity};
pub use leverage::{high_leverage_points, leverage_from_r_inverse};
