//! Regression estimate of the effect of AI tool access on developer task
//! completion time.
//!
//! Fits `ln(total time) ~ ai_treatment + covariates` by OLS over issue-level
//! observations and reports `exp(β) - 1` with 95% intervals under
//! homoskedastic, HC3 and developer-clustered standard errors.
//!
//! # Example
//!
//! ```rust,ignore
//! use ai_speedup::prelude::*;
//! use std::path::Path;
//!
//! let estimate = RegressionRunner::new(ModelSpec::default())
//!     .run(Path::new("data/observations.csv"))?;
//! print!("{}", render(&estimate));
//! ```

pub mod cli;
pub mod core;
pub mod diagnostics;
pub mod error;
pub mod inference;
pub mod report;
pub mod runner;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::{
        load_observations, Covariate, Dataset, EffectEstimate, EstimatorKind, IntervalEstimate,
        MissingPostReview, ModelSpec, ModelSpecBuilder, Observation, StdErrorSpec,
    };
    pub use crate::error::AnalysisError;
    pub use crate::inference::{CovarianceType, CriticalValue, HcType};
    pub use crate::report::render;
    pub use crate::runner::RegressionRunner;
    pub use crate::solvers::{FittedOls, FittedRegressor, OlsRegressor, Regressor};
}

pub use crate::core::{EffectEstimate, ModelSpec};
pub use crate::error::AnalysisError;
pub use crate::runner::RegressionRunner;
