//! Core types: observations, dataset loading, model specification and results.

mod dataset;
mod estimate;
mod frame;
mod na_action;
mod observation;
mod options;
mod result;

pub use dataset::{load_observations, read_observations, Dataset, MISSING_TOKENS, REQUIRED_COLUMNS};
pub use estimate::{to_speedup, EffectEstimate, IntervalEstimate};
pub use frame::{ModelFrame, TREATMENT};
pub use na_action::PostReviewImputation;
pub use observation::{Column, Observation};
pub use options::{
    Covariate, EstimatorKind, MissingPostReview, ModelSpec, ModelSpecBuilder, OptionsError,
    StdErrorSpec,
};
pub use result::RegressionResult;
