//! Fatal errors of an analysis run.

use crate::core::OptionsError;
use crate::solvers::RegressionError;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop the analysis. None of these are retried and no
/// partial result is produced.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The input path does not resolve to a file.
    #[error("input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// The input exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Missing column, malformed CSV, or a cell of the wrong type.
    #[error("schema error: {0}")]
    Schema(String),

    /// Not enough usable observations (or clusters, or treatment variation).
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Singular or near-singular design, or another numerical failure.
    #[error("numerical error: {0}")]
    Numerical(String),

    /// Invalid model configuration.
    #[error(transparent)]
    Options(#[from] OptionsError),
}

impl From<RegressionError> for AnalysisError {
    fn from(err: RegressionError) -> Self {
        match err {
            RegressionError::InsufficientObservations { .. } => {
                AnalysisError::InsufficientData(err.to_string())
            }
            RegressionError::RankDeficient { .. }
            | RegressionError::DimensionMismatch { .. }
            | RegressionError::NumericalError(_) => AnalysisError::Numerical(err.to_string()),
        }
    }
}
