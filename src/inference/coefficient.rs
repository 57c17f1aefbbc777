//! Wald inference for a single coefficient.

use crate::solvers::RegressionError;
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// Reference distribution for critical values and p-values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CriticalValue {
    /// Standard normal (large-sample Wald).
    #[default]
    Normal,
    /// Student t with the residual degrees of freedom.
    StudentT,
}

/// Inference for one coefficient under one covariance estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoefficientInference {
    /// Point estimate.
    pub estimate: f64,
    /// Standard error.
    pub std_error: f64,
    /// `estimate / std_error`.
    pub statistic: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    /// Two-sided critical value used for the interval.
    pub critical_value: f64,
    /// Confidence interval (lower, upper).
    pub conf_interval: (f64, f64),
}

impl CoefficientInference {
    /// Wald statistic, interval and p-value for `estimate` with standard error `std_error`.
    ///
    /// `df` is only consulted for [`CriticalValue::StudentT`].
    pub fn wald(
        estimate: f64,
        std_error: f64,
        distribution: CriticalValue,
        df: usize,
        confidence_level: f64,
    ) -> Result<Self, RegressionError> {
        if !(confidence_level > 0.0 && confidence_level < 1.0) {
            return Err(RegressionError::NumericalError(format!(
                "confidence level must be in (0, 1), got {confidence_level}"
            )));
        }
        if !std_error.is_finite() || std_error < 0.0 {
            return Err(RegressionError::NumericalError(format!(
                "invalid standard error {std_error}"
            )));
        }

        let upper_tail = 1.0 - (1.0 - confidence_level) / 2.0;
        let statistic = if std_error > 0.0 {
            estimate / std_error
        } else {
            f64::NAN
        };

        let (critical_value, p_value) = match distribution {
            CriticalValue::Normal => {
                let dist = Normal::new(0.0, 1.0)
                    .map_err(|e| RegressionError::NumericalError(e.to_string()))?;
                (dist.inverse_cdf(upper_tail), two_sided(&dist, statistic))
            }
            CriticalValue::StudentT => {
                if df == 0 {
                    return Err(RegressionError::InsufficientObservations { needed: 1, got: 0 });
                }
                let dist = StudentsT::new(0.0, 1.0, df as f64)
                    .map_err(|e| RegressionError::NumericalError(e.to_string()))?;
                (dist.inverse_cdf(upper_tail), two_sided(&dist, statistic))
            }
        };

        Ok(Self {
            estimate,
            std_error,
            statistic,
            p_value,
            critical_value,
            conf_interval: wald_interval(estimate, std_error, critical_value),
        })
    }
}

/// `(estimate - crit·se, estimate + crit·se)`.
pub fn wald_interval(estimate: f64, std_error: f64, critical_value: f64) -> (f64, f64) {
    (
        estimate - critical_value * std_error,
        estimate + critical_value * std_error,
    )
}

fn two_sided<D: ContinuousCDF<f64, f64>>(dist: &D, statistic: f64) -> f64 {
    if statistic.is_finite() {
        2.0 * (1.0 - dist.cdf(statistic.abs()))
    } else {
        f64::NAN
    }
}
