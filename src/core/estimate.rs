//! Treatment-effect estimate on the speedup scale.

use crate::inference::CoefficientInference;

/// Map a log-scale effect to the proportional change in expected time, `exp(x) - 1`.
///
/// Called "speedup" after the published analysis even though a positive
/// value is a longer expected completion time for `ai_treatment = 1`.
pub fn to_speedup(log_effect: f64) -> f64 {
    log_effect.exp_m1()
}

/// Interval for the treatment effect under one standard error estimator.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalEstimate {
    /// Estimator label, e.g. `"Robust (HC3)"`.
    pub label: String,
    /// Log-scale inference for the treatment coefficient.
    pub inference: CoefficientInference,
    /// Interval endpoints mapped through `exp(x) - 1`.
    pub speedup_interval: (f64, f64),
}

/// Result of the regression run.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectEstimate {
    /// Treatment coefficient β on `ln(time)`.
    pub beta: f64,
    /// `exp(β) - 1`.
    pub speedup: f64,
    /// Rows used in the fit.
    pub n_observations: usize,
    /// Distinct developers among those rows.
    pub n_clusters: usize,
    /// One entry per configured estimator, in configuration order.
    pub intervals: Vec<IntervalEstimate>,
}

impl EffectEstimate {
    /// Interval for the estimator with the given label.
    pub fn interval(&self, label: &str) -> Option<&IntervalEstimate> {
        self.intervals.iter().find(|i| i.label == label)
    }
}
