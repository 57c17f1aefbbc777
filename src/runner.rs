//! End-to-end regression run: load, build the model frame, fit, and derive
//! one interval per configured standard error estimator.

use crate::core::{
    load_observations, to_speedup, Dataset, EffectEstimate, EstimatorKind, IntervalEstimate,
    ModelFrame, ModelSpec,
};
use crate::diagnostics::{condition_diagnostic, high_leverage_points, ConditionSeverity};
use crate::error::AnalysisError;
use crate::inference::{count_clusters, CoefficientInference, CovarianceType};
use crate::solvers::{FittedRegressor, OlsRegressor, Regressor};
use std::path::Path;
use tracing::{debug, info, warn};

/// Runs the treatment-effect regression described by a [`ModelSpec`].
#[derive(Debug, Clone, Default)]
pub struct RegressionRunner {
    spec: ModelSpec,
}

impl RegressionRunner {
    pub fn new(spec: ModelSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    /// Load the observation table at `path` and run the regression.
    pub fn run(&self, path: &Path) -> Result<EffectEstimate, AnalysisError> {
        let dataset = load_observations(path)?;
        self.run_dataset(&dataset)
    }

    /// Run the regression on an already loaded dataset.
    pub fn run_dataset(&self, dataset: &Dataset) -> Result<EffectEstimate, AnalysisError> {
        let frame = ModelFrame::build(dataset, &self.spec)?;
        let n = frame.n_observations();

        let n_clusters = count_clusters(&frame.groups);
        if self.spec.needs_clusters() && n_clusters < 2 {
            return Err(AnalysisError::InsufficientData(format!(
                "cluster-robust errors need at least 2 developers, found {n_clusters}"
            )));
        }

        let condition = condition_diagnostic(&frame.x, true);
        debug!(
            condition_number = condition.condition_number,
            severity = condition.severity.description(),
            "design conditioning"
        );
        if matches!(
            condition.severity,
            ConditionSeverity::High | ConditionSeverity::Severe
        ) {
            warn!(
                condition_number = condition.condition_number,
                "{}",
                condition.severity.description()
            );
        }

        let fitted = OlsRegressor::builder()
            .with_intercept(true)
            .build()
            .fit(&frame.x, &frame.y)?;

        let high_leverage =
            high_leverage_points(&fitted.leverage(&frame.x), fitted.result().n_parameters, None);
        debug!(
            count = high_leverage.len(),
            rows = ?high_leverage,
            "observations above 2k/n leverage"
        );

        // Treatment is feature 0
        let beta = fitted.coefficients()[0];
        let treatment_index = fitted.design_index(0);
        let speedup = to_speedup(beta);
        info!(
            beta,
            speedup,
            r_squared = fitted.result().r_squared,
            observations = n,
            developers = n_clusters,
            "fitted treatment effect"
        );

        let mut intervals = Vec::with_capacity(self.spec.estimators().len());
        for estimator in self.spec.estimators() {
            let cov_type = match estimator.kind {
                EstimatorKind::Homoskedastic => CovarianceType::NonRobust,
                EstimatorKind::Robust(hc_type) => CovarianceType::Hc(hc_type),
                EstimatorKind::ClusteredByDeveloper => CovarianceType::Cluster(frame.groups.clone()),
            };

            let std_errors = fitted.std_errors(&frame.x, &cov_type)?;
            let inference = CoefficientInference::wald(
                beta,
                std_errors[treatment_index],
                self.spec.critical_value(),
                fitted.residual_df(),
                self.spec.confidence_level(),
            )?;
            let (lo, hi) = inference.conf_interval;
            let speedup_interval = (to_speedup(lo), to_speedup(hi));

            debug!(
                estimator = %estimator.label,
                std_error = inference.std_error,
                statistic = inference.statistic,
                p_value = inference.p_value,
                lower = speedup_interval.0,
                upper = speedup_interval.1,
                "treatment interval"
            );

            intervals.push(IntervalEstimate {
                label: estimator.label.clone(),
                inference,
                speedup_interval,
            });
        }

        Ok(EffectEstimate {
            beta,
            speedup,
            n_observations: n,
            n_clusters,
            intervals,
        })
    }
}
