//! Model specification: covariates, missing-data policy and the standard
//! error estimators to report.
//!
//! The defaults reproduce the published regression:
//! `log(total time) ~ ai_treatment + log(predicted_time_no_ai)`, reported
//! with normal-approximation 95% intervals under homoskedastic, HC3 and
//! developer-clustered standard errors.

use crate::core::observation::{Column, Observation};
use crate::inference::{CriticalValue, HcType};
use thiserror::Error;

/// Errors raised by [`ModelSpecBuilder::build`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptionsError {
    #[error("confidence level must be in (0, 1), got {0}")]
    InvalidConfidenceLevel(f64),
    #[error("at least one standard error estimator is required")]
    NoEstimators,
    #[error("covariate '{0}' is listed more than once")]
    DuplicateCovariate(&'static str),
}

/// A regressor added next to the treatment indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Covariate {
    /// `ln(predicted_time_no_ai)`, the developer's own forecast without AI.
    LogPredictedTimeNoAi,
    /// `ln(predicted_time_ai_allowed)`.
    LogPredictedTimeAiAllowed,
    /// Prior task exposure rating (1–5), entered linearly.
    PriorTaskExposure,
    /// External resource needs rating (1–3), entered linearly.
    ExternalResourceNeeds,
}

impl Covariate {
    /// Regressor name.
    pub fn name(&self) -> &'static str {
        match self {
            Covariate::LogPredictedTimeNoAi => "log_predicted_time_no_ai",
            Covariate::LogPredictedTimeAiAllowed => "log_predicted_time_ai_allowed",
            Covariate::PriorTaskExposure => "prior_task_exposure",
            Covariate::ExternalResourceNeeds => "external_resource_needs",
        }
    }

    /// Source column in the observation table.
    pub fn column(&self) -> Column {
        match self {
            Covariate::LogPredictedTimeNoAi => Column::PredictedTimeNoAi,
            Covariate::LogPredictedTimeAiAllowed => Column::PredictedTimeAiAllowed,
            Covariate::PriorTaskExposure => Column::PriorTaskExposure,
            Covariate::ExternalResourceNeeds => Column::ExternalResourceNeeds,
        }
    }

    /// Regressor value for one observation; `None` if missing or not finite.
    pub fn value(&self, obs: &Observation) -> Option<f64> {
        let v = match self {
            Covariate::LogPredictedTimeNoAi => obs.predicted_time_no_ai.map(f64::ln),
            Covariate::LogPredictedTimeAiAllowed => obs.predicted_time_ai_allowed.map(f64::ln),
            Covariate::PriorTaskExposure => obs.prior_task_exposure.map(f64::from),
            Covariate::ExternalResourceNeeds => obs.external_resource_needs.map(f64::from),
        };
        v.filter(|x| x.is_finite())
    }
}

/// What to do with rows that lack a post-review fix-up time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPostReview {
    /// Fill with the mean post-review time of the row's treatment group.
    #[default]
    ImputeGroupMean,
    /// Exclude the row from the fit.
    Drop,
}

/// Standard error estimator family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimatorKind {
    /// Classical OLS covariance.
    Homoskedastic,
    /// Heteroskedasticity-consistent covariance.
    Robust(HcType),
    /// One-way cluster-robust covariance by developer.
    ClusteredByDeveloper,
}

/// A labelled standard error estimator to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StdErrorSpec {
    /// Label printed in the report.
    pub label: String,
    pub kind: EstimatorKind,
}

impl StdErrorSpec {
    pub fn new(label: impl Into<String>, kind: EstimatorKind) -> Self {
        Self {
            label: label.into(),
            kind,
        }
    }

    /// The three estimators of the published analysis.
    pub fn reference_set() -> Vec<StdErrorSpec> {
        vec![
            StdErrorSpec::new("Homoskedastic", EstimatorKind::Homoskedastic),
            StdErrorSpec::new("Robust (HC3)", EstimatorKind::Robust(HcType::HC3)),
            StdErrorSpec::new("Clustered By Dev", EstimatorKind::ClusteredByDeveloper),
        ]
    }
}

/// Full specification of the regression to run.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSpec {
    covariates: Vec<Covariate>,
    missing_post_review: MissingPostReview,
    confidence_level: f64,
    critical_value: CriticalValue,
    estimators: Vec<StdErrorSpec>,
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self {
            covariates: vec![Covariate::LogPredictedTimeNoAi],
            missing_post_review: MissingPostReview::ImputeGroupMean,
            confidence_level: 0.95,
            critical_value: CriticalValue::Normal,
            estimators: StdErrorSpec::reference_set(),
        }
    }
}

impl ModelSpec {
    /// Create a builder starting from the default specification.
    pub fn builder() -> ModelSpecBuilder {
        ModelSpecBuilder::default()
    }

    pub fn covariates(&self) -> &[Covariate] {
        &self.covariates
    }

    pub fn missing_post_review(&self) -> MissingPostReview {
        self.missing_post_review
    }

    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    pub fn critical_value(&self) -> CriticalValue {
        self.critical_value
    }

    pub fn estimators(&self) -> &[StdErrorSpec] {
        &self.estimators
    }

    /// Whether any estimator clusters by developer.
    pub fn needs_clusters(&self) -> bool {
        self.estimators
            .iter()
            .any(|e| e.kind == EstimatorKind::ClusteredByDeveloper)
    }

    /// Number of regressors, intercept and treatment included.
    pub fn n_parameters(&self) -> usize {
        2 + self.covariates.len()
    }
}

/// Builder for [`ModelSpec`].
#[derive(Debug, Clone, Default)]
pub struct ModelSpecBuilder {
    spec: ModelSpec,
}

impl ModelSpecBuilder {
    /// Replace the covariate list. An empty list gives the treatment-only model.
    pub fn covariates(mut self, covariates: impl IntoIterator<Item = Covariate>) -> Self {
        self.spec.covariates = covariates.into_iter().collect();
        self
    }

    /// Treatment-only model (intercept + treatment).
    pub fn treatment_only(mut self) -> Self {
        self.spec.covariates.clear();
        self
    }

    /// Handling of missing post-review time.
    ///
    /// Default is [`MissingPostReview::ImputeGroupMean`].
    pub fn missing_post_review(mut self, policy: MissingPostReview) -> Self {
        self.spec.missing_post_review = policy;
        self
    }

    /// Confidence level for intervals.
    ///
    /// Default is 0.95.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.spec.confidence_level = level;
        self
    }

    /// Reference distribution for the critical value.
    ///
    /// Default is the standard normal.
    pub fn critical_value(mut self, dist: CriticalValue) -> Self {
        self.spec.critical_value = dist;
        self
    }

    /// Replace the list of reported estimators.
    pub fn estimators(mut self, estimators: impl IntoIterator<Item = StdErrorSpec>) -> Self {
        self.spec.estimators = estimators.into_iter().collect();
        self
    }

    /// Validate and build the model.
    pub fn build(self) -> Result<ModelSpec, OptionsError> {
        let spec = self.spec;

        if !(spec.confidence_level > 0.0 && spec.confidence_level < 1.0) {
            return Err(OptionsError::InvalidConfidenceLevel(spec.confidence_level));
        }
        if spec.estimators.is_empty() {
            return Err(OptionsError::NoEstimators);
        }
        for (i, cov) in spec.covariates.iter().enumerate() {
            if spec.covariates[..i].contains(cov) {
                return Err(OptionsError::DuplicateCovariate(cov.name()));
            }
        }

        Ok(spec)
    }
}
