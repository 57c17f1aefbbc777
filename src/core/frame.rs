//! Model frame: the numeric design, response and cluster labels of the
//! rows that survive missing-data handling.

use crate::core::dataset::Dataset;
use crate::core::na_action::PostReviewImputation;
use crate::core::observation::{Column, Observation};
use crate::core::options::{MissingPostReview, ModelSpec};
use crate::error::AnalysisError;
use faer::{Col, Mat};
use tracing::{debug, info};

/// Name of the treatment regressor; always the first feature column.
pub const TREATMENT: &str = "ai_treatment";

/// Numeric inputs of the regression.
#[derive(Debug, Clone)]
pub struct ModelFrame {
    /// Features without intercept: treatment first, then covariates in configured order.
    pub x: Mat<f64>,
    /// `ln(total implementation time)`.
    pub y: Col<f64>,
    /// Developer id of each row.
    pub groups: Vec<u64>,
    /// Feature names, aligned with the columns of `x`.
    pub feature_names: Vec<&'static str>,
    /// Rows excluded for missing or unusable values.
    pub n_dropped: usize,
    /// Retained rows whose post-review time was imputed.
    pub n_imputed: usize,
}

/// Why a row was left out of the fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DropReason {
    MissingDeveloper,
    MissingTreatment,
    MissingInitialTime,
    MissingPostReviewTime,
    NonPositiveTotalTime,
    MissingCovariate(&'static str),
}

struct Row {
    features: Vec<f64>,
    response: f64,
    group: u64,
    imputed: bool,
}

impl ModelFrame {
    /// Build the frame for `spec` from a loaded dataset.
    pub fn build(dataset: &Dataset, spec: &ModelSpec) -> Result<Self, AnalysisError> {
        let mut required = vec![
            Column::DevId,
            Column::AiTreatment,
            Column::InitialImplementationTime,
            Column::PostReviewImplementationTime,
        ];
        required.extend(spec.covariates().iter().map(|c| c.column()));
        for column in required {
            if !dataset.has_column(column) {
                return Err(AnalysisError::Schema(format!(
                    "model requires column '{}', which is not in the input",
                    column.header()
                )));
            }
        }

        let imputation = match spec.missing_post_review() {
            MissingPostReview::ImputeGroupMean => {
                let imputation = PostReviewImputation::fit(dataset.observations());
                debug!(
                    mean_ai_allowed = ?imputation.group_mean(false),
                    mean_ai_disallowed = ?imputation.group_mean(true),
                    "post-review time group means"
                );
                Some(imputation)
            }
            MissingPostReview::Drop => None,
        };

        let mut rows = Vec::with_capacity(dataset.len());
        let mut n_dropped = 0;
        for obs in dataset.observations() {
            match Self::row(obs, spec, imputation.as_ref()) {
                Ok(row) => rows.push(row),
                Err(reason) => {
                    n_dropped += 1;
                    debug!(
                        dev_id = ?obs.dev_id,
                        issue_id = ?obs.issue_id,
                        ?reason,
                        "dropping observation"
                    );
                }
            }
        }

        let n = rows.len();
        let k = spec.n_parameters();
        if n == 0 {
            return Err(AnalysisError::InsufficientData(
                "no observations remain after dropping incomplete rows".to_string(),
            ));
        }
        if n <= k {
            return Err(AnalysisError::InsufficientData(format!(
                "{n} usable observations for {k} parameters"
            )));
        }
        let n_treated = rows.iter().filter(|r| r.features[0] == 1.0).count();
        if n_treated == 0 || n_treated == n {
            return Err(AnalysisError::InsufficientData(format!(
                "treatment indicator has no variation: all {n} usable rows have ai_treatment = {}",
                u8::from(n_treated == n)
            )));
        }

        let p = k - 1;
        let n_imputed = rows.iter().filter(|r| r.imputed).count();
        let frame = ModelFrame {
            x: Mat::from_fn(n, p, |i, j| rows[i].features[j]),
            y: Col::from_fn(n, |i| rows[i].response),
            groups: rows.iter().map(|r| r.group).collect(),
            feature_names: std::iter::once(TREATMENT)
                .chain(spec.covariates().iter().map(|c| c.name()))
                .collect(),
            n_dropped,
            n_imputed,
        };

        info!(
            rows = n,
            dropped = n_dropped,
            imputed = n_imputed,
            treated = n_treated,
            "built model frame"
        );
        Ok(frame)
    }

    fn row(
        obs: &Observation,
        spec: &ModelSpec,
        imputation: Option<&PostReviewImputation>,
    ) -> Result<Row, DropReason> {
        let group = obs.dev_id.ok_or(DropReason::MissingDeveloper)?;
        let treatment = obs
            .treatment_indicator()
            .ok_or(DropReason::MissingTreatment)?;
        let initial = obs
            .initial_implementation_time
            .ok_or(DropReason::MissingInitialTime)?;
        let post_review = match imputation {
            Some(imp) => imp.post_review_time(obs),
            None => obs.post_review_implementation_time,
        }
        .ok_or(DropReason::MissingPostReviewTime)?;

        let response = (initial + post_review).ln();
        if !response.is_finite() {
            return Err(DropReason::NonPositiveTotalTime);
        }

        let mut features = Vec::with_capacity(spec.n_parameters() - 1);
        features.push(treatment);
        for cov in spec.covariates() {
            features.push(
                cov.value(obs)
                    .ok_or(DropReason::MissingCovariate(cov.name()))?,
            );
        }

        Ok(Row {
            features,
            response,
            group,
            imputed: imputation.is_some_and(|imp| imp.imputes(obs)),
        })
    }

    /// Number of rows in the frame.
    pub fn n_observations(&self) -> usize {
        self.x.nrows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dataset::read_observations;

    const HEADER: &str = "dev_id,issue_id,predicted_time_no_ai,ai_treatment,\
initial_implementation_time,post_review_implementation_time";

    fn dataset(body: &str) -> Dataset {
        read_observations(format!("{HEADER}\n{body}").as_bytes()).unwrap()
    }

    #[test]
    fn test_builds_log_outcome_and_covariate() {
        let ds = dataset("1,1,60,1,50,10\n1,2,30,0,20,\n2,3,90,0,80,20\n2,4,45,1,40,5\n");
        let frame = ModelFrame::build(&ds, &ModelSpec::default()).unwrap();

        assert_eq!(frame.n_observations(), 4);
        assert_eq!(frame.feature_names, vec![TREATMENT, "log_predicted_time_no_ai"]);
        assert_eq!(frame.n_imputed, 1);
        assert_eq!(frame.groups, vec![1, 1, 2, 2]);

        // Row (dev 1, issue 2): treatment 0, post-review imputed as 20 (mean of group 0)
        assert_eq!(frame.x[(1, 0)], 0.0);
        assert!((frame.y[1] - 40.0_f64.ln()).abs() < 1e-12);
        assert!((frame.x[(1, 1)] - 30.0_f64.ln()).abs() < 1e-12);
        assert!((frame.y[0] - 60.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_drops_incomplete_rows() {
        let ds = dataset(
            "1,1,60,1,50,10\n1,2,30,,20,5\n2,3,90,0,,20\n2,4,45,1,40,5\n3,5,,0,10,1\n3,6,20,0,15,2\n,7,25,1,30,2\n4,8,30,0,25,5\n",
        );
        let frame = ModelFrame::build(&ds, &ModelSpec::default()).unwrap();

        // Missing treatment, missing initial time, missing covariate, missing developer
        assert_eq!(frame.n_dropped, 4);
        assert_eq!(frame.n_observations(), 4);
    }

    #[test]
    fn test_drop_policy_skips_missing_post_review() {
        let ds = dataset("1,1,60,1,50,10\n1,2,30,0,20,\n2,3,90,0,80,20\n2,4,45,1,40,5\n3,5,20,0,10,3\n");
        let spec = ModelSpec::builder()
            .missing_post_review(MissingPostReview::Drop)
            .build()
            .unwrap();
        let frame = ModelFrame::build(&ds, &spec).unwrap();
        assert_eq!(frame.n_observations(), 4);
        assert_eq!(frame.n_dropped, 1);
        assert_eq!(frame.n_imputed, 0);
    }

    #[test]
    fn test_treatment_without_variation() {
        let ds = dataset("1,1,60,1,50,10\n1,2,30,1,20,4\n2,3,90,1,80,20\n2,4,45,1,40,5\n");
        let err = ModelFrame::build(&ds, &ModelSpec::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData(_)));
    }

    #[test]
    fn test_too_few_rows() {
        let ds = dataset("1,1,60,1,50,10\n2,2,30,0,20,4\n");
        assert!(matches!(
            ModelFrame::build(&ds, &ModelSpec::default()),
            Err(AnalysisError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_no_rows_survive() {
        let ds = dataset("1,1,60,,50,10\n2,2,30,,20,4\n");
        assert!(matches!(
            ModelFrame::build(&ds, &ModelSpec::default()),
            Err(AnalysisError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_missing_covariate_column() {
        let ds = read_observations(
            "dev_id,ai_treatment,initial_implementation_time,post_review_implementation_time\n1,0,10,1\n"
                .as_bytes(),
        )
        .unwrap();
        assert!(matches!(
            ModelFrame::build(&ds, &ModelSpec::default()),
            Err(AnalysisError::Schema(_))
        ));
    }
}
