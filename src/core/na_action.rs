//! Imputation of missing post-review fix-up time.
//!
//! About one in eight issues has no recorded post-review time. Those rows
//! are assigned the mean post-review time of their own treatment group, so
//! the completion-time outcome `initial + post_review` is defined for them
//! without borrowing information across arms.

use crate::core::observation::Observation;

/// Per-treatment-group mean post-review time, estimated once from the data.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PostReviewImputation {
    /// Index 0: AI allowed, index 1: AI disallowed.
    group_means: [Option<f64>; 2],
}

impl PostReviewImputation {
    /// Estimate group means over rows whose treatment and post-review time are both present.
    pub fn fit(observations: &[Observation]) -> Self {
        let mut sums = [0.0_f64; 2];
        let mut counts = [0_usize; 2];

        for obs in observations {
            if let (Some(treated), Some(post)) =
                (obs.ai_treatment, obs.post_review_implementation_time)
            {
                let g = usize::from(treated);
                sums[g] += post;
                counts[g] += 1;
            }
        }

        let mean = |g: usize| (counts[g] > 0).then(|| sums[g] / counts[g] as f64);
        Self {
            group_means: [mean(0), mean(1)],
        }
    }

    /// Mean post-review time of a treatment group, if the group has any observed value.
    pub fn group_mean(&self, ai_disallowed: bool) -> Option<f64> {
        self.group_means[usize::from(ai_disallowed)]
    }

    /// Observed post-review time, or the group mean when it is missing.
    pub fn post_review_time(&self, obs: &Observation) -> Option<f64> {
        obs.post_review_implementation_time
            .or_else(|| obs.ai_treatment.and_then(|t| self.group_mean(t)))
    }

    /// Whether `obs` would receive an imputed value.
    pub fn imputes(&self, obs: &Observation) -> bool {
        obs.post_review_implementation_time.is_none() && self.post_review_time(obs).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(treated: Option<bool>, post: Option<f64>) -> Observation {
        Observation {
            ai_treatment: treated,
            initial_implementation_time: Some(60.0),
            post_review_implementation_time: post,
            ..Default::default()
        }
    }

    #[test]
    fn test_group_means_are_separate() {
        let data = vec![
            obs(Some(false), Some(10.0)),
            obs(Some(false), Some(20.0)),
            obs(Some(true), Some(40.0)),
            obs(Some(true), None),
            obs(None, Some(1000.0)),
        ];
        let imputation = PostReviewImputation::fit(&data);

        assert_eq!(imputation.group_mean(false), Some(15.0));
        assert_eq!(imputation.group_mean(true), Some(40.0));
        assert_eq!(imputation.post_review_time(&data[3]), Some(40.0));
        assert_eq!(imputation.post_review_time(&data[0]), Some(10.0));
        assert!(imputation.imputes(&data[3]));
        assert!(!imputation.imputes(&data[0]));
    }

    #[test]
    fn test_group_without_observed_values() {
        let data = vec![obs(Some(false), Some(10.0)), obs(Some(true), None)];
        let imputation = PostReviewImputation::fit(&data);

        assert_eq!(imputation.group_mean(true), None);
        assert_eq!(imputation.post_review_time(&data[1]), None);
        assert!(!imputation.imputes(&data[1]));
    }

    #[test]
    fn test_missing_treatment_is_not_imputed() {
        let data = vec![obs(Some(false), Some(10.0)), obs(None, None)];
        let imputation = PostReviewImputation::fit(&data);
        assert_eq!(imputation.post_review_time(&data[1]), None);
    }
}
