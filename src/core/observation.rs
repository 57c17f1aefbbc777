//! One (developer, issue) observation of the study.

/// Columns of the observation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    DevId,
    IssueId,
    PredictedTimeNoAi,
    PredictedTimeAiAllowed,
    PriorTaskExposure,
    ExternalResourceNeeds,
    AiTreatment,
    InitialImplementationTime,
    PostReviewImplementationTime,
}

impl Column {
    /// Every known column, in file order.
    pub const ALL: [Column; 9] = [
        Column::DevId,
        Column::IssueId,
        Column::PredictedTimeNoAi,
        Column::PredictedTimeAiAllowed,
        Column::PriorTaskExposure,
        Column::ExternalResourceNeeds,
        Column::AiTreatment,
        Column::InitialImplementationTime,
        Column::PostReviewImplementationTime,
    ];

    /// Header name in the CSV file.
    pub fn header(&self) -> &'static str {
        match self {
            Column::DevId => "dev_id",
            Column::IssueId => "issue_id",
            Column::PredictedTimeNoAi => "predicted_time_no_ai",
            Column::PredictedTimeAiAllowed => "predicted_time_ai_allowed",
            Column::PriorTaskExposure => "Prior Task Exposure (1-5)",
            Column::ExternalResourceNeeds => "External Resource Needs (1-3)",
            Column::AiTreatment => "ai_treatment",
            Column::InitialImplementationTime => "initial_implementation_time",
            Column::PostReviewImplementationTime => "post_review_implementation_time",
        }
    }
}

/// A single completed issue. Missing cells are `None`.
///
/// `ai_treatment` is `Some(true)` when AI tools were disallowed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Observation {
    pub dev_id: Option<u64>,
    pub issue_id: Option<u64>,
    /// Minutes.
    pub predicted_time_no_ai: Option<f64>,
    /// Minutes.
    pub predicted_time_ai_allowed: Option<f64>,
    /// 1–5.
    pub prior_task_exposure: Option<u8>,
    /// 1–3.
    pub external_resource_needs: Option<u8>,
    pub ai_treatment: Option<bool>,
    /// Minutes.
    pub initial_implementation_time: Option<f64>,
    /// Minutes.
    pub post_review_implementation_time: Option<f64>,
}

impl Observation {
    /// Treatment as a 0/1 regressor.
    pub fn treatment_indicator(&self) -> Option<f64> {
        self.ai_treatment.map(|t| if t { 1.0 } else { 0.0 })
    }

    /// Total ordering used to make downstream computation independent of file row order.
    pub(crate) fn canonical_cmp(&self, other: &Self) -> std::cmp::Ordering {
        fn float(a: Option<f64>, b: Option<f64>) -> std::cmp::Ordering {
            match (a, b) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                (a, b) => a.is_some().cmp(&b.is_some()),
            }
        }

        self.dev_id
            .cmp(&other.dev_id)
            .then(self.issue_id.cmp(&other.issue_id))
            .then(self.ai_treatment.cmp(&other.ai_treatment))
            .then(float(
                self.initial_implementation_time,
                other.initial_implementation_time,
            ))
            .then(float(
                self.post_review_implementation_time,
                other.post_review_implementation_time,
            ))
            .then(float(self.predicted_time_no_ai, other.predicted_time_no_ai))
            .then(float(
                self.predicted_time_ai_allowed,
                other.predicted_time_ai_allowed,
            ))
            .then(self.prior_task_exposure.cmp(&other.prior_task_exposure))
            .then(
                self.external_resource_needs
                    .cmp(&other.external_resource_needs),
            )
    }
}
