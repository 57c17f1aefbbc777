//! Condition number of the regression design.
//!
//! κ(X) = σ_max / σ_min over the singular values of the design matrix. The
//! QR solver already rejects exactly dependent columns; this diagnostic
//! reports how close the accepted design is to that boundary.
//!
//! # Interpretation
//!
//! - κ < 30: well-conditioned
//! - 30 ≤ κ < 100: moderate collinearity
//! - 100 ≤ κ < 1000: high collinearity
//! - κ ≥ 1000: severe collinearity
//!
//! # References
//!
//! - Belsley, D.A., Kuh, E. and Welsch, R.E. (1980). Regression Diagnostics.

use crate::solvers::design_matrix;
use faer::Mat;

/// Condition number severity classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionSeverity {
    /// κ < 30
    WellConditioned,
    /// 30 ≤ κ < 100
    Moderate,
    /// 100 ≤ κ < 1000
    High,
    /// κ ≥ 1000
    Severe,
}

impl ConditionSeverity {
    /// Classify a condition number.
    pub fn classify(cond: f64) -> Self {
        if cond < 30.0 {
            Self::WellConditioned
        } else if cond < 100.0 {
            Self::Moderate
        } else if cond < 1000.0 {
            Self::High
        } else {
            Self::Severe
        }
    }

    /// Human-readable description of the severity.
    pub fn description(&self) -> &'static str {
        match self {
            Self::WellConditioned => "well-conditioned",
            Self::Moderate => "moderate collinearity",
            Self::High => "high collinearity, coefficients may be unstable",
            Self::Severe => "severe collinearity, coefficients are likely unreliable",
        }
    }
}

/// Singular values and condition number of a design.
#[derive(Debug, Clone)]
pub struct ConditionDiagnostic {
    /// κ(X), infinite when the design is rank deficient.
    pub condition_number: f64,
    /// Singular values, sorted descending.
    pub singular_values: Vec<f64>,
    /// Severity classification of `condition_number`.
    pub severity: ConditionSeverity,
}

/// Compute the condition diagnostic of `x`, with an intercept column prepended if requested.
pub fn condition_diagnostic(x: &Mat<f64>, with_intercept: bool) -> ConditionDiagnostic {
    let design = design_matrix(x, with_intercept);

    let mut singular_values: Vec<f64> = match design.svd() {
        Ok(svd) => {
            let s = svd.S();
            let s_col = s.column_vector();
            (0..s_col.nrows()).map(|i| s_col[i]).collect()
        }
        Err(_) => Vec::new(),
    };
    singular_values.sort_by(|a, b| b.total_cmp(a));

    let condition_number = match (singular_values.first(), singular_values.last()) {
        (Some(&s_max), Some(&s_min)) if s_min > 0.0 => s_max / s_min,
        _ => f64::INFINITY,
    };

    ConditionDiagnostic {
        condition_number,
        singular_values,
        severity: ConditionSeverity::classify(condition_number),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orthonormal_columns() {
        // Two orthogonal unit columns
        let x = Mat::from_fn(4, 2, |i, j| if i == j { 1.0 } else { 0.0 });
        let cond = condition_diagnostic(&x, false).condition_number;
        assert!((cond - 1.0).abs() < 1e-10, "got {}", cond);
    }

    #[test]
    fn test_nearly_collinear() {
        let x = Mat::from_fn(100, 2, |i, j| if j == 0 { i as f64 } else { i as f64 + 0.001 });
        let diag = condition_diagnostic(&x, false);
        assert!(diag.condition_number > 100.0);
        assert_eq!(diag.singular_values.len(), 2);
        assert!(diag.singular_values[0] >= diag.singular_values[1]);
    }

    #[test]
    fn test_constant_feature_with_intercept_is_singular() {
        let x = Mat::from_fn(10, 1, |_, _| 3.0);
        let diag = condition_diagnostic(&x, true);
        assert!(diag.condition_number > 1e10);
        assert_eq!(diag.severity, ConditionSeverity::Severe);
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            ConditionSeverity::classify(10.0),
            ConditionSeverity::WellConditioned
        );
        assert_eq!(ConditionSeverity::classify(50.0), ConditionSeverity::Moderate);
        assert_eq!(ConditionSeverity::classify(500.0), ConditionSeverity::High);
        assert_eq!(ConditionSeverity::classify(5000.0), ConditionSeverity::Severe);
        assert_eq!(
            ConditionSeverity::classify(f64::INFINITY),
            ConditionSeverity::Severe
        );
    }
}
