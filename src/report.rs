//! Plain-text report written to standard output.
//!
//! The lines are compared byte for byte against the published output, so the
//! wording (including "calculed") and number rendering are fixed.

use crate::core::EffectEstimate;
use std::fmt::Write;

/// Decimal places shown for every reported number.
pub const REPORT_DECIMALS: usize = 3;

/// Render the full report, one line per item, each terminated by `\n`.
pub fn render(estimate: &EffectEstimate) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(
        out,
        "Regression calculated speedup of: {}",
        format_number(estimate.speedup)
    );
    for interval in &estimate.intervals {
        let (lo, hi) = interval.speedup_interval;
        let _ = writeln!(
            out,
            "CI calculed with stderr={}: ({}, {})",
            interval.label,
            format_number(lo),
            format_number(hi)
        );
    }
    out
}

/// Round to [`REPORT_DECIMALS`] places and print the shortest decimal that
/// round-trips, keeping at least one fractional digit: `0.39`, `1.0`, `-0.0`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let fixed = format!("{:.*}", REPORT_DECIMALS, value);
    let rounded: f64 = fixed.parse().unwrap_or(value);
    let shortest = rounded.to_string();
    if shortest.contains('.') {
        shortest
    } else {
        format!("{shortest}.0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IntervalEstimate;
    use crate::inference::{CoefficientInference, CriticalValue};

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.18812), "0.188");
        assert_eq!(format_number(0.3901), "0.39");
        assert_eq!(format_number(0.0129), "0.013");
        assert_eq!(format_number(1.0), "1.0");
        assert_eq!(format_number(-0.0001), "-0.0");
        assert_eq!(format_number(-0.2468), "-0.247");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(f64::NAN), "nan");
        assert_eq!(format_number(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_render() {
        let interval = |label: &str, lo: f64, hi: f64| IntervalEstimate {
            label: label.to_string(),
            inference: CoefficientInference::wald(0.17, 0.09, CriticalValue::Normal, 100, 0.95)
                .unwrap(),
            speedup_interval: (lo, hi),
        };
        let estimate = EffectEstimate {
            beta: 0.1724,
            speedup: 0.18815,
            n_observations: 246,
            n_clusters: 16,
            intervals: vec![
                interval("Homoskedastic", 0.01295, 0.39466),
                interval("Robust (HC3)", 0.01301, 0.39401),
                interval("Clustered By Dev", 0.01613, 0.39004),
            ],
        };

        assert_eq!(
            render(&estimate),
            "Regression calculated speedup of: 0.188\n\
             CI calculed with stderr=Homoskedastic: (0.013, 0.395)\n\
             CI calculed with stderr=Robust (HC3): (0.013, 0.394)\n\
             CI calculed with stderr=Clustered By Dev: (0.016, 0.39)\n"
        );
    }
}
