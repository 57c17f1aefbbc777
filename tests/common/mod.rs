//! Common test utilities and fixtures.

use ai_speedup::core::{read_observations, Dataset};
use ai_speedup::AnalysisError;

/// Synthetic study: 16 developers, 177 issues, ~12% missing post-review
/// time, one row without initial time and one without treatment.
#[allow(dead_code)]
pub const SYNTHETIC_STUDY: &str = include_str!("../data/synthetic_study.csv");

/// Absolute path of the synthetic study fixture.
#[allow(dead_code)]
pub fn synthetic_study_path() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/synthetic_study.csv")
}

/// Split a CSV document into its header line and data lines.
#[allow(dead_code)]
pub fn split_csv(text: &str) -> (&str, Vec<&str>) {
    let mut lines = text.lines().filter(|l| !l.is_empty());
    let header = lines.next().expect("fixture has a header");
    (header, lines.collect())
}

/// Join a header and data lines back into a CSV document.
#[allow(dead_code)]
pub fn join_csv(header: &str, rows: &[String]) -> String {
    let mut out = String::with_capacity(header.len() + rows.len() * 64);
    out.push_str(header);
    out.push('\n');
    for row in rows {
        out.push_str(row);
        out.push('\n');
    }
    out
}

/// Replace column `index` of every data line using `f`.
#[allow(dead_code)]
pub fn map_column(text: &str, index: usize, f: impl Fn(&str) -> String) -> String {
    let (header, rows) = split_csv(text);
    let rows: Vec<String> = rows
        .iter()
        .map(|line| {
            line.split(',')
                .enumerate()
                .map(|(i, cell)| if i == index { f(cell) } else { cell.to_string() })
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect();
    join_csv(header, &rows)
}

/// Parse a CSV document into a dataset.
#[allow(dead_code)]
pub fn dataset(text: &str) -> Dataset {
    read(text).expect("fixture parses")
}

/// Parse a CSV document, keeping the load error.
#[allow(dead_code)]
pub fn read(text: &str) -> Result<Dataset, AnalysisError> {
    read_observations(text.as_bytes())
}

/// Approximate equality check for floating point values.
#[allow(dead_code)]
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}
