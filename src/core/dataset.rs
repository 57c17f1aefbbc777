//! Loading the observation table from CSV.
//!
//! Columns are located by header name; unknown columns are ignored. A cell
//! is missing when it is empty or one of [`MISSING_TOKENS`]. A non-missing
//! cell that does not parse as its column's type is a schema error.

use crate::core::observation::{Column, Observation};
use crate::error::AnalysisError;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// Cell values treated as missing.
pub const MISSING_TOKENS: [&str; 6] = ["", "NA", "N/A", "NaN", "nan", "null"];

/// Columns every observation table must carry.
pub const REQUIRED_COLUMNS: [Column; 3] = [
    Column::DevId,
    Column::AiTreatment,
    Column::InitialImplementationTime,
];

/// A loaded observation table.
#[derive(Debug, Clone)]
pub struct Dataset {
    observations: Vec<Observation>,
    columns: Vec<Column>,
}

impl Dataset {
    /// Build a dataset, sorting observations into canonical order.
    pub fn new(mut observations: Vec<Observation>, mut columns: Vec<Column>) -> Self {
        observations.sort_by(Observation::canonical_cmp);
        columns.sort_unstable();
        columns.dedup();
        Self {
            observations,
            columns,
        }
    }

    /// Observations in canonical `(dev_id, issue_id)` order.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Whether the file carried `column` in its header.
    pub fn has_column(&self, column: Column) -> bool {
        self.columns.binary_search(&column).is_ok()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Load observations from a CSV file.
pub fn load_observations(path: &Path) -> Result<Dataset, AnalysisError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AnalysisError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => AnalysisError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let dataset = read_observations(BufReader::new(file))?;
    info!(
        path = %path.display(),
        rows = dataset.len(),
        "loaded observations"
    );
    Ok(dataset)
}

/// Parse observations from any CSV reader (one header row).
pub fn read_observations<R: Read>(reader: R) -> Result<Dataset, AnalysisError> {
    let mut reader = csv::Reader::from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AnalysisError::Schema(format!("failed to read CSV header: {e}")))?
        .clone();

    let mut index: BTreeMap<Column, usize> = BTreeMap::new();
    for column in Column::ALL {
        if let Some(pos) = headers.iter().position(|h| h.trim() == column.header()) {
            index.insert(column, pos);
        }
    }

    for column in REQUIRED_COLUMNS {
        if !index.contains_key(&column) {
            return Err(AnalysisError::Schema(format!(
                "required column '{}' not found",
                column.header()
            )));
        }
    }

    let mut observations = Vec::new();
    for result in reader.records() {
        let record =
            result.map_err(|e| AnalysisError::Schema(format!("malformed CSV: {e}")))?;
        let line = record.position().map_or(0, |p| p.line());
        let cell = |column: Column| {
            index
                .get(&column)
                .and_then(|&pos| record.get(pos))
                .map(str::trim)
                .filter(|raw| !MISSING_TOKENS.contains(raw))
        };
        let ctx = |column: Column| CellContext { column, line };

        observations.push(Observation {
            dev_id: cell(Column::DevId)
                .map(|raw| parse_id(raw, ctx(Column::DevId)))
                .transpose()?,
            issue_id: cell(Column::IssueId)
                .map(|raw| parse_id(raw, ctx(Column::IssueId)))
                .transpose()?,
            predicted_time_no_ai: cell(Column::PredictedTimeNoAi)
                .map(|raw| parse_minutes(raw, ctx(Column::PredictedTimeNoAi)))
                .transpose()?,
            predicted_time_ai_allowed: cell(Column::PredictedTimeAiAllowed)
                .map(|raw| parse_minutes(raw, ctx(Column::PredictedTimeAiAllowed)))
                .transpose()?,
            prior_task_exposure: cell(Column::PriorTaskExposure)
                .map(|raw| parse_rating(raw, 1..=5, ctx(Column::PriorTaskExposure)))
                .transpose()?,
            external_resource_needs: cell(Column::ExternalResourceNeeds)
                .map(|raw| parse_rating(raw, 1..=3, ctx(Column::ExternalResourceNeeds)))
                .transpose()?,
            ai_treatment: cell(Column::AiTreatment)
                .map(|raw| parse_treatment(raw, ctx(Column::AiTreatment)))
                .transpose()?,
            initial_implementation_time: cell(Column::InitialImplementationTime)
                .map(|raw| parse_minutes(raw, ctx(Column::InitialImplementationTime)))
                .transpose()?,
            post_review_implementation_time: cell(Column::PostReviewImplementationTime)
                .map(|raw| parse_minutes(raw, ctx(Column::PostReviewImplementationTime)))
                .transpose()?,
        });
    }

    debug!(
        columns = index.len(),
        rows = observations.len(),
        "parsed observation table"
    );
    Ok(Dataset::new(observations, index.into_keys().collect()))
}

#[derive(Debug, Clone, Copy)]
struct CellContext {
    column: Column,
    line: u64,
}

impl CellContext {
    fn error(&self, raw: &str, expected: &str) -> AnalysisError {
        AnalysisError::Schema(format!(
            "line {}: column '{}' expected {expected}, got '{raw}'",
            self.line,
            self.column.header()
        ))
    }
}

/// Parse an integer cell, accepting integral floats such as `3.0`.
fn parse_integral(raw: &str) -> Option<f64> {
    if let Ok(v) = raw.parse::<i64>() {
        return Some(v as f64);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.fract() == 0.0)
}

/// Largest id accepted in float form (`3.0`); every integer up to it is exact in `f64`.
const MAX_FLOAT_ID: f64 = (1u64 << 53) as f64;

fn parse_id(raw: &str, ctx: CellContext) -> Result<u64, AnalysisError> {
    if let Ok(v) = raw.parse::<u64>() {
        return Ok(v);
    }
    match parse_integral(raw) {
        Some(v) if v >= 0.0 && v <= MAX_FLOAT_ID => Ok(v as u64),
        _ => Err(ctx.error(raw, "a non-negative integer")),
    }
}

/// Durations must be finite and strictly positive.
fn parse_minutes(raw: &str, ctx: CellContext) -> Result<f64, AnalysisError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| ctx.error(raw, "a positive number of minutes"))
}

fn parse_rating(
    raw: &str,
    range: std::ops::RangeInclusive<u8>,
    ctx: CellContext,
) -> Result<u8, AnalysisError> {
    match parse_integral(raw) {
        Some(v) if v >= f64::from(*range.start()) && v <= f64::from(*range.end()) => Ok(v as u8),
        _ => Err(ctx.error(
            raw,
            &format!("an integer in {}..={}", range.start(), range.end()),
        )),
    }
}

fn parse_treatment(raw: &str, ctx: CellContext) -> Result<bool, AnalysisError> {
    match parse_integral(raw) {
        Some(v) if v == 0.0 => Ok(false),
        Some(v) if v == 1.0 => Ok(true),
        _ => Err(ctx.error(raw, "0 or 1")),
    }
}
