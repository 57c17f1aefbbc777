//! Binary behaviour: argument handling, stdout report and exit status.

mod common;

use assert_cmd::Command;
use common::{synthetic_study_path, SYNTHETIC_STUDY};
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const EXPECTED_REPORT: &str = "\
Regression calculated speedup of: 0.324
CI calculed with stderr=Homoskedastic: (0.139, 0.539)
CI calculed with stderr=Robust (HC3): (0.138, 0.541)
CI calculed with stderr=Clustered By Dev: (0.11, 0.579)
";

fn ai_speedup() -> Command {
    Command::cargo_bin("ai-speedup").unwrap()
}

#[test]
fn test_report_on_synthetic_study() {
    ai_speedup()
        .arg("--input-data")
        .arg(synthetic_study_path())
        .assert()
        .success()
        .stdout(EXPECTED_REPORT);
}

#[test]
fn test_debug_logs_go_to_stderr() {
    ai_speedup()
        .arg("--input-data")
        .arg(synthetic_study_path())
        .arg("--debug")
        .assert()
        .success()
        .stdout(EXPECTED_REPORT)
        .stderr(predicate::str::contains("treatment interval"))
        .stderr(predicate::str::contains("observations above 2k/n leverage"));
}

#[test]
fn test_input_data_required() {
    ai_speedup()
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("--input-data"));
}

#[test]
fn test_missing_input_file() {
    ai_speedup()
        .args(["--input-data", "no/such/observations.csv"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_missing_required_column() {
    let text = SYNTHETIC_STUDY.replacen("ai_treatment", "treatment", 1);
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();

    ai_speedup()
        .arg("--input-data")
        .arg(file.path())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("ai_treatment"));
}

#[test]
fn test_empty_table() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", SYNTHETIC_STUDY.lines().next().unwrap()).unwrap();

    ai_speedup()
        .arg("--input-data")
        .arg(file.path())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
}
