//! End-to-end tests for the reduction status report

mod common;

use autolog::Error;
use autolog::app::services::header_reader::FitsHeaderReader;
use autolog::cli::commands::run_red_report_with;
use autolog::config::AutologConfig;
use common::{raw_frame, read, reduced_frame};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_reports_stage_states_per_file() {
    let temp_dir = TempDir::new().unwrap();
    reduced_frame("A", "2024-03-11T22:00:00", "60380.91667")
        .write(temp_dir.path(), "h_e_20240311_1_1_1_1.fits");
    raw_frame("B", "2024-03-11T22:30:00", "60380.9375")
        .write(temp_dir.path(), "h_e_20240311_2_1_1_0.fits");
    fs::write(temp_dir.path().join("readme"), "not data").unwrap();
    let config = AutologConfig::for_reduction_report(temp_dir.path()).without_progress();

    let mut console = Vec::new();
    let summary = run_red_report_with(&config, FitsHeaderReader, &mut console).unwrap();
    let console = String::from_utf8(console).unwrap();

    assert_eq!(summary.accepted, 2);
    assert_eq!(summary.unrecognized, 1);
    assert_eq!(summary.output_path, Some(temp_dir.path().join("red_report.log")));

    let expected_reduced = [
        "h_e_20240311_1_1_1_1.fits (IO:O)",
        "Overscan subtraction : Done",
        "Dark frame subtraction : Done",
        "Flatfielding : Done",
        "Filters: SDSS-R None",
    ]
    .join("\n");
    assert!(console.contains(&expected_reduced));

    let expected_raw = [
        "h_e_20240311_2_1_1_0.fits (IO:O)",
        "Overscan subtraction : File has not been reduced",
        "Dark frame subtraction : File has not been reduced",
        "Flatfielding : File has not been reduced",
        "Filters: Bessel-V None",
    ]
    .join("\n");
    assert!(console.contains(&expected_raw));
    assert!(console.contains("Not an LT file name (31): readme"));

    let log = read(&config.status_log_path());
    assert!(log.contains("Overscan subtraction : Done"));
    assert!(log.contains("Finished with h_e_20240311_2_1_1_0"));
    assert!(log.ends_with("    2 files successfully read into log\n    1 bad files not read\n"));
}

#[test]
fn test_superseded_raw_frame_not_reported() {
    let temp_dir = TempDir::new().unwrap();
    raw_frame("A", "2024-03-11T22:00:00", "60380.91667")
        .write(temp_dir.path(), "h_e_20240311_1_1_1_0.fits");
    reduced_frame("A", "2024-03-11T22:00:00", "60380.91667")
        .write(temp_dir.path(), "h_e_20240311_1_1_1_1.fits");
    let config = AutologConfig::for_reduction_report(temp_dir.path()).without_progress();

    let mut console = Vec::new();
    let summary = run_red_report_with(&config, FitsHeaderReader, &mut console).unwrap();
    let console = String::from_utf8(console).unwrap();

    assert_eq!(summary.accepted, 1);
    assert_eq!(summary.superseded, 1);
    assert!(!console.contains("h_e_20240311_1_1_1_0.fits ("));
    assert!(console.contains("h_e_20240311_1_1_1_1.fits (IO:O)"));
}

#[test]
fn test_missing_directory_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let config =
        AutologConfig::for_reduction_report(temp_dir.path().join("gone")).without_progress();

    let mut console = Vec::new();
    let error = run_red_report_with(&config, FitsHeaderReader, &mut console).unwrap_err();

    assert!(matches!(error, Error::DirectoryOpen { .. }));
}
