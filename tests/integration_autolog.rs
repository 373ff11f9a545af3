//! End-to-end tests for the observing log
//!
//! Each test writes real FITS headers into a temporary directory and runs the
//! whole command against it, checking the console output, the report file and
//! the status log.

mod common;

use autolog::Error;
use autolog::app::services::header_reader::FitsHeaderReader;
use autolog::cli::commands::run_autolog_with;
use autolog::config::AutologConfig;
use autolog::constants::exit_codes;
use common::{FitsFile, raw_frame, read, reduced_frame};
use std::fs;
use tempfile::TempDir;

fn config_for(temp_dir: &TempDir) -> AutologConfig {
    AutologConfig::new(temp_dir.path()).without_progress()
}

fn run(config: &AutologConfig) -> (autolog::cli::commands::RunSummary, String) {
    let mut console = Vec::new();
    let summary = run_autolog_with(config, FitsHeaderReader, &mut console)
        .expect("run should succeed");
    (summary, String::from_utf8(console).unwrap())
}

/// Data rows of a report file, banner removed
fn report_rows(content: &str) -> Vec<&str> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .skip(4)
        .collect()
}

#[test]
fn test_empty_directory_is_nothing_to_do() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);

    let (summary, console) = run(&config);

    assert_eq!(summary.accepted, 0);
    assert_eq!(summary.output_path, None);
    assert!(console.contains("Nothing to log."));

    let status = read(&config.status_log_path());
    assert!(status.starts_with("First line of the log.\n"));
    assert!(status.contains("    0 files successfully read into log"));
    assert!(status.ends_with("Nothing to do. Closing.\n"));

    // Only the status log was written
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
}

#[test]
fn test_single_night_sorted_by_time() {
    let temp_dir = TempDir::new().unwrap();
    reduced_frame("Late target", "2024-03-11T23:30:00.000", "60380.97917")
        .write(temp_dir.path(), "h_e_20240311_1_1_1_1.fits");
    reduced_frame("Early target", "2024-03-11T20:15:30.250", "60380.84410")
        .write(temp_dir.path(), "h_e_20240311_2_1_1_1.fits");

    let (summary, console) = run(&config_for(&temp_dir));

    let report_path = temp_dir.path().join("20240311.log");
    assert_eq!(summary.accepted, 2);
    assert_eq!(summary.output_path.as_deref(), Some(report_path.as_path()));

    let report = read(&report_path);
    let rows = report_rows(&report);
    assert_eq!(rows.len(), 2);
    assert!(rows[0].starts_with("20:15:30.250"));
    assert!(rows[0].contains("Early_target"));
    assert!(rows[0].contains("h_e_20240311_2_1_1_1"));
    assert!(rows[1].starts_with("23:30:00.000"));
    assert!(rows[1].contains("Late_target"));

    // File copy has no blank line after the banner; the console copy does
    assert!(!report.lines().nth(4).unwrap().trim().is_empty());
    assert_eq!(console.lines().nth(4), Some(""));
    assert!(console.contains(rows[0]));
}

#[test]
fn test_row_columns() {
    let temp_dir = TempDir::new().unwrap();
    reduced_frame("NGC 1068", "2024-03-11T21:14:05.123", "60380.88478")
        .write(temp_dir.path(), "h_e_20240311_12_1_1_1.fits");

    run(&config_for(&temp_dir));

    let report = read(&temp_dir.path().join("20240311.log"));
    let rows = report_rows(&report);
    let expected = format!(
        "21:14:05.123 {:>18} {:>16} {:>13} {:>13} 1.23 {:>12} {:>20}   2 {:>11}  120.0   1.4 20.7 {:>22} {:>20} 0",
        "NGC_1068",
        "PL24A01",
        "02:42:40.771",
        "-00:00:47.84",
        "IO:O",
        "SDSS-R",
        "NA",
        "h_e_20240311_12_1_1_1",
        "Seyfert_monitoring",
    );
    assert_eq!(rows, vec![expected.as_str()]);
}

#[test]
fn test_mixed_nights_named_after_last_observation() {
    let temp_dir = TempDir::new().unwrap();
    reduced_frame("A", "2024-03-11T22:00:00", "60380.91667")
        .write(temp_dir.path(), "h_e_20240311_5_1_1_1.fits");
    reduced_frame("B", "2024-03-13T02:00:00", "60382.08333")
        .write(temp_dir.path(), "h_e_20240312_1_1_1_1.fits");

    let (summary, _) = run(&config_for(&temp_dir));

    assert_eq!(
        summary.output_path,
        Some(temp_dir.path().join("20240313.log"))
    );
    assert!(!temp_dir.path().join("20240311.log").exists());
}

#[test]
fn test_mixed_nights_without_dates_use_fallback_name() {
    let temp_dir = TempDir::new().unwrap();
    FitsFile::new()
        .text("INSTRUME", "IO:O")
        .write(temp_dir.path(), "h_e_20240311_5_1_1_1.fits");
    FitsFile::new()
        .text("INSTRUME", "IO:O")
        .text("DATE-OBS", "not a date")
        .write(temp_dir.path(), "h_e_20240312_1_1_1_1.fits");
    let config = config_for(&temp_dir);

    let (summary, console) = run(&config);

    assert_eq!(
        summary.output_path,
        Some(temp_dir.path().join("autolog.log"))
    );
    assert!(console.contains("Error reading observations date. Log will be called autolog.log"));
    let status = read(&config.status_log_path());
    assert!(status.contains("Error reading date format: |not a date|"));
}

#[test]
fn test_superseded_raw_frame_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    raw_frame("M 31", "2024-03-11T21:00:00", "60380.875")
        .write(temp_dir.path(), "h_e_20240311_7_1_1_0.fits");
    reduced_frame("M 31", "2024-03-11T21:00:00", "60380.875")
        .write(temp_dir.path(), "h_e_20240311_7_1_1_1.fits");
    raw_frame("M 33", "2024-03-11T21:30:00", "60380.896")
        .write(temp_dir.path(), "h_e_20240311_8_1_1_0.fits");
    let config = config_for(&temp_dir);

    let (summary, _) = run(&config);

    assert_eq!(summary.accepted, 2);
    assert_eq!(summary.superseded, 1);
    assert_eq!(summary.rejected, 0);

    let report = read(&temp_dir.path().join("20240311.log"));
    let rows = report_rows(&report);
    assert_eq!(rows.len(), 2);
    assert!(rows[0].contains("h_e_20240311_7_1_1_1"));
    assert!(!report.contains("h_e_20240311_7_1_1_0"));

    // Raw frame without reduced data keeps the pipeline sentinels
    assert!(rows[1].contains("h_e_20240311_8_1_1_0"));
    assert!(rows[1].contains("999.0 99.9"));
    assert!(rows[1].contains("Bessel-V"));

    let status = read(&config.status_log_path());
    assert!(status.contains("Reduced data is available, so we will ignore this file."));
    assert!(status.contains("No reduced data exists, so pipeline keywords will not be read."));
}

#[test]
fn test_unrecognized_ignored_and_rejected_files() {
    let temp_dir = TempDir::new().unwrap();
    reduced_frame("A", "2024-03-11T22:00:00", "60380.91667")
        .write(temp_dir.path(), "h_e_20240311_1_1_1_1.fits");
    fs::write(temp_dir.path().join("notes.txt"), "observer notes").unwrap();
    fs::write(temp_dir.path().join("h_e_20240311_1_1_1_1.jpg"), b"\xff\xd8").unwrap();
    fs::write(temp_dir.path().join("h_e_20240311_9_1_1_1.fits"), b"not fits").unwrap();
    let config = config_for(&temp_dir);

    let (summary, _) = run(&config);

    assert_eq!(summary.accepted, 1);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.unrecognized, 1);
    assert_eq!(summary.ignored, 1);

    let status = read(&config.status_log_path());
    assert!(status.contains("Not an LT file name (31): notes.txt"));
    assert!(status.contains("Failed to open FITS (107) - h_e_20240311_9_1_1_1"));
    assert!(status.contains("    1 files successfully read into log"));
    assert!(status.contains("    2 bad files not read"));
    assert!(!status.contains("h_e_20240311_1_1_1_1.jpg"));
}

#[test]
fn test_failed_pipeline_checks_in_error_column() {
    let temp_dir = TempDir::new().unwrap();
    reduced_frame("A", "2024-03-11T22:00:00", "60380.91667")
        .literal("L1STATOV", "0")
        .write(temp_dir.path(), "h_e_20240311_1_1_1_1.fits");

    run(&config_for(&temp_dir));

    // The first L1STATOV card wins, so this frame stays clean
    let report = read(&temp_dir.path().join("20240311.log"));
    assert!(report_rows(&report)[0].ends_with(" 0"));

    let failing = FitsFile::new()
        .text("INSTRUME", "IO:O")
        .text("DATE-OBS", "2024-03-11T23:00:00")
        .literal("MJD", "60380.95833")
        .literal("L1STATOV", "0")
        .literal("L1STATDA", "5");
    failing.write(temp_dir.path(), "h_e_20240311_2_1_1_1.fits");

    run(&config_for(&temp_dir));

    let report = read(&temp_dir.path().join("20240311.log"));
    let rows = report_rows(&report);
    assert_eq!(rows.len(), 2);
    assert!(rows[1].ends_with(" -34"));
}

#[test]
fn test_given_output_name() {
    let temp_dir = TempDir::new().unwrap();
    reduced_frame("A", "2024-03-11T22:00:00", "60380.91667")
        .write(temp_dir.path(), "h_e_20240311_1_1_1_1.fits");
    let config = config_for(&temp_dir).with_output_name("tonight.txt");

    let (summary, _) = run(&config);

    assert_eq!(summary.output_path, Some(temp_dir.path().join("tonight.txt")));
    assert_eq!(report_rows(&read(&temp_dir.path().join("tonight.txt"))).len(), 1);
}

#[test]
fn test_unopenable_report_falls_back_to_console() {
    let temp_dir = TempDir::new().unwrap();
    reduced_frame("A", "2024-03-11T22:00:00", "60380.91667")
        .write(temp_dir.path(), "h_e_20240311_1_1_1_1.fits");
    fs::create_dir(temp_dir.path().join("blocked.log")).unwrap();
    let config = config_for(&temp_dir).with_output_name("blocked.log");

    let (summary, console) = run(&config);

    assert_eq!(summary.accepted, 1);
    assert_eq!(summary.output_path, None);
    assert!(console.contains("Could not open output file (-53)"));
    assert!(console.contains("Proceeding, but writing only to screen"));
    assert!(console.contains("h_e_20240311_1_1_1_1"));
    assert!(read(&config.status_log_path()).contains("Could not open output file (-53)"));
}

#[test]
fn test_missing_directory_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let config = AutologConfig::new(temp_dir.path().join("missing")).without_progress();

    let mut console = Vec::new();
    let error = run_autolog_with(&config, FitsHeaderReader, &mut console).unwrap_err();

    assert!(matches!(error, Error::DirectoryOpen { .. }));
    assert_eq!(error.exit_code(), exit_codes::DIRECTORY_OPEN);
}
