//! Downstream pipeline status checks
//!
//! The reduction pipeline writes one status keyword per calibration step. A
//! value of +1 (done) or -1 (not requested) is healthy; anything else is a
//! failure and subtracts that check's penalty from the record's error flag.

use crate::app::services::header_reader::{HeaderSource, KeyError};
use crate::constants::QUALITY_CHECKS;

/// Result of one status keyword check
#[derive(Debug, Clone, PartialEq)]
pub enum CheckResult {
    /// Value was +1 or -1
    Passed(i32),
    /// Any other value
    Failed { value: i32, penalty: i32 },
    /// Keyword absent or without a value; no penalty
    Missing,
    /// Keyword present but not an integer; no penalty
    Unreadable(KeyError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub keyword: &'static str,
    pub result: CheckResult,
}

impl CheckOutcome {
    pub fn penalty(&self) -> i32 {
        match self.result {
            CheckResult::Failed { penalty, .. } => penalty,
            _ => 0,
        }
    }
}

/// Classify a single status value against its penalty
pub fn evaluate(value: i32, penalty: i32) -> CheckResult {
    if matches!(value, 1 | -1) {
        CheckResult::Passed(value)
    } else {
        CheckResult::Failed { value, penalty }
    }
}

/// Run every status check against a header
pub fn run_quality_checks<S: HeaderSource>(source: &S) -> Vec<CheckOutcome> {
    QUALITY_CHECKS
        .iter()
        .map(|&(keyword, penalty)| {
            let result = match source.read_i32(keyword) {
                Ok(value) => evaluate(value, penalty),
                Err(e) if e.is_missing() => CheckResult::Missing,
                Err(e) => CheckResult::Unreadable(e),
            };
            CheckOutcome { keyword, result }
        })
        .collect()
}

/// Sum of the penalties of every failed check
pub fn total_penalty(outcomes: &[CheckOutcome]) -> i32 {
    outcomes.iter().map(CheckOutcome::penalty).sum()
}
