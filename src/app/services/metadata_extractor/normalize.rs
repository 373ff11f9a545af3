//! Normalization rules applied to raw header values
//!
//! These helpers are pure so the rendered-column rules can be tested without
//! any header behind them.

use crate::constants::{CLEAR_FILTER_NAMES, sentinels};
use chrono::NaiveDateTime;

/// Keep at most `width` characters of `value`
pub fn truncate_chars(value: &str, width: usize) -> String {
    value.chars().take(width).collect()
}

/// Replace every space with an underscore so names stay one column wide
pub fn underscore_spaces(value: &str) -> String {
    value.replace(' ', "_")
}

/// Check whether a filter wheel value means "no filter in the beam"
pub fn is_clear_filter(value: &str) -> bool {
    value.is_empty() || CLEAR_FILTER_NAMES.contains(&value)
}

/// Join filter wheel values into the filter column
///
/// Clear positions are dropped and the rest joined with commas. When nothing
/// is left the column reads `None`.
pub fn describe_filters<S: AsRef<str>>(values: &[S]) -> String {
    let kept: Vec<&str> = values
        .iter()
        .map(|v| v.as_ref().trim())
        .filter(|v| !is_clear_filter(v))
        .collect();

    if kept.is_empty() {
        sentinels::FILTER_NONE.to_string()
    } else {
        kept.join(",")
    }
}

/// Sky brightness for a textual SCHEDSKY value
///
/// The scheduler writes `UNKNOWN` when it has no estimate; that maps to the
/// sentinel. Any other text is not a sky brightness.
pub fn sky_brightness_from_text(value: &str) -> Option<f32> {
    if value
        .trim()
        .starts_with(sentinels::SKY_BRIGHTNESS_UNKNOWN_TOKEN)
    {
        Some(sentinels::SKY_BRIGHTNESS_UNKNOWN)
    } else {
        None
    }
}

/// Parse a `YYYY-MM-DDThh:mm:ss[.fff]` observation timestamp
pub fn parse_observation_time(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();

    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// UT start column text for an observation timestamp
pub fn format_ut_start(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%H:%M:%S%.3f").to_string()
}
