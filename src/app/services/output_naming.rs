//! Observing log filename selection
//!
//! When no name is given the log is named after the night it covers. A
//! directory holding a single night uses the date embedded in the filenames.
//! A mixed directory falls back to the date of the last observation timestamp
//! that could be parsed, and to a fixed name when there is none.

use crate::constants::REPORT_EXTENSION;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the report filename is chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputName {
    /// Name the log after the night(s) observed
    #[default]
    Derived,
    /// Use this filename inside the data directory
    Given(String),
}

impl OutputName {
    pub fn from_option(name: Option<String>) -> Self {
        match name {
            Some(name) => Self::Given(name),
            None => Self::Derived,
        }
    }
}

/// Nights seen during traversal
///
/// Filename dates are compared against the first one seen; any difference
/// marks the directory as mixed and further filename dates are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NightTracker {
    first_night: Option<String>,
    mixed: bool,
    last_observation: Option<NaiveDate>,
}

impl NightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note the `YYYYMMDD` date of a data filename
    pub fn observe_filename_date(&mut self, date: &str) {
        if self.mixed {
            return;
        }
        match &self.first_night {
            None => self.first_night = Some(date.to_string()),
            Some(first) if first != date => self.mixed = true,
            Some(_) => {}
        }
    }

    /// Note the calendar date of a parsed observation timestamp
    pub fn observe_observation(&mut self, date: NaiveDate) {
        self.last_observation = Some(date);
    }

    pub fn is_mixed(&self) -> bool {
        self.mixed
    }

    pub fn first_night(&self) -> Option<&str> {
        self.first_night.as_deref()
    }

    pub fn last_observation(&self) -> Option<NaiveDate> {
        self.last_observation
    }
}

/// Where a chosen report name came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameBasis {
    Given,
    SingleNight,
    LastObservation,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportName {
    pub file_name: String,
    pub basis: NameBasis,
}

impl fmt::Display for ReportName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name)
    }
}

/// Pick the report filename for a finished traversal
pub fn resolve_report_name(
    policy: &OutputName,
    nights: &NightTracker,
    fallback_name: &str,
) -> ReportName {
    if let OutputName::Given(name) = policy {
        return ReportName {
            file_name: name.clone(),
            basis: NameBasis::Given,
        };
    }

    if !nights.is_mixed() {
        if let Some(night) = nights.first_night() {
            return ReportName {
                file_name: format!("{}.{}", night, REPORT_EXTENSION),
                basis: NameBasis::SingleNight,
            };
        }
    }

    match nights.last_observation() {
        Some(date) => ReportName {
            file_name: format!("{}.{}", date.format("%Y%m%d"), REPORT_EXTENSION),
            basis: NameBasis::LastObservation,
        },
        None => ReportName {
            file_name: fallback_name.to_string(),
            basis: NameBasis::Fallback,
        },
    }
}
