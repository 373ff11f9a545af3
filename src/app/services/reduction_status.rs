//! Reduction pipeline progress per data file
//!
//! Backs the `red_report` tool: for every recognized data file it reports the
//! instrument, the state of the overscan, dark and flat stages, and the
//! instrument filter pair.

use crate::app::services::filename_classifier::ClassifiedName;
use crate::app::services::header_reader::{HeaderError, HeaderReader, HeaderSource, KeyError};
use crate::app::services::metadata_extractor::{ReductionLevel, check_reduction_level};
use crate::constants::{REDUCTION_STAGES, keywords, sentinels};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// State of one pipeline stage as recorded in its status keyword
#[derive(Debug, Clone, PartialEq)]
pub enum StageState {
    /// Keyword absent; the pipeline never touched the file
    NotReduced,
    Done,
    NotRequested,
    Pending,
    /// Negative status other than -1
    CriticalError(i32),
    /// Positive status other than 1
    NonCriticalError(i32),
    /// Keyword present but not an integer
    Unreadable(KeyError),
}

impl StageState {
    pub fn from_status(status: i32) -> Self {
        match status {
            1 => Self::Done,
            -1 => Self::NotRequested,
            0 => Self::Pending,
            s if s > 0 => Self::NonCriticalError(s),
            s => Self::CriticalError(s),
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Done | Self::NotRequested)
    }
}

impl fmt::Display for StageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReduced => write!(f, "File has not been reduced"),
            Self::Done => write!(f, "Done"),
            Self::NotRequested => write!(f, "Not requested"),
            Self::Pending => write!(f, "Pending. This seems improbable. Is it an error?"),
            Self::CriticalError(s) => write!(f, "Critical error during operation : {}", s),
            Self::NonCriticalError(s) => write!(f, "Non-Critical error during operation : {}", s),
            Self::Unreadable(e) => write!(f, "Unreadable status ({})", e.status_code()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StageReport {
    pub stage: &'static str,
    pub keyword: &'static str,
    pub state: StageState,
}

impl fmt::Display for StageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.stage, self.state)
    }
}

/// Pipeline progress for one opened file
#[derive(Debug, Clone, PartialEq)]
pub struct ReductionReport {
    pub file_name: String,
    pub instrument: String,
    pub stages: Vec<StageReport>,
    pub filters: String,
    /// Status code of a failed close, if any
    pub close_status: Option<i32>,
}

impl ReductionReport {
    /// Console lines for this file
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.stages.len() + 2);
        lines.push(format!("{} ({})", self.file_name, self.instrument));
        lines.extend(self.stages.iter().map(StageReport::to_string));
        lines.push(format!("Filters: {}", self.filters));
        lines
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReductionOutcome {
    Superseded { reduced: PathBuf },
    Rejected { error: HeaderError },
    Reported(ReductionReport),
}

/// Outcome plus the status log lines describing it
#[derive(Debug, Clone)]
pub struct FileReduction {
    pub outcome: ReductionOutcome,
    pub notes: Vec<String>,
}

/// Read the status keywords of one header
pub fn read_stages<S: HeaderSource>(source: &S) -> Vec<StageReport> {
    REDUCTION_STAGES
        .iter()
        .map(|&(keyword, stage)| {
            let state = match source.read_i32(keyword) {
                Ok(status) => StageState::from_status(status),
                Err(e) if e.is_missing() => StageState::NotReduced,
                Err(e) => StageState::Unreadable(e),
            };
            StageReport {
                stage,
                keyword,
                state,
            }
        })
        .collect()
}

/// Instrument filter pair, space separated
pub fn read_instrument_filters<S: HeaderSource>(source: &S) -> Result<String, KeyError> {
    let [first, second] = keywords::INSTRUMENT_FILTERS;
    let first = source.read_string(first)?;
    let second = source.read_string(second)?;
    Ok(format!("{} {}", first, second))
}

/// Inspects reduction status using an injected header reader
#[derive(Debug, Clone, Default)]
pub struct ReductionInspector<R> {
    reader: R,
}

impl<R: HeaderReader> ReductionInspector<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn inspect(&self, path: &Path, name: &ClassifiedName) -> FileReduction {
        let mut notes = Vec::new();
        let exposure = name.exposure();

        if let ReductionLevel::Superseded(reduced) =
            check_reduction_level(&self.reader, path, name, &mut notes)
        {
            return FileReduction {
                outcome: ReductionOutcome::Superseded { reduced },
                notes,
            };
        }

        let source = match self.reader.open(path) {
            Ok(source) => source,
            Err(error) => {
                warn!("Failed to open {}: {}", path.display(), error);
                notes.push(format!(
                    "Failed to open FITS ({}) - {}",
                    error.status_code(),
                    exposure
                ));
                return FileReduction {
                    outcome: ReductionOutcome::Rejected { error },
                    notes,
                };
            }
        };

        let instrument = source
            .read_string(keywords::INSTRUMENT)
            .unwrap_or_else(|e| {
                debug!("{}: {}", exposure, e);
                String::new()
            });

        let stages = read_stages(&source);

        let filters = read_instrument_filters(&source).unwrap_or_else(|e| {
            notes.push(format!("Could not read instrument filters ({})", e.status_code()));
            sentinels::FILTER_READ_ERROR.to_string()
        });

        let close_status = match source.close() {
            Ok(()) => None,
            Err(error) => {
                notes.push(format!("A FITSIO error has occured: {}", error.status_code()));
                Some(error.status_code())
            }
        };

        notes.push(format!("Finished with {}", exposure));

        FileReduction {
            outcome: ReductionOutcome::Reported(ReductionReport {
                file_name: name.file_name(),
                instrument,
                stages,
                filters,
                close_status,
            }),
            notes,
        }
    }
}
