//! Per-file metadata extraction
//!
//! Turns one classified data file into an [`ExposureRecord`]. Missing or
//! malformed keywords never abort a file: each field keeps its default and the
//! problem is noted for the status log. Only a file that cannot be opened at
//! all is rejected.
//!
//! Unreduced frames get special treatment. If the reduced counterpart exists
//! next to them they are skipped, because the reduced file carries everything
//! the raw one does and more. Otherwise the pipeline-derived keywords are not
//! requested at all since they are known to be absent.

pub mod normalize;
pub mod quality_checks;

#[cfg(test)]
pub(crate) mod tests;

use crate::app::models::{ExposureRecord, RecordBuilder};
use crate::app::services::filename_classifier::ClassifiedName;
use crate::app::services::header_reader::{
    HeaderError, HeaderReader, HeaderSource, KeyError,
};
use crate::constants::{keywords, sentinels};
use chrono::NaiveDate;
use normalize::{
    describe_filters, format_ut_start, parse_observation_time, sky_brightness_from_text,
    underscore_spaces,
};
use quality_checks::{CheckResult, run_quality_checks};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What happened to one data file
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// A reduced version exists and will be read instead
    Superseded { reduced: PathBuf },
    /// The file could not be opened
    Rejected { error: HeaderError },
    /// A record was produced
    Accepted {
        record: ExposureRecord,
        /// Calendar date of the parsed observation timestamp
        observation_date: Option<NaiveDate>,
    },
}

/// Extraction outcome plus the status log lines describing it
#[derive(Debug, Clone)]
pub struct FileExtraction {
    pub outcome: Extraction,
    pub notes: Vec<String>,
}

/// Extracts exposure records using an injected header reader
#[derive(Debug, Clone, Default)]
pub struct MetadataExtractor<R> {
    reader: R,
}

impl<R: HeaderReader> MetadataExtractor<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Produce the record for the file at `path`
    pub fn extract(&self, path: &Path, name: &ClassifiedName) -> FileExtraction {
        let mut notes = Vec::new();
        let exposure = name.exposure();

        let level = check_reduction_level(&self.reader, path, name, &mut notes);
        let downstream_expected = match level {
            ReductionLevel::Superseded(reduced) => {
                return FileExtraction {
                    outcome: Extraction::Superseded { reduced },
                    notes,
                };
            }
            ReductionLevel::Reduced => true,
            ReductionLevel::RawOnly => false,
        };

        let source = match self.reader.open(path) {
            Ok(source) => source,
            Err(error) => {
                warn!("Failed to open {}: {}", path.display(), error);
                notes.push(format!(
                    "Failed to open FITS ({}) - {}",
                    error.status_code(),
                    exposure
                ));
                return FileExtraction {
                    outcome: Extraction::Rejected { error },
                    notes,
                };
            }
        };

        let mut scan = HeaderScan::new(&source, &exposure);
        let builder = RecordBuilder::new(exposure.clone());
        let builder = read_identification(builder, &mut scan);
        let builder = read_exposure_settings(builder, &mut scan);
        let builder = if downstream_expected {
            read_pipeline_metrics(builder, &mut scan)
        } else {
            builder
        };
        let builder = read_object(builder, &mut scan);
        let builder = read_group(builder, &mut scan);
        let (builder, observation_date) = read_timestamp(builder, &mut scan);
        let builder = read_filters(builder, &mut scan);
        let builder = read_grating(builder, &mut scan);
        let builder = if downstream_expected {
            apply_quality_checks(builder, &mut scan)
        } else {
            builder
        };

        let mut builder = builder;
        notes.append(&mut scan.finish());

        if let Err(error) = source.close() {
            warn!("Error closing {}: {}", exposure, error);
            notes.push(format!("A FITSIO error has occured: {}", error.status_code()));
            builder = builder.fatal_status(error.status_code());
        }

        notes.push(format!("Finished with {}", exposure));

        FileExtraction {
            outcome: Extraction::Accepted {
                record: builder.build(),
                observation_date,
            },
            notes,
        }
    }
}

/// Reduction state of a data file as seen from its directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReductionLevel {
    /// The pipeline has processed this file
    Reduced,
    /// Unreduced and nothing better exists
    RawOnly,
    /// Unreduced, and the reduced file sits next to it
    Superseded(PathBuf),
}

/// Apply the reduced-counterpart skip rule to one file
///
/// Unreduced files are probed for their reduced counterpart in the same
/// directory. The steps taken are appended to `notes`.
pub fn check_reduction_level<R: HeaderReader>(
    reader: &R,
    path: &Path,
    name: &ClassifiedName,
    notes: &mut Vec<String>,
) -> ReductionLevel {
    if !name.is_unreduced() {
        return ReductionLevel::Reduced;
    }

    let reduced_name = name.reduced_counterpart().file_name();
    let reduced = path.with_file_name(&reduced_name);
    notes.push(format!(
        "File {} has not been reduced. Checking to see if {} exists",
        name.exposure(),
        reduced_name
    ));

    if reader.exists(&reduced) {
        notes.push("Reduced data is available, so we will ignore this file.".to_string());
        ReductionLevel::Superseded(reduced)
    } else {
        notes.push("No reduced data exists, so pipeline keywords will not be read.".to_string());
        ReductionLevel::RawOnly
    }
}

/// Keyword reads against one open header
///
/// Missing keywords are expected and only traced. Values that exist but
/// cannot be converted are remembered and reported once the file is done.
struct HeaderScan<'a, S> {
    source: &'a S,
    exposure: &'a str,
    residual: Vec<KeyError>,
    notes: Vec<String>,
}

impl<'a, S: HeaderSource> HeaderScan<'a, S> {
    fn new(source: &'a S, exposure: &'a str) -> Self {
        Self {
            source,
            exposure,
            residual: Vec::new(),
            notes: Vec::new(),
        }
    }

    fn absorb<T>(&mut self, result: Result<T, KeyError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.record_failure(e);
                None
            }
        }
    }

    fn record_failure(&mut self, error: KeyError) {
        if error.is_missing() {
            debug!("{}: {}", self.exposure, error);
        } else {
            self.residual.push(error);
        }
    }

    fn string(&mut self, keyword: &str) -> Option<String> {
        let result = self.source.read_string(keyword);
        self.absorb(result)
    }

    fn f32(&mut self, keyword: &str) -> Option<f32> {
        let result = self.source.read_f32(keyword);
        self.absorb(result)
    }

    fn i32(&mut self, keyword: &str) -> Option<i32> {
        let result = self.source.read_i32(keyword);
        self.absorb(result)
    }

    fn note(&mut self, line: String) {
        self.notes.push(line);
    }

    /// Clear residual statuses so the file can be closed, returning the log lines
    fn finish(self) -> Vec<String> {
        let mut notes = self.notes;
        for error in self.residual {
            warn!("{}: {}", self.exposure, error);
            notes.push(format!(
                "Cleared header status {} for {}: {}",
                error.status_code(),
                self.exposure,
                error
            ));
        }
        notes
    }
}

fn read_identification<S: HeaderSource>(
    builder: RecordBuilder,
    scan: &mut HeaderScan<'_, S>,
) -> RecordBuilder {
    let mut builder = builder;
    if let Some(value) = scan.string(keywords::INSTRUMENT) {
        builder = builder.instrument(&value);
    }
    if let Some(value) = scan.string(keywords::PROPOSAL) {
        builder = builder.proposal(&value);
    }
    if let Some(value) = scan.string(keywords::RA) {
        builder = builder.ra(&value);
    }
    if let Some(value) = scan.string(keywords::DEC) {
        builder = builder.dec(&value);
    }
    if let Some(value) = scan.string(keywords::UT_START) {
        builder = builder.ut_start(&value);
    }
    builder
}

fn read_exposure_settings<S: HeaderSource>(
    builder: RecordBuilder,
    scan: &mut HeaderScan<'_, S>,
) -> RecordBuilder {
    let mut builder = builder;
    if let Some(value) = scan.f32(keywords::EXPOSURE_TIME) {
        builder = builder.exposure_time(value);
    }
    if let Some(value) = scan.f32(keywords::AIRMASS) {
        builder = builder.airmass(value);
    }
    if let Some(value) = scan.i32(keywords::BINNING) {
        builder = builder.binning(value);
    }
    builder
}

/// Seeing, photometry and sky brightness written by the reduction pipeline
fn read_pipeline_metrics<S: HeaderSource>(
    builder: RecordBuilder,
    scan: &mut HeaderScan<'_, S>,
) -> RecordBuilder {
    let mut builder = builder;

    // Older frames only carry the legacy seeing keyword
    let seeing = match scan.source.read_f32(keywords::SEEING) {
        Ok(value) => Some(value),
        Err(e) if e.is_missing() => scan.f32(keywords::SEEING_LEGACY),
        Err(e) => {
            scan.record_failure(e);
            None
        }
    };
    if let Some(value) = seeing {
        builder = builder.seeing(value);
    }

    if let Some(value) = scan.f32(keywords::PHOTOMETRY) {
        builder = builder.photometry(value);
    }

    match scan.source.read_f32(keywords::SKY_BRIGHTNESS) {
        Ok(value) => builder = builder.sky_brightness(value),
        Err(e @ KeyError::TypeMismatch { .. }) => {
            let text = scan.source.read_string(keywords::SKY_BRIGHTNESS).unwrap_or_default();
            match sky_brightness_from_text(&text) {
                Some(value) => builder = builder.sky_brightness(value),
                None => scan.record_failure(e),
            }
        }
        Err(e) => scan.record_failure(e),
    }

    builder
}

fn read_object<S: HeaderSource>(
    builder: RecordBuilder,
    scan: &mut HeaderScan<'_, S>,
) -> RecordBuilder {
    let catalog = scan
        .string(keywords::CATALOG_NAME)
        .filter(|name| !name.trim().is_empty());

    let object = match catalog {
        Some(name) => Some(name),
        None => scan.string(keywords::OBJECT),
    };

    match object {
        Some(name) => builder.object(&underscore_spaces(&name)),
        None => builder,
    }
}

fn read_group<S: HeaderSource>(
    builder: RecordBuilder,
    scan: &mut HeaderScan<'_, S>,
) -> RecordBuilder {
    match scan.source.read_string(keywords::GROUP_ID) {
        Ok(group) => builder.group_id(&underscore_spaces(&group)),
        Err(e) => {
            debug!("{}: {}", scan.exposure, e);
            builder.group_id(sentinels::GROUP_UNKNOWN)
        }
    }
}

/// UT start and sort key from DATE-OBS / MJD
///
/// An unparseable DATE-OBS leaves the UTSTART value in place and the sort key
/// at zero rather than guessing at a time.
fn read_timestamp<S: HeaderSource>(
    builder: RecordBuilder,
    scan: &mut HeaderScan<'_, S>,
) -> (RecordBuilder, Option<NaiveDate>) {
    let Some(date_obs) = scan.string(keywords::DATE_OBS) else {
        return (builder, None);
    };

    let Some(timestamp) = parse_observation_time(&date_obs) else {
        scan.note(format!(
            "Error reading date format: |{}| (UT start kept as '{}', no sort key)",
            date_obs,
            builder.current_ut_start()
        ));
        return (builder, None);
    };

    let builder = builder.ut_start(&format_ut_start(&timestamp));
    let builder = match scan.source.read_f64(keywords::MJD) {
        Ok(mjd) => builder.mjd(mjd),
        Err(e) => {
            scan.note(format!(
                "Non-critical error reading MJD: {}: {}",
                e.status_code(),
                scan.exposure
            ));
            builder.mjd(sentinels::MJD_UNKNOWN)
        }
    };

    (builder, Some(timestamp.date()))
}

/// Filter column from up to three filter wheels
///
/// Reading stops at the first wheel that cannot be read. Only a failure on the
/// first wheel is an error; single-wheel instruments simply lack the others.
fn read_filters<S: HeaderSource>(
    builder: RecordBuilder,
    scan: &mut HeaderScan<'_, S>,
) -> RecordBuilder {
    let [first, rest @ ..] = keywords::FILTERS;

    let mut values = match scan.source.read_string(first) {
        Ok(value) => vec![value],
        Err(e) => {
            scan.note(format!("Could not read {} ({})", first, e.status_code()));
            return builder.filters(sentinels::FILTER_READ_ERROR);
        }
    };

    for keyword in rest {
        match scan.source.read_string(keyword) {
            Ok(value) => values.push(value),
            Err(_) => break,
        }
    }

    builder.filters(&describe_filters(&values))
}

fn read_grating<S: HeaderSource>(
    builder: RecordBuilder,
    scan: &mut HeaderScan<'_, S>,
) -> RecordBuilder {
    match scan.source.read_string(keywords::GRATING) {
        Ok(grating) => builder.grating(&grating),
        Err(_) => builder.grating(sentinels::GRATING_NONE),
    }
}

fn apply_quality_checks<S: HeaderSource>(
    builder: RecordBuilder,
    scan: &mut HeaderScan<'_, S>,
) -> RecordBuilder {
    let mut builder = builder;

    for outcome in run_quality_checks(scan.source) {
        match outcome.result {
            CheckResult::Failed { value, penalty } => {
                scan.note(format!(
                    "{} = {} failed pipeline check, error flag -{}",
                    outcome.keyword, value, penalty
                ));
                builder = builder.penalize(penalty);
            }
            CheckResult::Unreadable(e) => scan.record_failure(e),
            CheckResult::Passed(_) | CheckResult::Missing => {}
        }
    }

    builder
}
