//! Core data models for exposure metadata
//!
//! An [`ExposureRecord`] is produced once per data file that could be opened.
//! It is assembled through a [`RecordBuilder`] that is moved through each
//! extraction step and finalized before it is handed to the collector.

use crate::app::services::metadata_extractor::normalize::truncate_chars;
use crate::constants::{sentinels, widths};
use serde::{Deserialize, Serialize};

/// Normalized metadata for one exposure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureRecord {
    /// Filename stem; never empty
    pub exposure: String,
    pub object: String,
    pub proposal: String,
    pub ra: String,
    pub dec: String,
    /// Time of day the exposure started
    pub ut_start: String,
    /// Modified Julian Date used only as the sort key
    pub mjd: f64,
    pub airmass: f32,
    pub instrument: String,
    pub filters: String,
    pub grating: String,
    pub binning: i32,
    pub exposure_time: f32,
    pub seeing: f32,
    pub photometry: f32,
    pub sky_brightness: f32,
    pub group_id: String,
    /// 0 when clean, otherwise the sum of the penalties of failed checks
    pub error: i32,
}

impl ExposureRecord {
    /// Record for `exposure` with every other field at its default or sentinel
    pub fn new(exposure: impl Into<String>) -> Self {
        Self {
            exposure: truncate_chars(&exposure.into(), widths::EXPOSURE),
            object: String::new(),
            proposal: String::new(),
            ra: String::new(),
            dec: String::new(),
            ut_start: String::new(),
            mjd: sentinels::MJD_UNKNOWN,
            airmass: 0.0,
            instrument: String::new(),
            filters: String::new(),
            grating: sentinels::GRATING_NONE.to_string(),
            binning: 0,
            exposure_time: 0.0,
            seeing: sentinels::SEEING_UNKNOWN,
            photometry: sentinels::PHOTOMETRY_UNKNOWN,
            sky_brightness: sentinels::SKY_BRIGHTNESS_UNKNOWN,
            group_id: sentinels::GROUP_UNKNOWN.to_string(),
            error: 0,
        }
    }

    /// Check whether the record carries a usable timestamp
    pub fn has_timestamp(&self) -> bool {
        self.mjd != sentinels::MJD_UNKNOWN
    }

    /// Check whether seeing was measured
    pub fn has_seeing(&self) -> bool {
        self.seeing != sentinels::SEEING_UNKNOWN
    }

    /// Check whether every quality check passed
    pub fn is_clean(&self) -> bool {
        self.error == 0
    }
}

/// Record under construction
///
/// Each setter takes the builder by value and returns it, truncating text to
/// the display width of its column.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: ExposureRecord,
}

impl RecordBuilder {
    pub fn new(exposure: impl Into<String>) -> Self {
        Self {
            record: ExposureRecord::new(exposure),
        }
    }

    pub fn instrument(mut self, value: &str) -> Self {
        self.record.instrument = truncate_chars(value, widths::INSTRUMENT);
        self
    }

    pub fn proposal(mut self, value: &str) -> Self {
        self.record.proposal = truncate_chars(value, widths::PROPOSAL);
        self
    }

    pub fn ra(mut self, value: &str) -> Self {
        self.record.ra = truncate_chars(value, widths::RA);
        self
    }

    pub fn dec(mut self, value: &str) -> Self {
        self.record.dec = truncate_chars(value, widths::DEC);
        self
    }

    pub fn ut_start(mut self, value: &str) -> Self {
        self.record.ut_start = truncate_chars(value, widths::UT_START);
        self
    }

    pub fn object(mut self, value: &str) -> Self {
        self.record.object = truncate_chars(value, widths::OBJECT);
        self
    }

    pub fn group_id(mut self, value: &str) -> Self {
        self.record.group_id = truncate_chars(value, widths::GROUP_ID);
        self
    }

    pub fn filters(mut self, value: &str) -> Self {
        self.record.filters = truncate_chars(value, widths::FILTER);
        self
    }

    pub fn grating(mut self, value: &str) -> Self {
        self.record.grating = truncate_chars(value, widths::GRATING);
        self
    }

    pub fn mjd(mut self, value: f64) -> Self {
        self.record.mjd = value;
        self
    }

    pub fn airmass(mut self, value: f32) -> Self {
        self.record.airmass = value;
        self
    }

    pub fn binning(mut self, value: i32) -> Self {
        self.record.binning = value;
        self
    }

    pub fn exposure_time(mut self, value: f32) -> Self {
        self.record.exposure_time = value;
        self
    }

    pub fn seeing(mut self, value: f32) -> Self {
        self.record.seeing = value;
        self
    }

    pub fn photometry(mut self, value: f32) -> Self {
        self.record.photometry = value;
        self
    }

    pub fn sky_brightness(mut self, value: f32) -> Self {
        self.record.sky_brightness = value;
        self
    }

    /// Subtract a check penalty from the error flag
    pub fn penalize(mut self, magnitude: i32) -> Self {
        self.record.error -= magnitude.abs();
        self
    }

    /// Replace the error flag with a fatal status code
    pub fn fatal_status(mut self, code: i32) -> Self {
        self.record.error = code;
        self
    }

    /// Current UT start, used by steps that only fill it in when empty
    pub fn current_ut_start(&self) -> &str {
        &self.record.ut_start
    }

    pub fn current_error(&self) -> i32 {
        self.record.error
    }

    pub fn build(self) -> ExposureRecord {
        self.record
    }
}
