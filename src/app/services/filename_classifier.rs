//! Exposure filename classification
//!
//! Telescope data files follow a fixed naming convention:
//!
//! ```text
//! <instrument>_<type>_<YYYYMMDD>_<multrun>_<window>_<run>_<pipeline>.<extension>
//! h_e_20240311_12_1_1_1.fits
//! ```
//!
//! The `pipeline` field records the reduction level: `0` for raw frames and
//! `1` once the downstream pipeline has produced its reduced version.

use crate::constants::{FITS_EXTENSION, REDUCED_FLAG, UNREDUCED_FLAG};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static EXPOSURE_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)_([A-Za-z]+)_(\d{8})_(\d+)_(\d+)_(\d+)_(\d+)\.([A-Za-z0-9.]+)$")
        .unwrap()
});

/// Structured fields of a recognized exposure filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedName {
    /// Instrument code prefix
    pub instrument: String,
    /// Exposure type code (exposure, bias, dark, flat, ...)
    pub exposure_type: String,
    /// Night of observation as written in the filename
    pub date: String,
    pub multrun: String,
    pub window: String,
    pub run: String,
    /// Pipeline reduction level
    pub pipeline: String,
    /// Everything after the first `.`
    pub extension: String,
}

impl ClassifiedName {
    /// Parse a directory entry name
    ///
    /// Returns `None` for anything that does not follow the convention.
    pub fn parse(file_name: &str) -> Option<Self> {
        let caps = EXPOSURE_NAME_REGEX.captures(file_name)?;

        Some(Self {
            instrument: caps[1].to_string(),
            exposure_type: caps[2].to_string(),
            date: caps[3].to_string(),
            multrun: caps[4].to_string(),
            window: caps[5].to_string(),
            run: caps[6].to_string(),
            pipeline: caps[7].to_string(),
            extension: caps[8].to_string(),
        })
    }

    /// Filename without its extension; this is the exposure identifier
    pub fn exposure(&self) -> String {
        format!(
            "{}_{}_{}_{}_{}_{}_{}",
            self.instrument,
            self.exposure_type,
            self.date,
            self.multrun,
            self.window,
            self.run,
            self.pipeline
        )
    }

    /// Full filename including the extension
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.exposure(), self.extension)
    }

    /// Check whether this is a FITS file (`.fits`, `.fits.gz`, ...)
    pub fn is_fits(&self) -> bool {
        self.extension_starts_with(FITS_EXTENSION)
    }

    pub fn extension_starts_with(&self, prefix: &str) -> bool {
        self.extension.starts_with(prefix)
    }

    /// Check whether the pipeline has not yet been run on this exposure
    pub fn is_unreduced(&self) -> bool {
        self.pipeline.len() == 1 && self.pipeline.starts_with(UNREDUCED_FLAG)
    }

    /// The name the reduced version of this exposure would carry
    pub fn reduced_counterpart(&self) -> Self {
        Self {
            pipeline: REDUCED_FLAG.to_string(),
            ..self.clone()
        }
    }
}

impl fmt::Display for ClassifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name())
    }
}
