//! Application constants for autolog
//!
//! This module contains the file names, header keywords, display widths and
//! sentinel values used throughout the log generator. The sentinels are read by
//! downstream tools that parse the rendered log, so their literal values matter.

// =============================================================================
// File Names
// =============================================================================

/// Progress/diagnostic log written into the data directory
pub const STATUS_LOG_NAME: &str = "autolog_status.log";

/// Report name used when mixed-night data has no readable observation date
pub const FALLBACK_LOG_NAME: &str = "autolog.log";

/// Extension appended to date-derived report names
pub const REPORT_EXTENSION: &str = "log";

/// Output of the reduction status reporter
pub const RED_REPORT_LOG_NAME: &str = "red_report.log";

/// Extension prefix identifying FITS data files
pub const FITS_EXTENSION: &str = "fits";

// =============================================================================
// Pipeline Reduction Levels
// =============================================================================

/// Filename pipeline flag of a raw, unreduced exposure
pub const UNREDUCED_FLAG: char = '0';

/// Filename pipeline flag of the reduced counterpart
pub const REDUCED_FLAG: char = '1';

// =============================================================================
// Display Widths
// =============================================================================

/// Maximum characters kept for each text field of an exposure record
pub mod widths {
    pub const OBJECT: usize = 18;
    pub const PROPOSAL: usize = 16;
    pub const RA: usize = 13;
    pub const DEC: usize = 13;
    pub const UT_START: usize = 12;
    pub const INSTRUMENT: usize = 12;
    pub const GROUP_ID: usize = 20;
    pub const GRATING: usize = 11;
    pub const FILTER: usize = 47;
    pub const EXPOSURE: usize = 40;
}

// =============================================================================
// Sentinel Values
// =============================================================================

/// Placeholders for values the header could not supply
pub mod sentinels {
    /// Seeing could not be determined
    pub const SEEING_UNKNOWN: f32 = 999.0;

    /// Photometric quality could not be determined
    pub const PHOTOMETRY_UNKNOWN: f32 = -999.0;

    /// Sky brightness could not be determined
    pub const SKY_BRIGHTNESS_UNKNOWN: f32 = 99.9;

    /// Textual sky brightness written by the scheduler when it has no estimate
    pub const SKY_BRIGHTNESS_UNKNOWN_TOKEN: &str = "UNKNOWN";

    /// Sort key for records without a usable timestamp
    pub const MJD_UNKNOWN: f64 = 0.0;

    pub const GRATING_NONE: &str = "NA";
    pub const GROUP_UNKNOWN: &str = "Unknown";
    pub const FILTER_NONE: &str = "None";
    pub const FILTER_READ_ERROR: &str = "Error_reading_FITS";
}

/// Filter wheel positions that carry no filter
pub const CLEAR_FILTER_NAMES: &[&str] = &["Clear", "clear", "NONE"];

// =============================================================================
// Header Keywords
// =============================================================================

pub mod keywords {
    pub const INSTRUMENT: &str = "INSTRUME";
    pub const PROPOSAL: &str = "PROPID";
    pub const RA: &str = "RA";
    pub const DEC: &str = "DEC";
    pub const UT_START: &str = "UTSTART";
    pub const EXPOSURE_TIME: &str = "EXPTIME";
    pub const AIRMASS: &str = "AIRMASS";
    pub const BINNING: &str = "CCDXBIN";
    pub const SEEING: &str = "L1SEESEC";
    pub const SEEING_LEGACY: &str = "L1SEEING";
    pub const PHOTOMETRY: &str = "L1PHOTOM";
    pub const SKY_BRIGHTNESS: &str = "SCHEDSKY";
    pub const CATALOG_NAME: &str = "CAT-NAME";
    pub const OBJECT: &str = "OBJECT";
    pub const GROUP_ID: &str = "GROUPID";
    pub const DATE_OBS: &str = "DATE-OBS";
    pub const MJD: &str = "MJD";
    pub const GRATING: &str = "GRATID";

    /// Filter wheels, read in order until one is missing
    pub const FILTERS: [&str; 3] = ["FILTER1", "FILTER2", "FILTER3"];

    /// Instrument filter keywords reported by the reduction status reporter
    pub const INSTRUMENT_FILTERS: [&str; 2] = ["FILTERI1", "FILTERI2"];
}

// =============================================================================
// Downstream Quality Checks
// =============================================================================

/// Pipeline status keywords and the penalty each subtracts from a record's
/// error flag when its value is anything other than +1 or -1
///
/// Penalties are distinct powers of two so the accumulated flag identifies
/// exactly which checks failed.
pub const QUALITY_CHECKS: &[(&str, i32)] = &[
    ("L1STATOV", 2),
    ("L1STATZE", 4),
    ("L1STATTR", 8),
    ("L1STATFL", 16),
    ("L1STATDA", 32),
    ("L1STATFR", 64),
];

/// Pipeline stages shown by the reduction status reporter
pub const REDUCTION_STAGES: &[(&str, &str)] = &[
    ("L1STATOV", "Overscan subtraction"),
    ("L1STATDA", "Dark frame subtraction"),
    ("L1STATFL", "Flatfielding"),
];

// =============================================================================
// Header Reader Status Codes
// =============================================================================

/// Numeric status codes reported for keyword failures
///
/// These follow the conventional FITS library numbering so the status log reads
/// the same as the diagnostics observers are used to.
pub mod status_codes {
    pub const KEY_NOT_FOUND: i32 = 202;
    pub const VALUE_UNDEFINED: i32 = 204;
    pub const BAD_INTEGER: i32 = 407;
    pub const BAD_FLOAT: i32 = 408;
    pub const BAD_DOUBLE: i32 = 409;
    pub const BAD_LOGICAL: i32 = 404;
    pub const FILE_NOT_OPENED: i32 = 104;
    pub const END_OF_FILE: i32 = 107;
}

// =============================================================================
// Exit Codes
// =============================================================================

pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const BAD_ARGUMENTS: i32 = -10;
    pub const DIRECTORY_OPEN: i32 = -21;
    pub const STATUS_LOG_OPEN: i32 = -23;
    pub const GENERIC_FAILURE: i32 = 1;
}

/// Status recorded when the output report cannot be created
pub const OUTPUT_LOG_OPEN_FAILED: i32 = -53;

// =============================================================================
// FITS Layout
// =============================================================================

/// Size of one FITS header/data block
pub const FITS_BLOCK_SIZE: usize = 2880;

/// Size of one header card
pub const FITS_CARD_SIZE: usize = 80;

/// Upper bound on header blocks read before giving up on finding END
pub const MAX_HEADER_BLOCKS: usize = 1000;
