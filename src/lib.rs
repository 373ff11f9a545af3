//! Autolog Library
//!
//! A Rust library for turning a night's worth of telescope exposure files into
//! a time-ordered observing log.
//!
//! This library provides tools for:
//! - Classifying directory entries against the standard exposure filename convention
//! - Reading typed keywords from FITS primary headers
//! - Extracting and normalizing exposure metadata while tolerating missing fields
//! - Ordering records by observation timestamp through an index sort
//! - Rendering the fixed-width observing log and the reduction status report

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod filename_classifier;
        pub mod header_reader;
        pub mod metadata_extractor;
        pub mod output_naming;
        pub mod record_collector;
        pub mod reduction_status;
        pub mod report_renderer;
        pub mod timestamp_sorter;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{ExposureRecord, RecordBuilder};
pub use config::AutologConfig;

/// Result type alias for autolog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for autolog runs
///
/// Only the startup variants terminate a run. Everything that goes wrong with an
/// individual file is resolved inside the traversal loop and written to the
/// status log instead.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Wrong number of command line arguments
    #[error("Usage error: {message}")]
    Usage { message: String },

    /// The data directory could not be opened
    #[error("Error opening directory: {path}")]
    DirectoryOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The progress/status log could not be created
    #[error("Could not open progress log: {path}")]
    StatusLogOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Create a directory open error
    pub fn directory_open(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::DirectoryOpen {
            path: path.into(),
            source,
        }
    }

    /// Create a status log open error
    pub fn status_log_open(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::StatusLogOpen {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Process exit status for this error
    ///
    /// Startup failures each get their own value so wrapper scripts can tell
    /// them apart. Anything else maps to the generic failure code.
    pub fn exit_code(&self) -> i32 {
        use constants::exit_codes;

        match self {
            Self::Usage { .. } => exit_codes::BAD_ARGUMENTS,
            Self::DirectoryOpen { .. } => exit_codes::DIRECTORY_OPEN,
            Self::StatusLogOpen { .. } => exit_codes::STATUS_LOG_OPEN,
            _ => exit_codes::GENERIC_FAILURE,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}
