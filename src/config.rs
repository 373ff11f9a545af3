//! Run configuration and validation.
//!
//! Everything a run needs besides the files themselves: where the data lives,
//! how the report is named and which auxiliary files are written next to it.

use crate::app::services::output_naming::OutputName;
use crate::constants::{
    FALLBACK_LOG_NAME, FITS_EXTENSION, RED_REPORT_LOG_NAME, STATUS_LOG_NAME,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration for one observing log or reduction report run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutologConfig {
    /// Directory holding the night's data files
    pub directory: PathBuf,

    /// How the report file is named
    pub output_name: OutputName,

    /// Progress/status log written inside the data directory
    pub status_log_name: String,

    /// Report name used when no observation date is known
    pub fallback_log_name: String,

    /// Extension prefix of the files to read
    pub data_extension: String,

    /// Draw a progress bar while scanning
    pub show_progress: bool,
}

impl Default for AutologConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            output_name: OutputName::Derived,
            status_log_name: STATUS_LOG_NAME.to_string(),
            fallback_log_name: FALLBACK_LOG_NAME.to_string(),
            data_extension: FITS_EXTENSION.to_string(),
            show_progress: true,
        }
    }
}

impl AutologConfig {
    /// Configuration for the observing log of `directory`
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    /// Configuration for the reduction report of `directory`
    pub fn for_reduction_report(directory: impl Into<PathBuf>) -> Self {
        Self::new(directory).with_status_log_name(RED_REPORT_LOG_NAME)
    }

    /// Write the report under this name instead of deriving one
    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = OutputName::Given(name.into());
        self
    }

    pub fn with_status_log_name(mut self, name: impl Into<String>) -> Self {
        self.status_log_name = name.into();
        self
    }

    pub fn with_fallback_log_name(mut self, name: impl Into<String>) -> Self {
        self.fallback_log_name = name.into();
        self
    }

    pub fn with_data_extension(mut self, extension: impl Into<String>) -> Self {
        self.data_extension = extension.into();
        self
    }

    /// Disable the progress bar
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn status_log_path(&self) -> PathBuf {
        self.directory.join(&self.status_log_name)
    }

    /// Path of a file named `file_name` inside the data directory
    pub fn path_in_directory(&self, file_name: &str) -> PathBuf {
        self.directory.join(file_name)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Check that every name is a plain, non-empty filename
    pub fn validate(&self) -> Result<()> {
        if self.directory.as_os_str().is_empty() {
            return Err(Error::configuration("Data directory must not be empty"));
        }

        validate_file_name("status log", &self.status_log_name)?;
        validate_file_name("fallback log", &self.fallback_log_name)?;
        if let OutputName::Given(name) = &self.output_name {
            validate_file_name("output file", name)?;
        }

        if self.data_extension.is_empty() {
            return Err(Error::configuration("Data extension must not be empty"));
        }

        debug!("Configuration validated: {:?}", self);
        Ok(())
    }
}

fn validate_file_name(label: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::configuration(format!("The {} name must not be empty", label)));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(Error::configuration(format!(
            "The {} name '{}' must be a file name, not a path",
            label, name
        )));
    }
    Ok(())
}
