//! Command-line argument definitions for the autolog tools
//!
//! Both binaries take the data directory as their first positional argument.
//! The observing log optionally takes the report filename as a second one.

use crate::config::AutologConfig;
use crate::{Error, Result};
use clap::Parser;
use std::path::PathBuf;

/// Usage text printed when the positional arguments are wrong
pub const AUTOLOG_USAGE: &str = "autolog <DIR name> [output_file_name]
<DIR name> is string giving path to directory containing the data files.
output_file_name is optional name of file into which to write the log.
\tIt will be created in <DIR name>
\tIf not specified, autolog will try to create a sensible default output filename.
\tOutput and any error logs will be written to the same directory
Create a text logfile of all the files in directory.
Output is sorted by UT of the exposure";

pub const RED_REPORT_USAGE: &str = "red_report <DIR name>
<DIR name> is string giving path to directory containing the data files.
\tThe report and any error logs will be written to the same directory
Report the reduction pipeline status of every file in directory.";

/// CLI arguments for the observing log generator
///
/// Reads the header of every exposure file in a directory and writes a
/// fixed-width log of the night ordered by observation time.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "autolog",
    version,
    about = "Create a time-ordered observing log from a directory of FITS exposures",
    long_about = "Create a text logfile of all the exposure files in a directory. \
                  Output is sorted by UT of the exposure and written, together with a \
                  progress log, into the same directory."
)]
pub struct Args {
    /// Directory containing the data files
    #[arg(value_name = "DIR")]
    pub directory: PathBuf,

    /// Name of the log file to create inside DIR
    ///
    /// If not specified, the log is named after the night it covers.
    #[arg(value_name = "OUTPUT_FILE")]
    pub output_filename: Option<String>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress diagnostics and the progress bar
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.quiet, self.verbose)
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Build the validated run configuration
    pub fn to_config(&self) -> Result<AutologConfig> {
        let mut config = AutologConfig::new(self.directory.clone());
        if let Some(name) = &self.output_filename {
            config = config.with_output_name(name.clone());
        }
        if !self.show_progress() {
            config = config.without_progress();
        }
        config.validate()?;
        Ok(config)
    }
}

/// CLI arguments for the reduction status reporter
#[derive(Debug, Clone, Parser)]
#[command(
    name = "red_report",
    version,
    about = "Report the reduction pipeline status of every FITS exposure in a directory"
)]
pub struct RedReportArgs {
    /// Directory containing the data files
    #[arg(value_name = "DIR")]
    pub directory: PathBuf,

    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl RedReportArgs {
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.quiet, self.verbose)
    }

    pub fn to_config(&self) -> Result<AutologConfig> {
        let mut config = AutologConfig::for_reduction_report(self.directory.clone());
        if self.quiet {
            config = config.without_progress();
        }
        config.validate()?;
        Ok(config)
    }
}

fn log_level(quiet: bool, verbose: u8) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Turn a clap failure into a usage error
///
/// Help and version requests are not failures and are returned as `None` so
/// the caller can let clap print them.
pub fn usage_error(error: &clap::Error, usage: &str) -> Option<Error> {
    use clap::error::ErrorKind;

    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => None,
        _ => Some(Error::usage(usage.to_string())),
    }
}
