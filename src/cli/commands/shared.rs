//! Shared components for CLI commands
//!
//! Logging setup, the plain-text status log, directory listing and the end of
//! run summary used by both the observing log and the reduction report.

use crate::app::services::record_collector::CollectionStats;
use crate::{Error, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Counts and output location of a finished run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Files whose header was read
    pub accepted: usize,
    /// Recognized files that could not be opened
    pub rejected: usize,
    /// Entries not following the exposure naming convention
    pub unrecognized: usize,
    /// Unreduced files skipped in favour of their reduced version
    pub superseded: usize,
    /// Recognized names with a non-FITS extension
    pub ignored: usize,
    /// Report file, when one was written
    pub output_path: Option<PathBuf>,
}

impl RunSummary {
    pub fn from_stats(stats: CollectionStats, output_path: Option<PathBuf>) -> Self {
        Self {
            accepted: stats.accepted,
            rejected: stats.rejected,
            unrecognized: stats.unrecognized,
            superseded: stats.superseded,
            ignored: stats.ignored,
            output_path,
        }
    }

    /// Check whether there was nothing to report
    pub fn is_empty(&self) -> bool {
        self.accepted == 0
    }

    /// Print the summary to stderr
    pub fn print(&self) {
        eprintln!("\n{}", "Run Summary".bright_green().bold());
        eprintln!(
            "  {} {}",
            "Files read:".bright_cyan(),
            self.accepted.to_string().bright_white().bold()
        );
        if self.rejected > 0 {
            eprintln!(
                "  {} {}",
                "Files not read:".bright_red(),
                self.rejected.to_string().bright_red().bold()
            );
        }
        if self.superseded > 0 {
            eprintln!(
                "  {} {}",
                "Superseded by reduced data:".bright_cyan(),
                self.superseded.to_string().bright_white()
            );
        }
        if self.unrecognized > 0 {
            eprintln!(
                "  {} {}",
                "Unrecognized names:".bright_yellow(),
                self.unrecognized.to_string().bright_white()
            );
        }
        if self.ignored > 0 {
            eprintln!(
                "  {} {}",
                "Ignored (not FITS):".bright_cyan(),
                self.ignored.to_string().bright_white()
            );
        }
        match &self.output_path {
            Some(path) => eprintln!(
                "  {} {}",
                "Output:".bright_cyan(),
                path.display().to_string().bright_white()
            ),
            None => eprintln!("  {}", "No report file written".bright_yellow()),
        }
    }
}

/// Set up structured logging for either tool
pub fn setup_logging(log_level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("autolog={}", log_level)));

    let result = if quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| Error::configuration(format!("Failed to initialise logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Plain-text progress log written next to the data
///
/// Every per-file decision ends up here. The buffer is flushed at the
/// milestones the caller chooses and when the log is dropped.
#[derive(Debug)]
pub struct StatusLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl StatusLog {
    /// Create (truncating) the log at `path`
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .map_err(|e| Error::status_log_open(path.display().to_string(), e))?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn line(&mut self, text: impl AsRef<str>) -> Result<()> {
        writeln!(self.writer, "{}", text.as_ref())
            .map_err(|e| Error::io(format!("Failed to write {}", self.path.display()), e))
    }

    pub fn lines<I, S>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.line(line)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| Error::io(format!("Failed to flush {}", self.path.display()), e))
    }

    /// Write the end-of-run totals and flush
    ///
    /// Names outside the convention count as bad files here, as operators
    /// expect from this log.
    pub fn totals(&mut self, stats: &CollectionStats) -> Result<()> {
        self.line(format!("{:5} files successfully read into log", stats.accepted))?;
        self.line(format!(
            "{:5} bad files not read",
            stats.rejected + stats.unrecognized
        ))?;
        self.flush()
    }
}

/// One regular file in the data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub path: PathBuf,
    pub file_name: String,
}

/// List the regular files directly inside `directory`, in file-name order
///
/// Entries named in `exclude` are left out. Unreadable entries are logged and
/// skipped; only a directory that cannot be opened at all is an error.
pub fn list_directory(directory: &Path, exclude: &[&str]) -> Result<Vec<DirectoryEntry>> {
    std::fs::read_dir(directory)
        .map_err(|e| Error::directory_open(directory.display().to_string(), e))?;

    let mut entries = Vec::new();
    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable directory entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        if exclude.contains(&file_name.as_str()) {
            continue;
        }

        entries.push(DirectoryEntry {
            path: entry.path().to_path_buf(),
            file_name,
        });
    }

    debug!("Found {} files in {}", entries.len(), directory.display());
    Ok(entries)
}

/// Create a progress bar with appropriate styling
pub fn create_progress_bar(total: u64, message: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}
