//! Reduction status report command
//!
//! Lists the pipeline stage states of every recognized FITS file on the
//! console. The same lines, plus the per-file notes, go to the report log in
//! the data directory.

use crate::app::services::filename_classifier::ClassifiedName;
use crate::app::services::header_reader::{FitsHeaderReader, HeaderReader};
use crate::app::services::record_collector::CollectionStats;
use crate::app::services::reduction_status::{ReductionInspector, ReductionOutcome};
use crate::cli::commands::shared::{
    RunSummary, StatusLog, create_progress_bar, list_directory,
};
use crate::config::AutologConfig;
use crate::{Error, Result};
use std::io::{self, Write};
use tracing::{debug, info};

pub fn run_red_report(config: &AutologConfig) -> Result<RunSummary> {
    let stdout = io::stdout();
    let mut console = stdout.lock();
    run_red_report_with(config, FitsHeaderReader, &mut console)
}

/// Run the reduction report with an injected header reader and console
pub fn run_red_report_with<R, W>(
    config: &AutologConfig,
    reader: R,
    console: &mut W,
) -> Result<RunSummary>
where
    R: HeaderReader,
    W: Write,
{
    info!("Reporting reduction status for {}", config.directory.display());

    let entries = list_directory(&config.directory, &[config.status_log_name.as_str()])?;
    let mut report = StatusLog::create(&config.status_log_path())?;

    let inspector = ReductionInspector::new(reader);
    let mut stats = CollectionStats::default();
    let pb = create_progress_bar(entries.len() as u64, "Reading headers", config.show_progress);

    let console_error = |e| Error::io("Failed to write console", e);

    for entry in &entries {
        pb.inc(1);

        let Some(name) = ClassifiedName::parse(&entry.file_name) else {
            let line = format!("Not an LT file name (31): {}", entry.file_name);
            writeln!(console, "{}", line).map_err(console_error)?;
            report.line(line)?;
            stats.unrecognized += 1;
            continue;
        };

        if !name.extension_starts_with(&config.data_extension) {
            writeln!(console, "{} Extension is {}", entry.file_name, name.extension)
                .map_err(console_error)?;
            stats.ignored += 1;
            continue;
        }

        let inspection = inspector.inspect(&entry.path, &name);
        report.lines(&inspection.notes)?;

        match inspection.outcome {
            ReductionOutcome::Superseded { reduced } => {
                debug!("{} superseded by {}", entry.file_name, reduced.display());
                stats.superseded += 1;
            }
            ReductionOutcome::Rejected { error } => {
                writeln!(
                    console,
                    "Failed to open FITS ({}) - {}",
                    error.status_code(),
                    name.exposure()
                )
                .map_err(console_error)?;
                stats.rejected += 1;
            }
            ReductionOutcome::Reported(file_report) => {
                for line in file_report.lines() {
                    writeln!(console, "{}", line).map_err(console_error)?;
                    report.line(line)?;
                }
                stats.accepted += 1;
            }
        }

        report.flush()?;
    }

    pb.finish_and_clear();
    report.totals(&stats)?;

    Ok(RunSummary::from_stats(
        stats,
        Some(report.path().to_path_buf()),
    ))
}
