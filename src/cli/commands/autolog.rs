//! Observing log command
//!
//! Walks the data directory once, extracting a record from every recognized
//! FITS file, then sorts the records by observation time and writes the
//! table to the console and to the report file.

use crate::app::services::filename_classifier::ClassifiedName;
use crate::app::services::header_reader::{FitsHeaderReader, HeaderReader};
use crate::app::services::metadata_extractor::{Extraction, MetadataExtractor};
use crate::app::services::output_naming::{NameBasis, NightTracker, resolve_report_name};
use crate::app::services::record_collector::RecordCollector;
use crate::app::services::report_renderer::{TableTarget, write_table};
use crate::cli::commands::shared::{
    RunSummary, StatusLog, create_progress_bar, list_directory,
};
use crate::config::AutologConfig;
use crate::constants::OUTPUT_LOG_OPEN_FAILED;
use crate::{Error, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use tracing::{debug, info, warn};

/// Run the observing log against FITS files on disk, printing to stdout
pub fn run_autolog(config: &AutologConfig) -> Result<RunSummary> {
    let stdout = io::stdout();
    let mut console = stdout.lock();
    run_autolog_with(config, FitsHeaderReader, &mut console)
}

/// Run the observing log with an injected header reader and console
pub fn run_autolog_with<R, W>(
    config: &AutologConfig,
    reader: R,
    console: &mut W,
) -> Result<RunSummary>
where
    R: HeaderReader,
    W: Write,
{
    info!("Building observing log for {}", config.directory.display());

    let entries = list_directory(&config.directory, &[config.status_log_name.as_str()])?;

    let mut status = StatusLog::create(&config.status_log_path())?;
    status.line("First line of the log.")?;
    status.flush()?;

    let extractor = MetadataExtractor::new(reader);
    let mut collector = RecordCollector::new();
    let mut nights = NightTracker::new();

    let pb = create_progress_bar(entries.len() as u64, "Reading headers", config.show_progress);

    for entry in &entries {
        pb.inc(1);

        let Some(name) = ClassifiedName::parse(&entry.file_name) else {
            debug!("Not an exposure file name: {}", entry.file_name);
            status.line(format!("Not an LT file name (31): {}", entry.file_name))?;
            collector.skip_unrecognized();
            continue;
        };

        // Reduced data products can share the naming convention
        if !name.extension_starts_with(&config.data_extension) {
            debug!("Ignoring {} (extension {})", entry.file_name, name.extension);
            collector.skip_ignored();
            continue;
        }

        status.line(format!("current exposure : {}", name.exposure()))?;
        nights.observe_filename_date(&name.date);

        let extraction = extractor.extract(&entry.path, &name);
        status.lines(&extraction.notes)?;

        match extraction.outcome {
            Extraction::Superseded { reduced } => {
                debug!("{} superseded by {}", entry.file_name, reduced.display());
                collector.skip_superseded();
            }
            Extraction::Rejected { .. } => collector.reject(),
            Extraction::Accepted {
                record,
                observation_date,
            } => {
                if let Some(date) = observation_date {
                    nights.observe_observation(date);
                }
                collector.accept(record);
            }
        }

        status.flush()?;
    }

    pb.finish_and_clear();

    let stats = collector.stats();
    status.totals(&stats)?;
    info!("Traversal finished: {}", stats.summary());

    if collector.is_empty() {
        status.line("Nothing to do. Closing.")?;
        status.flush()?;
        writeln!(console, "Nothing to log.").map_err(|e| Error::io("Failed to write console", e))?;
        return Ok(RunSummary::from_stats(stats, None));
    }

    let order = collector.sort_index();

    let report_name = resolve_report_name(&config.output_name, &nights, &config.fallback_log_name);
    if report_name.basis == NameBasis::Fallback {
        let message = format!(
            "Error reading observations date. Log will be called {}",
            report_name
        );
        warn!("{}", message);
        writeln!(console, "{}", message).map_err(|e| Error::io("Failed to write console", e))?;
        status.line(&message)?;
    }
    let report_path = config.path_in_directory(&report_name.file_name);

    let report_file = match File::create(&report_path) {
        Ok(file) => Some(BufWriter::new(file)),
        Err(e) => {
            let message = format!(
                "Could not open output file ({}): {}",
                OUTPUT_LOG_OPEN_FAILED,
                report_path.display()
            );
            warn!("{}: {}", message, e);
            writeln!(console, "{}", message)
                .and_then(|_| writeln!(console, "Proceeding, but writing only to screen"))
                .map_err(|e| Error::io("Failed to write console", e))?;
            status.line(&message)?;
            None
        }
    };

    write_table(console, collector.records(), &order, TableTarget::Console)
        .map_err(|e| Error::io("Failed to write observing log to console", e))?;

    let output_path = match report_file {
        Some(mut file) => {
            write_table(&mut file, collector.records(), &order, TableTarget::File).map_err(
                |e| Error::io(format!("Failed to write {}", report_path.display()), e),
            )?;
            info!("Observing log written to {}", report_path.display());
            Some(report_path)
        }
        None => None,
    };

    status.flush()?;

    Ok(RunSummary::from_stats(stats, output_path))
}
