//! Fixed-width observing log table
//!
//! The layout is consumed by scripts at the telescope, so the banner text and
//! the column formats are reproduced exactly. Values wider than their column
//! are not cut here; the record builder has already truncated them.

use crate::app::models::ExposureRecord;
use crate::app::services::timestamp_sorter::SortIndex;
use std::io::{self, Write};

const RULE: &str = "############ ################## ################ ########################### #### ############ #################### ### ########## ###### ##### #### ####################### #################### ###";
const TITLES: &str = "     UTC        OBJECT_NAME          PROPID          RA             dec       AIR  INSTRUMENT        FILTERS        BIN  GRATING    EXPOS SEING  SKY        FILENAME               GroupID        ERR";
const UNITS: &str = "    START                                                  J2000                                                                      sec   sec  mag             ";

/// Where the table is going
///
/// The console copy has an empty line between the banner and the first row;
/// the file copy does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableTarget {
    Console,
    File,
}

/// Banner lines in output order
pub fn banner_lines() -> [&'static str; 4] {
    [RULE, TITLES, UNITS, RULE]
}

/// One table row, without the line terminator
pub fn format_row(record: &ExposureRecord) -> String {
    format!(
        "{:>12} {:>18} {:>16} {:>13} {:>13} {:4.2} {:>12} {:>20} {:3} {:>11} {:6.1} {:5.1} {:4.1} {:>22} {:>20} {}",
        record.ut_start,
        record.object,
        record.proposal,
        record.ra,
        record.dec,
        record.airmass,
        record.instrument,
        record.filters,
        record.binning,
        record.grating,
        record.exposure_time,
        record.seeing,
        record.sky_brightness,
        record.exposure,
        record.group_id,
        record.error
    )
}

pub fn write_banner<W: Write>(out: &mut W, target: TableTarget) -> io::Result<()> {
    for line in banner_lines() {
        writeln!(out, "{}", line)?;
    }
    if target == TableTarget::Console {
        writeln!(out)?;
    }
    Ok(())
}

/// Write the banner and every record in index order
pub fn write_table<W: Write>(
    out: &mut W,
    records: &[ExposureRecord],
    order: &SortIndex,
    target: TableTarget,
) -> io::Result<()> {
    write_banner(out, target)?;
    for record in order.ordered(records) {
        writeln!(out, "{}", format_row(record))?;
    }
    out.flush()
}

/// Render the table into a string
pub fn render_table(records: &[ExposureRecord], order: &SortIndex, target: TableTarget) -> String {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_table(&mut buffer, records, order, target);
    String::from_utf8_lossy(&buffer).into_owned()
}
