//! Provides the CSV report writer for sweep results

use chrono::{Local, NaiveDateTime};
use std::{fs::File, io, path::Path};

use crate::{error::Result, scanners::HostRecord};

/// Format of the capture timestamp column
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Header row of every report
pub const HEADER: [&str; 5] = ["#", "IP", "Hostname", "OS", "Timestamp"];

/// Writes the header followed by one row per record, numbered from 1. Every
/// row carries the same capture timestamp and missing fields are written as
/// empty strings
pub fn write_csv<W: io::Write>(
    writer: W,
    records: &[HostRecord],
    captured_at: NaiveDateTime,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let timestamp = captured_at.format(TIMESTAMP_FORMAT).to_string();

    csv_writer.write_record(HEADER)?;

    for (idx, record) in records.iter().enumerate() {
        let index = (idx + 1).to_string();
        let ip = record.ip.to_string();

        csv_writer.write_record([
            index.as_str(),
            ip.as_str(),
            record.hostname.as_deref().unwrap_or_default(),
            record.os.as_deref().unwrap_or_default(),
            timestamp.as_str(),
        ])?;
    }

    csv_writer.flush()?;

    Ok(())
}

/// Creates (truncating) the file at path and writes the report, stamped
/// with the current local time
///
/// # Errors
///
/// Returns an IO error if the file cannot be created, in which case nothing
/// was written, or a CSV/IO error if writing fails part way
///
/// # Examples
///
/// ```no_run
/// # use hostsweep_lib::report;
/// report::save_csv("scan_result.csv", &[]).unwrap();
/// ```
pub fn save_csv(path: impl AsRef<Path>, records: &[HostRecord]) -> Result<()> {
    save_csv_at(path, records, Local::now().naive_local())
}

/// Same as [`save_csv`] with an explicit capture time
pub fn save_csv_at(
    path: impl AsRef<Path>,
    records: &[HostRecord],
    captured_at: NaiveDateTime,
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;

    log::debug!("writing {} rows to {}", records.len(), path.display());

    write_csv(file, records, captured_at)
}

#[cfg(test)]
#[path = "./report_tests.rs"]
mod tests;
