//! Report output: a CSV file, or an aligned table on the console.

use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::models::{ReportRow, REPORT_COLUMNS};

/// Errors that can occur while writing a report
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Where a report goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportSink {
    /// Comma-separated file with a header line
    Csv(PathBuf),
    /// Table printed to stdout
    Console,
}

impl ReportSink {
    /// A file sink when a destination is given, the console otherwise
    pub fn from_destination(destination: Option<PathBuf>) -> Self {
        match destination {
            Some(path) => ReportSink::Csv(path),
            None => ReportSink::Console,
        }
    }

    pub fn emit(&self, rows: &[ReportRow]) -> Result<(), ReportError> {
        match self {
            ReportSink::Csv(path) => {
                write_csv_file(rows, path)?;
                tracing::debug!("Saved {} rows to {}", rows.len(), path.display());
            }
            ReportSink::Console => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{}", render_table(rows))?;
            }
        }
        Ok(())
    }
}

/// Write rows as CSV: one header line, then one line per row
pub fn write_csv<W: Write>(rows: &[ReportRow], writer: W) -> Result<(), ReportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    // Written explicitly so an empty report still carries its header
    writer.write_record(REPORT_COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Create (or truncate) `path` and write rows to it as CSV
pub fn write_csv_file(rows: &[ReportRow], path: &Path) -> Result<(), ReportError> {
    let file = File::create(path)?;
    write_csv(rows, io::BufWriter::new(file))
}

/// Read rows back from CSV produced by [`write_csv`]
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<ReportRow>, ReportError> {
    let mut reader = csv::Reader::from_reader(reader);
    let rows = reader.deserialize().collect::<Result<Vec<ReportRow>, _>>()?;
    Ok(rows)
}

/// Render rows as an aligned table with the report column headers
pub fn render_table(rows: &[ReportRow]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            REPORT_COLUMNS
                .iter()
                .map(|name| Cell::new(name).add_attribute(Attribute::Bold)),
        );

    for row in rows {
        table.add_row(row.fields());
    }

    table
}
