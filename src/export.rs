//! CSV export of aggregate tables
//!
//! Numbers are rounded to [`EXPORT_PRECISION`] decimals as they are written; the
//! aggregate table itself keeps full precision. Undefined values are written as
//! empty cells.

use crate::analysis::AggregateTable;
use crate::common::constants::EXPORT_PRECISION;
use csv::Writer;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while exporting
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
}

type Result<T> = core::result::Result<T, ExportError>;

/// Writes `table` as CSV to `destination`, replacing any existing file.
///
/// The header names the group key followed by each aggregation alias.
pub fn export(table: &AggregateTable, destination: &Path) -> Result<()> {
    let file = File::create(destination).map_err(|source| ExportError::FileWrite {
        path: destination.to_path_buf(),
        source,
    })?;

    write_csv(table, BufWriter::new(file)).map_err(|e| match e {
        ExportError::Csv(e) if e.is_io_error() => ExportError::FileWrite {
            path: destination.to_path_buf(),
            source: match e.into_kind() {
                csv::ErrorKind::Io(source) => source,
                _ => std::io::Error::other("CSV writer failed"),
            },
        },
        other => other,
    })?;

    info!(path = %destination.display(), rows = table.len(), "exported summary");
    Ok(())
}

/// Writes `table` as CSV to any writer.
pub fn write_csv<W: Write>(table: &AggregateTable, writer: W) -> Result<()> {
    let mut writer = Writer::from_writer(writer);

    let mut header = vec![table.key_column()];
    header.extend(table.aliases().iter().map(String::as_str));
    writer.write_record(&header)?;

    for row in table.rows() {
        let mut record = vec![row.key.clone()];
        record.extend(
            row.values
                .iter()
                .map(|value| value.format(EXPORT_PRECISION, "")),
        );
        writer.write_record(&record)?;
    }

    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
