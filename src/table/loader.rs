//! CSV loading for the raw census export
//!
//! The loader performs no type inference: every column is read as text and the
//! projector decides which columns are numeric. Files ending in `.zst` are
//! decompressed on the fly.

use super::{Series, Table, TableError};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};
use zstd::Decoder;

/// Errors that can occur while loading a dataset
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read input file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to decompress zstd file: {0}")]
    Decompression(String),

    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("Malformed table: {0}")]
    Table(#[from] TableError),
}

type Result<T> = core::result::Result<T, LoadError>;

/// Loads a CSV file (optionally zstd compressed) into an all-text [`Table`]
///
/// # Arguments
/// * `file_path` - Path to a `.csv` or `.csv.zst` file
///
/// # Returns
/// * `Ok(Table)` - One text column per CSV header
/// * `Err(LoadError)` - If reading, decompression or parsing failed
pub fn load_csv(file_path: &Path) -> Result<Table> {
    let file = File::open(file_path)?;

    let is_compressed = file_path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("zst"));

    let table = if is_compressed {
        let decoder = Decoder::new(file)
            .map_err(|e| LoadError::Decompression(format!("Failed to create decoder: {}", e)))?;
        read_csv(decoder)?
    } else {
        read_csv(BufReader::new(file))?
    };

    info!(
        path = %file_path.display(),
        rows = table.len(),
        columns = table.width(),
        "loaded dataset"
    );
    Ok(table)
}

/// Reads CSV data with a header row into an all-text [`Table`]
///
/// Surrounding whitespace is trimmed and empty cells become missing values.
pub fn read_csv<R: Read>(reader: R) -> Result<Table> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];

    for record in reader.records() {
        let record = record?;
        for (column, value) in cells.iter_mut().zip(record.iter()) {
            column.push((!value.is_empty()).then(|| value.to_string()));
        }
    }

    debug!(columns = ?headers, "parsed CSV header");

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| (name, Series::Text(values)))
        .collect();
    Ok(Table::new(columns)?)
}
