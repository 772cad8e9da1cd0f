//! In-memory tables of named, typed columns
//!
//! A [`Table`] is the unit every pipeline stage consumes and produces. Tables are
//! never mutated in place; filtering, projection and truncation return new tables.

pub mod filter;
pub mod loader;
pub mod projection;

use crate::common::tables::format_records;
use core::fmt;
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised when a table is built or queried
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("Column '{0}' does not exist in the table")]
    MissingColumn(String),

    #[error("Column '{0}' appears more than once")]
    DuplicateColumn(String),

    #[error("Column '{name}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Column '{name}' holds {actual} values, expected {expected} values")]
    TypeMismatch {
        name: String,
        expected: ColumnKind,
        actual: ColumnKind,
    },
}

type Result<T> = core::result::Result<T, TableError>;

/// The value type stored in a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Text => write!(f, "text"),
            ColumnKind::Number => write!(f, "numeric"),
        }
    }
}

/// A single column. Missing cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Series {
    Text(Vec<Option<String>>),
    Number(Vec<Option<f64>>),
}

impl Series {
    pub fn len(&self) -> usize {
        match self {
            Series::Text(values) => values.len(),
            Series::Number(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Series::Text(_) => ColumnKind::Text,
            Series::Number(_) => ColumnKind::Number,
        }
    }

    /// Number of missing cells (NaN numbers count as missing)
    pub fn missing_count(&self) -> usize {
        match self {
            Series::Text(values) => values.iter().filter(|v| v.is_none()).count(),
            Series::Number(values) => values
                .iter()
                .filter(|v| v.map_or(true, f64::is_nan))
                .count(),
        }
    }

    /// Returns the cell at `index` as a categorical label.
    ///
    /// Numbers are rendered with their shortest representation, so a zip code read
    /// as `10001.0` is labelled `10001`.
    pub fn label(&self, index: usize) -> Option<String> {
        match self {
            Series::Text(values) => values[index].clone(),
            Series::Number(values) => values[index]
                .filter(|v| !v.is_nan())
                .map(|v| v.to_string()),
        }
    }

    /// All cells as categorical labels.
    pub fn labels(&self) -> Vec<Option<String>> {
        (0..self.len()).map(|index| self.label(index)).collect()
    }

    /// Display form of a cell, `NaN` when missing.
    pub fn display_cell(&self, index: usize) -> String {
        self.label(index).unwrap_or_else(|| "NaN".to_string())
    }

    /// Builds a new series from the cells at `indices`, in that order.
    pub fn take(&self, indices: &[usize]) -> Series {
        match self {
            Series::Text(values) => {
                Series::Text(indices.iter().map(|&i| values[i].clone()).collect())
            }
            Series::Number(values) => Series::Number(indices.iter().map(|&i| values[i]).collect()),
        }
    }
}

impl From<Vec<&str>> for Series {
    fn from(values: Vec<&str>) -> Self {
        Series::Text(values.into_iter().map(|v| Some(v.to_string())).collect())
    }
}

impl From<Vec<Option<&str>>> for Series {
    fn from(values: Vec<Option<&str>>) -> Self {
        Series::Text(values.into_iter().map(|v| v.map(str::to_string)).collect())
    }
}

impl From<Vec<String>> for Series {
    fn from(values: Vec<String>) -> Self {
        Series::Text(values.into_iter().map(Some).collect())
    }
}

impl From<Vec<f64>> for Series {
    fn from(values: Vec<f64>) -> Self {
        Series::Number(values.into_iter().map(Some).collect())
    }
}

impl From<Vec<Option<f64>>> for Series {
    fn from(values: Vec<Option<f64>>) -> Self {
        Series::Number(values)
    }
}

/// An ordered collection of equally long, uniquely named columns
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Series>,
}

impl Table {
    /// Creates a table, validating that names are unique and lengths agree.
    pub fn new(columns: Vec<(String, Series)>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        let expected = columns.first().map_or(0, |(_, series)| series.len());

        let mut names = Vec::with_capacity(columns.len());
        let mut data = Vec::with_capacity(columns.len());
        for (name, series) in columns {
            if !seen.insert(name.clone()) {
                return Err(TableError::DuplicateColumn(name));
            }

            if series.len() != expected {
                return Err(TableError::LengthMismatch {
                    name,
                    expected,
                    actual: series.len(),
                });
            }

            names.push(name);
            data.push(series);
        }

        Ok(Self {
            names,
            columns: data,
        })
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Series::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Iterates over `(name, column)` pairs in column order
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Series)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }

    pub fn column(&self, name: &str) -> Result<&Series> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|index| &self.columns[index])
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    /// Returns a text column's cells.
    pub fn text(&self, name: &str) -> Result<&[Option<String>]> {
        match self.column(name)? {
            Series::Text(values) => Ok(values),
            Series::Number(_) => Err(TableError::TypeMismatch {
                name: name.to_string(),
                expected: ColumnKind::Text,
                actual: ColumnKind::Number,
            }),
        }
    }

    /// Returns a numeric column's cells.
    pub fn numbers(&self, name: &str) -> Result<&[Option<f64>]> {
        match self.column(name)? {
            Series::Number(values) => Ok(values),
            Series::Text(_) => Err(TableError::TypeMismatch {
                name: name.to_string(),
                expected: ColumnKind::Number,
                actual: ColumnKind::Text,
            }),
        }
    }

    /// Keeps the rows whose mask entry is `true`.
    pub fn filter(&self, mask: &[bool]) -> Result<Table> {
        if mask.len() != self.len() {
            return Err(TableError::LengthMismatch {
                name: "mask".to_string(),
                expected: self.len(),
                actual: mask.len(),
            });
        }

        let indices: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(index, &keep)| keep.then_some(index))
            .collect();
        Ok(self.take(&indices))
    }

    /// Builds a new table from the rows at `indices`, in that order.
    pub fn take(&self, indices: &[usize]) -> Table {
        Table {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.take(indices)).collect(),
        }
    }

    /// First `n` rows (or all rows when shorter)
    pub fn head(&self, n: usize) -> Table {
        let indices: Vec<usize> = (0..n.min(self.len())).collect();
        self.take(&indices)
    }

    /// Missing cell count per column, in column order
    pub fn missing_counts(&self) -> Vec<(String, usize)> {
        self.columns()
            .map(|(name, series)| (name.to_string(), series.missing_count()))
            .collect()
    }

    /// Row `index` rendered as display strings
    pub fn row_strings(&self, index: usize) -> Vec<String> {
        self.columns.iter().map(|c| c.display_cell(index)).collect()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let records = (0..self.len()).map(|i| self.row_strings(i)).collect();
        write!(f, "{}", format_records(self.names.clone(), records, None))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::common::{CITY, DBH, STATUS, ZIPCODE};

    /// The three-tree table used throughout the test suite.
    pub(crate) fn sample_trees() -> Table {
        Table::new(vec![
            (ZIPCODE.to_string(), Series::from(vec!["10001", "10001", "10002"])),
            (
                CITY.to_string(),
                Series::from(vec!["Manhattan", "Manhattan", "Brooklyn"]),
            ),
            (DBH.to_string(), Series::from(vec![5.0, 15.0, 10.0])),
            (STATUS.to_string(), Series::from(vec!["Alive", "Dead", "Alive"])),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_duplicate_columns() {
        let result = Table::new(vec![
            ("a".to_string(), Series::from(vec![1.0])),
            ("a".to_string(), Series::from(vec![2.0])),
        ]);
        assert_eq!(result, Err(TableError::DuplicateColumn("a".to_string())));
    }

    #[test]
    fn rejects_uneven_columns() {
        let result = Table::new(vec![
            ("a".to_string(), Series::from(vec![1.0, 2.0])),
            ("b".to_string(), Series::from(vec!["x"])),
        ]);
        assert!(matches!(
            result,
            Err(TableError::LengthMismatch {
                expected: 2,
                actual: 1,
                ..
            })
        ));
    }

    #[test]
    fn column_access_checks_kind() {
        let table = sample_trees();

        assert_eq!(table.numbers(DBH).unwrap().len(), 3);
        assert!(matches!(
            table.numbers(CITY),
            Err(TableError::TypeMismatch { .. })
        ));
        assert_eq!(
            table.column("borough"),
            Err(TableError::MissingColumn("borough".to_string()))
        );
    }

    #[test]
    fn filter_and_head_preserve_order() {
        let table = sample_trees();

        let filtered = table.filter(&[true, false, true]).unwrap();
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.numbers(DBH).unwrap(), &[Some(5.0), Some(10.0)]);

        let head = table.head(2);
        assert_eq!(head.len(), 2);
        assert_eq!(head.column_names(), table.column_names());

        assert_eq!(table.head(100).len(), 3);
        assert!(table.filter(&[true]).is_err());
    }

    #[test]
    fn counts_missing_cells() {
        let table = Table::new(vec![
            (DBH.to_string(), Series::from(vec![Some(1.0), None, Some(f64::NAN)])),
            (STATUS.to_string(), Series::from(vec![Some("Alive"), None, None])),
        ])
        .unwrap();

        assert_eq!(
            table.missing_counts(),
            vec![(DBH.to_string(), 2), (STATUS.to_string(), 2)]
        );
    }

    #[test]
    fn numeric_labels_drop_trailing_zero() {
        let series = Series::from(vec![Some(10001.0), None]);
        assert_eq!(series.label(0), Some("10001".to_string()));
        assert_eq!(series.label(1), None);
        assert_eq!(series.display_cell(1), "NaN");
    }

    #[test]
    fn display_renders_all_rows() {
        let rendered = sample_trees().to_string();
        assert!(rendered.contains("zip_city"));
        assert!(rendered.contains("Brooklyn"));
        assert!(rendered.contains("15"));
    }
}
