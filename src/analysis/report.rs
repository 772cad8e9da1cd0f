//! First look at the working table: shape, preview, missing values and
//! distributions of the diameter and status columns.

use super::describe::{describe, nunique, value_counts, Description};
use crate::common::constants::PREVIEW_ROWS;
use crate::common::tables::{format_count_table, format_records, CountEntry};
use crate::common::{CITY, DBH, STATUS, ZIPCODE};
use crate::table::{Table, TableError};
use core::fmt;

/// Exploration of the projected tree table
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorationReport {
    pub rows: usize,
    pub columns: Vec<String>,
    pub preview: Table,
    pub missing: Vec<(String, usize)>,
    pub dbh: Description,
    pub status_counts: Vec<(String, usize)>,
    pub unique_zipcodes: usize,
    pub unique_cities: usize,
}

impl ExplorationReport {
    pub fn build(table: &Table) -> Result<Self, TableError> {
        Ok(Self {
            rows: table.len(),
            columns: table.column_names().to_vec(),
            preview: table.head(PREVIEW_ROWS),
            missing: table.missing_counts(),
            dbh: describe(table.numbers(DBH)?),
            status_counts: value_counts(table, STATUS)?,
            unique_zipcodes: nunique(table, ZIPCODE)?,
            unique_cities: nunique(table, CITY)?,
        })
    }
}

impl fmt::Display for ExplorationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dataset Shape: ({}, {})", self.rows, self.columns.len())?;
        writeln!(f, "Columns: {:?}", self.columns)?;
        writeln!(f, "\nFirst {} rows:\n{}", PREVIEW_ROWS, self.preview)?;

        let missing = self
            .missing
            .iter()
            .map(|(name, count)| vec![name.clone(), count.to_string()])
            .collect();
        writeln!(
            f,
            "\n{}",
            format_records(
                vec!["Column".to_string(), "Missing".to_string()],
                missing,
                Some("Missing Values"),
            )
        )?;

        let dbh = self
            .dbh
            .rows()
            .into_iter()
            .map(|(label, value)| {
                let value = value.map_or_else(|| "NaN".to_string(), |v| format!("{:.6}", v));
                vec![label.to_string(), value]
            })
            .collect();
        writeln!(
            f,
            "\n{}",
            format_records(
                vec!["Statistic".to_string(), DBH.to_string()],
                dbh,
                Some("Tree DBH Statistics"),
            )
        )?;

        writeln!(
            f,
            "\n{}",
            format_count_table(
                &CountEntry::from_counts(&self.status_counts),
                Some("Status Distribution")
            )
        )?;

        writeln!(f, "\nNumber of unique zip codes: {}", self.unique_zipcodes)?;
        writeln!(f, "Number of unique cities: {}", self.unique_cities)
    }
}
