//! Row filters over the working table
//!
//! A filter that matches nothing is a valid outcome and yields an empty table.
//! Callers that need at least one row use [`TreeFilter::apply_non_empty`].

use super::{Table, TableError};
use crate::common::{CITY, DBH, STATUS};
use core::fmt;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while filtering
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("No trees match: {0}")]
    NoMatches(String),
}

type Result<T> = core::result::Result<T, FilterError>;

/// Diameter range, status and city selection. Unset fields do not constrain.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TreeFilter {
    pub min_dbh: Option<f64>,
    pub max_dbh: Option<f64>,
    pub status: Option<String>,
    pub city: Option<String>,
}

impl TreeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_dbh(mut self, min_dbh: f64) -> Self {
        self.min_dbh = Some(min_dbh);
        self
    }

    pub fn max_dbh(mut self, max_dbh: f64) -> Self {
        self.max_dbh = Some(max_dbh);
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Returns the rows satisfying every set constraint.
    ///
    /// Bounds are inclusive. A row with a missing diameter fails any diameter
    /// bound; a row with a missing status or city fails the matching equality test.
    pub fn apply(&self, table: &Table) -> Result<Table> {
        let mut mask = vec![true; table.len()];

        if self.min_dbh.is_some() || self.max_dbh.is_some() {
            let min = self.min_dbh.unwrap_or(f64::NEG_INFINITY);
            let max = self.max_dbh.unwrap_or(f64::INFINITY);
            for (keep, dbh) in mask.iter_mut().zip(table.numbers(DBH)?) {
                *keep &= dbh.is_some_and(|dbh| dbh >= min && dbh <= max);
            }
        }

        if let Some(status) = &self.status {
            restrict_to(&mut mask, table, STATUS, status)?;
        }

        if let Some(city) = &self.city {
            restrict_to(&mut mask, table, CITY, city)?;
        }

        let filtered = table.filter(&mask)?;
        debug!(filter = %self, matched = filtered.len(), "applied filter");
        Ok(filtered)
    }

    /// Like [`TreeFilter::apply`], but an empty result is an error.
    pub fn apply_non_empty(&self, table: &Table) -> Result<Table> {
        let filtered = self.apply(table)?;
        if filtered.is_empty() {
            return Err(FilterError::NoMatches(self.to_string()));
        }

        Ok(filtered)
    }
}

impl fmt::Display for TreeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Trees")?;
        if let Some(city) = &self.city {
            write!(f, " in {}", city)?;
        }

        match (self.min_dbh, self.max_dbh) {
            (Some(min), Some(max)) => write!(f, " with DBH between {} and {} inches", min, max)?,
            (Some(min), None) => write!(f, " with DBH of at least {} inches", min)?,
            (None, Some(max)) => write!(f, " with DBH of at most {} inches", max)?,
            (None, None) => {}
        }

        if let Some(status) = &self.status {
            write!(f, " with status '{}'", status)?;
        }

        Ok(())
    }
}

/// Keeps the rows whose `column` label is one of `values` (`isin`).
pub fn keep_values(table: &Table, column: &str, values: &[String]) -> core::result::Result<Table, TableError> {
    let series = table.column(column)?;
    let mask: Vec<bool> = (0..table.len())
        .map(|index| {
            series
                .label(index)
                .is_some_and(|label| values.contains(&label))
        })
        .collect();
    table.filter(&mask)
}

fn restrict_to(mask: &mut [bool], table: &Table, column: &str, expected: &str) -> Result<()> {
    let series = table.column(column)?;
    for (index, keep) in mask.iter_mut().enumerate() {
        *keep &= series.label(index).is_some_and(|label| label == expected);
    }

    Ok(())
}
