//! Column projection from the raw census table into the working table

use super::{ColumnKind, Series, Table, TableError};
use crate::common::{CITY, DBH, STATUS, ZIPCODE};
use tracing::{debug, warn};

type Result<T> = core::result::Result<T, TableError>;

/// A column to keep, and the type it should have in the projected table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnKind::Text,
        }
    }

    pub const fn number(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnKind::Number,
        }
    }
}

/// The four columns every analysis works from.
pub const TREE_COLUMNS: [ColumnSpec; 4] = [
    ColumnSpec::text(ZIPCODE),
    ColumnSpec::text(CITY),
    ColumnSpec::number(DBH),
    ColumnSpec::text(STATUS),
];

/// Selects `specs` from `table`, in the order given.
///
/// Row order and row count are preserved exactly. Text cells cast to numbers are
/// parsed; cells that do not parse become missing values.
///
/// # Errors
/// [`TableError::MissingColumn`] naming the first requested column absent from `table`.
pub fn project(table: &Table, specs: &[ColumnSpec]) -> Result<Table> {
    if let Some(missing) = specs.iter().find(|spec| !table.has_column(spec.name)) {
        return Err(TableError::MissingColumn(missing.name.to_string()));
    }

    let mut columns = Vec::with_capacity(specs.len());
    for spec in specs {
        let series = cast(spec.name, table.column(spec.name)?, spec.kind);
        columns.push((spec.name.to_string(), series));
    }

    debug!(rows = table.len(), columns = specs.len(), "projected table");
    Table::new(columns)
}

/// Projects the zipcode, city, diameter and status columns.
pub fn project_tree_columns(table: &Table) -> Result<Table> {
    project(table, &TREE_COLUMNS)
}

fn cast(name: &str, series: &Series, kind: ColumnKind) -> Series {
    match (series, kind) {
        (Series::Text(_), ColumnKind::Text) | (Series::Number(_), ColumnKind::Number) => {
            series.clone()
        }
        (Series::Number(_), ColumnKind::Text) => Series::Text(series.labels()),
        (Series::Text(values), ColumnKind::Number) => {
            let mut rejected = 0usize;
            let parsed = values
                .iter()
                .map(|value| {
                    let value = value.as_deref()?;
                    let number = value.parse::<f64>().ok().filter(|n| !n.is_nan());
                    if number.is_none() {
                        rejected += 1;
                    }
                    number
                })
                .collect();

            if rejected > 0 {
                warn!(column = name, rejected, "non-numeric cells treated as missing");
            }
            Series::Number(parsed)
        }
    }
}
