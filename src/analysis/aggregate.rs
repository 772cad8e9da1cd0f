//! Grouped aggregation
//!
//! [`aggregate`] partitions a table by one categorical column and computes a list
//! of named aggregations per group. The result is always fully sorted; truncating
//! to the top rows is a separate step ([`AggregateTable::head`]) so that "top 15"
//! and "all groups" share the same aggregation.

use super::describe::{mean, sample_std};
use crate::common::constants::EXPORT_PRECISION;
use crate::common::tables::format_records;
use crate::table::{Series, Table, TableError};
use core::cmp::Ordering;
use core::fmt;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during aggregation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregateError {
    #[error("Group key '{0}' is not a column of the table")]
    InvalidGroupKey(String),

    #[error("Aggregated column '{0}' is not a column of the table")]
    MissingColumn(String),

    #[error("Cannot aggregate an empty table")]
    EmptyInput,

    #[error("Cannot compute {op} of text column '{column}'")]
    TypeMismatch { column: String, op: AggOp },

    #[error("Sort column '{0}' is not one of the aggregations")]
    UnknownSortColumn(String),

    #[error("Output column '{0}' is named more than once")]
    DuplicateAlias(String),
}

type Result<T> = core::result::Result<T, AggregateError>;

/// A single aggregation operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggOp {
    /// Number of non-missing values
    Count,
    Mean,
    /// Sample standard deviation
    Std,
    Min,
    Max,
    /// Most frequent value; ties go to the lexicographically smallest value
    Mode,
    /// Number of distinct non-missing values
    NUnique,
}

impl AggOp {
    fn needs_numbers(self) -> bool {
        matches!(self, AggOp::Mean | AggOp::Std | AggOp::Min | AggOp::Max)
    }
}

impl fmt::Display for AggOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggOp::Count => "count",
            AggOp::Mean => "mean",
            AggOp::Std => "std",
            AggOp::Min => "min",
            AggOp::Max => "max",
            AggOp::Mode => "mode",
            AggOp::NUnique => "nunique",
        };
        write!(f, "{}", name)
    }
}

/// One aggregation: apply `op` to `column` and name the result `alias`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggSpec {
    pub column: String,
    pub op: AggOp,
    pub alias: String,
}

impl AggSpec {
    pub fn new(column: impl Into<String>, op: AggOp, alias: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            op,
            alias: alias.into(),
        }
    }
}

/// The result of one aggregation for one group
#[derive(Debug, Clone, PartialEq)]
pub enum AggValue {
    Count(usize),
    /// `None` when undefined (empty group, or std of fewer than two values)
    Number(Option<f64>),
    /// `None` when the group has no non-missing values
    Text(Option<String>),
}

impl AggValue {
    /// Numeric view of the value; text is never numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AggValue::Count(count) => Some(*count as f64),
            AggValue::Number(value) => *value,
            AggValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AggValue::Text(value) => value.as_deref(),
            _ => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        match self {
            AggValue::Count(_) => true,
            AggValue::Number(value) => value.is_some(),
            AggValue::Text(value) => value.is_some(),
        }
    }

    /// Display form, with numbers rounded to `precision` decimals.
    ///
    /// Undefined values render as `undefined`.
    pub fn format(&self, precision: usize, undefined: &str) -> String {
        match self {
            AggValue::Count(count) => count.to_string(),
            AggValue::Number(Some(value)) => format!("{:.*}", precision, value),
            AggValue::Text(Some(value)) => value.clone(),
            AggValue::Number(None) | AggValue::Text(None) => undefined.to_string(),
        }
    }

    /// Descending order; undefined values sort after every defined value.
    fn cmp_descending(&self, other: &AggValue) -> Ordering {
        match (self.is_defined(), other.is_defined()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => Ordering::Equal,
            (true, true) => match (self.as_text(), other.as_text()) {
                (Some(a), Some(b)) => b.cmp(a),
                _ => match (self.as_f64(), other.as_f64()) {
                    (Some(a), Some(b)) => b.total_cmp(&a),
                    _ => Ordering::Equal,
                },
            },
        }
    }
}

/// One summarized record per distinct group key value
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub key: String,
    /// One value per aggregation, in [`AggregateTable::aliases`] order
    pub values: Vec<AggValue>,
}

/// Sorted aggregation result
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateTable {
    key_column: String,
    aliases: Vec<String>,
    rows: Vec<AggregateRow>,
}

impl AggregateTable {
    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn rows(&self) -> &[AggregateRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `alias` among the aggregations
    pub fn column_index(&self, alias: &str) -> Option<usize> {
        self.aliases.iter().position(|a| a == alias)
    }

    /// The value of `alias` for the group `key`
    pub fn value(&self, key: &str, alias: &str) -> Option<&AggValue> {
        let index = self.column_index(alias)?;
        self.rows
            .iter()
            .find(|row| row.key == key)
            .map(|row| &row.values[index])
    }

    /// Group keys in row order
    pub fn keys(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.key.clone()).collect()
    }

    /// First `n` rows; values are untouched.
    pub fn head(&self, n: usize) -> AggregateTable {
        AggregateTable {
            key_column: self.key_column.clone(),
            aliases: self.aliases.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Re-sorts descending by `alias`, ties by key ascending.
    pub fn sorted_by(&self, alias: &str) -> Result<AggregateTable> {
        let index = self
            .column_index(alias)
            .ok_or_else(|| AggregateError::UnknownSortColumn(alias.to_string()))?;

        let mut sorted = self.clone();
        sort_rows(&mut sorted.rows, index);
        Ok(sorted)
    }

    /// Converts to a [`Table`] with the key column followed by one column per alias.
    ///
    /// Counts and numbers become numeric columns; modes become text columns.
    pub fn to_table(&self) -> Table {
        let mut columns = Vec::with_capacity(self.aliases.len() + 1);
        columns.push((self.key_column.clone(), Series::from(self.keys())));

        for (index, alias) in self.aliases.iter().enumerate() {
            let is_text = self
                .rows
                .first()
                .is_some_and(|row| matches!(row.values[index], AggValue::Text(_)));

            let series = if is_text {
                Series::Text(
                    self.rows
                        .iter()
                        .map(|row| row.values[index].as_text().map(str::to_string))
                        .collect(),
                )
            } else {
                Series::Number(self.rows.iter().map(|row| row.values[index].as_f64()).collect())
            };
            columns.push((alias.clone(), series));
        }

        // Names come from validated, distinct aggregation aliases.
        Table::new(columns).unwrap_or_default()
    }
}

impl fmt::Display for AggregateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut header = vec![self.key_column.clone()];
        header.extend(self.aliases.iter().cloned());

        let records = self
            .rows
            .iter()
            .map(|row| {
                let mut record = vec![row.key.clone()];
                record.extend(
                    row.values
                        .iter()
                        .map(|value| value.format(EXPORT_PRECISION, "NaN")),
                );
                record
            })
            .collect();

        write!(f, "{}", format_records(header, records, None))
    }
}

/// Groups `table` by `group_key` and applies each of `specs` per group.
///
/// Rows whose group key is missing belong to no group. The result is sorted
/// descending by `sort_by` (default: the first [`AggOp::Count`] aggregation, else
/// the first aggregation), with ties broken by group key ascending.
///
/// # Errors
/// * [`AggregateError::InvalidGroupKey`] - `group_key` is not a column
/// * [`AggregateError::MissingColumn`] - an aggregated column is absent
/// * [`AggregateError::TypeMismatch`] - a numeric operation targets a text column
/// * [`AggregateError::UnknownSortColumn`] - `sort_by` names no aggregation
/// * [`AggregateError::DuplicateAlias`] - two outputs share a name
/// * [`AggregateError::EmptyInput`] - the table has no rows
pub fn aggregate(
    table: &Table,
    group_key: &str,
    specs: &[AggSpec],
    sort_by: Option<&str>,
) -> Result<AggregateTable> {
    let key_series = table
        .column(group_key)
        .map_err(|_| AggregateError::InvalidGroupKey(group_key.to_string()))?;

    let mut columns = Vec::with_capacity(specs.len());
    for spec in specs {
        let series = table.column(&spec.column).map_err(|e| match e {
            TableError::MissingColumn(name) => AggregateError::MissingColumn(name),
            _ => AggregateError::MissingColumn(spec.column.clone()),
        })?;

        if spec.op.needs_numbers() && !matches!(series, Series::Number(_)) {
            return Err(AggregateError::TypeMismatch {
                column: spec.column.clone(),
                op: spec.op,
            });
        }
        columns.push(series);
    }

    let aliases: Vec<String> = specs.iter().map(|spec| spec.alias.clone()).collect();
    let mut seen = BTreeSet::from([group_key]);
    if let Some(duplicate) = aliases.iter().find(|alias| !seen.insert(alias.as_str())) {
        return Err(AggregateError::DuplicateAlias(duplicate.clone()));
    }

    let sort_index = match sort_by {
        Some(alias) => aliases
            .iter()
            .position(|a| a == alias)
            .ok_or_else(|| AggregateError::UnknownSortColumn(alias.to_string()))?,
        None => specs
            .iter()
            .position(|spec| spec.op == AggOp::Count)
            .unwrap_or(0),
    };

    if table.is_empty() {
        return Err(AggregateError::EmptyInput);
    }

    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (index, key) in key_series.labels().into_iter().enumerate() {
        if let Some(key) = key {
            groups.entry(key).or_default().push(index);
        }
    }

    let mut rows: Vec<AggregateRow> = groups
        .into_iter()
        .map(|(key, indices)| AggregateRow {
            key,
            values: specs
                .iter()
                .zip(&columns)
                .map(|(spec, series)| apply(spec.op, series, &indices))
                .collect(),
        })
        .collect();

    if !specs.is_empty() {
        sort_rows(&mut rows, sort_index);
    }

    debug!(group_key, groups = rows.len(), "aggregated table");
    Ok(AggregateTable {
        key_column: group_key.to_string(),
        aliases,
        rows,
    })
}

fn sort_rows(rows: &mut [AggregateRow], index: usize) {
    rows.sort_by(|a, b| {
        a.values[index]
            .cmp_descending(&b.values[index])
            .then_with(|| a.key.cmp(&b.key))
    });
}

fn apply(op: AggOp, series: &Series, indices: &[usize]) -> AggValue {
    match op {
        AggOp::Count => AggValue::Count(
            indices
                .iter()
                .filter(|&&i| series.label(i).is_some())
                .count(),
        ),
        AggOp::Mode => AggValue::Text(mode(series, indices)),
        AggOp::NUnique => {
            let distinct: BTreeSet<String> =
                indices.iter().filter_map(|&i| series.label(i)).collect();
            AggValue::Count(distinct.len())
        }
        AggOp::Mean | AggOp::Std | AggOp::Min | AggOp::Max => {
            let values: Vec<f64> = match series {
                Series::Number(values) => indices
                    .iter()
                    .filter_map(|&i| values[i])
                    .filter(|v| !v.is_nan())
                    .collect(),
                Series::Text(_) => Vec::new(),
            };

            AggValue::Number(match op {
                AggOp::Mean => mean(&values),
                AggOp::Std => sample_std(&values),
                AggOp::Min => values.iter().copied().reduce(f64::min),
                _ => values.iter().copied().reduce(f64::max),
            })
        }
    }
}

fn mode(series: &Series, indices: &[usize]) -> Option<String> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for label in indices.iter().filter_map(|&i| series.label(i)) {
        *counts.entry(label).or_default() += 1;
    }

    // BTreeMap iterates ascending, so keeping only strictly larger counts
    // resolves ties to the smallest label.
    let mut best: Option<(String, usize)> = None;
    for (label, count) in counts {
        if best.as_ref().map_or(true, |(_, best_count)| count > *best_count) {
            best = Some((label, count));
        }
    }

    best.map(|(label, _)| label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{CITY, DBH, STATUS, ZIPCODE};
    use crate::table::tests::sample_trees;
    use itertools::Itertools;
    use rstest::rstest;

    fn diameter_specs() -> Vec<AggSpec> {
        vec![
            AggSpec::new(DBH, AggOp::Count, "tree_count"),
            AggSpec::new(DBH, AggOp::Mean, "avg_dbh"),
            AggSpec::new(DBH, AggOp::Std, "std_dbh"),
            AggSpec::new(DBH, AggOp::Min, "min_dbh"),
            AggSpec::new(DBH, AggOp::Max, "max_dbh"),
            AggSpec::new(STATUS, AggOp::Mode, "most_common_status"),
        ]
    }

    fn larger_table() -> Table {
        Table::new(vec![
            (
                ZIPCODE.to_string(),
                Series::from(vec![
                    "11375", "11375", "10001", "11215", "11215", "11215", "10001", "10463",
                ]),
            ),
            (
                CITY.to_string(),
                Series::from(vec![
                    "Forest Hills",
                    "Forest Hills",
                    "New York",
                    "Brooklyn",
                    "Brooklyn",
                    "Brooklyn",
                    "New York",
                    "Bronx",
                ]),
            ),
            (
                DBH.to_string(),
                Series::from(vec![
                    Some(3.0),
                    Some(21.0),
                    None,
                    Some(8.0),
                    Some(12.5),
                    Some(4.0),
                    Some(30.0),
                    Some(0.0),
                ]),
            ),
            (
                STATUS.to_string(),
                Series::from(vec![
                    Some("Alive"),
                    Some("Dead"),
                    Some("Alive"),
                    Some("Stump"),
                    Some("Alive"),
                    None,
                    Some("Alive"),
                    Some("Stump"),
                ]),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn aggregates_by_zipcode() {
        let result = aggregate(&sample_trees(), ZIPCODE, &diameter_specs(), None).unwrap();

        assert_eq!(result.keys(), vec!["10001", "10002"]);
        assert_eq!(result.value("10001", "tree_count"), Some(&AggValue::Count(2)));
        assert_eq!(
            result.value("10001", "avg_dbh"),
            Some(&AggValue::Number(Some(10.0)))
        );
        assert_eq!(
            result.value("10001", "min_dbh"),
            Some(&AggValue::Number(Some(5.0)))
        );
        assert_eq!(
            result.value("10001", "max_dbh"),
            Some(&AggValue::Number(Some(15.0)))
        );

        assert_eq!(result.value("10002", "tree_count"), Some(&AggValue::Count(1)));
        assert_eq!(
            result.value("10002", "avg_dbh"),
            Some(&AggValue::Number(Some(10.0)))
        );
        assert_eq!(
            result.value("10002", "std_dbh"),
            Some(&AggValue::Number(None))
        );
    }

    #[test]
    fn mode_ties_resolve_to_smallest_label() {
        let result = aggregate(&sample_trees(), ZIPCODE, &diameter_specs(), None).unwrap();

        // 10001 holds one Alive and one Dead tree.
        assert_eq!(
            result.value("10001", "most_common_status"),
            Some(&AggValue::Text(Some("Alive".to_string())))
        );
    }

    #[test]
    fn counts_sum_to_non_missing_values() {
        let table = larger_table();
        let result = aggregate(&table, CITY, &diameter_specs(), None).unwrap();

        let total: usize = result
            .rows()
            .iter()
            .map(|row| row.values[0].as_f64().unwrap() as usize)
            .sum();
        let non_missing = table.numbers(DBH).unwrap().iter().flatten().count();
        assert_eq!(total, non_missing);
    }

    #[test]
    fn mean_lies_between_min_and_max() {
        let result = aggregate(&larger_table(), ZIPCODE, &diameter_specs(), None).unwrap();

        for row in result.rows() {
            let (mean, min, max) = (row.values[1].as_f64(), row.values[3].as_f64(), row.values[4].as_f64());
            if let (Some(mean), Some(min), Some(max)) = (mean, min, max) {
                assert!(min <= mean && mean <= max, "group {}", row.key);
            }
        }
    }

    #[test]
    fn missing_values_are_excluded_per_column() {
        let result = aggregate(&larger_table(), ZIPCODE, &diameter_specs(), None).unwrap();

        // 10001 has one missing diameter, but both statuses count towards the mode.
        assert_eq!(result.value("10001", "tree_count"), Some(&AggValue::Count(1)));
        assert_eq!(
            result.value("10001", "avg_dbh"),
            Some(&AggValue::Number(Some(30.0)))
        );
        assert_eq!(
            result.value("10001", "most_common_status"),
            Some(&AggValue::Text(Some("Alive".to_string())))
        );
    }

    #[test]
    fn sorts_by_count_then_key() {
        let result = aggregate(&larger_table(), ZIPCODE, &diameter_specs(), None).unwrap();

        // 11215: 3, 11375: 2, then 10001 and 10463 tie at 1.
        assert_eq!(result.keys(), vec!["11215", "11375", "10001", "10463"]);
    }

    #[test]
    fn sorts_by_requested_column_with_undefined_last() {
        let table = Table::new(vec![
            (ZIPCODE.to_string(), Series::from(vec!["a", "b", "c"])),
            (DBH.to_string(), Series::from(vec![Some(1.0), None, Some(7.0)])),
        ])
        .unwrap();

        let specs = [AggSpec::new(DBH, AggOp::Mean, "avg_dbh")];
        let result = aggregate(&table, ZIPCODE, &specs, Some("avg_dbh")).unwrap();
        assert_eq!(result.keys(), vec!["c", "a", "b"]);

        let resorted = aggregate(&table, ZIPCODE, &[AggSpec::new(ZIPCODE, AggOp::Count, "n")], None)
            .unwrap();
        assert_eq!(resorted.keys(), vec!["a", "b", "c"]);
    }

    #[rstest]
    #[case(AggValue::Count(0), true)]
    #[case(AggValue::Number(Some(0.0)), true)]
    #[case(AggValue::Number(None), false)]
    #[case(AggValue::Text(Some(String::new())), true)]
    #[case(AggValue::Text(None), false)]
    fn defined_values(#[case] value: AggValue, #[case] defined: bool) {
        assert_eq!(value.is_defined(), defined);
    }

    #[test]
    fn undefined_modes_sort_last() {
        let table = Table::new(vec![
            (ZIPCODE.to_string(), Series::from(vec!["a", "b", "c"])),
            (STATUS.to_string(), Series::from(vec![Some("Alive"), None, Some("Dead")])),
        ])
        .unwrap();

        let specs = [AggSpec::new(STATUS, AggOp::Mode, "most_common_status")];
        let result = aggregate(&table, ZIPCODE, &specs, Some("most_common_status")).unwrap();
        assert_eq!(result.keys(), vec!["c", "a", "b"]);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let table = larger_table();
        let first = aggregate(&table, STATUS, &diameter_specs(), None).unwrap();
        let second = aggregate(&table, STATUS, &diameter_specs(), None).unwrap();
        assert_eq!(first, second);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(3)]
    #[case(10)]
    fn head_is_a_prefix_of_the_full_result(#[case] n: usize) {
        let full = aggregate(&larger_table(), ZIPCODE, &diameter_specs(), None).unwrap();
        let top = full.head(n);

        assert_eq!(top.len(), n.min(full.len()));
        assert_eq!(top.rows(), &full.rows()[..top.len()]);
        assert_eq!(top.aliases(), full.aliases());
    }

    #[test]
    fn row_order_does_not_depend_on_input_order() {
        let table = larger_table();
        let expected = aggregate(&table, CITY, &diameter_specs(), None).unwrap();

        for permutation in (0..table.len()).permutations(table.len()).step_by(997) {
            let shuffled = table.take(&permutation);
            let actual = aggregate(&shuffled, CITY, &diameter_specs(), None).unwrap();
            assert_eq!(actual.keys(), expected.keys());
        }
    }

    #[test]
    fn counts_distinct_values_per_group() {
        let specs = [AggSpec::new(CITY, AggOp::NUnique, "cities_present")];
        let result = aggregate(&larger_table(), STATUS, &specs, None).unwrap();

        assert_eq!(result.value("Alive", "cities_present"), Some(&AggValue::Count(3)));
        assert_eq!(result.value("Stump", "cities_present"), Some(&AggValue::Count(2)));
        assert_eq!(result.value("Dead", "cities_present"), Some(&AggValue::Count(1)));
    }

    #[test]
    fn rows_with_missing_key_belong_to_no_group() {
        let result = aggregate(
            &larger_table(),
            STATUS,
            &[AggSpec::new(STATUS, AggOp::Count, "tree_count")],
            None,
        )
        .unwrap();

        let total: usize = result
            .rows()
            .iter()
            .filter_map(|row| row.values[0].as_f64())
            .map(|count| count as usize)
            .sum();
        assert_eq!(total, 7);
    }

    #[test]
    fn reports_invalid_inputs() {
        let table = sample_trees();

        assert_eq!(
            aggregate(&table, "borough", &diameter_specs(), None),
            Err(AggregateError::InvalidGroupKey("borough".to_string()))
        );
        assert_eq!(
            aggregate(&table, CITY, &[AggSpec::new("height", AggOp::Max, "h")], None),
            Err(AggregateError::MissingColumn("height".to_string()))
        );
        assert_eq!(
            aggregate(&table, CITY, &[AggSpec::new(STATUS, AggOp::Mean, "m")], None),
            Err(AggregateError::TypeMismatch {
                column: STATUS.to_string(),
                op: AggOp::Mean
            })
        );
        assert_eq!(
            aggregate(&table, CITY, &diameter_specs(), Some("median")),
            Err(AggregateError::UnknownSortColumn("median".to_string()))
        );
        assert_eq!(
            aggregate(&table, CITY, &[AggSpec::new(DBH, AggOp::Max, CITY)], None),
            Err(AggregateError::DuplicateAlias(CITY.to_string()))
        );
        assert_eq!(
            aggregate(&table.head(0), CITY, &diameter_specs(), None),
            Err(AggregateError::EmptyInput)
        );
    }

    #[test]
    fn filtered_out_groups_are_absent() {
        let alive = crate::table::filter::TreeFilter::new()
            .status("Alive")
            .apply(&sample_trees())
            .unwrap();
        let result = aggregate(&alive, STATUS, &diameter_specs(), None).unwrap();

        assert_eq!(result.keys(), vec!["Alive"]);
    }

    #[test]
    fn converts_to_table() {
        let result = aggregate(&sample_trees(), ZIPCODE, &diameter_specs(), None).unwrap();
        let table = result.to_table();

        assert_eq!(table.len(), 2);
        assert_eq!(table.column_names()[0], ZIPCODE);
        assert_eq!(table.numbers("tree_count").unwrap(), &[Some(2.0), Some(1.0)]);
        assert_eq!(table.numbers("std_dbh").unwrap()[1], None);
        assert_eq!(
            table.text("most_common_status").unwrap()[1],
            Some("Alive".to_string())
        );
    }

    #[test]
    fn display_rounds_to_two_decimals() {
        let table = Table::new(vec![
            (CITY.to_string(), Series::from(vec!["Bronx", "Bronx", "Bronx"])),
            (DBH.to_string(), Series::from(vec![1.0, 2.0, 2.0])),
        ])
        .unwrap();
        let result = aggregate(&table, CITY, &[AggSpec::new(DBH, AggOp::Mean, "avg_dbh")], None)
            .unwrap();

        assert!(result.to_string().contains("1.67"));
    }
}
