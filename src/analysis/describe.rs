//! Descriptive statistics: summaries of one numeric column, value counts,
//! distinct counts and cross tabulations of two categorical columns.

use crate::table::{Table, TableError};
use std::collections::{BTreeMap, BTreeSet, HashMap};

type Result<T> = core::result::Result<T, TableError>;

/// Summary of a numeric column over its non-missing values.
///
/// Every statistic except `count` is `None` when there are no values; `std` is
/// also `None` for a single value.
#[derive(Debug, Clone, PartialEq)]
pub struct Description {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub q50: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl Description {
    /// `(label, value)` pairs in the conventional display order
    pub fn rows(&self) -> Vec<(&'static str, Option<f64>)> {
        vec![
            ("count", Some(self.count as f64)),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.q50),
            ("75%", self.q75),
            ("max", self.max),
        ]
    }
}

/// Describes the non-missing values of a numeric column.
pub fn describe(values: &[Option<f64>]) -> Description {
    let mut sorted = present(values);
    sorted.sort_by(f64::total_cmp);

    Description {
        count: sorted.len(),
        mean: mean(&sorted),
        std: sample_std(&sorted),
        min: sorted.first().copied(),
        q25: quantile_sorted(&sorted, 0.25),
        q50: quantile_sorted(&sorted, 0.50),
        q75: quantile_sorted(&sorted, 0.75),
        max: sorted.last().copied(),
    }
}

/// Linear-interpolation quantile of the non-missing values.
///
/// Returns `None` when there are no values or `q` lies outside `[0, 1]`.
pub fn quantile(values: &[Option<f64>], q: f64) -> Option<f64> {
    let mut sorted = present(values);
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, q)
}

/// Linear-interpolation quantile of an ascending slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }

    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Arithmetic mean, clamped into `[min, max]` against rounding drift.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    Some(mean.clamp(min, max))
}

/// Sample standard deviation (n - 1 denominator); `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((squares / (values.len() - 1) as f64).sqrt())
}

/// Counts of each non-missing label in `column`, most frequent first.
///
/// Equal counts are ordered by label ascending.
pub fn value_counts(table: &Table, column: &str) -> Result<Vec<(String, usize)>> {
    let series = table.column(column)?;

    let mut counts: HashMap<String, usize> = HashMap::new();
    for label in series.labels().into_iter().flatten() {
        *counts.entry(label).or_default() += 1;
    }

    let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
    counts.sort_by(|(a_label, a_count), (b_label, b_count)| {
        b_count.cmp(a_count).then_with(|| a_label.cmp(b_label))
    });
    Ok(counts)
}

/// Number of distinct non-missing labels in `column`.
pub fn nunique(table: &Table, column: &str) -> Result<usize> {
    let series = table.column(column)?;
    let distinct: BTreeSet<String> = series.labels().into_iter().flatten().collect();
    Ok(distinct.len())
}

/// Frequency matrix of two categorical columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crosstab {
    /// Labels of the row column, largest row total first
    pub rows: Vec<String>,
    /// Labels of the column column, ascending
    pub columns: Vec<String>,
    /// `counts[row][column]`
    pub counts: Vec<Vec<usize>>,
}

impl Crosstab {
    pub fn get(&self, row: usize, column: usize) -> usize {
        self.counts[row][column]
    }

    pub fn row_total(&self, row: usize) -> usize {
        self.counts[row].iter().sum()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    /// Keeps the given row labels, in the given order; unknown labels are skipped.
    pub fn select_rows(&self, labels: &[String]) -> Crosstab {
        let mut rows = Vec::new();
        let mut counts = Vec::new();
        for label in labels {
            if let Some(index) = self.rows.iter().position(|row| row == label) {
                rows.push(label.clone());
                counts.push(self.counts[index].clone());
            }
        }

        Crosstab {
            rows,
            columns: self.columns.clone(),
            counts,
        }
    }
}

/// Counts co-occurrences of `row_column` and `col_column` labels.
///
/// Rows missing either label are skipped.
pub fn crosstab(table: &Table, row_column: &str, col_column: &str) -> Result<Crosstab> {
    let row_labels = table.column(row_column)?.labels();
    let col_labels = table.column(col_column)?.labels();

    let mut cells: BTreeMap<(String, String), usize> = BTreeMap::new();
    for (row, col) in row_labels.into_iter().zip(col_labels) {
        if let (Some(row), Some(col)) = (row, col) {
            *cells.entry((row, col)).or_default() += 1;
        }
    }

    let columns: Vec<String> = cells
        .keys()
        .map(|(_, col)| col.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut totals: BTreeMap<String, usize> = BTreeMap::new();
    for ((row, _), count) in &cells {
        *totals.entry(row.clone()).or_default() += count;
    }

    let mut rows: Vec<(String, usize)> = totals.into_iter().collect();
    rows.sort_by(|(a_label, a_total), (b_label, b_total)| {
        b_total.cmp(a_total).then_with(|| a_label.cmp(b_label))
    });
    let rows: Vec<String> = rows.into_iter().map(|(label, _)| label).collect();

    let counts = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|col| {
                    cells
                        .get(&(row.clone(), col.clone()))
                        .copied()
                        .unwrap_or(0)
                })
                .collect()
        })
        .collect();

    Ok(Crosstab {
        rows,
        columns,
        counts,
    })
}

fn present(values: &[Option<f64>]) -> Vec<f64> {
    values
        .iter()
        .flatten()
        .copied()
        .filter(|v| !v.is_nan())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{CITY, DBH, STATUS, ZIPCODE};
    use crate::table::tests::sample_trees;
    use crate::table::Series;
    use rstest::rstest;

    #[test]
    fn describes_non_missing_values() {
        let description = describe(&[Some(1.0), None, Some(2.0), Some(3.0), Some(4.0), Some(5.0)]);

        assert_eq!(description.count, 5);
        assert_eq!(description.mean, Some(3.0));
        assert_eq!(description.min, Some(1.0));
        assert_eq!(description.q25, Some(2.0));
        assert_eq!(description.q50, Some(3.0));
        assert_eq!(description.q75, Some(4.0));
        assert_eq!(description.max, Some(5.0));
        assert!((description.std.unwrap() - 2.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn empty_description_is_undefined() {
        let description = describe(&[None, None]);

        assert_eq!(description.count, 0);
        assert_eq!(description.mean, None);
        assert_eq!(description.std, None);
        assert_eq!(description.max, None);
    }

    #[rstest]
    #[case(0.0, Some(10.0))]
    #[case(0.5, Some(25.0))]
    #[case(0.9, Some(37.0))]
    #[case(1.0, Some(40.0))]
    #[case(1.5, None)]
    fn linear_quantiles(#[case] q: f64, #[case] expected: Option<f64>) {
        let values = [Some(40.0), Some(10.0), Some(30.0), Some(20.0)];
        let actual = quantile(&values, q);

        match (actual, expected) {
            (Some(a), Some(e)) => assert!((a - e).abs() < 1e-9, "q={q}: {a} != {e}"),
            (a, e) => assert_eq!(a, e),
        }
    }

    #[test]
    fn sample_std_needs_two_values() {
        assert_eq!(sample_std(&[]), None);
        assert_eq!(sample_std(&[3.0]), None);
        assert_eq!(sample_std(&[5.0, 15.0]), Some(50.0f64.sqrt()));
    }

    #[test]
    fn mean_stays_within_range() {
        let values = [0.1, 0.1, 0.1];
        let mean = mean(&values).unwrap();
        assert!(mean <= 0.1 && mean >= 0.1);
    }

    #[test]
    fn value_counts_break_ties_by_label() {
        let counts = value_counts(&sample_trees(), CITY).unwrap();
        assert_eq!(
            counts,
            vec![("Manhattan".to_string(), 2), ("Brooklyn".to_string(), 1)]
        );

        let table = Table::new(vec![(
            STATUS.to_string(),
            Series::from(vec![Some("Stump"), Some("Dead"), None, Some("Alive")]),
        )])
        .unwrap();
        let counts = value_counts(&table, STATUS).unwrap();
        assert_eq!(
            counts,
            vec![
                ("Alive".to_string(), 1),
                ("Dead".to_string(), 1),
                ("Stump".to_string(), 1)
            ]
        );
    }

    #[test]
    fn missing_diameter_still_counts_towards_status() {
        let table = Table::new(vec![
            (DBH.to_string(), Series::from(vec![Some(5.0), None, Some(15.0)])),
            (STATUS.to_string(), Series::from(vec!["Alive", "Alive", "Dead"])),
        ])
        .unwrap();

        let description = describe(table.numbers(DBH).unwrap());
        assert_eq!(description.count, 2);
        assert_eq!(description.mean, Some(10.0));
        assert_eq!(description.min, Some(5.0));
        assert_eq!(description.max, Some(15.0));

        let counts = value_counts(&table, STATUS).unwrap();
        assert_eq!(counts[0], ("Alive".to_string(), 2));
    }

    #[test]
    fn counts_distinct_values() {
        assert_eq!(nunique(&sample_trees(), ZIPCODE).unwrap(), 2);
        assert_eq!(nunique(&sample_trees(), STATUS).unwrap(), 2);
        assert!(nunique(&sample_trees(), "borough").is_err());
    }

    #[test]
    fn crosstab_orders_rows_by_total() {
        let tab = crosstab(&sample_trees(), ZIPCODE, STATUS).unwrap();

        assert_eq!(tab.rows, vec!["10001", "10002"]);
        assert_eq!(tab.columns, vec!["Alive", "Dead"]);
        assert_eq!(tab.counts, vec![vec![1, 1], vec![1, 0]]);
        assert_eq!(tab.row_total(0), 2);
        assert_eq!(tab.max_count(), 1);

        let selected = tab.select_rows(&["10002".to_string(), "99999".to_string()]);
        assert_eq!(selected.rows, vec!["10002"]);
        assert_eq!(selected.counts, vec![vec![1, 0]]);
    }
}
