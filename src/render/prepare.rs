//! Reduction of a table to the numbers a chart draws
//!
//! Everything here is pure and independent of the drawing backend, so the
//! geometry of every chart can be tested without fonts.

use super::{ChartKind, ChartSpec, RenderError};
use crate::analysis::describe::{quantile, quantile_sorted, sample_std, value_counts};
use crate::analysis::{crosstab, Crosstab};
use crate::table::{Series, Table, TableError};
use std::collections::BTreeMap;
use tracing::debug;

type Result<T> = core::result::Result<T, RenderError>;

/// Points at which violin densities are evaluated
const VIOLIN_POINTS: usize = 64;

/// Violin outlines extend this many bandwidths past the extreme values
const VIOLIN_CUT: f64 = 2.0;

/// Chart-ready data, one variant per family of chart
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    /// Pie slices: label and count
    Slices(Vec<(String, f64)>),
    Histogram(HistogramBins),
    /// One bar per label, in drawing order
    Bars(Vec<(String, f64)>),
    Boxes(Vec<BoxStats>),
    Violins(Vec<ViolinShape>),
    /// Row by column counts for heatmaps and stacked bars
    Matrix(Crosstab),
}

/// Equal-width bins over the range of the values
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBins {
    /// `counts.len() + 1` ascending bin edges
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl HistogramBins {
    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Five-number summary of one box with Tukey (1.5 IQR) whiskers
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub label: String,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest value within 1.5 IQR below `q1`
    pub lower_whisker: f64,
    /// Largest value within 1.5 IQR above `q3`
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Kernel density outline of one group
#[derive(Debug, Clone, PartialEq)]
pub struct ViolinShape {
    pub label: String,
    /// `(value, density)` pairs, ascending by value
    pub density: Vec<(f64, f64)>,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
}

impl ViolinShape {
    pub fn max_density(&self) -> f64 {
        self.density.iter().map(|(_, d)| *d).fold(0.0, f64::max)
    }
}

/// Validates `spec` against `data` and computes what the chart will draw.
///
/// Every bound column is checked before any data is read.
///
/// # Errors
/// * [`RenderError::MissingBinding`] - the kind needs an axis the spec leaves unset
/// * [`RenderError::MissingColumn`] - a bound column is not in `data`
/// * [`RenderError::NotNumeric`] - the value column holds text
/// * [`RenderError::InvalidData`] - nothing is left to draw
pub fn prepare(spec: &ChartSpec, data: &Table) -> Result<ChartData> {
    for name in [&spec.category, &spec.value, &spec.series]
        .into_iter()
        .flatten()
    {
        if !data.has_column(name) {
            return Err(RenderError::MissingColumn(name.clone()));
        }
    }

    let chart = match spec.kind {
        ChartKind::Pie => {
            let category = required(spec, &spec.category, "category")?;
            ChartData::Slices(category_counts(data, category)?)
        }
        ChartKind::Histogram => {
            let value = required(spec, &spec.value, "value")?;
            if spec.bins == 0 {
                return Err(RenderError::InvalidData(
                    "Histogram needs at least one bin".to_string(),
                ));
            }

            let values: Vec<f64> = numbers(data, value)?.iter().flatten().copied().collect();
            let bins = histogram_bins(&values, spec.bins).ok_or_else(|| {
                RenderError::InvalidData(format!("Column '{}' has no values", value))
            })?;
            ChartData::Histogram(bins)
        }
        ChartKind::HorizontalBar | ChartKind::VerticalBar => {
            let category = required(spec, &spec.category, "category")?;
            let bars = match &spec.value {
                Some(value) => row_values(data, category, value)?,
                None => category_counts(data, category)?,
            };
            ChartData::Bars(bars)
        }
        ChartKind::Box | ChartKind::Violin => {
            let category = required(spec, &spec.category, "category")?;
            let value = required(spec, &spec.value, "value")?;
            let groups = clipped_groups(data, category, value, spec.clip_quantile)?;

            if spec.kind == ChartKind::Box {
                ChartData::Boxes(
                    groups
                        .into_iter()
                        .filter_map(|(label, values)| box_stats(label, values))
                        .collect(),
                )
            } else {
                ChartData::Violins(
                    groups
                        .into_iter()
                        .filter_map(|(label, values)| violin_shape(label, values))
                        .collect(),
                )
            }
        }
        ChartKind::Heatmap | ChartKind::StackedBar => {
            let category = required(spec, &spec.category, "category")?;
            let series = required(spec, &spec.series, "series")?;
            ChartData::Matrix(crosstab(data, category, series)?)
        }
    };

    if chart.is_empty() {
        return Err(RenderError::InvalidData(format!(
            "Nothing to draw for '{}'",
            spec.title
        )));
    }

    Ok(chart)
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        match self {
            ChartData::Slices(items) | ChartData::Bars(items) => items.is_empty(),
            ChartData::Histogram(bins) => bins.counts.is_empty(),
            ChartData::Boxes(boxes) => boxes.is_empty(),
            ChartData::Violins(violins) => violins.is_empty(),
            ChartData::Matrix(matrix) => matrix.is_empty(),
        }
    }
}

/// Splits `values` into `bins` equal-width bins spanning their range.
///
/// The last bin is closed on the right. A single distinct value gets a range of
/// width one centred on it. Returns `None` when there are no finite values.
pub fn histogram_bins(values: &[f64], bins: usize) -> Option<HistogramBins> {
    let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if values.is_empty() || bins == 0 {
        return None;
    }

    let mut low = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut high = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if low == high {
        low -= 0.5;
        high += 0.5;
    }

    let width = (high - low) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| low + width * i as f64).collect();
    edges.push(high);

    let mut counts = vec![0usize; bins];
    for value in values {
        let index = (((value - low) / width).floor() as usize).min(bins - 1);
        counts[index] += 1;
    }

    Some(HistogramBins { edges, counts })
}

/// Quartiles, whiskers and outliers of one group; `None` when `values` is empty.
pub fn box_stats(label: String, mut values: Vec<f64>) -> Option<BoxStats> {
    values.sort_by(f64::total_cmp);
    let q1 = quantile_sorted(&values, 0.25)?;
    let median = quantile_sorted(&values, 0.5)?;
    let q3 = quantile_sorted(&values, 0.75)?;

    let reach = 1.5 * (q3 - q1);
    let (low_fence, high_fence) = (q1 - reach, q3 + reach);

    let inside = values
        .iter()
        .copied()
        .filter(|v| (low_fence..=high_fence).contains(v));
    let lower_whisker = inside.clone().fold(f64::INFINITY, f64::min).min(q1);
    let upper_whisker = inside.fold(f64::NEG_INFINITY, f64::max).max(q3);

    let outliers = values
        .iter()
        .copied()
        .filter(|v| !(low_fence..=high_fence).contains(v))
        .collect();

    Some(BoxStats {
        label,
        q1,
        median,
        q3,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

/// Gaussian kernel density of one group; `None` when `values` is empty.
pub fn violin_shape(label: String, mut values: Vec<f64>) -> Option<ViolinShape> {
    values.sort_by(f64::total_cmp);
    let q1 = quantile_sorted(&values, 0.25)?;
    let median = quantile_sorted(&values, 0.5)?;
    let q3 = quantile_sorted(&values, 0.75)?;

    let bandwidth = scott_bandwidth(&values);
    let low = values[0] - VIOLIN_CUT * bandwidth;
    let high = values[values.len() - 1] + VIOLIN_CUT * bandwidth;
    let step = (high - low) / (VIOLIN_POINTS - 1) as f64;

    let density = (0..VIOLIN_POINTS)
        .map(|i| {
            let at = low + step * i as f64;
            (at, gaussian_kde(&values, bandwidth, at))
        })
        .collect();

    Some(ViolinShape {
        label,
        density,
        q1,
        median,
        q3,
    })
}

/// Scott's rule, `std * n^(-1/5)`; 1.0 when the spread is zero or undefined.
pub fn scott_bandwidth(values: &[f64]) -> f64 {
    match sample_std(values) {
        Some(std) if std > 0.0 && std.is_finite() => std * (values.len() as f64).powf(-0.2),
        _ => 1.0,
    }
}

/// Density estimate at `at` with a Gaussian kernel of width `bandwidth`.
pub fn gaussian_kde(values: &[f64], bandwidth: f64, at: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let norm = 1.0 / (values.len() as f64 * bandwidth * (2.0 * core::f64::consts::PI).sqrt());
    values
        .iter()
        .map(|v| {
            let z = (at - v) / bandwidth;
            (-0.5 * z * z).exp()
        })
        .sum::<f64>()
        * norm
}

fn required<'a>(spec: &ChartSpec, binding: &'a Option<String>, axis: &'static str) -> Result<&'a str> {
    binding.as_deref().ok_or(RenderError::MissingBinding {
        kind: spec.kind,
        axis,
    })
}

fn numbers<'a>(data: &'a Table, column: &str) -> Result<&'a [Option<f64>]> {
    data.numbers(column).map_err(|e| match e {
        TableError::TypeMismatch { name, .. } => RenderError::NotNumeric(name),
        other => other.into(),
    })
}

fn category_counts(data: &Table, column: &str) -> Result<Vec<(String, f64)>> {
    Ok(value_counts(data, column)?
        .into_iter()
        .map(|(label, count)| (label, count as f64))
        .collect())
}

/// One bar per row with both a label and a value, in row order.
fn row_values(data: &Table, category: &str, value: &str) -> Result<Vec<(String, f64)>> {
    let values = numbers(data, value)?;
    let labels = data.column(category)?;

    Ok(values
        .iter()
        .enumerate()
        .filter_map(|(row, value)| Some((labels.label(row)?, (*value)?)))
        .collect())
}

/// Values of `value` grouped by `category` label ascending, without values above
/// the `clip` quantile of the whole column.
fn clipped_groups(
    data: &Table,
    category: &str,
    value: &str,
    clip: Option<f64>,
) -> Result<BTreeMap<String, Vec<f64>>> {
    let values = numbers(data, value)?;
    let labels: &Series = data.column(category)?;

    let threshold = match clip {
        Some(q) => Some(quantile(values, q).ok_or_else(|| {
            RenderError::InvalidData(format!("Cannot clip '{}' at quantile {}", value, q))
        })?),
        None => None,
    };

    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut dropped = 0usize;
    for (row, value) in values.iter().enumerate() {
        let (Some(label), Some(value)) = (labels.label(row), *value) else {
            continue;
        };

        if threshold.is_some_and(|limit| value > limit) {
            dropped += 1;
            continue;
        }
        groups.entry(label).or_default().push(value);
    }

    if dropped > 0 {
        debug!(column = value, dropped, "clipped values above quantile");
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{summarize, SummaryKind};
    use crate::common::{CITY, DBH, STATUS, ZIPCODE};
    use crate::table::tests::sample_trees;
    use rstest::rstest;

    #[test]
    fn pie_slices_are_status_counts() {
        let spec = ChartSpec::new(ChartKind::Pie, "Status").category(STATUS);
        let chart = prepare(&spec, &sample_trees()).unwrap();

        assert_eq!(
            chart,
            ChartData::Slices(vec![("Alive".to_string(), 2.0), ("Dead".to_string(), 1.0)])
        );
    }

    #[rstest]
    #[case(ChartKind::Pie, "category")]
    #[case(ChartKind::Histogram, "value")]
    #[case(ChartKind::VerticalBar, "category")]
    #[case(ChartKind::Heatmap, "category")]
    fn unbound_axes_are_rejected(#[case] kind: ChartKind, #[case] axis: &str) {
        let result = prepare(&ChartSpec::new(kind, "Chart"), &sample_trees());

        assert!(matches!(
            result,
            Err(RenderError::MissingBinding { kind: k, axis: a }) if k == kind && a == axis
        ));
    }

    #[test]
    fn every_binding_is_checked_even_when_unused() {
        let spec = ChartSpec::new(ChartKind::Pie, "Status")
            .category(STATUS)
            .series("species");

        assert!(matches!(
            prepare(&spec, &sample_trees()),
            Err(RenderError::MissingColumn(name)) if name == "species"
        ));
    }

    #[test]
    fn text_values_are_rejected() {
        let spec = ChartSpec::new(ChartKind::Histogram, "Zip").value(ZIPCODE);

        assert!(matches!(
            prepare(&spec, &sample_trees()),
            Err(RenderError::NotNumeric(name)) if name == ZIPCODE
        ));
    }

    #[test]
    fn histogram_covers_the_value_range() {
        let bins = histogram_bins(&[1.0, 2.0, 3.0, 4.0], 3).unwrap();

        assert_eq!(bins.edges, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(bins.counts, vec![1, 1, 2]);
        assert_eq!(bins.max_count(), 2);
    }

    #[test]
    fn histogram_of_one_distinct_value() {
        let bins = histogram_bins(&[5.0, 5.0], 2).unwrap();

        assert_eq!(bins.edges, vec![4.5, 5.0, 5.5]);
        assert_eq!(bins.counts, vec![0, 2]);
    }

    #[test]
    fn histogram_counts_every_value() {
        let values: Vec<f64> = (0..1000).map(|i| (i % 97) as f64 * 0.37).collect();
        let bins = histogram_bins(&values, 30).unwrap();

        assert_eq!(bins.counts.len(), 30);
        assert_eq!(bins.edges.len(), 31);
        assert_eq!(bins.counts.iter().sum::<usize>(), values.len());
    }

    #[test]
    fn zero_bins_are_invalid() {
        let spec = ChartSpec::new(ChartKind::Histogram, "DBH").value(DBH).bins(0);
        assert!(matches!(
            prepare(&spec, &sample_trees()),
            Err(RenderError::InvalidData(_))
        ));
    }

    #[test]
    fn bars_follow_aggregate_row_order() {
        let by_city = summarize(&sample_trees(), SummaryKind::City)
            .unwrap()
            .to_table();
        let spec = ChartSpec::new(ChartKind::HorizontalBar, "Trees")
            .category(CITY)
            .value("tree_count");

        assert_eq!(
            prepare(&spec, &by_city).unwrap(),
            ChartData::Bars(vec![
                ("Manhattan".to_string(), 2.0),
                ("Brooklyn".to_string(), 1.0)
            ])
        );
    }

    #[test]
    fn box_whiskers_stop_at_the_fences() {
        let mut values: Vec<f64> = (1..=9).map(f64::from).collect();
        values.push(100.0);
        let stats = box_stats("Alive".to_string(), values).unwrap();

        assert_eq!(stats.q1, 3.25);
        assert_eq!(stats.median, 5.5);
        assert_eq!(stats.q3, 7.75);
        assert_eq!(stats.lower_whisker, 1.0);
        assert_eq!(stats.upper_whisker, 9.0);
        assert_eq!(stats.outliers, vec![100.0]);
    }

    #[test]
    fn clipping_only_affects_drawn_values() {
        let trees = sample_trees();
        let before = trees.clone();
        let spec = ChartSpec::new(ChartKind::Box, "DBH")
            .category(STATUS)
            .value(DBH)
            .clip_quantile(0.5);

        let ChartData::Boxes(boxes) = prepare(&spec, &trees).unwrap() else {
            panic!("expected box data");
        };

        // The 15 inch tree is above the median and is the only dead tree.
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].label, "Alive");
        assert_eq!(boxes[0].upper_whisker, 10.0);
        assert_eq!(trees, before);
    }

    #[test]
    fn groups_are_ordered_by_label() {
        let spec = ChartSpec::new(ChartKind::Violin, "DBH").category(CITY).value(DBH);
        let ChartData::Violins(violins) = prepare(&spec, &sample_trees()).unwrap() else {
            panic!("expected violin data");
        };

        let labels: Vec<&str> = violins.iter().map(|v| v.label.as_str()).collect();
        assert_eq!(labels, vec!["Brooklyn", "Manhattan"]);
    }

    #[test]
    fn violin_density_integrates_to_about_one() {
        let values: Vec<f64> = (0..200).map(|i| (i % 20) as f64).collect();
        let shape = violin_shape("Alive".to_string(), values).unwrap();

        assert_eq!(shape.density.len(), VIOLIN_POINTS);
        let step = shape.density[1].0 - shape.density[0].0;
        let area: f64 = shape.density.iter().map(|(_, d)| d * step).sum();
        assert!((area - 1.0).abs() < 0.05, "area was {}", area);
        assert!(shape.max_density() > 0.0);
    }

    #[rstest]
    #[case(&[4.0], 1.0)]
    #[case(&[3.0, 3.0, 3.0], 1.0)]
    fn degenerate_bandwidth_falls_back(#[case] values: &[f64], #[case] expected: f64) {
        assert_eq!(scott_bandwidth(values), expected);
    }

    #[test]
    fn matrix_for_stacked_bars() {
        let spec = ChartSpec::new(ChartKind::StackedBar, "Status")
            .category(ZIPCODE)
            .series(STATUS);
        let ChartData::Matrix(matrix) = prepare(&spec, &sample_trees()).unwrap() else {
            panic!("expected matrix data");
        };

        assert_eq!(matrix.rows, vec!["10001", "10002"]);
        assert_eq!(matrix.columns, vec!["Alive", "Dead"]);
        assert_eq!(matrix.counts, vec![vec![1, 1], vec![1, 0]]);
    }

    #[test]
    fn empty_table_has_nothing_to_draw() {
        let empty = sample_trees().head(0);
        let spec = ChartSpec::new(ChartKind::Pie, "Status").category(STATUS);

        assert!(matches!(prepare(&spec, &empty), Err(RenderError::InvalidData(_))));
    }
}
