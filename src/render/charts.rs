//! The fixed chart sets of an analysis run
//!
//! Each set pairs chart specs with the table they are drawn from. Tables are
//! derived here (top-N selections, count tables, re-sorted summaries); the
//! working table itself is only read.

use super::style::{CORAL, FOREST_GREEN, GOLD, LIGHT_GREEN, SKY_BLUE};
use super::{render_to_file, ChartKind, ChartSpec, PlotStyle, RenderError, ValueLabelFormat};
use crate::analysis::{value_counts, AggregateTable};
use crate::common::{CITY, DBH, STATUS, ZIPCODE};
use crate::config::AnalysisParams;
use crate::table::filter::keep_values;
use crate::table::{Series, Table};
use std::path::{Path, PathBuf};

type Result<T> = core::result::Result<T, RenderError>;

/// Name of the count column in derived count tables
const COUNT: &str = "tree_count";

const DBH_LABEL: &str = "Tree DBH (inches)";
const AVG_DBH_LABEL: &str = "Average Tree DBH (inches)";
const TREES_LABEL: &str = "Number of Trees";

/// One chart to render: what to draw, from which table, into which file
#[derive(Debug, Clone, PartialEq)]
pub struct ChartJob {
    pub file_name: String,
    pub spec: ChartSpec,
    pub data: Table,
}

impl ChartJob {
    fn new(file_name: &str, spec: ChartSpec, data: Table) -> Self {
        Self {
            file_name: file_name.to_string(),
            spec,
            data,
        }
    }

    /// Renders this chart into `output_dir` and returns the written path.
    pub fn render(&self, style: &PlotStyle, output_dir: &Path) -> Result<PathBuf> {
        let path = output_dir.join(&self.file_name);
        render_to_file(&self.spec, &self.data, style, &path)?;
        Ok(path)
    }
}

/// Table of the `n` most frequent labels of `column` and their counts.
fn counts_table(table: &Table, column: &str, n: usize) -> Result<Table> {
    let counts = value_counts(table, column)?;
    let (labels, counts): (Vec<String>, Vec<f64>) = counts
        .into_iter()
        .take(n)
        .map(|(label, count)| (label, count as f64))
        .unzip();

    Ok(Table::new(vec![
        (column.to_string(), Series::from(labels)),
        (COUNT.to_string(), Series::from(counts)),
    ])?)
}

/// The `n` most frequent labels of `column`.
fn top_labels(table: &Table, column: &str, n: usize) -> Result<Vec<String>> {
    Ok(value_counts(table, column)?
        .into_iter()
        .take(n)
        .map(|(label, _)| label)
        .collect())
}

/// Status, diameter and city overview
pub fn overview_charts(
    trees: &Table,
    by_city: &AggregateTable,
    params: &AnalysisParams,
) -> Result<Vec<ChartJob>> {
    let top_cities = counts_table(trees, CITY, params.top_categories)?;
    let avg_by_city = by_city
        .sorted_by("avg_dbh")?
        .head(params.top_categories)
        .to_table();

    Ok(vec![
        ChartJob::new(
            "status_distribution.png",
            ChartSpec::new(ChartKind::Pie, "Tree Status Distribution").category(STATUS),
            trees.clone(),
        ),
        ChartJob::new(
            "dbh_histogram.png",
            ChartSpec::new(ChartKind::Histogram, "Tree Diameter Distribution")
                .value(DBH)
                .bins(params.bins)
                .color(FOREST_GREEN)
                .x_label(DBH_LABEL)
                .y_label("Frequency"),
            trees.clone(),
        ),
        ChartJob::new(
            "top_cities_by_count.png",
            ChartSpec::new(
                ChartKind::HorizontalBar,
                format!("Top {} Cities by Tree Count", params.top_categories),
            )
            .category(CITY)
            .value(COUNT)
            .color(SKY_BLUE)
            .value_labels(ValueLabelFormat::Thousands)
            .x_label(TREES_LABEL),
            top_cities,
        ),
        ChartJob::new(
            "avg_dbh_by_city.png",
            ChartSpec::new(
                ChartKind::HorizontalBar,
                format!("Average Tree DBH by City (Top {})", params.top_categories),
            )
            .category(CITY)
            .value("avg_dbh")
            .color(LIGHT_GREEN)
            .value_labels(ValueLabelFormat::OneDecimal)
            .x_label(AVG_DBH_LABEL),
            avg_by_city,
        ),
        ChartJob::new(
            "status_counts.png",
            ChartSpec::new(ChartKind::VerticalBar, "Tree Count by Status")
                .category(STATUS)
                .value_labels(ValueLabelFormat::Thousands)
                .x_label("Tree Status")
                .y_label(TREES_LABEL),
            trees.clone(),
        ),
        ChartJob::new(
            "dbh_by_status_box.png",
            ChartSpec::new(ChartKind::Box, "Tree DBH Distribution by Status")
                .category(STATUS)
                .value(DBH)
                .clip_quantile(params.clip_quantile)
                .x_label("Tree Status")
                .y_label(DBH_LABEL),
            trees.clone(),
        ),
    ])
}

/// Counts, sizes and status mix of the busiest zip codes
pub fn zipcode_charts(
    trees: &Table,
    by_zipcode: &AggregateTable,
    params: &AnalysisParams,
) -> Result<Vec<ChartJob>> {
    let top_zips = counts_table(trees, ZIPCODE, params.top_n)?;
    let avg_by_zip = by_zipcode.sorted_by("avg_dbh")?.head(params.top_n).to_table();
    let busiest = keep_values(
        trees,
        ZIPCODE,
        &top_labels(trees, ZIPCODE, params.top_categories)?,
    )?;

    Ok(vec![
        ChartJob::new(
            "top_zipcodes_by_count.png",
            ChartSpec::new(
                ChartKind::VerticalBar,
                format!("Tree Count by Zip Code (Top {})", params.top_n),
            )
            .category(ZIPCODE)
            .value(COUNT)
            .color(CORAL)
            .value_labels(ValueLabelFormat::Thousands)
            .x_label("Zip Code")
            .y_label(TREES_LABEL),
            top_zips,
        ),
        ChartJob::new(
            "avg_dbh_by_zipcode.png",
            ChartSpec::new(
                ChartKind::VerticalBar,
                format!("Average Tree DBH by Zip Code (Top {})", params.top_n),
            )
            .category(ZIPCODE)
            .value("avg_dbh")
            .color(GOLD)
            .value_labels(ValueLabelFormat::OneDecimal)
            .x_label("Zip Code")
            .y_label(AVG_DBH_LABEL),
            avg_by_zip,
        ),
        ChartJob::new(
            "status_by_zipcode_heatmap.png",
            ChartSpec::new(
                ChartKind::Heatmap,
                format!("Tree Status by Zip Code (Top {})", params.top_categories),
            )
            .category(ZIPCODE)
            .series(STATUS)
            .x_label("Tree Status")
            .y_label("Zip Code"),
            busiest.clone(),
        ),
        ChartJob::new(
            "dbh_by_zipcode_box.png",
            ChartSpec::new(
                ChartKind::Box,
                format!("Tree DBH Distribution by Zip Code (Top {})", params.top_categories),
            )
            .category(ZIPCODE)
            .value(DBH)
            .clip_quantile(params.detail_clip_quantile)
            .x_label("Zip Code")
            .y_label(DBH_LABEL),
            busiest,
        ),
    ])
}

/// Status broken down by city and zip code
pub fn status_charts(
    trees: &Table,
    by_status: &AggregateTable,
    params: &AnalysisParams,
) -> Result<Vec<ChartJob>> {
    let busiest_cities = keep_values(
        trees,
        CITY,
        &top_labels(trees, CITY, params.top_categories)?,
    )?;
    let busiest_zips = keep_values(
        trees,
        ZIPCODE,
        &top_labels(trees, ZIPCODE, params.top_categories)?,
    )?;
    let avg_by_status = by_status.sorted_by("avg_dbh")?.to_table();

    Ok(vec![
        ChartJob::new(
            "status_by_city_heatmap.png",
            ChartSpec::new(
                ChartKind::Heatmap,
                format!("Tree Status by City (Top {})", params.top_categories),
            )
            .category(CITY)
            .series(STATUS)
            .x_label("Tree Status")
            .y_label("City"),
            busiest_cities,
        ),
        ChartJob::new(
            "dbh_by_status_violin.png",
            ChartSpec::new(ChartKind::Violin, "Tree DBH Distribution by Status")
                .category(STATUS)
                .value(DBH)
                .clip_quantile(params.detail_clip_quantile)
                .x_label("Tree Status")
                .y_label(DBH_LABEL),
            trees.clone(),
        ),
        ChartJob::new(
            "status_by_zipcode_stacked.png",
            ChartSpec::new(
                ChartKind::StackedBar,
                format!("Tree Status by Zip Code (Top {})", params.top_categories),
            )
            .category(ZIPCODE)
            .series(STATUS)
            .x_label("Zip Code")
            .y_label(TREES_LABEL),
            busiest_zips,
        ),
        ChartJob::new(
            "avg_dbh_by_status.png",
            ChartSpec::new(ChartKind::VerticalBar, "Average Tree DBH by Status")
                .category(STATUS)
                .value("avg_dbh")
                .value_labels(ValueLabelFormat::OneDecimal)
                .x_label("Tree Status")
                .y_label(AVG_DBH_LABEL),
            avg_by_status,
        ),
    ])
}

/// Diameter and zip code breakdown of the filtered subset.
///
/// Returns no jobs when the subset is empty.
pub fn filtered_charts(filtered: &Table, params: &AnalysisParams) -> Result<Vec<ChartJob>> {
    if filtered.is_empty() {
        return Ok(Vec::new());
    }

    let subject = format!("{}, {}", params.city, params.status);
    let zip_counts = counts_table(filtered, ZIPCODE, params.top_categories)?;

    Ok(vec![
        ChartJob::new(
            "filtered_dbh_histogram.png",
            ChartSpec::new(ChartKind::Histogram, format!("DBH Distribution - {}", subject))
                .value(DBH)
                .bins(params.filtered_bins)
                .color(FOREST_GREEN)
                .x_label(DBH_LABEL)
                .y_label("Frequency"),
            filtered.clone(),
        ),
        ChartJob::new(
            "filtered_zipcode_counts.png",
            ChartSpec::new(
                ChartKind::VerticalBar,
                format!("Tree Count by Zip Code - {}", subject),
            )
            .category(ZIPCODE)
            .value(COUNT)
            .color(SKY_BLUE)
            .value_labels(ValueLabelFormat::Thousands)
            .x_label("Zip Code")
            .y_label(TREES_LABEL),
            zip_counts,
        ),
    ])
}
