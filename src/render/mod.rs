//! Chart rendering
//!
//! A [`ChartSpec`] names the kind of chart and which columns of a [`Table`] feed
//! each axis. Rendering happens in two steps:
//!
//! 1. [`prepare`] validates the bindings against the table and reduces it to
//!    plain chart data (slices, bins, bars, box statistics, densities or a
//!    count matrix). Nothing is drawn if this fails.
//! 2. The drawing code lays the chart data out with [`plotters`] onto a bitmap,
//!    either a PNG file ([`render_to_file`]) or an RGB buffer ([`render_to_buffer`]).
//!
//! The input table is never modified; outlier clipping only affects what is drawn.

pub mod charts;
mod draw;
pub mod prepare;
pub mod style;

use crate::analysis::AggregateError;
use crate::common::constants::DEFAULT_BINS;
use crate::table::{Table, TableError};
use core::fmt;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub use charts::ChartJob;
pub use prepare::{prepare, ChartData};
pub use style::PlotStyle;

/// Errors that can occur during chart rendering
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Chart binds column '{0}' which is not in the data")]
    MissingColumn(String),

    #[error("A {kind} chart needs a {axis} column")]
    MissingBinding { kind: ChartKind, axis: &'static str },

    #[error("Column '{0}' must be numeric to be plotted as values")]
    NotNumeric(String),

    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

type Result<T> = core::result::Result<T, RenderError>;

/// The kinds of chart the renderer can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Pie,
    Histogram,
    HorizontalBar,
    VerticalBar,
    Box,
    Violin,
    Heatmap,
    StackedBar,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Pie => "pie",
            ChartKind::Histogram => "histogram",
            ChartKind::HorizontalBar => "horizontal bar",
            ChartKind::VerticalBar => "vertical bar",
            ChartKind::Box => "box",
            ChartKind::Violin => "violin",
            ChartKind::Heatmap => "heatmap",
            ChartKind::StackedBar => "stacked bar",
        };
        write!(f, "{}", name)
    }
}

/// How numbers next to bars are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueLabelFormat {
    /// Rounded integer with thousands separators, e.g. `12,345`
    Thousands,
    /// One decimal place, e.g. `12.3`
    OneDecimal,
}

impl ValueLabelFormat {
    pub fn format(self, value: f64) -> String {
        match self {
            ValueLabelFormat::Thousands => format_thousands(value),
            ValueLabelFormat::OneDecimal => format!("{:.1}", value),
        }
    }
}

/// Formats `value` as a rounded integer with `,` between groups of three digits.
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// What to draw and which columns feed it
///
/// Bindings by kind:
/// * pie: `category` (slices are category counts)
/// * histogram: `value`
/// * horizontal/vertical bar: `category`, and `value` for one bar per row;
///   without `value` bars are category counts
/// * box, violin: `category` and `value`
/// * heatmap, stacked bar: `category` (rows / bars) and `series` (columns / stacks)
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub category: Option<String>,
    pub value: Option<String>,
    pub series: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    /// Histogram bin count
    pub bins: usize,
    /// Box and violin values above this quantile of the value column are not drawn
    pub clip_quantile: Option<f64>,
    pub value_labels: Option<ValueLabelFormat>,
    /// Single fill colour; the style's palette is used per category when unset
    pub color: Option<RGBColor>,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            category: None,
            value: None,
            series: None,
            x_label: None,
            y_label: None,
            bins: DEFAULT_BINS,
            clip_quantile: None,
            value_labels: None,
            color: None,
        }
    }

    pub fn category(mut self, column: impl Into<String>) -> Self {
        self.category = Some(column.into());
        self
    }

    pub fn value(mut self, column: impl Into<String>) -> Self {
        self.value = Some(column.into());
        self
    }

    pub fn series(mut self, column: impl Into<String>) -> Self {
        self.series = Some(column.into());
        self
    }

    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = Some(label.into());
        self
    }

    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }

    pub fn bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    pub fn clip_quantile(mut self, quantile: f64) -> Self {
        self.clip_quantile = Some(quantile);
        self
    }

    pub fn value_labels(mut self, format: ValueLabelFormat) -> Self {
        self.value_labels = Some(format);
        self
    }

    pub fn color(mut self, color: RGBColor) -> Self {
        self.color = Some(color);
        self
    }
}

/// Renders `spec` over `data` and saves it as a PNG at `output_path`.
///
/// Bindings are validated before the file is created.
///
/// # Errors
/// * [`RenderError::MissingColumn`] / [`RenderError::MissingBinding`] / [`RenderError::NotNumeric`] -
///   the spec does not fit the data
/// * [`RenderError::FileSave`] - the destination directory does not exist
/// * [`RenderError::DrawingArea`] / [`RenderError::ChartConfig`] / [`RenderError::Drawing`] -
///   the backend failed
pub fn render_to_file(
    spec: &ChartSpec,
    data: &Table,
    style: &PlotStyle,
    output_path: &Path,
) -> Result<()> {
    let chart = prepare(spec, data)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(RenderError::FileSave(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("directory '{}' does not exist", parent.display()),
            )));
        }
    }

    let root = BitMapBackend::new(output_path, (style.width, style.height)).into_drawing_area();
    draw::draw(&root, spec, &chart, style)?;
    root.present()
        .map_err(|e| RenderError::Drawing(e.to_string()))?;

    debug!(path = %output_path.display(), kind = %spec.kind, "rendered chart");
    Ok(())
}

/// Renders `spec` over `data` into a `width * height * 3` RGB buffer.
pub fn render_to_buffer(spec: &ChartSpec, data: &Table, style: &PlotStyle) -> Result<Vec<u8>> {
    let chart = prepare(spec, data)?;

    let mut buffer = vec![0u8; style.width as usize * style.height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        draw::draw(&root, spec, &chart, style)?;
        root.present()
            .map_err(|e| RenderError::Drawing(e.to_string()))?;
    }

    Ok(buffer)
}
