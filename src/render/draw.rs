//! Drawing of prepared chart data with [`plotters`]
//!
//! Categorical axes use segmented coordinates so that every category owns one
//! segment and is labelled at its centre. Pie slices, boxes and violins are laid
//! out in backend pixels, using the chart's coordinate mapping where there is one.

use super::prepare::{BoxStats, ChartData, HistogramBins, ViolinShape};
use super::style::{heat_color, needs_light_text, PlotStyle};
use super::{ChartKind, ChartSpec, RenderError};
use crate::analysis::Crosstab;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

type Result<T> = core::result::Result<T, RenderError>;

/// Headroom above the tallest bar for value labels
const HEADROOM: f64 = 1.12;

pub(super) fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    data: &ChartData,
    style: &PlotStyle,
) -> Result<()> {
    root.fill(&WHITE)
        .map_err(|e| RenderError::DrawingArea(e.to_string()))?;

    match data {
        ChartData::Slices(slices) => draw_pie(root, spec, slices, style),
        ChartData::Histogram(bins) => draw_histogram(root, spec, bins, style),
        ChartData::Bars(bars) if spec.kind == ChartKind::HorizontalBar => {
            draw_horizontal_bars(root, spec, bars, style)
        }
        ChartData::Bars(bars) => draw_vertical_bars(root, spec, bars, style),
        ChartData::Boxes(boxes) => draw_boxes(root, spec, boxes, style),
        ChartData::Violins(violins) => draw_violins(root, spec, violins, style),
        ChartData::Matrix(matrix) if spec.kind == ChartKind::StackedBar => {
            draw_stacked_bars(root, spec, matrix, style)
        }
        ChartData::Matrix(matrix) => draw_heatmap(root, spec, matrix, style),
    }
}

fn font(style: &PlotStyle, size: u32) -> TextStyle<'_> {
    (style.font_family.as_str(), size as f64)
        .into_font()
        .color(&BLACK)
}

/// Label of the category whose segment centre is `value`
fn segment_label(labels: &[String], value: &SegmentValue<u32>) -> String {
    match value {
        SegmentValue::CenterOf(index) => labels.get(*index as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    }
}

fn axis_label(label: &Option<String>) -> &str {
    label.as_deref().unwrap_or("")
}

fn drawing_error<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Drawing(e.to_string())
}

fn draw_pie<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    slices: &[(String, f64)],
    style: &PlotStyle,
) -> Result<()> {
    let area = root
        .titled(&spec.title, font(style, style.title_size))
        .map_err(|e| RenderError::DrawingArea(e.to_string()))?;

    let total: f64 = slices.iter().map(|(_, count)| count).sum();
    if total <= 0.0 {
        return Err(RenderError::InvalidData("Pie slices sum to zero".to_string()));
    }

    let (width, height) = area.dim_in_pixel();
    let center = (width as f64 / 2.0, height as f64 / 2.0);
    let radius = width.min(height) as f64 * 0.36;

    // Slices run counter-clockwise from twelve o'clock; the first is pulled out.
    let mut start = core::f64::consts::FRAC_PI_2;
    for (index, (label, count)) in slices.iter().enumerate() {
        let sweep = count / total * core::f64::consts::TAU;
        let middle = start + sweep / 2.0;
        let offset = if index == 0 { radius * 0.05 } else { 0.0 };
        let origin = (
            center.0 + offset * middle.cos(),
            center.1 - offset * middle.sin(),
        );

        let at = |angle: f64, distance: f64| {
            (
                (origin.0 + distance * angle.cos()).round() as i32,
                (origin.1 - distance * angle.sin()).round() as i32,
            )
        };

        let steps = ((sweep.to_degrees()).ceil() as usize).max(2);
        let mut outline = Vec::with_capacity(steps + 2);
        outline.push(at(0.0, 0.0));
        outline.extend((0..=steps).map(|step| at(start + sweep * step as f64 / steps as f64, radius)));

        area.draw(&Polygon::new(outline, style.color(index).filled()))
            .map_err(drawing_error)?;

        let anchor = if middle.cos() >= 0.0 { HPos::Left } else { HPos::Right };
        area.draw(&Text::new(
            label.clone(),
            at(middle, radius * 1.1),
            font(style, style.axis_label_size).pos(Pos::new(anchor, VPos::Center)),
        ))
        .map_err(drawing_error)?;

        area.draw(&Text::new(
            format!("{:.1}%", count / total * 100.0),
            at(middle, radius * 0.6),
            font(style, style.value_label_size).pos(Pos::new(HPos::Center, VPos::Center)),
        ))
        .map_err(drawing_error)?;

        start += sweep;
    }

    Ok(())
}

fn draw_histogram<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    bins: &HistogramBins,
    style: &PlotStyle,
) -> Result<()> {
    let low = bins.edges[0];
    let high = bins.edges[bins.edges.len() - 1];
    let top = (bins.max_count() as f64 * HEADROOM).max(1.0);

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, font(style, style.title_size))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(low..high, 0.0..top)
        .map_err(|e| RenderError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(axis_label(&spec.x_label))
        .y_desc(axis_label(&spec.y_label))
        .axis_desc_style(font(style, style.axis_label_size))
        .label_style(font(style, style.tick_label_size))
        .light_line_style(BLACK.mix(0.05))
        .draw()
        .map_err(drawing_error)?;

    let fill = spec.color.unwrap_or_else(|| style.color(0));
    let corners: Vec<[(f64, f64); 2]> = bins
        .counts
        .iter()
        .enumerate()
        .map(|(index, count)| {
            [
                (bins.edges[index], 0.0),
                (bins.edges[index + 1], *count as f64),
            ]
        })
        .collect();

    chart
        .draw_series(corners.iter().map(|c| Rectangle::new(*c, fill.mix(0.7).filled())))
        .map_err(drawing_error)?;
    chart
        .draw_series(corners.iter().map(|c| Rectangle::new(*c, BLACK.stroke_width(1))))
        .map_err(drawing_error)?;

    Ok(())
}

fn draw_vertical_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    bars: &[(String, f64)],
    style: &PlotStyle,
) -> Result<()> {
    let labels: Vec<String> = bars.iter().map(|(label, _)| label.clone()).collect();
    let top = (bars.iter().map(|(_, v)| *v).fold(0.0, f64::max) * HEADROOM).max(1.0);

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, font(style, style.title_size))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d((0..labels.len() as u32).into_segmented(), 0.0..top)
        .map_err(|e| RenderError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|v| segment_label(&labels, v))
        .x_desc(axis_label(&spec.x_label))
        .y_desc(axis_label(&spec.y_label))
        .axis_desc_style(font(style, style.axis_label_size))
        .label_style(font(style, style.tick_label_size))
        .draw()
        .map_err(drawing_error)?;

    chart
        .draw_series(bars.iter().enumerate().map(|(index, (_, value))| {
            let color = spec.color.unwrap_or_else(|| style.color(index));
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(index as u32), 0.0),
                    (SegmentValue::Exact(index as u32 + 1), *value),
                ],
                color.filled(),
            );
            bar.set_margin(0, 0, 6, 6);
            bar
        }))
        .map_err(drawing_error)?;

    if let Some(format) = spec.value_labels {
        let label_font = font(style, style.value_label_size).pos(Pos::new(HPos::Center, VPos::Bottom));
        chart
            .draw_series(bars.iter().enumerate().map(|(index, (_, value))| {
                Text::new(
                    format.format(*value),
                    (SegmentValue::CenterOf(index as u32), *value),
                    label_font.clone(),
                )
            }))
            .map_err(drawing_error)?;
    }

    Ok(())
}

fn draw_horizontal_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    bars: &[(String, f64)],
    style: &PlotStyle,
) -> Result<()> {
    // The first bar is drawn at the top, which is the last segment.
    let count = bars.len() as u32;
    let labels: Vec<String> = bars.iter().rev().map(|(label, _)| label.clone()).collect();
    let right = (bars.iter().map(|(_, v)| *v).fold(0.0, f64::max) * HEADROOM).max(1.0);

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, font(style, style.title_size))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(200)
        .build_cartesian_2d(0.0..right, (0..count).into_segmented())
        .map_err(|e| RenderError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(labels.len())
        .y_label_formatter(&|v| segment_label(&labels, v))
        .x_desc(axis_label(&spec.x_label))
        .y_desc(axis_label(&spec.y_label))
        .axis_desc_style(font(style, style.axis_label_size))
        .label_style(font(style, style.tick_label_size))
        .draw()
        .map_err(drawing_error)?;

    let position = |index: usize| count - 1 - index as u32;

    chart
        .draw_series(bars.iter().enumerate().map(|(index, (_, value))| {
            let color = spec.color.unwrap_or_else(|| style.color(index));
            let mut bar = Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(position(index))),
                    (*value, SegmentValue::Exact(position(index) + 1)),
                ],
                color.filled(),
            );
            bar.set_margin(4, 4, 0, 0);
            bar
        }))
        .map_err(drawing_error)?;

    if let Some(format) = spec.value_labels {
        let label_font = font(style, style.value_label_size).pos(Pos::new(HPos::Left, VPos::Center));
        chart
            .draw_series(bars.iter().enumerate().map(|(index, (_, value))| {
                Text::new(
                    format!(" {}", format.format(*value)),
                    (*value, SegmentValue::CenterOf(position(index))),
                    label_font.clone(),
                )
            }))
            .map_err(drawing_error)?;
    }

    Ok(())
}

/// Vertical extent of a set of groups, padded by 5% on both ends.
fn padded_range(low: f64, high: f64) -> core::ops::Range<f64> {
    let span = (high - low).max(1.0);
    (low - span * 0.05)..(high + span * 0.05)
}

fn draw_boxes<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    boxes: &[BoxStats],
    style: &PlotStyle,
) -> Result<()> {
    let labels: Vec<String> = boxes.iter().map(|b| b.label.clone()).collect();
    let low = boxes
        .iter()
        .flat_map(|b| b.outliers.iter().copied().chain([b.lower_whisker]))
        .fold(f64::INFINITY, f64::min);
    let high = boxes
        .iter()
        .flat_map(|b| b.outliers.iter().copied().chain([b.upper_whisker]))
        .fold(f64::NEG_INFINITY, f64::max);

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, font(style, style.title_size))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d((0..labels.len() as u32).into_segmented(), padded_range(low, high))
        .map_err(|e| RenderError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|v| segment_label(&labels, v))
        .x_desc(axis_label(&spec.x_label))
        .y_desc(axis_label(&spec.y_label))
        .axis_desc_style(font(style, style.axis_label_size))
        .label_style(font(style, style.tick_label_size))
        .draw()
        .map_err(drawing_error)?;

    let segment = segment_width(|v| chart.backend_coord(&(v, 0.0)).0);
    let half = (segment as f64 * 0.3).round() as i32;
    let cap = half / 2;

    for (index, stats) in boxes.iter().enumerate() {
        let at = |value: f64| chart.backend_coord(&(SegmentValue::CenterOf(index as u32), value));
        let color = style.color(index);
        let (x, q1) = at(stats.q1);
        let (_, q3) = at(stats.q3);
        let (_, median) = at(stats.median);
        let (_, lower) = at(stats.lower_whisker);
        let (_, upper) = at(stats.upper_whisker);

        root.draw(&Rectangle::new([(x - half, q3), (x + half, q1)], color.mix(0.8).filled()))
            .map_err(drawing_error)?;
        root.draw(&Rectangle::new([(x - half, q3), (x + half, q1)], BLACK.stroke_width(1)))
            .map_err(drawing_error)?;
        root.draw(&PathElement::new(vec![(x - half, median), (x + half, median)], BLACK.stroke_width(2)))
            .map_err(drawing_error)?;

        for (end, whisker) in [(q3, upper), (q1, lower)] {
            root.draw(&PathElement::new(vec![(x, end), (x, whisker)], BLACK.stroke_width(1)))
                .map_err(drawing_error)?;
            root.draw(&PathElement::new(vec![(x - cap, whisker), (x + cap, whisker)], BLACK.stroke_width(1)))
                .map_err(drawing_error)?;
        }

        for outlier in &stats.outliers {
            root.draw(&Circle::new(at(*outlier), 3, BLACK.stroke_width(1)))
                .map_err(drawing_error)?;
        }
    }

    Ok(())
}

fn draw_violins<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    violins: &[ViolinShape],
    style: &PlotStyle,
) -> Result<()> {
    let labels: Vec<String> = violins.iter().map(|v| v.label.clone()).collect();
    let low = violins
        .iter()
        .filter_map(|v| v.density.first().map(|(at, _)| *at))
        .fold(f64::INFINITY, f64::min);
    let high = violins
        .iter()
        .filter_map(|v| v.density.last().map(|(at, _)| *at))
        .fold(f64::NEG_INFINITY, f64::max);

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, font(style, style.title_size))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d((0..labels.len() as u32).into_segmented(), padded_range(low, high))
        .map_err(|e| RenderError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|v| segment_label(&labels, v))
        .x_desc(axis_label(&spec.x_label))
        .y_desc(axis_label(&spec.y_label))
        .axis_desc_style(font(style, style.axis_label_size))
        .label_style(font(style, style.tick_label_size))
        .draw()
        .map_err(drawing_error)?;

    let half = segment_width(|v| chart.backend_coord(&(v, 0.0)).0) as f64 * 0.4;

    for (index, violin) in violins.iter().enumerate() {
        let at = |value: f64| chart.backend_coord(&(SegmentValue::CenterOf(index as u32), value));
        let peak = violin.max_density();
        let scale = if peak > 0.0 { half / peak } else { 0.0 };

        let mut outline: Vec<(i32, i32)> = violin
            .density
            .iter()
            .map(|(value, density)| {
                let (x, y) = at(*value);
                (x + (density * scale).round() as i32, y)
            })
            .collect();
        outline.extend(violin.density.iter().rev().map(|(value, density)| {
            let (x, y) = at(*value);
            (x - (density * scale).round() as i32, y)
        }));

        let color = style.color(index);
        root.draw(&Polygon::new(outline.clone(), color.mix(0.8).filled()))
            .map_err(drawing_error)?;
        if let Some(first) = outline.first().copied() {
            outline.push(first);
        }
        root.draw(&PathElement::new(outline, BLACK.stroke_width(1)))
            .map_err(drawing_error)?;

        // Interquartile bar with the median marked in white.
        let (x, q1) = at(violin.q1);
        let (_, q3) = at(violin.q3);
        root.draw(&Rectangle::new([(x - 4, q3), (x + 4, q1)], BLACK.filled()))
            .map_err(drawing_error)?;
        root.draw(&Circle::new(at(violin.median), 4, WHITE.filled()))
            .map_err(drawing_error)?;
    }

    Ok(())
}

/// Width in pixels of one segment, given the pixel column of a segment boundary
fn segment_width(to_pixel: impl Fn(SegmentValue<u32>) -> i32) -> i32 {
    (to_pixel(SegmentValue::Exact(1)) - to_pixel(SegmentValue::Exact(0))).max(1)
}

fn draw_heatmap<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    matrix: &Crosstab,
    style: &PlotStyle,
) -> Result<()> {
    // Rows are listed top to bottom, so the first row takes the last segment.
    let row_count = matrix.rows.len() as u32;
    let row_labels: Vec<String> = matrix.rows.iter().rev().cloned().collect();
    let column_labels = matrix.columns.clone();
    let max = matrix.max_count().max(1) as f64;

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, font(style, style.title_size))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(200)
        .build_cartesian_2d(
            (0..column_labels.len() as u32).into_segmented(),
            (0..row_count).into_segmented(),
        )
        .map_err(|e| RenderError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(column_labels.len())
        .y_labels(row_labels.len())
        .x_label_formatter(&|v| segment_label(&column_labels, v))
        .y_label_formatter(&|v| segment_label(&row_labels, v))
        .x_desc(axis_label(&spec.x_label))
        .y_desc(axis_label(&spec.y_label))
        .axis_desc_style(font(style, style.axis_label_size))
        .label_style(font(style, style.tick_label_size))
        .draw()
        .map_err(drawing_error)?;

    let cells: Vec<(u32, u32, usize)> = (0..matrix.rows.len())
        .flat_map(|row| {
            (0..matrix.columns.len()).map(move |column| {
                (column as u32, row_count - 1 - row as u32, matrix.get(row, column))
            })
        })
        .collect();

    chart
        .draw_series(cells.iter().map(|(column, row, count)| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(*column), SegmentValue::Exact(*row)),
                    (SegmentValue::Exact(column + 1), SegmentValue::Exact(row + 1)),
                ],
                heat_color(*count as f64 / max).filled(),
            )
        }))
        .map_err(drawing_error)?;

    chart
        .draw_series(cells.iter().map(|(column, row, count)| {
            let text_color = if needs_light_text(heat_color(*count as f64 / max)) {
                WHITE
            } else {
                BLACK
            };
            Text::new(
                count.to_string(),
                (SegmentValue::CenterOf(*column), SegmentValue::CenterOf(*row)),
                (style.font_family.as_str(), style.value_label_size as f64)
                    .into_font()
                    .color(&text_color)
                    .pos(Pos::new(HPos::Center, VPos::Center)),
            )
        }))
        .map_err(drawing_error)?;

    Ok(())
}

fn draw_stacked_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    matrix: &Crosstab,
    style: &PlotStyle,
) -> Result<()> {
    let labels = matrix.rows.clone();
    let tallest = (0..matrix.rows.len())
        .map(|row| matrix.row_total(row))
        .max()
        .unwrap_or(0);
    let top = (tallest as f64 * HEADROOM).max(1.0);

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, font(style, style.title_size))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d((0..labels.len() as u32).into_segmented(), 0.0..top)
        .map_err(|e| RenderError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|v| segment_label(&labels, v))
        .x_desc(axis_label(&spec.x_label))
        .y_desc(axis_label(&spec.y_label))
        .axis_desc_style(font(style, style.axis_label_size))
        .label_style(font(style, style.tick_label_size))
        .draw()
        .map_err(drawing_error)?;

    let mut bottoms = vec![0.0f64; matrix.rows.len()];
    for (column, name) in matrix.columns.iter().enumerate() {
        let color = style.color(column);
        let segments: Vec<Rectangle<(SegmentValue<u32>, f64)>> = bottoms
            .iter_mut()
            .enumerate()
            .map(|(row, bottom)| {
                let base = *bottom;
                *bottom += matrix.get(row, column) as f64;
                let mut segment = Rectangle::new(
                    [
                        (SegmentValue::Exact(row as u32), base),
                        (SegmentValue::Exact(row as u32 + 1), *bottom),
                    ],
                    color.filled(),
                );
                segment.set_margin(0, 0, 6, 6);
                segment
            })
            .collect();

        chart
            .draw_series(segments)
            .map_err(drawing_error)?
            .label(name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .label_font(font(style, style.tick_label_size))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()
        .map_err(drawing_error)?;

    Ok(())
}
