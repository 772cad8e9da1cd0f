//! The full analysis run: load, project, explore, summarise, export and chart
//!
//! Stages run one after the other on a single thread. Console output goes to the
//! writer handed to [`run`]; files go under [`PipelineOptions::output_dir`].

use crate::analysis::{format_summary, summarize, AggregateTable, ExplorationReport, FilterReport, SummaryKind};
use crate::config::AnalysisParams;
use crate::error::PipelineError;
use crate::export::export;
use crate::render::charts::{filtered_charts, overview_charts, status_charts, zipcode_charts};
use crate::render::{ChartJob, PlotStyle, RenderError};
use crate::table::loader::load_csv;
use crate::table::projection::project_tree_columns;
use crate::table::Table;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

type Result<T> = core::result::Result<T, PipelineError>;

/// Sub-directory of the output directory receiving the charts
pub const CHARTS_DIR: &str = "charts";

/// Inputs of one run
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// CSV (or `.csv.zst`) census export
    pub input: PathBuf,
    /// Receives the summary CSVs and the `charts` directory
    pub output_dir: PathBuf,
    pub params: AnalysisParams,
    pub style: PlotStyle,
    pub render_charts: bool,
    pub show_progress: bool,
}

impl PipelineOptions {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            params: AnalysisParams::default(),
            style: PlotStyle::default(),
            render_charts: true,
            show_progress: false,
        }
    }
}

/// What a run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub exploration: ExplorationReport,
    pub summaries: Vec<(SummaryKind, AggregateTable)>,
    pub filter: FilterReport,
    /// Summary CSVs, in city, zip code, status order
    pub exported: Vec<PathBuf>,
    pub charts: Vec<PathBuf>,
}

impl RunSummary {
    pub fn summary(&self, kind: SummaryKind) -> Option<&AggregateTable> {
        self.summaries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, summary)| summary)
    }
}

/// Runs every stage and writes the console report to `out`.
///
/// # Errors
/// * [`PipelineError::Load`] - the input cannot be read or parsed
/// * [`PipelineError::EmptyInput`] - the input has a header but no rows
/// * [`PipelineError::Table`] - a required column is missing
/// * [`PipelineError::OutputDir`] / [`PipelineError::Export`] - outputs cannot be written
/// * [`PipelineError::Render`] - a chart fails to draw
///
/// Charts left without data (an all-missing column, say) are skipped with a
/// warning instead of failing the run.
pub fn run<W: Write>(options: &PipelineOptions, out: &mut W) -> Result<RunSummary> {
    options.params.validate()?;
    info!(input = %options.input.display(), "starting analysis");

    writeln!(out, "Extracting key columns...")?;
    let trees = load_trees(&options.input)?;

    let exploration = ExplorationReport::build(&trees)?;
    writeln!(out, "{}", exploration)?;

    create_dir(&options.output_dir)?;

    let by_city = summarize(&trees, SummaryKind::City)?;
    let by_zipcode = summarize(&trees, SummaryKind::Zipcode)?;
    let by_status = summarize(&trees, SummaryKind::Status)?;

    let mut exported = Vec::with_capacity(SummaryKind::ALL.len());
    for (kind, summary) in [
        (SummaryKind::City, &by_city),
        (SummaryKind::Zipcode, &by_zipcode),
        (SummaryKind::Status, &by_status),
    ] {
        let shown = match kind {
            SummaryKind::Status => summary.len(),
            _ => options.params.top_n,
        };
        writeln!(out, "{}", format_summary(summary, kind, shown))?;

        let path = options.output_dir.join(kind.file_name());
        export(summary, &path)?;
        writeln!(out, "\nSummary saved to '{}'\n", path.display())?;
        exported.push(path);
    }

    let filter = options.params.tree_filter();
    let filter_report = FilterReport::build(&trees, &filter, options.params.top_categories)?;
    writeln!(out, "{}", filter_report)?;

    let charts = if options.render_charts {
        let filtered = filter.apply(&trees)?;
        let mut jobs = overview_charts(&trees, &by_city, &options.params)?;
        jobs.extend(zipcode_charts(&trees, &by_zipcode, &options.params)?);
        jobs.extend(status_charts(&trees, &by_status, &options.params)?);

        if filtered.is_empty() {
            warn!(filter = %filter, "0 trees match, skipping filtered charts");
        } else {
            jobs.extend(filtered_charts(&filtered, &options.params)?);
        }

        render_jobs(&jobs, options)?
    } else {
        Vec::new()
    };

    info!(
        trees = trees.len(),
        exported = exported.len(),
        charts = charts.len(),
        "analysis complete"
    );

    Ok(RunSummary {
        exploration,
        summaries: vec![
            (SummaryKind::City, by_city),
            (SummaryKind::Zipcode, by_zipcode),
            (SummaryKind::Status, by_status),
        ],
        filter: filter_report,
        exported,
        charts,
    })
}

/// Loads the input and projects it to the working columns.
///
/// A file with a header but no rows is [`PipelineError::EmptyInput`].
pub fn load_trees(input: &Path) -> Result<Table> {
    let raw = load_csv(input)?;
    if raw.is_empty() {
        return Err(PipelineError::EmptyInput(input.to_path_buf()));
    }

    Ok(project_tree_columns(&raw)?)
}

fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| PipelineError::OutputDir {
        path: path.to_path_buf(),
        source,
    })
}

fn render_jobs(jobs: &[ChartJob], options: &PipelineOptions) -> Result<Vec<PathBuf>> {
    let charts_dir = options.output_dir.join(CHARTS_DIR);
    create_dir(&charts_dir)?;

    let bar = if options.show_progress {
        create_progress_bar(jobs.len())
    } else {
        ProgressBar::hidden()
    };

    let mut written = Vec::with_capacity(jobs.len());
    for job in jobs {
        bar.set_message(job.file_name.clone());
        match job.render(&options.style, &charts_dir) {
            Ok(path) => written.push(path),
            Err(RenderError::InvalidData(reason)) => {
                warn!(chart = %job.file_name, %reason, "nothing to draw, skipping chart");
            }
            Err(e) => return Err(e.into()),
        }
        bar.inc(1);
    }

    bar.finish_with_message("charts rendered");
    info!(count = written.len(), dir = %charts_dir.display(), "rendered charts");
    Ok(written)
}

fn create_progress_bar(total: usize) -> ProgressBar {
    let bar = ProgressBar::new(total as u64);
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░ ");
    bar.set_style(style);
    bar
}
