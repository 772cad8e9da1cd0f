//! Top level error of an analysis run

use crate::analysis::AggregateError;
use crate::config::ConfigError;
use crate::export::ExportError;
use crate::render::RenderError;
use crate::table::filter::FilterError;
use crate::table::loader::LoadError;
use crate::table::TableError;
use std::path::PathBuf;
use thiserror::Error;

/// Any failure of the load, analyse, render and export pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to load input: {0}")]
    Load(#[from] LoadError),

    #[error("Input file '{0}' contains no rows")]
    EmptyInput(PathBuf),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("Failed to aggregate: {0}")]
    Aggregate(#[from] AggregateError),

    #[error("Failed to render chart: {0}")]
    Render(#[from] RenderError),

    #[error("Failed to export summary: {0}")]
    Export(#[from] ExportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to create output directory '{path}': {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write console output: {0}")]
    Console(#[from] std::io::Error),
}
