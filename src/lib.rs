//! # Tree Census Stats
//!
//! Loads a street tree census export, computes grouped statistics per city, zip
//! code and health status, renders a fixed set of charts and writes the
//! summaries to CSV.
//!
//! ```no_run
//! use tree_census_stats::pipeline::{run, PipelineOptions};
//!
//! let options = PipelineOptions::new("2015_Street_Tree_Census.csv", "out");
//! let summary = run(&options, &mut std::io::stdout()).unwrap();
//! println!("wrote {} summaries", summary.exported.len());
//! ```

pub mod analysis;
pub mod common;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod pipeline;
pub mod render;
pub mod table;

pub use config::AnalysisParams;
pub use error::PipelineError;
pub use pipeline::{run, PipelineOptions, RunSummary};
