//! Statistics over the working table
//!
//! This module contains the analysis logic for:
//! - Grouped aggregation with explicit sorting and truncation
//! - Descriptive statistics, value counts and cross tabulations
//! - The fixed city, zipcode and status summaries
//! - The exploration report printed before any chart is drawn

pub mod aggregate;
pub mod describe;
pub mod report;
pub mod summaries;

// Re-export analysis functions for convenience
pub use aggregate::{aggregate, AggOp, AggSpec, AggValue, AggregateError, AggregateTable};
pub use describe::{crosstab, describe, nunique, quantile, value_counts, Crosstab, Description};
pub use report::ExplorationReport;
pub use summaries::{format_summary, summarize, FilterReport, SummaryKind};
