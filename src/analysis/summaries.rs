//! The fixed per-city, per-zipcode and per-status summary tables

use super::aggregate::{aggregate, AggOp, AggSpec, AggregateError, AggregateTable};
use super::describe::value_counts;
use crate::common::constants::{CITY_SUMMARY_FILE, STATUS_SUMMARY_FILE, ZIPCODE_SUMMARY_FILE};
use crate::common::tables::{format_count_table, with_title, CountEntry};
use crate::common::{CITY, DBH, STATUS, ZIPCODE};
use crate::table::filter::{FilterError, TreeFilter};
use crate::table::Table;
use core::fmt;

/// Which summary to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    City,
    Zipcode,
    Status,
}

impl SummaryKind {
    pub const ALL: [SummaryKind; 3] = [SummaryKind::City, SummaryKind::Zipcode, SummaryKind::Status];

    pub fn group_key(self) -> &'static str {
        match self {
            SummaryKind::City => CITY,
            SummaryKind::Zipcode => ZIPCODE,
            SummaryKind::Status => STATUS,
        }
    }

    /// File name the summary is exported under
    pub fn file_name(self) -> &'static str {
        match self {
            SummaryKind::City => CITY_SUMMARY_FILE,
            SummaryKind::Zipcode => ZIPCODE_SUMMARY_FILE,
            SummaryKind::Status => STATUS_SUMMARY_FILE,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SummaryKind::City => "SUMMARY STATISTICS BY CITY",
            SummaryKind::Zipcode => "ZIP CODE ANALYSIS",
            SummaryKind::Status => "STATUS ANALYSIS",
        }
    }

    /// The aggregations making up this summary, in output column order
    pub fn specs(self) -> Vec<AggSpec> {
        let mut specs = vec![
            AggSpec::new(DBH, AggOp::Count, "tree_count"),
            AggSpec::new(DBH, AggOp::Mean, "avg_dbh"),
            AggSpec::new(DBH, AggOp::Std, "std_dbh"),
        ];

        match self {
            SummaryKind::City => {
                specs.push(AggSpec::new(DBH, AggOp::Min, "min_dbh"));
                specs.push(AggSpec::new(DBH, AggOp::Max, "max_dbh"));
                specs.push(AggSpec::new(STATUS, AggOp::Mode, "most_common_status"));
            }
            SummaryKind::Zipcode => {
                specs.push(AggSpec::new(STATUS, AggOp::Mode, "most_common_status"));
            }
            SummaryKind::Status => {
                specs.push(AggSpec::new(DBH, AggOp::Min, "min_dbh"));
                specs.push(AggSpec::new(DBH, AggOp::Max, "max_dbh"));
                specs.push(AggSpec::new(CITY, AggOp::NUnique, "cities_present"));
            }
        }

        specs
    }
}

/// Builds the `kind` summary of `table`, sorted by tree count descending.
pub fn summarize(table: &Table, kind: SummaryKind) -> Result<AggregateTable, AggregateError> {
    aggregate(table, kind.group_key(), &kind.specs(), None)
}

/// Console form of a summary: a banner and the first `top_n` rows.
pub fn format_summary(summary: &AggregateTable, kind: SummaryKind, top_n: usize) -> String {
    let banner = "=".repeat(80);
    format!(
        "{}\n{}\n{}\n{}",
        banner,
        kind.title(),
        banner,
        summary.head(top_n)
    )
}

/// Outcome of the parameterised filter: how many trees matched and where
#[derive(Debug, Clone, PartialEq)]
pub struct FilterReport {
    pub description: String,
    pub matched: usize,
    /// Most common zip codes among the matching trees
    pub by_zipcode: Vec<(String, usize)>,
}

impl FilterReport {
    /// Applies `filter` and counts the matching trees per zip code.
    pub fn build(table: &Table, filter: &TreeFilter, top_n: usize) -> Result<Self, FilterError> {
        let filtered = filter.apply(table)?;

        let mut by_zipcode = value_counts(&filtered, ZIPCODE)?;
        by_zipcode.truncate(top_n);

        Ok(Self {
            description: filter.to_string(),
            matched: filtered.len(),
            by_zipcode,
        })
    }
}

impl fmt::Display for FilterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.description)?;
        if self.matched == 0 {
            return writeln!(f, "0 trees match");
        }

        writeln!(f, "Total count: {}", self.matched)?;
        let table = format_count_table(&CountEntry::from_counts(&self.by_zipcode), None);
        writeln!(f, "\n{}", with_title(&table, Some("By zip code")))
    }
}
