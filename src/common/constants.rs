//! Column names, file names and numeric defaults shared across the pipeline
//!
//! Column names match the headers of the NYC street tree census export, so a
//! freshly downloaded CSV can be projected without renaming.

/// Zip code of the tree's location
pub const ZIPCODE: &str = "zipcode";

/// City (borough or neighbourhood) derived from the zip code
pub const CITY: &str = "zip_city";

/// Trunk diameter at breast height, in inches
pub const DBH: &str = "tree_dbh";

/// Tree status (Alive, Dead, Stump)
pub const STATUS: &str = "status";

/// Default number of histogram bins
pub const DEFAULT_BINS: usize = 30;

/// Decimal places used when exporting or printing aggregate values
pub const EXPORT_PRECISION: usize = 2;

/// Number of rows shown when previewing a table
pub const PREVIEW_ROWS: usize = 5;

/// Output file for the per-city summary
pub const CITY_SUMMARY_FILE: &str = "nyc_tree_summary_by_city.csv";

/// Output file for the per-zipcode summary
pub const ZIPCODE_SUMMARY_FILE: &str = "nyc_tree_summary_by_zipcode.csv";

/// Output file for the per-status summary
pub const STATUS_SUMMARY_FILE: &str = "nyc_tree_summary_by_status.csv";
