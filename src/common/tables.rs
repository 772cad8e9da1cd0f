//! ASCII table formatting for console reports
//!
//! This module provides shared functionality for printing analysis results:
//! - [`CountEntry`] type for representing a categorical value with its count and share
//! - ASCII table formatting using the [`tabled`] crate

use tabled::builder::Builder;
use tabled::{Table, Tabled};

/// Represents a single categorical value with its count and percentage
#[derive(Debug, Clone, Tabled)]
pub struct CountEntry {
    /// The categorical value (e.g. "Alive", "Brooklyn", "11375")
    #[tabled(rename = "Value")]
    pub value: String,
    /// Number of records holding this value
    #[tabled(rename = "Count")]
    pub count: usize,
    /// Percentage of all counted records holding this value
    #[tabled(rename = "Percentage")]
    pub percentage: String,
}

impl CountEntry {
    /// Creates a new count entry with formatted percentage
    pub fn new(value: String, count: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            "0.00%".to_string()
        } else {
            format!("{:.2}%", (count as f64 / total as f64) * 100.0)
        };

        Self {
            value,
            count,
            percentage,
        }
    }

    /// Builds entries from `(value, count)` pairs, using their sum as the total
    pub fn from_counts(counts: &[(String, usize)]) -> Vec<Self> {
        let total = counts.iter().map(|(_, count)| count).sum();
        counts
            .iter()
            .map(|(value, count)| Self::new(value.clone(), *count, total))
            .collect()
    }
}

/// Formats count entries as an ASCII table using the [`tabled`] crate
///
/// # Arguments
/// * `entries` - A slice of [`CountEntry`] to format
/// * `title` - Optional title for the table
///
/// # Returns
/// A formatted ASCII table as a [`String`]
pub fn format_count_table(entries: &[CountEntry], title: Option<&str>) -> String {
    if entries.is_empty() {
        return with_title("No data available", title);
    }

    with_title(&Table::new(entries).to_string(), title)
}

/// Formats a header row and string records as an ASCII table
pub fn format_records(header: Vec<String>, records: Vec<Vec<String>>, title: Option<&str>) -> String {
    let mut builder = Builder::default();
    builder.push_record(header);
    for record in records {
        builder.push_record(record);
    }

    with_title(&builder.build().to_string(), title)
}

/// Prefixes `body` with an underlined title
pub fn with_title(body: &str, title: Option<&str>) -> String {
    match title {
        Some(title) => format!("{}\n{}\n{}", title, "=".repeat(title.chars().count()), body),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_entry_new() {
        let entry = CountEntry::new("Alive".to_string(), 25, 100);
        assert_eq!(entry.value, "Alive");
        assert_eq!(entry.count, 25);
        assert_eq!(entry.percentage, "25.00%");

        // Test zero total
        let entry_zero = CountEntry::new("Dead".to_string(), 10, 0);
        assert_eq!(entry_zero.percentage, "0.00%");
    }

    #[test]
    fn test_from_counts_uses_sum_as_total() {
        let counts = vec![("Alive".to_string(), 3), ("Dead".to_string(), 1)];
        let entries = CountEntry::from_counts(&counts);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].percentage, "75.00%");
        assert_eq!(entries[1].percentage, "25.00%");
    }

    #[test]
    fn test_format_count_table() {
        let entries = vec![
            CountEntry::new("Alive".to_string(), 10, 100),
            CountEntry::new("Stump".to_string(), 20, 100),
        ];

        let table = format_count_table(&entries, Some("Status Distribution"));
        assert!(table.contains("Status Distribution"));
        assert!(table.contains("Value"));
        assert!(table.contains("Count"));
        assert!(table.contains("Percentage"));
        assert!(table.contains("Stump"));
        assert!(table.contains("10.00%"));

        // Test without title
        let table_no_title = format_count_table(&entries, None);
        assert!(!table_no_title.contains("Status Distribution"));
        assert!(table_no_title.contains("Value"));
    }

    #[test]
    fn test_format_records() {
        let table = format_records(
            vec!["zipcode".to_string(), "tree_count".to_string()],
            vec![vec!["10001".to_string(), "2".to_string()]],
            Some("Zip Codes"),
        );

        assert!(table.starts_with("Zip Codes\n========="));
        assert!(table.contains("tree_count"));
        assert!(table.contains("10001"));
    }
}
