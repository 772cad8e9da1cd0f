//! Analysis parameters
//!
//! Defaults reproduce the standard census walkthrough. A TOML file may override
//! any subset of them, and command line flags override the file.
//!
//! ```toml
//! min_dbh = 5.0
//! max_dbh = 40.0
//! status = "Dead"
//! city = "Bronx"
//! top_n = 20
//! ```

use crate::table::filter::TreeFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading parameters
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid parameter: {0}")]
    Invalid(String),
}

type Result<T> = core::result::Result<T, ConfigError>;

/// Tunable values of one analysis run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisParams {
    /// Smallest diameter (inches) kept by the filter, inclusive
    pub min_dbh: f64,
    /// Largest diameter (inches) kept by the filter, inclusive
    pub max_dbh: f64,
    pub status: String,
    pub city: String,
    /// Rows of each summary printed, and zip codes in the zip code bar charts
    pub top_n: usize,
    /// Categories in the top-cities and top-zip code breakdowns
    pub top_categories: usize,
    /// Outlier clip for the overview box plot
    pub clip_quantile: f64,
    /// Outlier clip for the per-zip code box plot and the violin plot
    pub detail_clip_quantile: f64,
    pub bins: usize,
    /// Histogram bins for the filtered subset
    pub filtered_bins: usize,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            min_dbh: 10.0,
            max_dbh: 50.0,
            status: "Alive".to_string(),
            city: "Brooklyn".to_string(),
            top_n: 15,
            top_categories: 10,
            clip_quantile: 0.95,
            detail_clip_quantile: 0.9,
            bins: 30,
            filtered_bins: 20,
        }
    }
}

impl AnalysisParams {
    /// Parses parameters from TOML; missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let params: AnalysisParams = toml::from_str(text)?;
        params.validate()?;
        Ok(params)
    }

    /// Loads parameters from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "loaded analysis parameters");
        Self::from_toml_str(&text)
    }

    /// Checks that the parameters describe a runnable analysis.
    pub fn validate(&self) -> Result<()> {
        if !self.min_dbh.is_finite() || !self.max_dbh.is_finite() {
            return Err(ConfigError::Invalid(
                "diameter bounds must be finite".to_string(),
            ));
        }
        if self.min_dbh > self.max_dbh {
            return Err(ConfigError::Invalid(format!(
                "min_dbh ({}) is greater than max_dbh ({})",
                self.min_dbh, self.max_dbh
            )));
        }

        for (name, quantile) in [
            ("clip_quantile", self.clip_quantile),
            ("detail_clip_quantile", self.detail_clip_quantile),
        ] {
            if !(quantile > 0.0 && quantile <= 1.0) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be in (0, 1], got {}",
                    name, quantile
                )));
            }
        }

        for (name, count) in [
            ("top_n", self.top_n),
            ("top_categories", self.top_categories),
            ("bins", self.bins),
            ("filtered_bins", self.filtered_bins),
        ] {
            if count == 0 {
                return Err(ConfigError::Invalid(format!("{} must be positive", name)));
            }
        }

        Ok(())
    }

    /// The filter selecting trees of the configured city, status and size.
    pub fn tree_filter(&self) -> TreeFilter {
        TreeFilter::new()
            .min_dbh(self.min_dbh)
            .max_dbh(self.max_dbh)
            .status(self.status.clone())
            .city(self.city.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(
            AnalysisParams::from_toml_str("").unwrap(),
            AnalysisParams::default()
        );
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let params = AnalysisParams::from_toml_str("city = \"Bronx\"\ntop_n = 5\n").unwrap();

        assert_eq!(params.city, "Bronx");
        assert_eq!(params.top_n, 5);
        assert_eq!(params.status, "Alive");
        assert_eq!(params.bins, 30);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            AnalysisParams::from_toml_str("colour = \"red\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[rstest]
    #[case("min_dbh = 60.0")]
    #[case("clip_quantile = 0.0")]
    #[case("detail_clip_quantile = 1.5")]
    #[case("bins = 0")]
    #[case("top_n = 0")]
    fn invalid_values_are_rejected(#[case] text: &str) {
        assert!(matches!(
            AnalysisParams::from_toml_str(text),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "status = \"Dead\"").unwrap();

        let params = AnalysisParams::load(file.path()).unwrap();
        assert_eq!(params.status, "Dead");
    }

    #[test]
    fn missing_file_is_reported() {
        assert!(matches!(
            AnalysisParams::load(Path::new("/nonexistent/params.toml")),
            Err(ConfigError::FileRead { .. })
        ));
    }

    #[test]
    fn filter_uses_every_parameter() {
        let filter = AnalysisParams::default().tree_filter();

        assert_eq!(filter.min_dbh, Some(10.0));
        assert_eq!(filter.max_dbh, Some(50.0));
        assert_eq!(filter.status.as_deref(), Some("Alive"));
        assert_eq!(filter.city.as_deref(), Some("Brooklyn"));
    }
}
