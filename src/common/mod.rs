//! Common infrastructure modules shared across analysis phases
//!
//! This module provides reusable infrastructure for:
//! - Column names, output file names and numeric defaults
//! - ASCII table formatting for console reports

pub mod constants;
pub mod tables;

// Re-export commonly used items
pub use constants::{CITY, DBH, STATUS, ZIPCODE};
