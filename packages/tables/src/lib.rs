#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! On-disk tables exchanged between pipeline stages.
//!
//! - [`housing`]: the cleaned housing production table.
//! - [`income`]: the cleaned and expanded income-by-zone tables.
//! - [`reports`]: per-year regression reports and the combined
//!   predictions file.
//! - [`paths`]: where each table lives.

pub mod housing;
pub mod income;
pub mod paths;
pub mod reports;

use thiserror::Error;

/// Errors that can occur while reading or writing tables.
#[derive(Debug, Error)]
pub enum TableError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A row failed normalization on read.
    #[error(transparent)]
    Normalize(#[from] housing_gap_normalize::NormalizeError),

    /// A row holds values that do not fit the table's types.
    #[error("Invalid row: {message}")]
    InvalidRow {
        /// Description of what went wrong.
        message: String,
    },
}
