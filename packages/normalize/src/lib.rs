#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Record normalizer for the housing gap pipeline.
//!
//! Turns the raw affordable housing production table into typed
//! [`HousingProject`](housing_gap_housing_models::HousingProject) values
//! and the raw income-by-zone survey into
//! [`ZoneIncomeProfile`](housing_gap_income_models::ZoneIncomeProfile)s.
//!
//! Raw tables are read with [`raw`], imputed with [`imputation`], and
//! parsed with the helpers in [`parsing`].

pub mod housing;
pub mod imputation;
pub mod income;
pub mod parsing;
pub mod progress;
pub mod raw;

use std::collections::BTreeMap;

/// One raw table row keyed by its column header.
pub type RawRecord = BTreeMap<String, String>;

/// Errors that can occur while reading or normalizing raw records.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    /// A required column is absent.
    #[error("Schema error: {record} is missing column '{column}'")]
    Schema {
        /// Identifies the offending row.
        record: String,
        /// The missing column.
        column: String,
    },

    /// A value could not be parsed into its typed field.
    #[error("Invalid value in {record}: column '{column}' has '{value}'")]
    InvalidValue {
        /// Identifies the offending row.
        record: String,
        /// The column holding the value.
        column: String,
        /// The raw value.
        value: String,
    },

    /// A postcode had to be imputed but the borough is not recognized.
    #[error("Unknown borough in {record}: '{value}'")]
    UnknownBorough {
        /// Identifies the offending row.
        record: String,
        /// The raw borough value.
        value: String,
    },

    /// The raw table is structurally unusable.
    #[error("Table error: {message}")]
    Table {
        /// Description of the problem.
        message: String,
    },

    /// CSV parse error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
