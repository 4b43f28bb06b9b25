#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ratio and regression engine.
//!
//! Fits the housing-to-households ratio of each zone as a polynomial in
//! its median income:
//!
//! 1. Split zones into training and held-out sets ([`split`]).
//! 2. Pick a degree by incremental least-squares improvement
//!    ([`selection`]).
//! 3. Refit that degree with a cross-validated Lasso ([`lasso`]).
//! 4. Score the held-out set and build the prediction curve and per-zone
//!    predictions ([`report`]).

pub mod lasso;
pub mod metrics;
pub mod polynomial;
pub mod report;
pub mod selection;
pub mod split;

use thiserror::Error;

pub use report::{display_size, fit_report};

/// Errors that can occur while fitting the ratio model.
#[derive(Debug, Error)]
pub enum RegressionError {
    /// Too few zones to split, select, or cross-validate.
    #[error("Insufficient data: {message}")]
    InsufficientData {
        /// What was short.
        message: String,
    },

    /// A least-squares or Lasso fit failed.
    #[error("Model fit error: {message}")]
    ModelFit {
        /// Description of what went wrong.
        message: String,
    },
}
