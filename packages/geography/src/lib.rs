#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Zone joiner.
//!
//! Cross-references affordable housing supply and borough identity onto
//! each zone's income profile. Both reference tables ([`HousingIndex`]
//! and [`ZoneBoroughTable`]) are built once per snapshot year and passed
//! read-only into [`join_zones`].

pub mod boroughs;
pub mod index;
pub mod join;

use thiserror::Error;

pub use boroughs::ZoneBoroughTable;
pub use index::{HousingIndex, HousingTotals};
pub use join::{join_zone, join_zones};

/// Errors that can occur while joining zones.
#[derive(Debug, Error)]
pub enum GeoError {
    /// I/O error reading a reference table.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A reference table is missing a required column.
    #[error("Schema error: missing column '{column}'")]
    Schema {
        /// The missing column.
        column: String,
    },

    /// Inputs to the join do not line up.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}
