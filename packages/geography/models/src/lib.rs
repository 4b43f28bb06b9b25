#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Zone and borough types for the metro area.
//!
//! A zone is a postal (ZIP / ZCTA) code. One reserved code,
//! [`ZoneCode::METRO_AGGREGATE`], stands for the whole metro area and is
//! matched against every housing record during joins.

pub mod boroughs;

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use boroughs::Borough;

/// A five-digit postal zone code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "u32")]
pub struct ZoneCode(u32);

impl ZoneCode {
    /// Reserved code for the aggregate "whole metro area" zone.
    pub const METRO_AGGREGATE: Self = Self(10000);

    /// Largest value a five-digit code can hold.
    const MAX: u32 = 99_999;

    /// Creates a zone code from its numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is zero or wider than five digits.
    pub const fn new(value: u32) -> Result<Self, InvalidZoneCodeError> {
        if value == 0 || value > Self::MAX {
            return Err(InvalidZoneCodeError {
                value: String::new(),
            });
        }
        Ok(Self(value))
    }

    /// Returns the numeric value of this code.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Whether this is the reserved metro aggregate code.
    #[must_use]
    pub const fn is_metro_aggregate(self) -> bool {
        self.0 == Self::METRO_AGGREGATE.0
    }
}

impl std::fmt::Display for ZoneCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:05}", self.0)
    }
}

impl FromStr for ZoneCode {
    type Err = InvalidZoneCodeError;

    /// Parses `"10001"` as well as float-formatted codes such as
    /// `"10001.0"` that spreadsheet exports tend to produce.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || InvalidZoneCodeError {
            value: trimmed.to_string(),
        };

        let value = match trimmed.parse::<u32>() {
            Ok(v) => v,
            Err(_) => trimmed
                .parse::<f64>()
                .ok()
                .and_then(whole_number)
                .ok_or_else(invalid)?,
        };

        Self::new(value).map_err(|_| invalid())
    }
}

/// Converts a float to `u32` when it holds a whole, in-range value.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_number(value: f64) -> Option<u32> {
    if value.fract() != 0.0 || value < 1.0 || value > f64::from(ZoneCode::MAX) {
        return None;
    }
    Some(value as u32)
}

impl TryFrom<String> for ZoneCode {
    type Error = InvalidZoneCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ZoneCode> for u32 {
    fn from(code: ZoneCode) -> Self {
        code.0
    }
}

/// Error returned when a string or number is not a valid [`ZoneCode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidZoneCodeError {
    /// The rejected input.
    pub value: String,
}

impl std::fmt::Display for InvalidZoneCodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid zone code '{}': expected 1-5 digits", self.value)
    }
}

impl std::error::Error for InvalidZoneCodeError {}

/// Borough label attached to a zone after the join.
///
/// Besides the five boroughs, the aggregate zone is labelled
/// `"New York"` and zones missing from the reference table `"Other"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ZoneBorough {
    /// One of the five boroughs.
    Borough(Borough),
    /// The whole metro area.
    Metro,
    /// Zone not present in the reference table.
    Other,
}

impl ZoneBorough {
    const METRO_LABEL: &'static str = "New York";
    const OTHER_LABEL: &'static str = "Other";
}

impl std::fmt::Display for ZoneBorough {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Borough(b) => write!(f, "{b}"),
            Self::Metro => f.write_str(Self::METRO_LABEL),
            Self::Other => f.write_str(Self::OTHER_LABEL),
        }
    }
}

impl FromStr for ZoneBorough {
    type Err = InvalidBoroughLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            Self::METRO_LABEL => Ok(Self::Metro),
            Self::OTHER_LABEL => Ok(Self::Other),
            other => other
                .parse()
                .map(Self::Borough)
                .map_err(|_| InvalidBoroughLabelError {
                    value: other.to_string(),
                }),
        }
    }
}

/// Error returned when a string is not a [`ZoneBorough`] label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidBoroughLabelError {
    /// The rejected input.
    pub value: String,
}

impl std::fmt::Display for InvalidBoroughLabelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown borough label '{}': expected a borough, '{}' or '{}'",
            self.value,
            ZoneBorough::METRO_LABEL,
            ZoneBorough::OTHER_LABEL
        )
    }
}

impl std::error::Error for InvalidBoroughLabelError {}

impl Serialize for ZoneBorough {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ZoneBorough {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
