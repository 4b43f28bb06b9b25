//! Borough utilities.
//!
//! Maps each of the five boroughs to the default postal zone used when a
//! housing record arrives without a postcode.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::ZoneCode;

/// One of the five boroughs of the metro area.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Borough {
    /// The Bronx
    Bronx,
    /// Brooklyn (Kings County)
    Brooklyn,
    /// Manhattan (New York County)
    Manhattan,
    /// Queens
    Queens,
    /// Staten Island (Richmond County)
    #[serde(rename = "Staten Island")]
    #[strum(serialize = "Staten Island")]
    StatenIsland,
}

impl Borough {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Bronx,
            Self::Brooklyn,
            Self::Manhattan,
            Self::Queens,
            Self::StatenIsland,
        ]
    }

    /// Default postal zone assigned to records in this borough that
    /// carry no postcode of their own.
    #[must_use]
    pub const fn default_zone(self) -> ZoneCode {
        match self {
            Self::Bronx => ZoneCode(10451),
            Self::Brooklyn => ZoneCode(11201),
            Self::Manhattan => ZoneCode(10001),
            Self::Queens => ZoneCode(11431),
            Self::StatenIsland => ZoneCode(10341),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borough_count() {
        assert_eq!(Borough::all().len(), 5);
    }

    #[test]
    fn names_roundtrip() {
        for borough in Borough::all() {
            let name = borough.to_string();
            assert_eq!(name.parse::<Borough>().unwrap(), *borough, "{name}");
        }
        assert_eq!(Borough::StatenIsland.to_string(), "Staten Island");
    }

    #[test]
    fn default_zones_are_distinct_and_not_aggregate() {
        let mut seen = std::collections::BTreeSet::new();
        for borough in Borough::all() {
            let zone = borough.default_zone();
            assert!(!zone.is_metro_aggregate());
            assert!(seen.insert(zone), "duplicate default zone {zone}");
        }
    }

    #[test]
    fn unknown_borough() {
        assert!("Hoboken".parse::<Borough>().is_err());
    }
}
