#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Affordable housing project records and income tier definitions.
//!
//! A [`HousingProject`] is one building/project from the affordable
//! housing production dataset after normalization. Unit counts are broken
//! down by [`IncomeTier`].

pub mod tier;

use chrono::{Datelike as _, NaiveDate};
use housing_gap_geography_models::{Borough, ZoneCode};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use tier::{IncomeTier, TierValues};

/// How a project delivers its affordable units.
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
pub enum ConstructionType {
    /// Newly built units.
    #[serde(rename = "New Construction")]
    #[strum(serialize = "New Construction")]
    NewConstruction,
    /// Existing units kept affordable.
    Preservation,
}

/// One normalized affordable housing project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HousingProject {
    /// Source project identifier.
    pub project_id: String,
    /// Project start date (defaulted when the source omits it).
    pub start_date: NaiveDate,
    /// Project completion date (defaulted when the source omits it).
    pub completion_date: NaiveDate,
    /// Borough the project is located in.
    pub borough: Borough,
    /// Postal zone, imputed from the borough when missing.
    pub postcode: ZoneCode,
    /// New construction vs. preservation.
    pub construction_type: ConstructionType,
    /// Unit counts per income tier.
    pub units: TierValues<u64>,
    /// All units counted toward affordable housing goals.
    pub counted_units: u64,
    /// All units in the project, affordable or not.
    pub total_units: u64,
}

impl HousingProject {
    /// Calendar year the project started.
    #[must_use]
    pub fn start_year(&self) -> i32 {
        self.start_date.year()
    }

    /// Calendar year the project completes.
    #[must_use]
    pub fn end_year(&self) -> i32 {
        self.completion_date.year()
    }

    /// Counted units as a fraction of total units, rounded to three
    /// decimals. `None` when the project reports no units at all.
    #[must_use]
    pub fn completion_percentage(&self) -> Option<f64> {
        if self.total_units == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.counted_units as f64 / self.total_units as f64;
        Some(round_thousandths(ratio))
    }

    /// Whether this project's units exist as of the snapshot `year`.
    ///
    /// Preservation projects work on existing units, so they are never
    /// excluded by the completion-year cutoff.
    #[must_use]
    pub fn counts_toward(&self, year: i32) -> bool {
        self.construction_type == ConstructionType::Preservation || self.end_year() <= year
    }
}

/// Rounds to three decimal places.
#[must_use]
pub fn round_thousandths(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(construction_type: ConstructionType, completion: NaiveDate) -> HousingProject {
        HousingProject {
            project_id: "44223".to_string(),
            start_date: NaiveDate::from_ymd_opt(2015, 3, 1).unwrap(),
            completion_date: completion,
            borough: Borough::Queens,
            postcode: ZoneCode::new(11432).unwrap(),
            construction_type,
            units: TierValues::default(),
            counted_units: 40,
            total_units: 120,
        }
    }

    #[test]
    fn derives_years_and_percentage() {
        let p = project(
            ConstructionType::NewConstruction,
            NaiveDate::from_ymd_opt(2018, 6, 30).unwrap(),
        );
        assert_eq!(p.start_year(), 2015);
        assert_eq!(p.end_year(), 2018);
        assert_eq!(p.completion_percentage(), Some(0.333));
    }

    #[test]
    fn zero_total_units_has_no_percentage() {
        let mut p = project(
            ConstructionType::NewConstruction,
            NaiveDate::from_ymd_opt(2018, 6, 30).unwrap(),
        );
        p.total_units = 0;
        assert_eq!(p.completion_percentage(), None);
    }

    #[test]
    fn cutoff_excludes_future_new_construction_only() {
        let late = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(!project(ConstructionType::NewConstruction, late).counts_toward(2020));
        assert!(project(ConstructionType::NewConstruction, late).counts_toward(2024));
        assert!(project(ConstructionType::Preservation, late).counts_toward(2011));
    }

    #[test]
    fn construction_type_names() {
        assert_eq!(
            "New Construction".parse::<ConstructionType>().unwrap(),
            ConstructionType::NewConstruction
        );
        assert_eq!(ConstructionType::Preservation.to_string(), "Preservation");
    }

    #[test]
    fn rounds_to_thousandths() {
        assert!((round_thousandths(0.123_456) - 0.123).abs() < f64::EPSILON);
        assert!((round_thousandths(2.0 / 3.0) - 0.667).abs() < f64::EPSILON);
    }
}
