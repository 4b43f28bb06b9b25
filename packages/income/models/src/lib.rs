#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Zone household income profiles and their derived tier allocations.
//!
//! A [`ZoneIncomeProfile`] is produced by the normalizer from one column
//! of the income survey. The allocator attaches a [`HouseholdEstimate`],
//! and the zone joiner combines it with housing sums into an
//! [`ExpandedZone`].

pub mod bracket;

use housing_gap_geography_models::{ZoneBorough, ZoneCode};
use housing_gap_housing_models::{TierValues, round_thousandths};
use serde::{Deserialize, Serialize};

pub use bracket::{BracketFractions, IncomeBracket};

/// One zone's household income distribution for a snapshot year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneIncomeProfile {
    /// Postal zone (or the metro aggregate code).
    pub zone: ZoneCode,
    /// Total households in the zone. Always positive.
    pub total_households: u64,
    /// Median household income in dollars.
    pub median_income: u64,
    /// Mean household income in dollars.
    pub mean_income: u64,
    /// Fraction of households in each income bracket.
    pub brackets: BracketFractions,
}

/// Household counts per tier as estimated from the income brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdEstimate {
    /// Cumulative households at or below each tier's income ceiling.
    pub raw_cumulative: TierValues<u64>,
    /// Disjoint per-tier counts after the overcount correction.
    pub households: TierValues<u64>,
    /// Set when a correction step went negative and was clamped to zero.
    pub clamped: bool,
}

/// Per-tier households, housing units, and their ratio for one zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketAllocation {
    /// Disjoint household estimate per tier.
    pub households: TierValues<u64>,
    /// Affordable units designated for each tier.
    pub housing: TierValues<u64>,
    /// `housing / households` per tier, rounded to three decimals.
    /// `None` when the tier has no households.
    pub ratios: TierValues<Option<f64>>,
    /// Carried over from [`HouseholdEstimate::clamped`].
    pub clamped: bool,
}

impl BracketAllocation {
    /// Combines a household estimate with per-tier housing sums.
    #[must_use]
    pub fn new(estimate: &HouseholdEstimate, housing: TierValues<u64>) -> Self {
        let ratios = TierValues::from_fn(|tier| {
            ratio(*housing.get(tier), *estimate.households.get(tier))
        });
        Self {
            households: estimate.households,
            housing,
            ratios,
            clamped: estimate.clamped,
        }
    }
}

/// A zone profile expanded with housing supply and tier allocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedZone {
    /// The normalized income profile.
    pub profile: ZoneIncomeProfile,
    /// All counted affordable units matched to this zone.
    pub total_affordable_housing: u64,
    /// `total_affordable_housing / total_households`, three decimals.
    pub housing_ratio: f64,
    /// Per-tier households, housing and ratios.
    pub allocation: BracketAllocation,
    /// Borough label for the zone.
    pub borough: ZoneBorough,
}

/// `numerator / denominator` rounded to three decimals, or `None` when the
/// denominator is zero.
#[must_use]
pub fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    if denominator == 0 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let value = numerator as f64 / denominator as f64;
    Some(round_thousandths(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_handles_zero_denominator() {
        assert_eq!(ratio(5, 0), None);
        assert_eq!(ratio(0, 0), None);
        assert_eq!(ratio(0, 10), Some(0.0));
        assert_eq!(ratio(1, 3), Some(0.333));
    }

    #[test]
    fn allocation_ratios_follow_tiers() {
        let estimate = HouseholdEstimate {
            raw_cumulative: TierValues {
                extremely_low: 100,
                very_low: 150,
                low: 250,
                moderate: 250,
                middle: 400,
            },
            households: TierValues {
                extremely_low: 100,
                very_low: 50,
                low: 100,
                moderate: 0,
                middle: 150,
            },
            clamped: false,
        };
        let housing = TierValues {
            extremely_low: 10,
            very_low: 25,
            low: 0,
            moderate: 12,
            middle: 30,
        };
        let allocation = BracketAllocation::new(&estimate, housing);
        assert_eq!(allocation.ratios.extremely_low, Some(0.1));
        assert_eq!(allocation.ratios.very_low, Some(0.5));
        assert_eq!(allocation.ratios.low, Some(0.0));
        assert_eq!(allocation.ratios.moderate, None);
        assert_eq!(allocation.ratios.middle, Some(0.2));
        assert!(!allocation.clamped);
    }
}
