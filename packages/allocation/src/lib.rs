#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Bracket allocator.
//!
//! Estimates how many of a zone's households qualify for each
//! [`IncomeTier`] using only the zone's ten income bracket fractions.
//!
//! Each tier's income ceiling is `median_income * multiplier`. The
//! brackets are walked in ascending order: brackets entirely below the
//! ceiling contribute all of their households, and the bracket containing
//! the ceiling contributes a linearly interpolated share. This yields a
//! cumulative count per tier, which [`estimate_households`] then makes
//! disjoint by subtracting each lower tier's cumulative count.

use housing_gap_housing_models::{IncomeTier, TierValues};
use housing_gap_income_models::{HouseholdEstimate, IncomeBracket, ZoneIncomeProfile};

/// Position of a [`BracketWalk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Every bracket seen so far lies strictly below the ceiling.
    Scanning,
    /// This bracket contains the ceiling and has not been counted yet.
    Found(IncomeBracket),
    /// The walk is complete.
    Done,
}

/// Accumulates the households at or below an income ceiling, one bracket
/// at a time.
#[derive(Debug, Clone)]
pub struct BracketWalk<'a> {
    profile: &'a ZoneIncomeProfile,
    limit: f64,
    cumulative: u64,
    state: ScanState,
}

impl<'a> BracketWalk<'a> {
    /// Starts a walk over `profile` with the given income ceiling.
    #[must_use]
    pub const fn new(profile: &'a ZoneIncomeProfile, limit: f64) -> Self {
        Self {
            profile,
            limit,
            cumulative: 0,
            state: ScanState::Scanning,
        }
    }

    /// Current state of the walk.
    #[must_use]
    pub const fn state(&self) -> ScanState {
        self.state
    }

    /// Households accumulated so far.
    #[must_use]
    pub const fn cumulative(&self) -> u64 {
        self.cumulative
    }

    /// Feeds the next bracket (ascending order) to the walk.
    ///
    /// Brackets fed after the walk is [`ScanState::Done`] are ignored.
    pub fn step(&mut self, bracket: IncomeBracket) -> ScanState {
        self.state = match self.state {
            ScanState::Scanning => {
                if f64::from(bracket.upper_bound()) < self.limit && !bracket.is_open_ended() {
                    self.cumulative += self.full_bracket(bracket);
                    ScanState::Scanning
                } else {
                    ScanState::Found(bracket)
                }
            }
            found @ ScanState::Found(_) => found,
            ScanState::Done => ScanState::Done,
        };

        if let ScanState::Found(bracket) = self.state {
            self.cumulative += self.partial_bracket(bracket);
            self.state = ScanState::Done;
        }

        self.state
    }

    /// Runs the walk over every bracket and returns the cumulative count.
    #[must_use]
    pub fn run(mut self) -> u64 {
        for &bracket in IncomeBracket::all() {
            if self.step(bracket) == ScanState::Done {
                break;
            }
        }
        self.cumulative
    }

    fn households(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let total = self.profile.total_households as f64;
        total
    }

    fn full_bracket(&self, bracket: IncomeBracket) -> u64 {
        truncate(self.profile.brackets.get(bracket) * self.households())
    }

    /// Share of the bracket below the ceiling. Capped at the whole bracket
    /// when the ceiling exceeds the open-ended bracket's nominal bound.
    fn partial_bracket(&self, bracket: IncomeBracket) -> u64 {
        let share = (self.limit / f64::from(bracket.upper_bound())).min(1.0);
        let portion = self.households() * share;
        truncate(self.profile.brackets.get(bracket) * portion)
    }
}

/// Income ceiling of `tier` for a zone.
#[must_use]
pub fn tier_limit(profile: &ZoneIncomeProfile, tier: IncomeTier) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let median = profile.median_income as f64;
    median * tier.median_multiplier()
}

/// Households at or below `tier`'s income ceiling, overlapping with every
/// lower tier.
#[must_use]
pub fn raw_cumulative(profile: &ZoneIncomeProfile, tier: IncomeTier) -> u64 {
    BracketWalk::new(profile, tier_limit(profile, tier)).run()
}

/// Estimates disjoint per-tier household counts for a zone.
///
/// See [`correct_overlap`] for the correction applied to the raw
/// cumulative counts.
#[must_use]
pub fn estimate_households(profile: &ZoneIncomeProfile) -> HouseholdEstimate {
    let raw = TierValues::from_fn(|tier| raw_cumulative(profile, tier));
    let (households, clamped) = correct_overlap(&raw);
    if clamped {
        log::warn!(
            "Zone {}: a tier cumulative count fell below the next lower tier, clamped to 0",
            profile.zone
        );
    }

    HouseholdEstimate {
        raw_cumulative: raw,
        households,
        clamped,
    }
}

/// Turns overlapping cumulative counts into disjoint per-tier counts.
///
/// Tiers are corrected from [`IncomeTier::Middle`] downward by subtracting
/// the next lower tier's raw cumulative count; Extremely-Low keeps its raw
/// value. A subtraction that would go negative is clamped to zero and the
/// returned flag is set.
///
/// Counts produced by [`raw_cumulative`] never decrease with the tier
/// multiplier, so the clamp only fires for counts from elsewhere.
#[must_use]
pub fn correct_overlap(raw: &TierValues<u64>) -> (TierValues<u64>, bool) {
    let mut households = *raw;
    let mut clamped = false;

    for &tier in IncomeTier::all().iter().rev() {
        let Some(lower) = tier.lower() else {
            continue;
        };
        let own = *raw.get(tier);
        let below = *raw.get(lower);
        if below > own {
            log::debug!("{tier} cumulative {own} is below {lower} cumulative {below}");
            clamped = true;
        }
        *households.get_mut(tier) = own.saturating_sub(below);
    }

    (households, clamped)
}

/// Estimates households for every profile, in input order.
#[must_use]
pub fn estimate_all(profiles: &[ZoneIncomeProfile]) -> Vec<HouseholdEstimate> {
    let estimates: Vec<HouseholdEstimate> = profiles.iter().map(estimate_households).collect();
    let clamped = estimates.iter().filter(|e| e.clamped).count();
    log::info!(
        "Allocated households for {} zones ({clamped} clamped)",
        estimates.len()
    );
    estimates
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn truncate(value: f64) -> u64 {
    value.max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use housing_gap_geography_models::ZoneCode;
    use housing_gap_income_models::BracketFractions;

    use super::*;

    fn profile(
        total: u64,
        median: u64,
        fractions: [f64; IncomeBracket::COUNT],
    ) -> ZoneIncomeProfile {
        ZoneIncomeProfile {
            zone: ZoneCode::new(10001).unwrap(),
            total_households: total,
            median_income: median,
            mean_income: median,
            brackets: BracketFractions::new(fractions),
        }
    }

    fn uniform(total: u64, median: u64) -> ZoneIncomeProfile {
        profile(total, median, [0.1; IncomeBracket::COUNT])
    }

    #[test]
    fn extremely_low_limit_lands_in_partial_bracket() {
        let zone = uniform(1000, 50_000);
        assert!((tier_limit(&zone, IncomeTier::ExtremelyLow) - 15_000.0).abs() < 1e-9);

        let mut walk = BracketWalk::new(&zone, 15_000.0);
        assert_eq!(walk.step(IncomeBracket::Under10k), ScanState::Scanning);
        assert_eq!(walk.cumulative(), 100);
        // upper bound 15000 is not strictly below the limit; portion = 1000
        assert_eq!(walk.step(IncomeBracket::From10kTo15k), ScanState::Done);
        assert_eq!(walk.cumulative(), 200);
        assert_eq!(walk.step(IncomeBracket::From15kTo25k), ScanState::Done);
        assert_eq!(walk.cumulative(), 200);

        assert_eq!(raw_cumulative(&zone, IncomeTier::ExtremelyLow), 200);
    }

    #[test]
    fn partial_contribution_truncates() {
        // limit 25000 (median 50000 * 0.5): brackets 10k, 15k full; 25k partial
        let zone = profile(
            999,
            50_000,
            [0.123, 0.057, 0.2, 0.1, 0.1, 0.1, 0.1, 0.1, 0.07, 0.05],
        );
        // trunc(0.123 * 999) + trunc(0.057 * 999) + trunc(0.2 * 999 * 1.0)
        assert_eq!(raw_cumulative(&zone, IncomeTier::VeryLow), 122 + 56 + 199);
    }

    #[test]
    fn limit_above_top_bound_counts_whole_top_bracket() {
        let zone = uniform(1000, 400_000);
        assert!(tier_limit(&zone, IncomeTier::Middle) > 500_000.0);
        assert_eq!(raw_cumulative(&zone, IncomeTier::Middle), 1000);
    }

    #[test]
    fn zero_median_counts_nothing() {
        let zone = uniform(1000, 0);
        for &tier in IncomeTier::all() {
            assert_eq!(raw_cumulative(&zone, tier), 0);
        }
    }

    #[test]
    fn raw_cumulative_is_monotonic_in_multiplier() {
        for median in [0, 12_500, 38_000, 67_046, 150_000, 310_000] {
            let zone = profile(
                4321,
                median,
                [0.08, 0.05, 0.11, 0.09, 0.12, 0.17, 0.12, 0.14, 0.07, 0.05],
            );
            let raw: Vec<u64> = IncomeTier::all()
                .iter()
                .map(|&t| raw_cumulative(&zone, t))
                .collect();
            assert!(raw.windows(2).all(|w| w[0] <= w[1]), "median {median}: {raw:?}");
        }
    }

    #[test]
    fn corrected_tiers_are_disjoint_and_bounded() {
        for median in [9_000, 45_000, 67_046, 120_000, 400_000] {
            let zone = profile(
                2500,
                median,
                [0.08, 0.05, 0.11, 0.09, 0.12, 0.17, 0.12, 0.14, 0.07, 0.05],
            );
            let estimate = estimate_households(&zone);
            let sum: u64 = estimate.households.iter().map(|(_, v)| *v).sum();
            assert!(sum <= estimate.raw_cumulative.middle, "median {median}");
            assert!(!estimate.clamped);
            assert_eq!(
                estimate.households.extremely_low,
                estimate.raw_cumulative.extremely_low
            );
        }
    }

    #[test]
    fn correction_subtracts_lower_raw_counts() {
        let zone = uniform(1000, 50_000);
        let estimate = estimate_households(&zone);
        let raw = estimate.raw_cumulative;
        assert_eq!(estimate.households.very_low, raw.very_low - raw.extremely_low);
        assert_eq!(estimate.households.low, raw.low - raw.very_low);
        assert_eq!(estimate.households.moderate, raw.moderate - raw.low);
        assert_eq!(estimate.households.middle, raw.middle - raw.moderate);
    }

    #[test]
    fn decreasing_cumulative_counts_are_clamped_and_flagged() {
        let raw = TierValues {
            extremely_low: 120,
            very_low: 100,
            low: 300,
            moderate: 250,
            middle: 400,
        };
        let (households, clamped) = correct_overlap(&raw);
        assert!(clamped);
        assert_eq!(households.extremely_low, 120);
        assert_eq!(households.very_low, 0);
        assert_eq!(households.low, 200);
        assert_eq!(households.moderate, 0);
        assert_eq!(households.middle, 150);
    }

    #[test]
    fn non_decreasing_counts_are_not_flagged() {
        let raw = TierValues {
            extremely_low: 10,
            very_low: 10,
            low: 25,
            moderate: 40,
            middle: 41,
        };
        let (households, clamped) = correct_overlap(&raw);
        assert!(!clamped);
        assert_eq!(households.very_low, 0);
        assert_eq!(households.middle, 1);
    }

    #[test]
    fn estimate_all_preserves_order() {
        let zones = vec![uniform(1000, 50_000), uniform(10, 0)];
        let estimates = estimate_all(&zones);
        assert_eq!(estimates.len(), 2);
        assert_eq!(estimates[0], estimate_households(&zones[0]));
        assert_eq!(estimates[1].raw_cumulative.middle, 0);
    }
}
