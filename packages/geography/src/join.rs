//! Joins income profiles, household estimates, and housing sums into
//! [`ExpandedZone`]s.

use housing_gap_income_models::{
    BracketAllocation, ExpandedZone, HouseholdEstimate, ZoneIncomeProfile, ratio,
};

use crate::{GeoError, HousingIndex, ZoneBoroughTable};

/// Expands one zone. Returns `None` for zones with a zero median income.
#[must_use]
pub fn join_zone(
    profile: &ZoneIncomeProfile,
    estimate: &HouseholdEstimate,
    index: &HousingIndex,
    boroughs: &ZoneBoroughTable,
) -> Option<ExpandedZone> {
    if profile.median_income == 0 {
        log::debug!("Dropping zone {}: median income is 0", profile.zone);
        return None;
    }

    let totals = index.totals(profile.zone);
    Some(ExpandedZone {
        profile: profile.clone(),
        total_affordable_housing: totals.counted_units,
        housing_ratio: ratio(totals.counted_units, profile.total_households).unwrap_or(0.0),
        allocation: BracketAllocation::new(estimate, totals.units),
        borough: boroughs.resolve(profile.zone),
    })
}

/// Expands every zone, pairing `profiles[i]` with `estimates[i]`.
///
/// # Errors
///
/// Returns [`GeoError::Conversion`] if the two slices differ in length.
pub fn join_zones(
    profiles: &[ZoneIncomeProfile],
    estimates: &[HouseholdEstimate],
    index: &HousingIndex,
    boroughs: &ZoneBoroughTable,
) -> Result<Vec<ExpandedZone>, GeoError> {
    if profiles.len() != estimates.len() {
        return Err(GeoError::Conversion {
            message: format!(
                "{} profiles but {} household estimates",
                profiles.len(),
                estimates.len()
            ),
        });
    }

    let zones: Vec<ExpandedZone> = profiles
        .iter()
        .zip(estimates)
        .filter_map(|(profile, estimate)| join_zone(profile, estimate, index, boroughs))
        .collect();

    log::info!(
        "Joined {} zones for {} ({} dropped)",
        zones.len(),
        index.year(),
        profiles.len() - zones.len()
    );
    Ok(zones)
}
