//! Per-zone affordable housing sums for one snapshot year.

use std::collections::BTreeMap;

use housing_gap_geography_models::ZoneCode;
use housing_gap_housing_models::{HousingProject, TierValues};
use serde::{Deserialize, Serialize};

/// Summed affordable units for a zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HousingTotals {
    /// Sum of "All Counted Units".
    pub counted_units: u64,
    /// Sum of each tier's unit column.
    pub units: TierValues<u64>,
}

impl HousingTotals {
    fn add(&mut self, project: &HousingProject) {
        self.counted_units += project.counted_units;
        for (tier, units) in project.units.iter() {
            *self.units.get_mut(tier) += units;
        }
    }
}

/// Housing sums keyed by postal zone, restricted to projects that count
/// toward a snapshot year.
#[derive(Debug, Clone, Default)]
pub struct HousingIndex {
    year: i32,
    by_zone: BTreeMap<ZoneCode, HousingTotals>,
    metro: HousingTotals,
    project_count: usize,
}

impl HousingIndex {
    /// Builds the index from every project that counts toward `year`
    /// (completed by then, or preservation).
    #[must_use]
    pub fn build(projects: &[HousingProject], year: i32) -> Self {
        let mut index = Self {
            year,
            ..Self::default()
        };

        for project in projects.iter().filter(|p| p.counts_toward(year)) {
            index.by_zone.entry(project.postcode).or_default().add(project);
            index.metro.add(project);
            index.project_count += 1;
        }

        log::info!(
            "Indexed {} of {} housing projects across {} zones for {year}",
            index.project_count,
            projects.len(),
            index.by_zone.len()
        );
        index
    }

    /// Snapshot year the index was built for.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Number of projects included.
    #[must_use]
    pub const fn project_count(&self) -> usize {
        self.project_count
    }

    /// Housing sums for `zone`. The metro aggregate zone matches every
    /// indexed project; an unmatched zone has all-zero totals.
    #[must_use]
    pub fn totals(&self, zone: ZoneCode) -> HousingTotals {
        if zone.is_metro_aggregate() {
            return self.metro;
        }
        self.by_zone.get(&zone).copied().unwrap_or_default()
    }
}
