//! Zone to borough reference table.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use housing_gap_geography_models::{Borough, ZoneBorough, ZoneCode};
use serde::Deserialize;

use crate::GeoError;

#[derive(Debug, Deserialize)]
struct ZoneBoroughRow {
    #[serde(rename = "ZipCode", alias = "Zipcode")]
    zone: String,
    #[serde(rename = "Borough")]
    borough: String,
}

/// Read-only lookup from postal zone to borough.
#[derive(Debug, Clone, Default)]
pub struct ZoneBoroughTable {
    zones: BTreeMap<ZoneCode, Borough>,
}

impl ZoneBoroughTable {
    /// Builds a table from `(zone, borough)` pairs. Later pairs win.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = (ZoneCode, Borough)>) -> Self {
        Self {
            zones: entries.into_iter().collect(),
        }
    }

    /// Reads a `ZipCode`/`Zipcode`, `Borough` CSV. Rows whose zone or
    /// borough cannot be parsed are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] if the CSV is malformed or lacks the zone or
    /// borough column.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, GeoError> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = reader.headers()?.clone();
        if !headers.iter().any(|h| h == "ZipCode" || h == "Zipcode") {
            return Err(GeoError::Schema {
                column: "ZipCode".to_string(),
            });
        }
        if !headers.iter().any(|h| h == "Borough") {
            return Err(GeoError::Schema {
                column: "Borough".to_string(),
            });
        }

        let mut zones = BTreeMap::new();
        for row in reader.deserialize::<ZoneBoroughRow>() {
            let row = row?;
            match (row.zone.parse::<ZoneCode>(), row.borough.parse::<Borough>()) {
                (Ok(zone), Ok(borough)) => {
                    zones.insert(zone, borough);
                }
                _ => log::warn!(
                    "Skipping borough reference row '{}', '{}'",
                    row.zone,
                    row.borough
                ),
            }
        }

        log::debug!("Loaded {} zone/borough pairs", zones.len());
        Ok(Self { zones })
    }

    /// Reads the reference table from a file.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] if the file cannot be opened or parsed.
    pub fn from_path(path: &Path) -> Result<Self, GeoError> {
        Self::from_reader(std::fs::File::open(path)?)
    }

    /// Number of zones in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Borough label for `zone`: [`ZoneBorough::Metro`] for the aggregate
    /// zone, [`ZoneBorough::Other`] when the zone is not in the table.
    #[must_use]
    pub fn resolve(&self, zone: ZoneCode) -> ZoneBorough {
        if zone.is_metro_aggregate() {
            return ZoneBorough::Metro;
        }
        self.zones.get(&zone).map_or_else(
            || {
                log::debug!("Zone {zone} not in borough table, labelling Other");
                ZoneBorough::Other
            },
            |&borough| ZoneBorough::Borough(borough),
        )
    }
}
