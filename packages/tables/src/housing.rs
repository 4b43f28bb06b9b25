//! The cleaned housing production table.
//!
//! Written from [`HousingProject`]s in the column layout of
//! [`housing_gap_normalize::housing::cleaned_header`]; read back through
//! the normalizer, which is a fixed point over its own output.

use std::io::{Read, Write};
use std::path::Path;

use housing_gap_housing_models::HousingProject;
use housing_gap_normalize::housing::{cleaned_fields, cleaned_header, normalize_housing_records};
use housing_gap_normalize::imputation::ImputationDefaults;
use housing_gap_normalize::progress::NullProgress;
use housing_gap_normalize::raw::read_records;

use crate::TableError;
use crate::paths::ensure_parent;

/// Writes projects as a cleaned housing CSV.
///
/// # Errors
///
/// Returns [`TableError`] if writing fails.
pub fn write_housing<W: Write>(writer: W, projects: &[HousingProject]) -> Result<(), TableError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(cleaned_header())?;
    for project in projects {
        writer.write_record(cleaned_fields(project))?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the cleaned housing table to `path`, creating its directory.
///
/// # Errors
///
/// Returns [`TableError`] if the file cannot be created or written.
pub fn write_housing_file(path: &Path, projects: &[HousingProject]) -> Result<(), TableError> {
    ensure_parent(path)?;
    write_housing(std::fs::File::create(path)?, projects)?;
    log::info!("Wrote {} housing projects to {}", projects.len(), path.display());
    Ok(())
}

/// Reads a cleaned housing CSV.
///
/// # Errors
///
/// Returns [`TableError`] if the CSV is malformed or a row fails
/// normalization.
pub fn read_housing<R: Read>(
    reader: R,
    defaults: &ImputationDefaults,
) -> Result<Vec<HousingProject>, TableError> {
    let records = read_records(reader)?;
    Ok(normalize_housing_records(&records, defaults, &NullProgress)?)
}

/// Reads the cleaned housing table from `path`.
///
/// # Errors
///
/// Returns [`TableError`] if the file cannot be read or parsed.
pub fn read_housing_file(
    path: &Path,
    defaults: &ImputationDefaults,
) -> Result<Vec<HousingProject>, TableError> {
    read_housing(std::fs::File::open(path)?, defaults)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use housing_gap_geography_models::{Borough, ZoneCode};
    use housing_gap_housing_models::{ConstructionType, TierValues};

    use super::*;

    #[test]
    fn cleaned_table_round_trips() {
        let projects = vec![
            HousingProject {
                project_id: "44223".to_string(),
                start_date: NaiveDate::from_ymd_opt(2014, 12, 29).unwrap(),
                completion_date: NaiveDate::from_ymd_opt(2016, 3, 1).unwrap(),
                borough: Borough::StatenIsland,
                postcode: ZoneCode::new(10301).unwrap(),
                construction_type: ConstructionType::Preservation,
                units: TierValues {
                    extremely_low: 1,
                    very_low: 2,
                    low: 3,
                    moderate: 4,
                    middle: 5,
                },
                counted_units: 15,
                total_units: 0,
            },
        ];

        let mut buffer = Vec::new();
        write_housing(&mut buffer, &projects).unwrap();
        let read = read_housing(buffer.as_slice(), &ImputationDefaults::default()).unwrap();
        assert_eq!(read, projects);
    }
}
