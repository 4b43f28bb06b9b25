//! Normalizes raw affordable housing rows into [`HousingProject`] values.
//!
//! Missing dates and postcodes are filled through the imputation table in
//! [`crate::imputation`], then every column is parsed into its typed
//! field. [`cleaned_fields`] renders a project back into the cleaned
//! housing table layout, which this module also accepts as input.

use housing_gap_geography_models::{Borough, ZoneCode};
use housing_gap_housing_models::{ConstructionType, HousingProject, IncomeTier, TierValues};

use crate::imputation::{HOUSING_IMPUTATIONS, ImputationDefaults, impute_record, record_label};
use crate::parsing::{parse_count, parse_date};
use crate::progress::ProgressCallback;
use crate::{NormalizeError, RawRecord};

/// Column names of the housing production table.
pub mod columns {
    /// Project identifier.
    pub const PROJECT_ID: &str = "Project ID";
    /// Project start date.
    pub const START_DATE: &str = "Project Start Date";
    /// Project completion date.
    pub const COMPLETION_DATE: &str = "Project Completion Date";
    /// Borough name.
    pub const BOROUGH: &str = "Borough";
    /// Postal zone.
    pub const POSTCODE: &str = "Postcode";
    /// New construction vs. preservation.
    pub const CONSTRUCTION_TYPE: &str = "Reporting Construction Type";
    /// Units counted toward affordability goals.
    pub const COUNTED_UNITS: &str = "All Counted Units";
    /// All units in the project.
    pub const TOTAL_UNITS: &str = "Total Units";
    /// Derived start year.
    pub const START_YEAR: &str = "Project Start Year";
    /// Derived completion year.
    pub const END_YEAR: &str = "Project End Year";
    /// Derived counted/total ratio.
    pub const PERCENT: &str = "Percent";
}

/// Normalizes one raw housing row.
///
/// # Errors
///
/// Returns [`NormalizeError`] if a required column is missing, a value
/// cannot be parsed, or a postcode must be imputed from an unknown
/// borough.
pub fn normalize_housing_record(
    record: &RawRecord,
    defaults: &ImputationDefaults,
) -> Result<HousingProject, NormalizeError> {
    let mut record = record.clone();
    let replaced = impute_record(&mut record, HOUSING_IMPUTATIONS, defaults)?;
    if replaced > 0 {
        log::trace!("{}: imputed {replaced} field(s)", record_label(&record));
    }

    let project_id = required(&record, columns::PROJECT_ID)?.to_string();

    let borough = parse_field::<Borough>(&record, columns::BOROUGH)?;
    let postcode = parse_field::<ZoneCode>(&record, columns::POSTCODE)?;
    let construction_type = parse_field::<ConstructionType>(&record, columns::CONSTRUCTION_TYPE)?;

    let start_date = date_field(&record, columns::START_DATE)?;
    let completion_date = date_field(&record, columns::COMPLETION_DATE)?;

    let mut units = TierValues::default();
    for &tier in IncomeTier::all() {
        *units.get_mut(tier) = count_field(&record, tier.units_column())?;
    }

    Ok(HousingProject {
        project_id,
        start_date,
        completion_date,
        borough,
        postcode,
        construction_type,
        units,
        counted_units: count_field(&record, columns::COUNTED_UNITS)?,
        total_units: count_field(&record, columns::TOTAL_UNITS)?,
    })
}

/// Normalizes every raw housing row, failing on the first bad row.
///
/// # Errors
///
/// Returns the first [`NormalizeError`] encountered.
pub fn normalize_housing_records(
    records: &[RawRecord],
    defaults: &ImputationDefaults,
    progress: &dyn ProgressCallback,
) -> Result<Vec<HousingProject>, NormalizeError> {
    progress.set_total(records.len() as u64);

    let mut projects = Vec::with_capacity(records.len());
    for record in records {
        projects.push(normalize_housing_record(record, defaults)?);
        progress.inc(1);
    }

    progress.finish(format!("{} projects normalized", projects.len()));
    log::info!("Normalized {} housing projects", projects.len());
    Ok(projects)
}

/// Header of the cleaned housing table, in column order.
#[must_use]
pub fn cleaned_header() -> Vec<&'static str> {
    let mut header = vec![
        columns::PROJECT_ID,
        columns::START_DATE,
        columns::COMPLETION_DATE,
        columns::BOROUGH,
        columns::POSTCODE,
        columns::CONSTRUCTION_TYPE,
    ];
    header.extend(IncomeTier::all().iter().map(|t| t.units_column()));
    header.extend([
        columns::COUNTED_UNITS,
        columns::TOTAL_UNITS,
        columns::START_YEAR,
        columns::END_YEAR,
        columns::PERCENT,
    ]);
    header
}

/// Renders a project as a cleaned housing table row, matching
/// [`cleaned_header`].
#[must_use]
pub fn cleaned_fields(project: &HousingProject) -> Vec<String> {
    let mut fields = vec![
        project.project_id.clone(),
        project.start_date.format("%Y-%m-%d").to_string(),
        project.completion_date.format("%Y-%m-%d").to_string(),
        project.borough.to_string(),
        project.postcode.value().to_string(),
        project.construction_type.to_string(),
    ];
    fields.extend(project.units.iter().map(|(_, units)| units.to_string()));
    fields.extend([
        project.counted_units.to_string(),
        project.total_units.to_string(),
        project.start_year().to_string(),
        project.end_year().to_string(),
        project
            .completion_percentage()
            .map_or_else(String::new, |p| p.to_string()),
    ]);
    fields
}

fn required<'a>(record: &'a RawRecord, column: &str) -> Result<&'a str, NormalizeError> {
    record
        .get(column)
        .map(|v| v.trim())
        .ok_or_else(|| NormalizeError::Schema {
            record: record_label(record),
            column: column.to_string(),
        })
}

fn invalid(record: &RawRecord, column: &str, value: &str) -> NormalizeError {
    NormalizeError::InvalidValue {
        record: record_label(record),
        column: column.to_string(),
        value: value.to_string(),
    }
}

fn parse_field<T: std::str::FromStr>(
    record: &RawRecord,
    column: &str,
) -> Result<T, NormalizeError> {
    let raw = required(record, column)?;
    raw.parse::<T>().map_err(|_| invalid(record, column, raw))
}

fn date_field(record: &RawRecord, column: &str) -> Result<chrono::NaiveDate, NormalizeError> {
    let raw = required(record, column)?;
    parse_date(raw).ok_or_else(|| invalid(record, column, raw))
}

fn count_field(record: &RawRecord, column: &str) -> Result<u64, NormalizeError> {
    let raw = required(record, column)?;
    parse_count(raw).ok_or_else(|| invalid(record, column, raw))
}
