//! Cleaned and expanded income-by-zone tables.
//!
//! Column names follow the survey's own labels (`"Total Households"`,
//! `"$10,000 to $14,999"`, ...) so the files read naturally next to the
//! raw exports.

use std::io::{Read, Write};
use std::path::Path;

use housing_gap_geography_models::{ZoneBorough, ZoneCode};
use housing_gap_housing_models::TierValues;
use housing_gap_income_models::{
    BracketAllocation, BracketFractions, ExpandedZone, IncomeBracket, ZoneIncomeProfile,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::TableError;
use crate::paths::ensure_parent;

/// One row of the cleaned income table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedIncomeRow {
    #[serde(rename = "Zipcode")]
    zone: ZoneCode,
    #[serde(rename = "Total Households")]
    total_households: u64,
    #[serde(rename = "Less than $10,000")]
    under_10k: f64,
    #[serde(rename = "$10,000 to $14,999")]
    from_10k_to_15k: f64,
    #[serde(rename = "$15,000 to $24,999")]
    from_15k_to_25k: f64,
    #[serde(rename = "$25,000 to $34,999")]
    from_25k_to_35k: f64,
    #[serde(rename = "$35,000 to $49,999")]
    from_35k_to_50k: f64,
    #[serde(rename = "$50,000 to $74,999")]
    from_50k_to_75k: f64,
    #[serde(rename = "$75,000 to $99,999")]
    from_75k_to_100k: f64,
    #[serde(rename = "$100,000 to $149,999")]
    from_100k_to_150k: f64,
    #[serde(rename = "$150,000 to $199,999")]
    from_150k_to_200k: f64,
    #[serde(rename = "$200,000 or more")]
    over_200k: f64,
    #[serde(rename = "Median income (dollars)")]
    median_income: u64,
    #[serde(rename = "Mean income (dollars)")]
    mean_income: u64,
}

impl From<&ZoneIncomeProfile> for CleanedIncomeRow {
    fn from(profile: &ZoneIncomeProfile) -> Self {
        let [
            under_10k,
            from_10k_to_15k,
            from_15k_to_25k,
            from_25k_to_35k,
            from_35k_to_50k,
            from_50k_to_75k,
            from_75k_to_100k,
            from_100k_to_150k,
            from_150k_to_200k,
            over_200k,
        ] = fractions(&profile.brackets);
        Self {
            zone: profile.zone,
            total_households: profile.total_households,
            under_10k,
            from_10k_to_15k,
            from_15k_to_25k,
            from_25k_to_35k,
            from_35k_to_50k,
            from_50k_to_75k,
            from_75k_to_100k,
            from_100k_to_150k,
            from_150k_to_200k,
            over_200k,
            median_income: profile.median_income,
            mean_income: profile.mean_income,
        }
    }
}

impl From<CleanedIncomeRow> for ZoneIncomeProfile {
    fn from(row: CleanedIncomeRow) -> Self {
        Self {
            zone: row.zone,
            total_households: row.total_households,
            median_income: row.median_income,
            mean_income: row.mean_income,
            brackets: BracketFractions::new([
                row.under_10k,
                row.from_10k_to_15k,
                row.from_15k_to_25k,
                row.from_25k_to_35k,
                row.from_35k_to_50k,
                row.from_50k_to_75k,
                row.from_75k_to_100k,
                row.from_100k_to_150k,
                row.from_150k_to_200k,
                row.over_200k,
            ]),
        }
    }
}

/// One row of the expanded income table: the cleaned columns followed by
/// housing supply, tier allocation, and borough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpandedIncomeRow {
    #[serde(rename = "Zipcode")]
    zone: ZoneCode,
    #[serde(rename = "Total Households")]
    total_households: u64,
    #[serde(rename = "Less than $10,000")]
    under_10k: f64,
    #[serde(rename = "$10,000 to $14,999")]
    from_10k_to_15k: f64,
    #[serde(rename = "$15,000 to $24,999")]
    from_15k_to_25k: f64,
    #[serde(rename = "$25,000 to $34,999")]
    from_25k_to_35k: f64,
    #[serde(rename = "$35,000 to $49,999")]
    from_35k_to_50k: f64,
    #[serde(rename = "$50,000 to $74,999")]
    from_50k_to_75k: f64,
    #[serde(rename = "$75,000 to $99,999")]
    from_75k_to_100k: f64,
    #[serde(rename = "$100,000 to $149,999")]
    from_100k_to_150k: f64,
    #[serde(rename = "$150,000 to $199,999")]
    from_150k_to_200k: f64,
    #[serde(rename = "$200,000 or more")]
    over_200k: f64,
    #[serde(rename = "Median income (dollars)")]
    median_income: u64,
    #[serde(rename = "Mean income (dollars)")]
    mean_income: u64,
    #[serde(rename = "Total Affordable Housing")]
    total_affordable_housing: u64,
    #[serde(rename = "Housing to Households Ratio")]
    housing_ratio: f64,
    #[serde(rename = "Extremely Low Income Households")]
    extremely_low_households: u64,
    #[serde(rename = "Very Low Income Households")]
    very_low_households: u64,
    #[serde(rename = "Low Income Households")]
    low_households: u64,
    #[serde(rename = "Moderate Income Households")]
    moderate_households: u64,
    #[serde(rename = "Middle Income Households")]
    middle_households: u64,
    #[serde(rename = "Extremely Low Housing")]
    extremely_low_housing: u64,
    #[serde(rename = "Very Low Housing")]
    very_low_housing: u64,
    #[serde(rename = "Low Housing")]
    low_housing: u64,
    #[serde(rename = "Moderate Housing")]
    moderate_housing: u64,
    #[serde(rename = "Middle Housing")]
    middle_housing: u64,
    #[serde(rename = "Extremely Low H/H Ratio")]
    extremely_low_ratio: Option<f64>,
    #[serde(rename = "Very Low H/H Ratio")]
    very_low_ratio: Option<f64>,
    #[serde(rename = "Low H/H Ratio")]
    low_ratio: Option<f64>,
    #[serde(rename = "Moderate H/H Ratio")]
    moderate_ratio: Option<f64>,
    #[serde(rename = "Middle H/H Ratio")]
    middle_ratio: Option<f64>,
    #[serde(rename = "Borough")]
    borough: ZoneBorough,
    #[serde(rename = "Allocation Clamped")]
    clamped: bool,
}

impl From<&ExpandedZone> for ExpandedIncomeRow {
    fn from(zone: &ExpandedZone) -> Self {
        let cleaned = CleanedIncomeRow::from(&zone.profile);
        let allocation = &zone.allocation;
        Self {
            zone: cleaned.zone,
            total_households: cleaned.total_households,
            under_10k: cleaned.under_10k,
            from_10k_to_15k: cleaned.from_10k_to_15k,
            from_15k_to_25k: cleaned.from_15k_to_25k,
            from_25k_to_35k: cleaned.from_25k_to_35k,
            from_35k_to_50k: cleaned.from_35k_to_50k,
            from_50k_to_75k: cleaned.from_50k_to_75k,
            from_75k_to_100k: cleaned.from_75k_to_100k,
            from_100k_to_150k: cleaned.from_100k_to_150k,
            from_150k_to_200k: cleaned.from_150k_to_200k,
            over_200k: cleaned.over_200k,
            median_income: cleaned.median_income,
            mean_income: cleaned.mean_income,
            total_affordable_housing: zone.total_affordable_housing,
            housing_ratio: zone.housing_ratio,
            extremely_low_households: allocation.households.extremely_low,
            very_low_households: allocation.households.very_low,
            low_households: allocation.households.low,
            moderate_households: allocation.households.moderate,
            middle_households: allocation.households.middle,
            extremely_low_housing: allocation.housing.extremely_low,
            very_low_housing: allocation.housing.very_low,
            low_housing: allocation.housing.low,
            moderate_housing: allocation.housing.moderate,
            middle_housing: allocation.housing.middle,
            extremely_low_ratio: allocation.ratios.extremely_low,
            very_low_ratio: allocation.ratios.very_low,
            low_ratio: allocation.ratios.low,
            moderate_ratio: allocation.ratios.moderate,
            middle_ratio: allocation.ratios.middle,
            borough: zone.borough,
            clamped: allocation.clamped,
        }
    }
}

impl From<ExpandedIncomeRow> for ExpandedZone {
    fn from(row: ExpandedIncomeRow) -> Self {
        let profile = ZoneIncomeProfile::from(CleanedIncomeRow {
            zone: row.zone,
            total_households: row.total_households,
            under_10k: row.under_10k,
            from_10k_to_15k: row.from_10k_to_15k,
            from_15k_to_25k: row.from_15k_to_25k,
            from_25k_to_35k: row.from_25k_to_35k,
            from_35k_to_50k: row.from_35k_to_50k,
            from_50k_to_75k: row.from_50k_to_75k,
            from_75k_to_100k: row.from_75k_to_100k,
            from_100k_to_150k: row.from_100k_to_150k,
            from_150k_to_200k: row.from_150k_to_200k,
            over_200k: row.over_200k,
            median_income: row.median_income,
            mean_income: row.mean_income,
        });
        Self {
            profile,
            total_affordable_housing: row.total_affordable_housing,
            housing_ratio: row.housing_ratio,
            allocation: BracketAllocation {
                households: TierValues {
                    extremely_low: row.extremely_low_households,
                    very_low: row.very_low_households,
                    low: row.low_households,
                    moderate: row.moderate_households,
                    middle: row.middle_households,
                },
                housing: TierValues {
                    extremely_low: row.extremely_low_housing,
                    very_low: row.very_low_housing,
                    low: row.low_housing,
                    moderate: row.moderate_housing,
                    middle: row.middle_housing,
                },
                ratios: TierValues {
                    extremely_low: row.extremely_low_ratio,
                    very_low: row.very_low_ratio,
                    low: row.low_ratio,
                    moderate: row.moderate_ratio,
                    middle: row.middle_ratio,
                },
                clamped: row.clamped,
            },
            borough: row.borough,
        }
    }
}

fn fractions(brackets: &BracketFractions) -> [f64; IncomeBracket::COUNT] {
    let mut out = [0.0; IncomeBracket::COUNT];
    for (bracket, fraction) in brackets.iter() {
        out[bracket.index()] = fraction;
    }
    out
}

fn write_rows<W: Write, T: Serialize>(
    writer: W,
    rows: impl IntoIterator<Item = T>,
) -> Result<(), TableError> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn read_rows<R: Read, T: DeserializeOwned>(reader: R) -> Result<Vec<T>, TableError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let rows = reader.deserialize().collect::<Result<Vec<T>, _>>()?;
    Ok(rows)
}

/// Writes profiles as a cleaned income CSV.
///
/// # Errors
///
/// Returns [`TableError`] if writing fails.
pub fn write_cleaned_income<W: Write>(
    writer: W,
    profiles: &[ZoneIncomeProfile],
) -> Result<(), TableError> {
    write_rows(writer, profiles.iter().map(CleanedIncomeRow::from))
}

/// Reads a cleaned income CSV.
///
/// # Errors
///
/// Returns [`TableError`] if the CSV is malformed.
pub fn read_cleaned_income<R: Read>(reader: R) -> Result<Vec<ZoneIncomeProfile>, TableError> {
    let rows: Vec<CleanedIncomeRow> = read_rows(reader)?;
    Ok(rows.into_iter().map(ZoneIncomeProfile::from).collect())
}

/// Writes zones as an expanded income CSV.
///
/// # Errors
///
/// Returns [`TableError`] if writing fails.
pub fn write_expanded_income<W: Write>(
    writer: W,
    zones: &[ExpandedZone],
) -> Result<(), TableError> {
    write_rows(writer, zones.iter().map(ExpandedIncomeRow::from))
}

/// Reads an expanded income CSV.
///
/// # Errors
///
/// Returns [`TableError`] if the CSV is malformed.
pub fn read_expanded_income<R: Read>(reader: R) -> Result<Vec<ExpandedZone>, TableError> {
    let rows: Vec<ExpandedIncomeRow> = read_rows(reader)?;
    Ok(rows.into_iter().map(ExpandedZone::from).collect())
}

/// Writes the cleaned income table to `path`, creating its directory.
///
/// # Errors
///
/// Returns [`TableError`] if the file cannot be created or written.
pub fn write_cleaned_income_file(
    path: &Path,
    profiles: &[ZoneIncomeProfile],
) -> Result<(), TableError> {
    ensure_parent(path)?;
    write_cleaned_income(std::fs::File::create(path)?, profiles)?;
    log::info!("Wrote {} income zones to {}", profiles.len(), path.display());
    Ok(())
}

/// Reads the cleaned income table from `path`.
///
/// # Errors
///
/// Returns [`TableError`] if the file cannot be read or parsed.
pub fn read_cleaned_income_file(path: &Path) -> Result<Vec<ZoneIncomeProfile>, TableError> {
    read_cleaned_income(std::fs::File::open(path)?)
}

/// Writes the expanded income table to `path`, creating its directory.
///
/// # Errors
///
/// Returns [`TableError`] if the file cannot be created or written.
pub fn write_expanded_income_file(path: &Path, zones: &[ExpandedZone]) -> Result<(), TableError> {
    ensure_parent(path)?;
    write_expanded_income(std::fs::File::create(path)?, zones)?;
    log::info!("Wrote {} expanded zones to {}", zones.len(), path.display());
    Ok(())
}

/// Reads the expanded income table from `path`.
///
/// # Errors
///
/// Returns [`TableError`] if the file cannot be read or parsed.
pub fn read_expanded_income_file(path: &Path) -> Result<Vec<ExpandedZone>, TableError> {
    read_expanded_income(std::fs::File::open(path)?)
}
