//! Normalizes the income-by-zone survey table into [`ZoneIncomeProfile`]s.
//!
//! The survey arrives with one column per `"<Area>!!<Category>!!<Stat>"`
//! label and one row per statistic. It is transposed to one row per
//! column label, reduced to the household estimates, and coerced into
//! typed profiles.

use std::collections::BTreeMap;

use housing_gap_geography_models::ZoneCode;
use housing_gap_housing_models::round_thousandths;
use housing_gap_income_models::{BracketFractions, IncomeBracket, ZoneIncomeProfile};

use crate::NormalizeError;
use crate::parsing::{clean_label, parse_number, strip_letters};

/// Marker identifying household estimate columns.
pub const HOUSEHOLDS_MARKER: &str = "!!Households!!";

/// Column label of the whole-metro household estimate.
pub const METRO_LABEL: &str = "New York city, New York!!Households!!Estimate";

/// Statistic labels used downstream.
pub mod stats {
    /// Total households.
    pub const TOTAL: &str = "Total";
    /// Median household income.
    pub const MEDIAN_INCOME: &str = "Median income (dollars)";
    /// Mean household income.
    pub const MEAN_INCOME: &str = "Mean income (dollars)";
}

/// Statistics that carry no information needed downstream: allocation
/// quality metadata (named `PERCENT IMPUTED` in older vintages) and the
/// family/non-family breakdown headers.
pub const DROPPED_STATS: &[&str] = &[
    "PERCENT ALLOCATED",
    "PERCENT IMPUTED",
    "Family income in the past 12 months",
    "Nonfamily income in the past 12 months",
];

/// The survey table as read from disk: statistics down, zones across.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawIncomeTable {
    /// Statistic label of each row.
    pub stat_labels: Vec<String>,
    /// One entry per survey column.
    pub columns: Vec<RawIncomeColumn>,
}

/// One survey column: a label and one value per statistic row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawIncomeColumn {
    /// `"<Area>!!<Category>!!<Stat>"` label.
    pub label: String,
    /// Values aligned with [`RawIncomeTable::stat_labels`].
    pub values: Vec<String>,
}

/// A transposed survey row: one column label and its statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawZoneRow {
    /// Original column label.
    pub label: String,
    /// Cleaned statistic label -> raw value.
    pub stats: BTreeMap<String, String>,
}

impl RawIncomeTable {
    /// Transposes the table into one row per survey column, cleaning
    /// statistic labels and dropping unused statistics.
    #[must_use]
    pub fn transpose(&self) -> Vec<RawZoneRow> {
        let labels: Vec<String> = self.stat_labels.iter().map(|l| clean_label(l)).collect();

        self.columns
            .iter()
            .map(|column| {
                let stats = labels
                    .iter()
                    .zip(&column.values)
                    .filter(|(label, _)| !DROPPED_STATS.contains(&label.as_str()))
                    .map(|(label, value)| (label.clone(), value.clone()))
                    .collect();
                RawZoneRow {
                    label: column.label.trim().to_string(),
                    stats,
                }
            })
            .collect()
    }
}

/// Resolves the zone code encoded in a survey column label.
///
/// # Errors
///
/// Returns [`NormalizeError::InvalidValue`] if no zone code can be
/// recovered.
pub fn zone_from_label(label: &str) -> Result<ZoneCode, NormalizeError> {
    if label == METRO_LABEL {
        return Ok(ZoneCode::METRO_AGGREGATE);
    }
    let digits = strip_letters(label);
    digits.parse().map_err(|_| NormalizeError::InvalidValue {
        record: label.to_string(),
        column: "zone label".to_string(),
        value: digits,
    })
}

/// Normalizes one transposed household row.
///
/// Returns `Ok(None)` for zones with no households.
///
/// # Errors
///
/// Returns [`NormalizeError::Schema`] if a bracket or summary statistic
/// is missing, or [`NormalizeError::InvalidValue`] if one is not numeric.
pub fn normalize_zone_row(row: &RawZoneRow) -> Result<Option<ZoneIncomeProfile>, NormalizeError> {
    let zone = zone_from_label(&row.label)?;

    let number = |stat: &str| -> Result<f64, NormalizeError> {
        let raw = row.stats.get(stat).ok_or_else(|| NormalizeError::Schema {
            record: row.label.clone(),
            column: stat.to_string(),
        })?;
        parse_number(raw).ok_or_else(|| NormalizeError::InvalidValue {
            record: row.label.clone(),
            column: stat.to_string(),
            value: raw.clone(),
        })
    };

    let mut fractions = [0.0; IncomeBracket::COUNT];
    for &bracket in IncomeBracket::all() {
        let percent = number(bracket.as_ref())?;
        fractions[bracket.index()] = round_thousandths(percent / 100.0);
    }

    let total_households = whole(number(stats::TOTAL)?);
    if total_households == 0 {
        log::debug!("Dropping zone {zone}: no households");
        return Ok(None);
    }

    Ok(Some(ZoneIncomeProfile {
        zone,
        total_households,
        median_income: whole(number(stats::MEDIAN_INCOME)?),
        mean_income: whole(number(stats::MEAN_INCOME)?),
        brackets: BracketFractions::new(fractions),
    }))
}

/// Normalizes a full survey table.
///
/// # Errors
///
/// Returns the first [`NormalizeError`] raised by a household row.
pub fn normalize_income_table(
    table: &RawIncomeTable,
) -> Result<Vec<ZoneIncomeProfile>, NormalizeError> {
    let rows = table.transpose();
    let household_rows: Vec<&RawZoneRow> = rows
        .iter()
        .filter(|row| row.label.contains(HOUSEHOLDS_MARKER))
        .collect();

    let mut profiles = Vec::with_capacity(household_rows.len());
    for row in &household_rows {
        if let Some(profile) = normalize_zone_row(row)? {
            profiles.push(profile);
        }
    }

    log::info!(
        "Normalized {} zones ({} household columns, {} dropped with no households)",
        profiles.len(),
        household_rows.len(),
        household_rows.len() - profiles.len()
    );
    Ok(profiles)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole(value: f64) -> u64 {
    value.max(0.0) as u64
}
