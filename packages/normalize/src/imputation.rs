//! Declarative field imputation for raw housing records.
//!
//! Each [`FieldImputation`] names a column, a validity predicate, and a
//! function producing the replacement value. [`impute_record`] walks a
//! table of these uniformly, so adding a defaulted column is a one-line
//! table change.

use chrono::NaiveDate;
use housing_gap_geography_models::{Borough, ZoneCode};

use crate::housing::columns;
use crate::parsing::parse_date;
use crate::{NormalizeError, RawRecord};

/// Defaults that imputation functions may draw on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImputationDefaults {
    /// Date substituted for missing start/completion dates.
    pub missing_date: NaiveDate,
}

impl Default for ImputationDefaults {
    fn default() -> Self {
        Self {
            missing_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MAX),
        }
    }
}

/// One row of the imputation table.
#[derive(Debug, Clone, Copy)]
pub struct FieldImputation {
    /// Column the rule applies to.
    pub field: &'static str,
    /// Returns `true` when the present value can be kept.
    pub is_valid: fn(&str) -> bool,
    /// Produces the replacement value from the rest of the record.
    pub default_value: fn(&RawRecord, &ImputationDefaults) -> Result<String, NormalizeError>,
}

/// Imputation rules for housing project records.
pub static HOUSING_IMPUTATIONS: &[FieldImputation] = &[
    FieldImputation {
        field: columns::COMPLETION_DATE,
        is_valid: is_date,
        default_value: default_date,
    },
    FieldImputation {
        field: columns::START_DATE,
        is_valid: is_date,
        default_value: default_date,
    },
    FieldImputation {
        field: columns::POSTCODE,
        is_valid: is_zone_code,
        default_value: borough_default_zone,
    },
];

fn is_date(value: &str) -> bool {
    parse_date(value).is_some()
}

fn is_zone_code(value: &str) -> bool {
    value.parse::<ZoneCode>().is_ok()
}

#[allow(clippy::unnecessary_wraps)]
fn default_date(
    _record: &RawRecord,
    defaults: &ImputationDefaults,
) -> Result<String, NormalizeError> {
    Ok(defaults.missing_date.format("%Y-%m-%d").to_string())
}

fn borough_default_zone(
    record: &RawRecord,
    _defaults: &ImputationDefaults,
) -> Result<String, NormalizeError> {
    let raw = record.get(columns::BOROUGH).map_or("", String::as_str).trim();
    let borough = raw
        .parse::<Borough>()
        .map_err(|_| NormalizeError::UnknownBorough {
            record: record_label(record),
            value: raw.to_string(),
        })?;
    Ok(borough.default_zone().value().to_string())
}

/// Identifies a record in error messages by its project id when present.
pub(crate) fn record_label(record: &RawRecord) -> String {
    record.get(columns::PROJECT_ID).map_or_else(
        || "project <unknown>".to_string(),
        |id| format!("project {}", id.trim()),
    )
}

/// Applies every rule in `table` to `record`, replacing invalid or missing
/// values in place.
///
/// Returns how many fields were replaced.
///
/// # Errors
///
/// Returns [`NormalizeError`] if a default cannot be produced (e.g. the
/// postcode is missing and the borough is not recognized).
pub fn impute_record(
    record: &mut RawRecord,
    table: &[FieldImputation],
    defaults: &ImputationDefaults,
) -> Result<usize, NormalizeError> {
    let mut replaced = 0;

    for rule in table {
        let current = record.get(rule.field).map(|v| v.trim());
        if current.is_some_and(rule.is_valid) {
            continue;
        }

        if let Some(bad) = current.filter(|v| !v.is_empty()) {
            log::warn!(
                "{}: unreadable {} '{bad}', substituting default",
                record_label(record),
                rule.field
            );
        }

        let value = (rule.default_value)(record, defaults)?;
        record.insert(rule.field.to_string(), value);
        replaced += 1;
    }

    Ok(replaced)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn fills_missing_dates_and_postcode() {
        let mut rec = record(&[
            (columns::PROJECT_ID, "100"),
            (columns::BOROUGH, "Brooklyn"),
            (columns::START_DATE, ""),
            (columns::POSTCODE, ""),
        ]);
        let replaced =
            impute_record(&mut rec, HOUSING_IMPUTATIONS, &ImputationDefaults::default()).unwrap();
        assert_eq!(replaced, 3);
        assert_eq!(rec[columns::START_DATE], "2024-01-01");
        assert_eq!(rec[columns::COMPLETION_DATE], "2024-01-01");
        assert_eq!(rec[columns::POSTCODE], "11201");
    }

    #[test]
    fn keeps_valid_values() {
        let mut rec = record(&[
            (columns::BOROUGH, "Bronx"),
            (columns::START_DATE, "03/15/2014"),
            (columns::COMPLETION_DATE, "2016-09-01"),
            (columns::POSTCODE, "10455"),
        ]);
        let before = rec.clone();
        let replaced =
            impute_record(&mut rec, HOUSING_IMPUTATIONS, &ImputationDefaults::default()).unwrap();
        assert_eq!(replaced, 0);
        assert_eq!(rec, before);
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let mut rec = record(&[(columns::BOROUGH, "Staten Island")]);
        let defaults = ImputationDefaults::default();
        impute_record(&mut rec, HOUSING_IMPUTATIONS, &defaults).unwrap();
        let once = rec.clone();
        assert_eq!(impute_record(&mut rec, HOUSING_IMPUTATIONS, &defaults).unwrap(), 0);
        assert_eq!(rec, once);
    }

    #[test]
    fn unknown_borough_cannot_default_postcode() {
        let mut rec = record(&[
            (columns::PROJECT_ID, "7"),
            (columns::BOROUGH, "Hoboken"),
            (columns::START_DATE, "2014-01-01"),
            (columns::COMPLETION_DATE, "2014-01-01"),
        ]);
        let err = impute_record(&mut rec, HOUSING_IMPUTATIONS, &ImputationDefaults::default())
            .unwrap_err();
        assert!(matches!(err, NormalizeError::UnknownBorough { .. }), "{err}");
    }

    #[test]
    fn custom_default_date() {
        let defaults = ImputationDefaults {
            missing_date: NaiveDate::from_ymd_opt(2030, 12, 31).unwrap(),
        };
        let mut rec = record(&[(columns::BOROUGH, "Queens"), (columns::POSTCODE, "11432")]);
        impute_record(&mut rec, HOUSING_IMPUTATIONS, &defaults).unwrap();
        assert_eq!(rec[columns::COMPLETION_DATE], "2030-12-31");
    }
}
