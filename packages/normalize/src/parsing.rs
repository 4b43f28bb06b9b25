//! Shared parsing utilities for raw survey and housing values.
//!
//! Survey exports carry formatting artifacts (percent signs, thousands
//! separators, `ZCTA5` prefixes, quoted labels) that are stripped here
//! before values are coerced to numbers.

use chrono::{NaiveDate, NaiveDateTime};

/// Date formats accepted in housing records, tried in order.
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];

/// Date-time formats accepted in housing records; only the date is kept.
const DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %I:%M:%S %p",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Keeps only ASCII digits and `.` from a survey value.
///
/// An input that strips down to nothing becomes `"0"`. `None` passes
/// through untouched.
///
/// ```
/// use housing_gap_normalize::parsing::strip_punctuation;
///
/// assert_eq!(strip_punctuation(Some("22.5%")).as_deref(), Some("22.5"));
/// assert_eq!(strip_punctuation(Some("")).as_deref(), Some("0"));
/// assert_eq!(strip_punctuation(None), None);
/// ```
#[must_use]
pub fn strip_punctuation(value: Option<&str>) -> Option<String> {
    let value = value?;
    let output: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if output.is_empty() {
        return Some("0".to_string());
    }
    Some(output)
}

/// Recovers a bare zone code from a survey column label.
///
/// Keeps the digits of the label and drops the first one, which is the
/// `5` of the `ZCTA5` prefix.
///
/// ```
/// use housing_gap_normalize::parsing::strip_letters;
///
/// assert_eq!(strip_letters("ZCTA5 10101 Estimate"), "10101");
/// ```
#[must_use]
pub fn strip_letters(label: &str) -> String {
    label.chars().filter(char::is_ascii_digit).skip(1).collect()
}

/// Removes every double quote from a column label.
#[must_use]
pub fn strip_quotations(label: &str) -> String {
    label.chars().filter(|c| *c != '"').collect()
}

/// Cleans a statistic label: surrounding whitespace, then quotes.
#[must_use]
pub fn clean_label(label: &str) -> String {
    strip_quotations(label.trim())
}

/// Parses a housing record date in any of the accepted formats.
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parses a numeric survey or housing value after stripping punctuation.
///
/// Returns `None` only when the stripped text is still not a number
/// (e.g. `"1.2.3"`).
#[must_use]
pub fn parse_number(s: &str) -> Option<f64> {
    strip_punctuation(Some(s))?.parse::<f64>().ok()
}

/// Parses a non-negative count, truncating any fractional part.
#[must_use]
pub fn parse_count(s: &str) -> Option<u64> {
    let value = parse_number(s)?;
    if !value.is_finite() {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = value.max(0.0) as u64;
    Some(count)
}
