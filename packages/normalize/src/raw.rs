//! Reads raw CSV tables into [`RawRecord`]s and [`RawIncomeTable`]s.
//!
//! Headers are trimmed, short rows are padded with empty strings, and
//! every value is trimmed. Nothing is parsed here.

use std::io::Read;
use std::path::Path;

use crate::income::{RawIncomeColumn, RawIncomeTable};
use crate::{NormalizeError, RawRecord};

/// Reads a header-first CSV into one [`RawRecord`] per row.
///
/// # Errors
///
/// Returns [`NormalizeError`] if the CSV cannot be parsed or has no
/// header row.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<RawRecord>, NormalizeError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(NormalizeError::Table {
            message: "CSV file contains no header row".to_owned(),
        });
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let record = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), row.get(i).unwrap_or("").trim().to_owned()))
            .collect();
        records.push(record);
    }

    log::debug!("Parsed {} raw records", records.len());
    Ok(records)
}

/// Reads a header-first CSV file into [`RawRecord`]s.
///
/// # Errors
///
/// Returns [`NormalizeError`] if the file cannot be opened or parsed.
pub fn read_records_file(path: &Path) -> Result<Vec<RawRecord>, NormalizeError> {
    let records = read_records(std::fs::File::open(path)?)?;
    log::info!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Reads the income survey: the first column holds statistic labels and
/// every other column is one `"<Area>!!<Category>!!<Stat>"` estimate.
///
/// # Errors
///
/// Returns [`NormalizeError`] if the CSV cannot be parsed or has no
/// estimate columns.
pub fn read_income_table<R: Read>(reader: R) -> Result<RawIncomeTable, NormalizeError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();
    if headers.len() < 2 {
        return Err(NormalizeError::Table {
            message: "income table has no estimate columns".to_owned(),
        });
    }

    let mut table = RawIncomeTable {
        stat_labels: Vec::new(),
        columns: headers[1..]
            .iter()
            .map(|label| RawIncomeColumn {
                label: label.clone(),
                values: Vec::new(),
            })
            .collect(),
    };

    for result in reader.records() {
        let row = result?;
        table.stat_labels.push(row.get(0).unwrap_or("").to_owned());
        for (i, column) in table.columns.iter_mut().enumerate() {
            column
                .values
                .push(row.get(i + 1).unwrap_or("").trim().to_owned());
        }
    }

    log::debug!(
        "Parsed income table: {} statistics x {} columns",
        table.stat_labels.len(),
        table.columns.len()
    );
    Ok(table)
}

/// Reads the income survey from a file.
///
/// # Errors
///
/// Returns [`NormalizeError`] if the file cannot be opened or parsed.
pub fn read_income_table_file(path: &Path) -> Result<RawIncomeTable, NormalizeError> {
    let table = read_income_table(std::fs::File::open(path)?)?;
    log::info!(
        "Read income table with {} columns from {}",
        table.columns.len(),
        path.display()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_records_and_pads_short_rows() {
        let data = "Project ID, Borough ,Postcode\n1,Bronx,10455\n2, Queens\n";
        let records = read_records(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["Borough"], "Bronx");
        assert_eq!(records[1]["Borough"], "Queens");
        assert_eq!(records[1]["Postcode"], "");
    }

    #[test]
    fn reads_income_table_columns() {
        let data = "Label (Grouping),\"New York city, New York!!Households!!Estimate\",\
                    ZCTA5 10001!!Households!!Estimate\n\
                    Total,\"3,211,034\",\"12,431\"\n\
                    \"    Less than $10,000\",9.9%,8.1%\n";
        let table = read_income_table(data.as_bytes()).unwrap();
        assert_eq!(table.stat_labels, vec!["Total", "    Less than $10,000"]);
        assert_eq!(table.columns.len(), 2);
        assert_eq!(
            table.columns[0].label,
            "New York city, New York!!Households!!Estimate"
        );
        assert_eq!(table.columns[1].values, vec!["12,431", "8.1%"]);
    }

    #[test]
    fn income_table_without_estimates_is_rejected() {
        let err = read_income_table("Label\nTotal\n".as_bytes()).unwrap_err();
        assert!(matches!(err, NormalizeError::Table { .. }), "{err}");
    }
}
