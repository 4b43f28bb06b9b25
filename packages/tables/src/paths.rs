//! Canonical file locations for pipeline inputs and outputs.
//!
//! Directories default to `data/raw/` and `data/processed/` under the
//! workspace root; the CLI config can point elsewhere.

use std::path::{Path, PathBuf};

/// Returns the workspace root directory.
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR`.
///
/// # Panics
///
/// Panics if the project root cannot be resolved.
#[must_use]
pub fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .expect("Failed to find project root from CARGO_MANIFEST_DIR")
        .to_path_buf()
}

/// Returns the `data/` directory path.
#[must_use]
pub fn data_dir() -> PathBuf {
    project_root().join("data")
}

/// Returns the default `data/raw/` input directory.
#[must_use]
pub fn raw_dir() -> PathBuf {
    data_dir().join("raw")
}

/// Returns the default `data/processed/` output directory.
#[must_use]
pub fn processed_dir() -> PathBuf {
    data_dir().join("processed")
}

/// Cleaned housing table inside `dir`.
#[must_use]
pub fn cleaned_housing_path(dir: &Path) -> PathBuf {
    dir.join("AHP_by_Building_cleaned.csv")
}

/// Cleaned income table for `year` inside `dir`.
#[must_use]
pub fn cleaned_income_path(dir: &Path, year: i32) -> PathBuf {
    dir.join(format!("NYC_Income_by_ZIP_{year}_Cleaned.csv"))
}

/// Expanded income table for `year` inside `dir`.
#[must_use]
pub fn expanded_income_path(dir: &Path, year: i32) -> PathBuf {
    dir.join(format!("NYC_Income_by_ZIP_{year}_Expanded.csv"))
}

/// Regression report for `year` inside `dir`.
#[must_use]
pub fn report_path(dir: &Path, year: i32) -> PathBuf {
    dir.join(format!("regression_{year}.json"))
}

/// Combined multi-year predictions inside `dir`.
#[must_use]
pub fn predictions_path(dir: &Path) -> PathBuf {
    dir.join("predictions.json")
}

/// Substitutes `{year}` in a file name pattern.
#[must_use]
pub fn year_file(pattern: &str, year: i32) -> String {
    pattern.replace("{year}", &year.to_string())
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Ensures the parent directory of a file path exists.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_pattern_substitution() {
        assert_eq!(
            year_file("NYC_income_by_zip_{year}.csv", 2016),
            "NYC_income_by_zip_2016.csv"
        );
        assert_eq!(year_file("fixed.csv", 2016), "fixed.csv");
    }

    #[test]
    fn per_year_paths_embed_year() {
        let dir = Path::new("out");
        assert_eq!(
            expanded_income_path(dir, 2021),
            Path::new("out/NYC_Income_by_ZIP_2021_Expanded.csv")
        );
        assert_eq!(report_path(dir, 2011), Path::new("out/regression_2011.json"));
    }
}
