//! Pipeline configuration loaded from TOML.
//!
//! Every field has a default, so an empty or missing file runs the full
//! 2011-2021 pipeline over `data/raw/` into `data/processed/`.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use housing_gap_analytics_models::RegressionSettings;
use housing_gap_normalize::imputation::ImputationDefaults;
use housing_gap_tables::paths;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for [`PipelineConfig`].
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The config parsed but holds unusable values.
    #[error("Invalid config: {message}")]
    Invalid {
        /// Description of what went wrong.
        message: String,
    },
}

/// Where inputs live, where outputs go, and how each stage is tuned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding the raw housing, income and borough files.
    pub input_dir: PathBuf,
    /// Directory the cleaned, expanded and report files are written to.
    pub output_dir: PathBuf,
    /// Raw housing production file name.
    pub housing_file: String,
    /// Raw income survey file name; `{year}` is replaced per snapshot.
    pub income_pattern: String,
    /// Zone-to-borough reference file name.
    pub borough_file: String,
    /// Snapshot years processed by `run`.
    pub years: Vec<i32>,
    /// Date substituted for missing project dates.
    pub missing_date: NaiveDate,
    /// Regression tunables.
    pub regression: RegressionSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: paths::raw_dir(),
            output_dir: paths::processed_dir(),
            housing_file: "Affordable_Housing_Production_by_Building.csv".to_string(),
            income_pattern: "NYC_income_by_zip_{year}.csv".to_string(),
            borough_file: "nyc_zipcodes_and_boros.csv".to_string(),
            years: (2011..=2021).collect(),
            missing_date: ImputationDefaults::default().missing_date,
            regression: RegressionSettings::default(),
        }
    }
}

impl PipelineConfig {
    /// Loads the config at `path`, falling back to defaults when the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let config = Self::from_toml_str(&std::fs::read_to_string(path)?)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not a valid config.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::de::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let fraction = self.regression.test_fraction;
        if !(fraction > 0.0 && fraction < 1.0) {
            return Err(ConfigError::Invalid {
                message: format!("regression.test_fraction must be in (0, 1), got {fraction}"),
            });
        }
        if !self.income_pattern.contains("{year}") {
            return Err(ConfigError::Invalid {
                message: format!("income_pattern '{}' has no {{year}}", self.income_pattern),
            });
        }
        Ok(())
    }

    /// Imputation defaults for the housing normalizer.
    #[must_use]
    pub const fn imputation(&self) -> ImputationDefaults {
        ImputationDefaults {
            missing_date: self.missing_date,
        }
    }

    /// Path of the raw housing production file.
    #[must_use]
    pub fn housing_input(&self) -> PathBuf {
        self.input_dir.join(&self.housing_file)
    }

    /// Path of the raw income survey for `year`.
    #[must_use]
    pub fn income_input(&self, year: i32) -> PathBuf {
        self.input_dir
            .join(paths::year_file(&self.income_pattern, year))
    }

    /// Path of the zone-to-borough reference table.
    #[must_use]
    pub fn borough_input(&self) -> PathBuf {
        self.input_dir.join(&self.borough_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.years.first(), Some(&2011));
        assert_eq!(config.years.last(), Some(&2021));
        assert_eq!(config.years.len(), 11);
        assert_eq!(
            config.missing_date,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let config = PipelineConfig::from_toml_str(
            r#"
            years = [2015, 2017]
            input_dir = "/tmp/raw"
            missing_date = "2030-06-30"

            [regression]
            max_degree = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.years, vec![2015, 2017]);
        assert_eq!(config.input_dir, PathBuf::from("/tmp/raw"));
        assert_eq!(config.regression.max_degree, 4);
        assert_eq!(config.regression.seed, RegressionSettings::default().seed);
        assert_eq!(
            config.imputation().missing_date,
            NaiveDate::from_ymd_opt(2030, 6, 30).unwrap()
        );
        assert_eq!(
            config.income_input(2017),
            PathBuf::from("/tmp/raw/NYC_income_by_zip_2017.csv")
        );
    }

    #[test]
    fn rejects_bad_values() {
        let err = PipelineConfig::from_toml_str("[regression]\ntest_fraction = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }), "{err}");

        let err = PipelineConfig::from_toml_str("income_pattern = \"income.csv\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }), "{err}");

        let err = PipelineConfig::from_toml_str("years = \"all\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)), "{err}");
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("housing_gap_no_such_config.toml");
        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }
}
