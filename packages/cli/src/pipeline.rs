//! Stage orchestration for the housing gap pipeline.
//!
//! Each stage reads its inputs from disk, runs one library crate, and
//! writes a table the next stage picks up, so any stage can be rerun on
//! its own. [`Pipeline::run_all`] chains them over every configured year,
//! logging and skipping years that fail.

use std::fmt::Display;
use std::time::Instant;

use housing_gap_allocation::estimate_all;
use housing_gap_analytics::{RegressionError, fit_report};
use housing_gap_analytics_models::RegressionReport;
use housing_gap_cli_utils::{MultiProgress, TerminalProgress};
use housing_gap_geography::{GeoError, HousingIndex, ZoneBoroughTable, join_zones};
use housing_gap_housing_models::HousingProject;
use housing_gap_income_models::{ExpandedZone, ZoneIncomeProfile};
use housing_gap_normalize::NormalizeError;
use housing_gap_normalize::housing::normalize_housing_records;
use housing_gap_normalize::income::normalize_income_table;
use housing_gap_normalize::progress::ProgressCallback;
use housing_gap_normalize::raw::{read_income_table_file, read_records_file};
use housing_gap_tables::reports::{PredictionsSummary, YearPrediction};
use housing_gap_tables::{TableError, housing, income, paths, reports};
use thiserror::Error;

use crate::config::{ConfigError, PipelineConfig};

/// Any error a pipeline stage can raise.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Config error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Normalization error.
    #[error("Normalize error: {0}")]
    Normalize(#[from] NormalizeError),

    /// Zone join error.
    #[error("Geography error: {0}")]
    Geo(#[from] GeoError),

    /// Regression error.
    #[error("Regression error: {0}")]
    Regression(#[from] RegressionError),

    /// Table read/write error.
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs pipeline stages against one [`PipelineConfig`].
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Wraps a loaded config. Nothing is read until a stage runs.
    #[must_use]
    pub const fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// The config every stage reads its paths and settings from.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Normalizes the raw housing file and writes the cleaned table.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if the raw file cannot be read, a record
    /// fails normalization, or the output cannot be written.
    pub fn clean_housing(
        &self,
        progress: &dyn ProgressCallback,
    ) -> Result<Vec<HousingProject>, PipelineError> {
        let records = read_records_file(&self.config.housing_input())?;
        let projects = normalize_housing_records(&records, &self.config.imputation(), progress)?;

        paths::ensure_dir(&self.config.output_dir)?;
        let path = paths::cleaned_housing_path(&self.config.output_dir);
        housing::write_housing_file(&path, &projects)?;
        Ok(projects)
    }

    /// Reads the cleaned housing table written by [`Self::clean_housing`].
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if the table is missing or malformed.
    pub fn load_housing(&self) -> Result<Vec<HousingProject>, PipelineError> {
        let path = paths::cleaned_housing_path(&self.config.output_dir);
        Ok(housing::read_housing_file(&path, &self.config.imputation())?)
    }

    /// Normalizes one year's income survey and writes the cleaned table.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if the survey cannot be read or
    /// normalized, or the output cannot be written.
    pub fn clean_income(&self, year: i32) -> Result<Vec<ZoneIncomeProfile>, PipelineError> {
        let table = read_income_table_file(&self.config.income_input(year))?;
        let profiles = normalize_income_table(&table)?;

        let path = paths::cleaned_income_path(&self.config.output_dir, year);
        income::write_cleaned_income_file(&path, &profiles)?;
        Ok(profiles)
    }

    /// Reads the zone-to-borough reference table.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if the table is missing or lacks its
    /// columns.
    pub fn load_boroughs(&self) -> Result<ZoneBoroughTable, PipelineError> {
        let table = ZoneBoroughTable::from_path(&self.config.borough_input())?;
        log::debug!("Loaded {} zone boroughs", table.len());
        Ok(table)
    }

    /// Estimates tier households for one year's cleaned zones, joins the
    /// housing that counts toward that year, and writes the expanded
    /// table.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if the cleaned income table cannot be
    /// read or the expanded table cannot be written.
    pub fn expand(
        &self,
        year: i32,
        projects: &[HousingProject],
        boroughs: &ZoneBoroughTable,
    ) -> Result<Vec<ExpandedZone>, PipelineError> {
        let cleaned = paths::cleaned_income_path(&self.config.output_dir, year);
        let profiles = income::read_cleaned_income_file(&cleaned)?;
        let estimates = estimate_all(&profiles);

        let index = HousingIndex::build(projects, year);
        log::info!("{year}: {} projects count toward the snapshot", index.project_count());

        let zones = join_zones(&profiles, &estimates, &index, boroughs)?;
        let path = paths::expanded_income_path(&self.config.output_dir, year);
        income::write_expanded_income_file(&path, &zones)?;
        Ok(zones)
    }

    /// Fits the ratio model to one year's expanded table and writes its
    /// report.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if the expanded table cannot be read, the
    /// fit fails, or the report cannot be written.
    pub fn predict(&self, year: i32) -> Result<RegressionReport, PipelineError> {
        let path = paths::expanded_income_path(&self.config.output_dir, year);
        let zones = income::read_expanded_income_file(&path)?;

        let report = fit_report(year, &zones, &self.config.regression)?;
        reports::write_report_file(&paths::report_path(&self.config.output_dir, year), &report)?;
        Ok(report)
    }

    /// Runs clean-income, expand and predict for one year.
    ///
    /// # Errors
    ///
    /// Returns the first [`PipelineError`] raised by a stage.
    pub fn run_year(
        &self,
        year: i32,
        projects: &[HousingProject],
        boroughs: &ZoneBoroughTable,
    ) -> Result<RegressionReport, PipelineError> {
        self.clean_income(year)?;
        self.expand(year, projects, boroughs)?;
        self.predict(year)
    }

    /// Runs every stage for `years`, writing the combined predictions file
    /// from the years that succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if housing cleanup, the borough table, or
    /// the predictions file fails. Per-year failures are logged and
    /// skipped.
    pub fn run_all(
        &self,
        years: &[i32],
        multi: &MultiProgress,
    ) -> Result<PredictionsSummary, PipelineError> {
        let start = Instant::now();

        let housing_bar = TerminalProgress::rows_bar(multi, "Cleaning housing records");
        let projects = self.clean_housing(&housing_bar)?;
        let boroughs = self.load_boroughs()?;

        let years_bar = TerminalProgress::years_bar(multi, years.len());
        let (done, failures) = run_years(years, &years_bar, |year| {
            self.run_year(year, &projects, &boroughs)
        });

        let summary = PredictionsSummary {
            years: done.iter().map(YearPrediction::from).collect(),
        };
        let path = paths::predictions_path(&self.config.output_dir);
        reports::write_predictions_file(&path, &summary)?;

        log::info!(
            "Pipeline finished in {:.1}s: {} year(s) succeeded, {} failed",
            start.elapsed().as_secs_f64(),
            done.len(),
            failures.len()
        );
        Ok(summary)
    }
}

/// Runs `stage` for each year in order. A failing year is logged and
/// collected without stopping the others.
pub fn run_years<T, E: Display>(
    years: &[i32],
    progress: &dyn ProgressCallback,
    mut stage: impl FnMut(i32) -> Result<T, E>,
) -> (Vec<T>, Vec<(i32, E)>) {
    let mut done = Vec::new();
    let mut failed = Vec::new();

    for &year in years {
        progress.set_message(format!("Year {year}"));
        match stage(year) {
            Ok(value) => done.push(value),
            Err(e) => {
                log::error!("{year} failed: {e}");
                failed.push((year, e));
            }
        }
        progress.inc(1);
    }

    progress.finish(format!("{} of {} years done", done.len(), years.len()));
    (done, failed)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use housing_gap_geography_models::{ZoneBorough, ZoneCode};
    use housing_gap_income_models::IncomeBracket;
    use housing_gap_normalize::progress::NullProgress;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("housing_gap_{name}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn income_csv() -> String {
        let mut csv = String::from(
            "Label (Grouping),\"New York city, New York!!Households!!Estimate\",\
             ZCTA5 10001!!Households!!Estimate,ZCTA5 10451!!Households!!Estimate,\
             ZCTA5 10020!!Households!!Estimate\n",
        );
        csv.push_str("Total,\"2,000\",\"1,000\",\"1,000\",0\n");
        for bracket in IncomeBracket::all() {
            csv.push_str(&format!("\"    {}\",10.0%,10.0%,10.0%,-\n", bracket.as_ref()));
        }
        csv.push_str("Median income (dollars),\"40,000\",\"50,000\",\"30,000\",-\n");
        csv.push_str("Mean income (dollars),\"45,000\",\"60,000\",\"35,000\",-\n");
        csv.push_str("PERCENT ALLOCATED,(X),(X),(X),(X)\n");
        csv
    }

    fn housing_csv() -> String {
        [
            "Project ID,Project Start Date,Project Completion Date,Borough,Postcode,\
             Reporting Construction Type,Extremely Low Income Units,Very Low Income Units,\
             Low Income Units,Moderate Income Units,Middle Income Units,\
             All Counted Units,Total Units",
            "1,03/01/2012,06/30/2014,Manhattan,10001,New Construction,5,10,20,0,3,38,76",
            "2,03/01/2016,06/30/2019,Bronx,10451,New Construction,4,4,4,0,0,12,12",
            "3,03/01/2013,,Bronx,,Preservation,0,0,10,0,0,10,20",
        ]
        .join("\n")
    }

    fn pipeline(name: &str) -> Pipeline {
        let dir = scratch_dir(name);
        let input_dir = dir.join("raw");
        std::fs::create_dir_all(&input_dir).unwrap();
        std::fs::write(input_dir.join("housing.csv"), housing_csv()).unwrap();
        std::fs::write(input_dir.join("income_2015.csv"), income_csv()).unwrap();
        std::fs::write(
            input_dir.join("boroughs.csv"),
            "ZipCode,Borough\n10001,Manhattan\n10451,Bronx\n",
        )
        .unwrap();

        Pipeline::new(PipelineConfig {
            input_dir,
            output_dir: dir.join("processed"),
            housing_file: "housing.csv".to_string(),
            income_pattern: "income_{year}.csv".to_string(),
            borough_file: "boroughs.csv".to_string(),
            ..PipelineConfig::default()
        })
    }

    #[test]
    fn stages_chain_through_written_tables() {
        let pipeline = pipeline("stages");

        let projects = pipeline.clean_housing(&NullProgress).unwrap();
        assert_eq!(projects.len(), 3);
        assert_eq!(pipeline.load_housing().unwrap(), projects);

        let profiles = pipeline.clean_income(2015).unwrap();
        assert_eq!(profiles.len(), 3, "zone with no households is dropped");

        let boroughs = pipeline.load_boroughs().unwrap();
        let projects = pipeline.load_housing().unwrap();
        let zones = pipeline.expand(2015, &projects, &boroughs).unwrap();
        assert_eq!(zones.len(), 3);

        let by_zone = |code: u32| {
            zones
                .iter()
                .find(|z| z.profile.zone == ZoneCode::new(code).unwrap())
                .unwrap()
        };

        let metro = by_zone(10000);
        assert_eq!(metro.borough, ZoneBorough::Metro);
        assert_eq!(metro.total_affordable_housing, 48, "completed 2014 + preservation");

        let chelsea = by_zone(10001);
        assert_eq!(chelsea.total_affordable_housing, 38);
        assert!((chelsea.housing_ratio - 0.038).abs() < 1e-12);

        let bronx = by_zone(10451);
        assert_eq!(bronx.total_affordable_housing, 10, "2019 project excluded");
        assert_eq!(bronx.allocation.housing.low, 10);

        let written = income::read_expanded_income_file(&paths::expanded_income_path(
            &pipeline.config().output_dir,
            2015,
        ))
        .unwrap();
        assert_eq!(written.len(), zones.len());
    }

    #[test]
    fn too_few_zones_fail_prediction() {
        let pipeline = pipeline("predict");
        let projects = pipeline.clean_housing(&NullProgress).unwrap();
        let boroughs = pipeline.load_boroughs().unwrap();

        let err = pipeline.run_year(2015, &projects, &boroughs).unwrap_err();
        assert!(matches!(err, PipelineError::Regression(_)), "{err}");
    }

    #[test]
    fn missing_survey_year_is_an_error() {
        let pipeline = pipeline("missing_year");
        let err = pipeline.clean_income(2012).unwrap_err();
        assert!(matches!(err, PipelineError::Normalize(_)), "{err}");
    }

    #[test]
    fn failing_years_do_not_stop_the_run() {
        let years = [2011, 2012, 2013, 2014];
        let (done, failed) = run_years(&years, &NullProgress, |year| {
            if year % 2 == 0 {
                Err(format!("no survey for {year}"))
            } else {
                Ok(year * 10)
            }
        });
        assert_eq!(done, vec![20110, 20130]);
        let failed_years: Vec<i32> = failed.iter().map(|(y, _)| *y).collect();
        assert_eq!(failed_years, vec![2012, 2014]);
    }
}
