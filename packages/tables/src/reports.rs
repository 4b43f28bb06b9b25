//! JSON regression reports.

use std::path::Path;

use housing_gap_analytics_models::{PredictionPoint, RegressionReport};
use serde::{Deserialize, Serialize};

use crate::TableError;
use crate::paths::ensure_parent;

/// One year's line in the combined predictions file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearPrediction {
    /// Snapshot year.
    pub year: i32,
    /// Selected polynomial degree.
    pub degree: u32,
    /// Held-out mean squared error.
    pub mse: f64,
    /// Held-out coefficient of determination.
    pub r2: f64,
    /// Dense prediction curve.
    pub curve: Vec<PredictionPoint>,
}

impl From<&RegressionReport> for YearPrediction {
    fn from(report: &RegressionReport) -> Self {
        Self {
            year: report.year,
            degree: report.degree,
            mse: report.test_mse,
            r2: report.r2,
            curve: report.curve.clone(),
        }
    }
}

/// Every successful year's prediction curve, for overlaying.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionsSummary {
    /// One entry per year, in run order.
    pub years: Vec<YearPrediction>,
}

/// Writes a regression report as pretty JSON.
///
/// # Errors
///
/// Returns [`TableError`] if the file cannot be created or serialized.
pub fn write_report_file(path: &Path, report: &RegressionReport) -> Result<(), TableError> {
    write_json(path, report)?;
    log::info!("Wrote {} regression report to {}", report.year, path.display());
    Ok(())
}

/// Writes the combined predictions file as pretty JSON.
///
/// # Errors
///
/// Returns [`TableError`] if the file cannot be created or serialized.
pub fn write_predictions_file(path: &Path, summary: &PredictionsSummary) -> Result<(), TableError> {
    write_json(path, summary)?;
    log::info!(
        "Wrote predictions for {} years to {}",
        summary.years.len(),
        path.display()
    );
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), TableError> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_takes_held_out_scores() {
        let report = RegressionReport {
            year: 2019,
            degree: 3,
            training_mse: 0.1,
            test_mse: 0.2,
            r2: 0.7,
            alpha: 0.01,
            train_size: 9,
            test_size: 3,
            trials: vec![],
            curve: vec![PredictionPoint {
                income: 1_000,
                ratio: 0.05,
            }],
            zones: vec![],
        };
        let line = YearPrediction::from(&report);
        assert_eq!(line.year, 2019);
        assert!((line.mse - 0.2).abs() < f64::EPSILON);
        assert_eq!(line.curve, report.curve);

        let json = serde_json::to_string(&PredictionsSummary { years: vec![line] }).unwrap();
        let back: PredictionsSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.years[0].degree, 3);
    }
}
