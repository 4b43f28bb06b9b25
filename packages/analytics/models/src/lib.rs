#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Settings and output types for the ratio regression.
//!
//! [`RegressionSettings`] is read from the `[regression]` table of the
//! pipeline config; every field has a default. [`RegressionReport`] is
//! written as JSON once per snapshot year.

use housing_gap_geography_models::{ZoneBorough, ZoneCode};
use serde::{Deserialize, Serialize};

/// Tunables for degree selection, the Lasso refit, and the outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RegressionSettings {
    /// Fraction of zones held out for evaluation.
    pub test_fraction: f64,
    /// Seed for the train/test shuffle.
    pub seed: u64,
    /// Highest polynomial degree tried.
    pub max_degree: u32,
    /// Relative training-error improvement a higher degree must beat.
    pub min_improvement: f64,
    /// Contiguous cross-validation folds for the Lasso.
    pub cv_folds: usize,
    /// Number of regularization strengths on the Lasso path.
    pub n_alphas: usize,
    /// Smallest alpha on the path as a fraction of the largest.
    pub alpha_ratio: f64,
    /// Coordinate descent sweep limit per alpha.
    pub max_iter: usize,
    /// Coordinate descent convergence tolerance.
    pub tolerance: f64,
    /// First income on the prediction curve.
    pub curve_start: u32,
    /// Exclusive upper income of the prediction curve.
    pub curve_end: u32,
    /// Income step of the prediction curve.
    pub curve_step: u32,
    /// Cap applied to the display-size column.
    pub display_cap: u64,
}

impl Default for RegressionSettings {
    fn default() -> Self {
        Self {
            test_fraction: 0.25,
            seed: 10_000,
            max_degree: 11,
            min_improvement: 0.05,
            cv_folds: 5,
            n_alphas: 100,
            alpha_ratio: 1e-3,
            max_iter: 1_000,
            tolerance: 1e-4,
            curve_start: 0,
            curve_end: 200_000,
            curve_step: 1_000,
            display_cap: 50_000,
        }
    }
}

/// Outcome of testing one polynomial degree during selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DegreeTrial {
    /// Polynomial degree.
    pub degree: u32,
    /// Training mean squared error of the least-squares fit.
    pub training_mse: f64,
    /// Whether the degree improved enough to be kept.
    pub accepted: bool,
}

/// One point of the dense income -> ratio curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionPoint {
    /// Median income in dollars.
    pub income: u32,
    /// Predicted housing-to-households ratio.
    pub ratio: f64,
}

/// Model output for one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZonePrediction {
    /// Postal zone.
    pub zone: ZoneCode,
    /// Borough label.
    pub borough: ZoneBorough,
    /// Median income in dollars.
    pub median_income: u64,
    /// Observed housing-to-households ratio.
    pub actual_ratio: f64,
    /// Model prediction at the zone's median income.
    pub predicted_ratio: f64,
    /// `predicted_ratio - actual_ratio`.
    pub error: f64,
    /// Total affordable housing capped for display.
    pub display_size: u64,
}

/// Everything the regression produces for one snapshot year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegressionReport {
    /// Snapshot year.
    pub year: i32,
    /// Selected polynomial degree.
    pub degree: u32,
    /// Training MSE of the selected degree's least-squares fit.
    pub training_mse: f64,
    /// Held-out MSE of the Lasso model.
    pub test_mse: f64,
    /// Held-out coefficient of determination of the Lasso model.
    pub r2: f64,
    /// Regularization strength chosen by cross-validation.
    pub alpha: f64,
    /// Zones used for fitting.
    pub train_size: usize,
    /// Zones held out.
    pub test_size: usize,
    /// Every degree tried during selection.
    pub trials: Vec<DegreeTrial>,
    /// Dense prediction curve.
    pub curve: Vec<PredictionPoint>,
    /// Per-zone predictions.
    pub zones: Vec<ZonePrediction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_fill_defaults() {
        let settings: RegressionSettings = toml::from_str("max_degree = 4\nseed = 7\n").unwrap();
        assert_eq!(settings.max_degree, 4);
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.cv_folds, 5);
        assert!((settings.test_fraction - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn report_serializes_camel_case() {
        let report = RegressionReport {
            year: 2016,
            degree: 2,
            training_mse: 0.001,
            test_mse: 0.002,
            r2: 0.5,
            alpha: 0.0001,
            train_size: 3,
            test_size: 1,
            trials: vec![],
            curve: vec![PredictionPoint {
                income: 0,
                ratio: 0.1,
            }],
            zones: vec![],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["trainingMse"], 0.001);
        assert_eq!(json["curve"][0]["income"], 0);
    }
}
