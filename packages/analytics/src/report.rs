//! Assembles the per-year regression report.

use housing_gap_analytics_models::{
    PredictionPoint, RegressionReport, RegressionSettings, ZonePrediction,
};
use housing_gap_income_models::ExpandedZone;

use crate::RegressionError;
use crate::lasso::PolynomialLasso;
use crate::metrics::{mean_squared_error, r2_score};
use crate::selection::select_degree;
use crate::split::train_test_split;

/// Marker size for plotting: total affordable housing, capped so the
/// metro aggregate does not dwarf every zone.
#[must_use]
pub fn display_size(total_affordable_housing: u64, cap: u64) -> u64 {
    total_affordable_housing.min(cap)
}

/// Fits the ratio model for one snapshot year and builds its report.
///
/// The input zones are only read; ratios and incomes are never altered.
///
/// # Errors
///
/// Returns [`RegressionError`] if there are too few zones or a fit fails.
pub fn fit_report(
    year: i32,
    zones: &[ExpandedZone],
    settings: &RegressionSettings,
) -> Result<RegressionReport, RegressionError> {
    let samples: Vec<(f64, f64)> = zones.iter().map(|z| (income(z), z.housing_ratio)).collect();
    let (train, test) = train_test_split(&samples, settings.test_fraction, settings.seed)?;

    let (x_train, y_train): (Vec<f64>, Vec<f64>) = train.into_iter().unzip();
    let (x_test, y_test): (Vec<f64>, Vec<f64>) = test.into_iter().unzip();

    let selection = select_degree(&x_train, &y_train, settings)?;
    let model = PolynomialLasso::fit(&x_train, &y_train, selection.degree, settings)?;

    let y_predicted = model.predict(&x_test);
    let test_mse = mean_squared_error(&y_test, &y_predicted);
    let r2 = r2_score(&y_test, &y_predicted);
    log::info!("{year}: degree {}, test MSE {test_mse:.6e}, R2 {r2:.4}", selection.degree);

    let incomes: Vec<u32> = (settings.curve_start..settings.curve_end)
        .step_by(settings.curve_step.max(1) as usize)
        .collect();
    let curve_x: Vec<f64> = incomes.iter().map(|&i| f64::from(i)).collect();
    let curve = incomes
        .into_iter()
        .zip(model.predict(&curve_x))
        .map(|(income, ratio)| PredictionPoint { income, ratio })
        .collect();

    let zone_x: Vec<f64> = zones.iter().map(income).collect();
    let predictions = zones
        .iter()
        .zip(model.predict(&zone_x))
        .map(|(zone, predicted)| ZonePrediction {
            zone: zone.profile.zone,
            borough: zone.borough,
            median_income: zone.profile.median_income,
            actual_ratio: zone.housing_ratio,
            predicted_ratio: predicted,
            error: predicted - zone.housing_ratio,
            display_size: display_size(zone.total_affordable_housing, settings.display_cap),
        })
        .collect();

    Ok(RegressionReport {
        year,
        degree: selection.degree,
        training_mse: selection.training_mse,
        test_mse,
        r2,
        alpha: model.model().alpha(),
        train_size: x_train.len(),
        test_size: x_test.len(),
        trials: selection.trials,
        curve,
        zones: predictions,
    })
}

fn income(zone: &ExpandedZone) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let median = zone.profile.median_income as f64;
    median
}

#[cfg(test)]
mod tests {
    use housing_gap_geography_models::{ZoneBorough, ZoneCode};
    use housing_gap_housing_models::TierValues;
    use housing_gap_income_models::{
        BracketAllocation, BracketFractions, HouseholdEstimate, IncomeBracket, ZoneIncomeProfile,
    };

    use super::*;

    fn zone(code: u32, median: u64, ratio: f64, housing: u64) -> ExpandedZone {
        let estimate = HouseholdEstimate {
            raw_cumulative: TierValues::default(),
            households: TierValues::default(),
            clamped: false,
        };
        ExpandedZone {
            profile: ZoneIncomeProfile {
                zone: ZoneCode::new(code).unwrap(),
                total_households: 1000,
                median_income: median,
                mean_income: median,
                brackets: BracketFractions::new([0.1; IncomeBracket::COUNT]),
            },
            total_affordable_housing: housing,
            housing_ratio: ratio,
            allocation: BracketAllocation::new(&estimate, TierValues::default()),
            borough: ZoneBorough::Other,
        }
    }

    fn zones() -> Vec<ExpandedZone> {
        (0..80u32)
            .map(|i| {
                let median = 25_000 + u64::from(i) * 2_500;
                #[allow(clippy::cast_precision_loss)]
                let x = median as f64;
                let wobble = if i % 3 == 0 { 0.004 } else { -0.002 };
                let ratio = 0.3 * (-x / 60_000.0).exp() + wobble;
                zone(10_001 + i, median, ratio, u64::from(i) * 1_000)
            })
            .collect()
    }

    #[test]
    fn report_covers_curve_and_every_zone() {
        let zones = zones();
        let settings = RegressionSettings::default();
        let report = fit_report(2016, &zones, &settings).unwrap();

        assert_eq!(report.year, 2016);
        assert_eq!(report.test_size, 20);
        assert_eq!(report.train_size, 60);
        assert!(report.degree >= 1 && report.degree <= settings.max_degree);
        assert!(report.training_mse <= report.trials[0].training_mse);

        assert_eq!(report.curve.len(), 200);
        assert_eq!(report.curve[0].income, 0);
        assert_eq!(report.curve[199].income, 199_000);

        assert_eq!(report.zones.len(), zones.len());
        for (prediction, zone) in report.zones.iter().zip(&zones) {
            assert_eq!(prediction.zone, zone.profile.zone);
            assert!((prediction.actual_ratio - zone.housing_ratio).abs() < f64::EPSILON);
            assert!(
                (prediction.error - (prediction.predicted_ratio - prediction.actual_ratio)).abs()
                    < 1e-12
            );
        }
        assert!(report.r2 > 0.5, "r2 {}", report.r2);
    }

    #[test]
    fn display_size_is_capped_without_touching_inputs() {
        let mut zones = zones();
        zones[0].total_affordable_housing = 180_000;
        let report = fit_report(2016, &zones, &RegressionSettings::default()).unwrap();
        assert_eq!(report.zones[0].display_size, 50_000);
        assert_eq!(zones[0].total_affordable_housing, 180_000);
        assert_eq!(display_size(42, 50_000), 42);
    }

    #[test]
    fn too_few_zones_is_insufficient_data() {
        let err = fit_report(2016, &zones()[..1], &RegressionSettings::default()).unwrap_err();
        assert!(matches!(err, RegressionError::InsufficientData { .. }), "{err}");
    }
}
