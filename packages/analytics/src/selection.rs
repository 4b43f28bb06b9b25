//! Polynomial degree selection by incremental improvement.

use housing_gap_analytics_models::{DegreeTrial, RegressionSettings};

use crate::RegressionError;
use crate::metrics::mean_squared_error;
use crate::polynomial::PolynomialFit;

/// The chosen degree and how it was reached.
#[derive(Debug, Clone, PartialEq)]
pub struct DegreeSelection {
    /// Selected polynomial degree.
    pub degree: u32,
    /// Training MSE of the selected degree.
    pub training_mse: f64,
    /// Every degree tried, in order.
    pub trials: Vec<DegreeTrial>,
}

/// Tries degrees `1..=max_degree` on the training set and keeps raising
/// the degree while each step lowers the training MSE by more than
/// `min_improvement` (relative). Stops at the first degree that does not.
///
/// Degree 1 is always kept.
///
/// # Errors
///
/// Returns [`RegressionError::ModelFit`] if `max_degree` is zero or the
/// degree 1 fit fails.
pub fn select_degree(
    x: &[f64],
    y: &[f64],
    settings: &RegressionSettings,
) -> Result<DegreeSelection, RegressionError> {
    if settings.max_degree == 0 {
        return Err(RegressionError::ModelFit {
            message: "max_degree must be at least 1".to_string(),
        });
    }

    let mut best: Option<(u32, f64)> = None;
    let mut trials = Vec::new();

    for degree in 1..=settings.max_degree {
        let fit = match PolynomialFit::least_squares(x, y, degree) {
            Ok(fit) => fit,
            Err(e) if best.is_some() => {
                log::debug!("Stopping degree search at {degree}: {e}");
                break;
            }
            Err(e) => return Err(e),
        };
        let error = mean_squared_error(y, &fit.predict(x));

        let accepted = match best {
            None => error.is_finite(),
            Some((_, best_error)) => {
                error < best_error && 1.0 - error / best_error > settings.min_improvement
            }
        };
        log::debug!("Degree {degree}: training MSE {error:.6e}, accepted {accepted}");
        trials.push(DegreeTrial {
            degree,
            training_mse: error,
            accepted,
        });

        if !accepted {
            break;
        }
        best = Some((degree, error));
    }

    let (degree, training_mse) = best.ok_or_else(|| RegressionError::ModelFit {
        message: "degree 1 fit has non-finite training error".to_string(),
    })?;

    log::info!("Selected polynomial degree {degree} (training MSE {training_mse:.6e})");
    Ok(DegreeSelection {
        degree,
        training_mse,
        trials,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incomes() -> Vec<f64> {
        (0..50).map(|i| 10_000.0 + f64::from(i) * 4_000.0).collect()
    }

    #[test]
    fn linear_data_keeps_degree_one() {
        let x = incomes();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, v)| 0.2 - 5e-7 * v + if i % 2 == 0 { 0.01 } else { -0.01 })
            .collect();
        let selection = select_degree(&x, &y, &RegressionSettings::default()).unwrap();
        assert_eq!(selection.degree, 1, "trials: {:?}", selection.trials);
        assert_eq!(selection.trials[0].degree, 1);
        assert!(selection.trials[0].accepted);
        assert!(selection.trials[1..].iter().all(|t| !t.accepted));
    }

    #[test]
    fn curved_data_selects_higher_degree() {
        let x = incomes();
        let y: Vec<f64> = x.iter().map(|v| (v / 40_000.0).sin() * 0.1 + 0.1).collect();
        let selection = select_degree(&x, &y, &RegressionSettings::default()).unwrap();
        assert!(selection.degree >= 2, "selected {}", selection.degree);
    }

    #[test]
    fn never_exceeds_max_degree_and_beats_degree_one() {
        let x = incomes();
        let y: Vec<f64> = x.iter().map(|v| (v / 25_000.0).cos() * 0.05 + 0.08).collect();
        for max_degree in 1..=6 {
            let settings = RegressionSettings {
                max_degree,
                ..RegressionSettings::default()
            };
            let selection = select_degree(&x, &y, &settings).unwrap();
            assert!(selection.degree <= max_degree);
            assert!(selection.training_mse <= selection.trials[0].training_mse);
            assert!(selection.trials.len() <= max_degree as usize);
        }
    }

    #[test]
    fn zero_max_degree_is_rejected() {
        let settings = RegressionSettings {
            max_degree: 0,
            ..RegressionSettings::default()
        };
        assert!(select_degree(&incomes(), &incomes(), &settings).is_err());
    }
}
