//! Regression scores.

/// Mean squared error. `NaN` for empty input.
#[must_use]
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    debug_assert_eq!(actual.len(), predicted.len());
    #[allow(clippy::cast_precision_loss)]
    let n = actual.len() as f64;
    sum_squared_residuals(actual, predicted) / n
}

/// Coefficient of determination.
///
/// When every actual value is equal the score is 1.0 for a perfect fit
/// and 0.0 otherwise.
#[must_use]
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> f64 {
    let residual = sum_squared_residuals(actual, predicted);
    let mean = mean(actual);
    let total: f64 = actual.iter().map(|y| (y - mean).powi(2)).sum();

    if total == 0.0 {
        return if residual == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - residual / total
}

/// Arithmetic mean. `NaN` for empty input.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f64;
    values.iter().sum::<f64>() / n
}

fn sum_squared_residuals(actual: &[f64], predicted: &[f64]) -> f64 {
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mse_of_known_residuals() {
        let mse = mean_squared_error(&[1.0, 2.0, 3.0], &[1.0, 3.0, 5.0]);
        assert!((mse - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn r2_perfect_and_mean_predictor() {
        let y = [0.1, 0.4, 0.2, 0.7];
        assert!((r2_score(&y, &y) - 1.0).abs() < 1e-12);
        let m = mean(&y);
        assert!(r2_score(&y, &[m; 4]).abs() < 1e-12);
    }

    #[test]
    fn r2_constant_target() {
        assert!((r2_score(&[0.5, 0.5], &[0.5, 0.5]) - 1.0).abs() < f64::EPSILON);
        assert!(r2_score(&[0.5, 0.5], &[0.4, 0.6]).abs() < f64::EPSILON);
    }
}
