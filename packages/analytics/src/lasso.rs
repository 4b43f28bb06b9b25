//! Cross-validated Lasso regression by coordinate descent.
//!
//! Minimizes `(1 / 2n) ||y - X w - b||^2 + alpha ||w||_1` over a
//! log-spaced path of `alpha` values. Features are standardized with the
//! training set's column means and population standard deviations before
//! fitting; the intercept is recovered from the centered target.
//!
//! The regularization strength is chosen by contiguous K-fold
//! cross-validation: each fold is held out in turn, the path is fitted on
//! the remaining rows with warm starts, and the alpha with the lowest mean
//! held-out MSE wins.

use housing_gap_analytics_models::RegressionSettings;
use nalgebra::{DMatrix, DVector};

use crate::RegressionError;
use crate::polynomial::PolynomialBasis;

/// A fitted Lasso model over standardized features.
#[derive(Debug, Clone, PartialEq)]
pub struct LassoModel {
    alpha: f64,
    intercept: f64,
    coefficients: DVector<f64>,
    means: DVector<f64>,
    scales: DVector<f64>,
}

impl LassoModel {
    /// Regularization strength of the fit.
    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Intercept in target units.
    #[must_use]
    pub const fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Coefficients on the standardized features.
    #[must_use]
    pub const fn coefficients(&self) -> &DVector<f64> {
        &self.coefficients
    }

    /// Predicts one value per feature row.
    #[must_use]
    pub fn predict(&self, features: &DMatrix<f64>) -> Vec<f64> {
        let standardized = apply_standardization(features, &self.means, &self.scales);
        (standardized * &self.coefficients)
            .iter()
            .map(|v| v + self.intercept)
            .collect()
    }
}

/// Fits a Lasso model, choosing `alpha` by cross-validation.
///
/// # Errors
///
/// Returns [`RegressionError::InsufficientData`] if there are fewer rows
/// than folds (or fewer than two folds), or [`RegressionError::ModelFit`]
/// if the fit produces non-finite coefficients.
pub fn fit_lasso_cv(
    features: &DMatrix<f64>,
    target: &[f64],
    settings: &RegressionSettings,
) -> Result<LassoModel, RegressionError> {
    let n = features.nrows();
    if settings.cv_folds < 2 || n < settings.cv_folds || target.len() != n {
        return Err(RegressionError::InsufficientData {
            message: format!(
                "{n} training rows ({} targets) for {} folds",
                target.len(),
                settings.cv_folds
            ),
        });
    }

    let (means, scales) = standardization(features);
    let x = apply_standardization(features, &means, &scales);
    let y_mean = crate::metrics::mean(target);
    let y = DVector::from_iterator(n, target.iter().map(|v| v - y_mean));

    let alphas = alpha_grid(&x, &y, settings.n_alphas, settings.alpha_ratio);
    let alpha_index = cross_validate(&x, &y, &alphas, settings);
    let alpha = alphas[alpha_index];

    let mut coefficients = DVector::zeros(x.ncols());
    let mut converged = true;
    for &step in &alphas[..=alpha_index] {
        converged = coordinate_descent(
            &x,
            &y,
            step,
            &mut coefficients,
            settings.max_iter,
            settings.tolerance,
        );
    }
    if !converged {
        log::warn!(
            "Lasso did not converge at alpha {alpha:.3e} within {} sweeps",
            settings.max_iter
        );
    }
    if !coefficients.iter().all(|v| v.is_finite()) {
        return Err(RegressionError::ModelFit {
            message: format!("Lasso produced non-finite coefficients at alpha {alpha:.3e}"),
        });
    }

    log::debug!(
        "Lasso alpha {alpha:.3e} ({} of {}), {} non-zero coefficients",
        alpha_index + 1,
        alphas.len(),
        coefficients.iter().filter(|w| **w != 0.0).count()
    );

    Ok(LassoModel {
        alpha,
        intercept: y_mean,
        coefficients,
        means,
        scales,
    })
}

/// A polynomial basis paired with the Lasso fitted on its features.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialLasso {
    basis: PolynomialBasis,
    model: LassoModel,
}

impl PolynomialLasso {
    /// Fits a degree-`degree` polynomial Lasso of `y` on `x`.
    ///
    /// # Errors
    ///
    /// See [`fit_lasso_cv`].
    pub fn fit(
        x: &[f64],
        y: &[f64],
        degree: u32,
        settings: &RegressionSettings,
    ) -> Result<Self, RegressionError> {
        let basis = PolynomialBasis::fit(degree, x);
        let model = fit_lasso_cv(&basis.expand(x), y, settings)?;
        Ok(Self { basis, model })
    }

    /// The fitted Lasso.
    #[must_use]
    pub const fn model(&self) -> &LassoModel {
        &self.model
    }

    /// Predicts one value per input.
    #[must_use]
    pub fn predict(&self, x: &[f64]) -> Vec<f64> {
        self.model.predict(&self.basis.expand(x))
    }
}

/// Log-spaced alphas from `alpha_max = max |x_j . y| / n` down to
/// `alpha_max * ratio`, largest first.
#[must_use]
pub fn alpha_grid(x: &DMatrix<f64>, y: &DVector<f64>, n_alphas: usize, ratio: f64) -> Vec<f64> {
    #[allow(clippy::cast_precision_loss)]
    let n = x.nrows() as f64;
    let alpha_max = x
        .column_iter()
        .map(|column| column.dot(y).abs() / n)
        .fold(0.0, f64::max);

    if n_alphas <= 1 || alpha_max <= 0.0 {
        return vec![alpha_max];
    }

    #[allow(clippy::cast_precision_loss)]
    let last = (n_alphas - 1) as f64;
    (0..n_alphas)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64 / last;
            alpha_max * ratio.powf(t)
        })
        .collect()
}

/// Contiguous `(start, end)` fold ranges. The first `n % k` folds get one
/// extra row.
#[must_use]
pub fn fold_bounds(n: usize, k: usize) -> Vec<(usize, usize)> {
    let base = n / k;
    let extra = n % k;
    let mut start = 0;
    (0..k)
        .map(|fold| {
            let size = base + usize::from(fold < extra);
            let bounds = (start, start + size);
            start += size;
            bounds
        })
        .collect()
}

/// Index into `alphas` of the lowest mean held-out MSE.
fn cross_validate(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    alphas: &[f64],
    settings: &RegressionSettings,
) -> usize {
    let mut path_mse = vec![0.0; alphas.len()];

    for (start, end) in fold_bounds(x.nrows(), settings.cv_folds) {
        let train_rows: Vec<usize> = (0..x.nrows()).filter(|i| *i < start || *i >= end).collect();
        let test_rows: Vec<usize> = (start..end).collect();
        #[allow(clippy::cast_precision_loss)]
        let held_out = test_rows.len().max(1) as f64;

        let x_train = x.select_rows(&train_rows);
        let y_train = y.select_rows(&train_rows);
        let x_test = x.select_rows(&test_rows);
        let y_test = y.select_rows(&test_rows);

        let x_means = column_means(&x_train);
        let y_mean = y_train.mean();
        let x_train = center(&x_train, &x_means);
        let y_train = y_train.add_scalar(-y_mean);
        let x_test = center(&x_test, &x_means);

        let mut w = DVector::zeros(x.ncols());
        for (i, &alpha) in alphas.iter().enumerate() {
            let converged = coordinate_descent(
                &x_train,
                &y_train,
                alpha,
                &mut w,
                settings.max_iter,
                settings.tolerance,
            );
            if !converged {
                log::debug!("Fold {start}..{end}: alpha {alpha:.3e} did not converge");
            }
            let predicted = (&x_test * &w).add_scalar(y_mean);
            path_mse[i] += (&y_test - predicted).norm_squared() / held_out;
        }
    }

    path_mse
        .iter()
        .enumerate()
        .fold((0, f64::INFINITY), |(best_i, best), (i, &mse)| {
            if mse < best { (i, mse) } else { (best_i, best) }
        })
        .0
}

/// Runs coordinate descent sweeps on centered `x`/`y`, updating `w` in
/// place. Returns whether the largest coefficient change in a sweep fell
/// below `tolerance` relative to the largest coefficient.
fn coordinate_descent(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    alpha: f64,
    w: &mut DVector<f64>,
    max_iter: usize,
    tolerance: f64,
) -> bool {
    #[allow(clippy::cast_precision_loss)]
    let n = x.nrows() as f64;
    let norms: Vec<f64> = x.column_iter().map(|c| c.norm_squared() / n).collect();
    let mut residual = y - x * &*w;

    for _ in 0..max_iter {
        let mut max_change = 0.0_f64;
        let mut max_weight = 0.0_f64;

        for (j, &norm) in norms.iter().enumerate() {
            if norm == 0.0 {
                continue;
            }
            let column = x.column(j);
            let old = w[j];
            let rho = column.dot(&residual) / n + norm * old;
            let new = soft_threshold(rho, alpha) / norm;
            residual.axpy(old - new, &column, 1.0);
            w[j] = new;
            max_change = max_change.max((new - old).abs());
            max_weight = max_weight.max(new.abs());
        }

        if max_weight == 0.0 || max_change <= tolerance * max_weight {
            return true;
        }
    }
    false
}

fn soft_threshold(value: f64, threshold: f64) -> f64 {
    if value > threshold {
        value - threshold
    } else if value < -threshold {
        value + threshold
    } else {
        0.0
    }
}

fn column_means(x: &DMatrix<f64>) -> DVector<f64> {
    DVector::from_iterator(x.ncols(), x.column_iter().map(|c| c.mean()))
}

fn center(x: &DMatrix<f64>, means: &DVector<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(x.nrows(), x.ncols(), |i, j| x[(i, j)] - means[j])
}

/// Column means and population standard deviations. Constant columns get
/// a scale of 1.
fn standardization(x: &DMatrix<f64>) -> (DVector<f64>, DVector<f64>) {
    let means = column_means(x);
    let scales = DVector::from_iterator(
        x.ncols(),
        x.column_iter().zip(means.iter()).map(|(c, m)| {
            #[allow(clippy::cast_precision_loss)]
            let n = c.len() as f64;
            let sd = (c.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n).sqrt();
            if sd.is_finite() && sd > 0.0 { sd } else { 1.0 }
        }),
    );
    (means, scales)
}

fn apply_standardization(
    x: &DMatrix<f64>,
    means: &DVector<f64>,
    scales: &DVector<f64>,
) -> DMatrix<f64> {
    DMatrix::from_fn(x.nrows(), x.ncols(), |i, j| (x[(i, j)] - means[j]) / scales[j])
}
