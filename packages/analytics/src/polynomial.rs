//! Polynomial features of a single input and their least-squares fit.
//!
//! Incomes are centered and scaled before being raised to a power so
//! that high degrees stay well conditioned. The affine rescaling spans the
//! same polynomial space, so least-squares predictions are unaffected.

use nalgebra::{DMatrix, DVector};

use crate::RegressionError;

/// SVD singular value cutoffs, tried strictest first.
const SVD_TOLERANCES: [f64; 3] = [1e-12, 1e-10, 1e-8];

/// Maps an input to the powers `z, z^2, ..., z^degree` of its
/// standardized value `z`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolynomialBasis {
    degree: u32,
    center: f64,
    scale: f64,
}

impl PolynomialBasis {
    /// Fits the standardization of `x` (mean and population standard
    /// deviation). A constant input keeps a scale of 1.
    #[must_use]
    pub fn fit(degree: u32, x: &[f64]) -> Self {
        let center = crate::metrics::mean(x);
        #[allow(clippy::cast_precision_loss)]
        let n = x.len() as f64;
        let variance = x.iter().map(|v| (v - center).powi(2)).sum::<f64>() / n;
        let scale = if variance.is_finite() && variance > 0.0 {
            variance.sqrt()
        } else {
            1.0
        };
        let center = if center.is_finite() { center } else { 0.0 };

        Self {
            degree,
            center,
            scale,
        }
    }

    /// Polynomial degree.
    #[must_use]
    pub const fn degree(&self) -> u32 {
        self.degree
    }

    /// Number of feature columns produced by [`Self::expand`].
    #[must_use]
    pub const fn width(&self) -> usize {
        self.degree as usize
    }

    /// Feature matrix with one row per input and one column per power.
    #[must_use]
    pub fn expand(&self, x: &[f64]) -> DMatrix<f64> {
        DMatrix::from_fn(x.len(), self.width(), |i, j| self.power(x[i], j + 1))
    }

    /// Design matrix with a leading intercept column of ones.
    #[must_use]
    pub fn design(&self, x: &[f64]) -> DMatrix<f64> {
        DMatrix::from_fn(x.len(), self.width() + 1, |i, j| self.power(x[i], j))
    }

    fn power(&self, x: f64, exponent: usize) -> f64 {
        let z = (x - self.center) / self.scale;
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let exponent = exponent as i32;
        z.powi(exponent)
    }
}

/// Ordinary least-squares polynomial fit.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialFit {
    basis: PolynomialBasis,
    coefficients: DVector<f64>,
}

impl PolynomialFit {
    /// Fits `y ≈ c0 + c1 z + ... + cd z^d` by least squares.
    ///
    /// # Errors
    ///
    /// Returns [`RegressionError::InsufficientData`] for empty input, or
    /// [`RegressionError::ModelFit`] if the system cannot be solved.
    pub fn least_squares(x: &[f64], y: &[f64], degree: u32) -> Result<Self, RegressionError> {
        if x.is_empty() || x.len() != y.len() {
            return Err(RegressionError::InsufficientData {
                message: format!("{} inputs for {} targets", x.len(), y.len()),
            });
        }

        let basis = PolynomialBasis::fit(degree, x);
        let design = basis.design(x);
        let target = DVector::from_column_slice(y);
        let coefficients =
            solve_least_squares(&design, &target).ok_or_else(|| RegressionError::ModelFit {
                message: format!("least squares did not converge for degree {degree}"),
            })?;

        Ok(Self {
            basis,
            coefficients,
        })
    }

    /// Polynomial degree.
    #[must_use]
    pub const fn degree(&self) -> u32 {
        self.basis.degree()
    }

    /// Predicts one value per input.
    #[must_use]
    pub fn predict(&self, x: &[f64]) -> Vec<f64> {
        (self.basis.design(x) * &self.coefficients)
            .iter()
            .copied()
            .collect()
    }
}

/// Solves `min ||x b - y||` through SVD, loosening the singular value
/// cutoff until a finite solution appears.
#[must_use]
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);
    SVD_TOLERANCES.iter().find_map(|&tol| {
        svd.solve(y, tol)
            .ok()
            .filter(|beta| beta.iter().all(|v| v.is_finite()))
    })
}
