//! Seeded train/test split.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::RegressionError;

/// Number of held-out items: `ceil(test_fraction * n)`.
#[must_use]
pub fn test_size(n: usize, test_fraction: f64) -> usize {
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let size = (test_fraction * n as f64).ceil().max(0.0) as usize;
    size.min(n)
}

/// Shuffles `items` with a seeded generator and returns
/// `(train, test)`, with the first `test_size` shuffled items held out.
///
/// # Errors
///
/// Returns [`RegressionError::InsufficientData`] if either side would be
/// empty.
pub fn train_test_split<T: Clone>(
    items: &[T],
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<T>, Vec<T>), RegressionError> {
    let n_test = test_size(items.len(), test_fraction);
    if n_test == 0 || n_test >= items.len() {
        return Err(RegressionError::InsufficientData {
            message: format!(
                "cannot split {} zones with test fraction {test_fraction}",
                items.len()
            ),
        });
    }

    let mut indices: Vec<usize> = (0..items.len()).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test = indices[..n_test].iter().map(|&i| items[i].clone()).collect();
    let train = indices[n_test..].iter().map(|&i| items[i].clone()).collect();
    Ok((train, test))
}
