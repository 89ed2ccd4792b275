//! Descriptive statistics used by the confidence-interval estimator.
//!
//! Quantiles follow the R-7 linear interpolation method (Hyndman & Fan
//! 1996), the default in R and `NumPy`.

use crate::error::{EvaluarError, Result};
use rand::distributions::{Distribution, Uniform};
use rand::Rng;

/// Computes several percentiles (0-100) with a single sort.
///
/// NaN values must be filtered out beforehand.
///
/// # Examples
///
/// ```
/// use evaluar::stats::percentiles;
///
/// let p = percentiles(&[1.0, 2.0, 3.0, 4.0, 5.0], &[25.0, 50.0, 75.0]).expect("valid data");
/// assert_eq!(p, vec![2.0, 3.0, 4.0]);
/// ```
///
/// # Errors
///
/// Returns `InvalidInput` if the data is empty, contains NaN, or a
/// percentile is outside [0, 100].
pub fn percentiles(data: &[f64], percentiles: &[f64]) -> Result<Vec<f64>> {
    if data.is_empty() {
        return Err(EvaluarError::InvalidInput(
            "cannot compute percentiles of empty data".into(),
        ));
    }
    if data.iter().any(|v| v.is_nan()) {
        return Err(EvaluarError::InvalidInput(
            "cannot compute percentiles of NaN values".into(),
        ));
    }
    for &p in percentiles {
        if !(0.0..=100.0).contains(&p) {
            return Err(EvaluarError::InvalidInput(format!(
                "percentile must be in [0, 100], got {p}"
            )));
        }
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    Ok(percentiles
        .iter()
        .map(|&p| {
            // R-7: h = (n - 1) * q
            let h = (n - 1) as f64 * (p / 100.0);
            let lo = h.floor() as usize;
            let hi = h.ceil() as usize;
            if lo == hi {
                sorted[lo]
            } else {
                sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
            }
        })
        .collect())
}

/// Draws `n_samples` row indices uniformly with replacement.
///
/// # Panics
///
/// Panics if `n_samples` is zero.
pub fn bootstrap_indices<R: Rng + ?Sized>(n_samples: usize, rng: &mut R) -> Vec<usize> {
    let dist = Uniform::from(0..n_samples);
    (0..n_samples).map(|_| dist.sample(rng)).collect()
}

/// Number of distinct values, treating values within `1e-12` as equal.
#[must_use]
pub fn distinct_count(values: &[f64]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup_by(|a, b| (*a - *b).abs() <= 1e-12);
    sorted.len()
}
