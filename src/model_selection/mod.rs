//! Seeded row partitioning.
//!
//! `Dataset::split` and the bootstrap helpers in [`crate::stats`] draw all
//! their randomness through here so a single seed reproduces a run.

use crate::error::{EvaluarError, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Builds the RNG for a given seed, falling back to OS entropy.
pub(crate) fn rng_from(random_state: Option<u64>) -> StdRng {
    match random_state {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Shuffles indices with optional random seed.
#[must_use]
pub fn shuffle_indices(n_samples: usize, random_state: Option<u64>) -> Vec<usize> {
    use rand::seq::SliceRandom;

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = rng_from(random_state);
    indices.shuffle(&mut rng);
    indices
}

/// Computes the sizes of the two parts of a `ratio : 1 - ratio` split.
///
/// The first part receives `round(n_samples * ratio)` rows.
///
/// # Errors
///
/// Returns `InvalidInput` if `ratio` is outside (0, 1) or either part
/// would be empty.
pub fn split_sizes(n_samples: usize, ratio: f64) -> Result<(usize, usize)> {
    if !(ratio > 0.0 && ratio < 1.0) {
        return Err(EvaluarError::InvalidInput(format!(
            "split ratio must be between 0 and 1, got {ratio}"
        )));
    }

    let n_first = (n_samples as f64 * ratio).round() as usize;
    let n_second = n_samples - n_first.min(n_samples);

    if n_first == 0 || n_second == 0 {
        return Err(EvaluarError::InvalidInput(format!(
            "split would result in an empty part (n_first={n_first}, n_second={n_second})"
        )));
    }

    Ok((n_first, n_second))
}

/// Randomly partitions `0..n_samples` into two index sets.
///
/// # Example
///
/// ```rust
/// use evaluar::model_selection::split_indices;
///
/// let (first, second) = split_indices(10, 0.8, Some(42)).expect("valid split");
/// assert_eq!(first.len(), 8);
/// assert_eq!(second.len(), 2);
/// ```
///
/// # Errors
///
/// Propagates [`split_sizes`] validation errors.
pub fn split_indices(
    n_samples: usize,
    ratio: f64,
    random_state: Option<u64>,
) -> Result<(Vec<usize>, Vec<usize>)> {
    let (n_first, _) = split_sizes(n_samples, ratio)?;
    let mut indices = shuffle_indices(n_samples, random_state);
    let second = indices.split_off(n_first);
    Ok((indices, second))
}
