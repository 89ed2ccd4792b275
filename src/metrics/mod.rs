//! Evaluation metrics for fitted models.
//!
//! Includes regression metrics (R², MSE, MAE, RMSE), classification
//! metrics (accuracy, precision, recall, F1, ROC AUC, log loss) and the
//! [`registry`] that names them for the scoring engine.

pub mod classification;
pub mod registry;

pub use registry::{CiConfig, Metric, MetricFn, MetricInput, MetricRegistry, ProblemType};

/// Computes the coefficient of determination (R²).
///
/// R² = 1 - (`SS_res` / `SS_tot`)
///
/// Returns 0.0 when `y_true` is constant (`SS_tot` = 0).
///
/// # Examples
///
/// ```
/// use evaluar::metrics::r_squared;
///
/// let y_true = [3.0, -0.5, 2.0, 7.0];
/// let y_pred = [2.5, 0.0, 2.0, 8.0];
/// let r2 = r_squared(&y_pred, &y_true);
/// assert!(r2 > 0.9);
/// ```
///
/// # Panics
///
/// Panics if slices have different lengths.
#[must_use]
pub fn r_squared(y_pred: &[f32], y_true: &[f32]) -> f64 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");

    let ss_tot = total_sum_of_squares(y_true);
    if ss_tot == 0.0 {
        return 0.0;
    }

    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(&t, &p)| (f64::from(t) - f64::from(p)).powi(2))
        .sum();

    1.0 - (ss_res / ss_tot)
}

/// Sum of squared deviations from the mean.
pub(crate) fn total_sum_of_squares(y: &[f32]) -> f64 {
    if y.is_empty() {
        return 0.0;
    }
    let mean = y.iter().map(|&v| f64::from(v)).sum::<f64>() / y.len() as f64;
    y.iter().map(|&v| (f64::from(v) - mean).powi(2)).sum()
}

/// Computes the Mean Squared Error (MSE).
///
/// MSE = (1/n) * `Σ(y_true` - `y_pred)²`
///
/// # Examples
///
/// ```
/// use evaluar::metrics::mse;
///
/// let y_true = [3.0, -0.5, 2.0, 7.0];
/// let y_pred = [2.5, 0.0, 2.0, 8.0];
/// assert!((mse(&y_pred, &y_true) - 0.375).abs() < 1e-9);
/// ```
///
/// # Panics
///
/// Panics if slices have different lengths or are empty.
#[must_use]
pub fn mse(y_pred: &[f32], y_true: &[f32]) -> f64 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
    assert!(!y_true.is_empty(), "Vectors cannot be empty");

    let sum_sq_error: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(&t, &p)| (f64::from(t) - f64::from(p)).powi(2))
        .sum();

    sum_sq_error / y_true.len() as f64
}

/// Computes the Mean Absolute Error (MAE).
///
/// MAE = (1/n) * `Σ|y_true` - `y_pred`|
///
/// # Examples
///
/// ```
/// use evaluar::metrics::mae;
///
/// let y_true = [3.0, -0.5, 2.0, 7.0];
/// let y_pred = [2.5, 0.0, 2.0, 8.0];
/// assert!((mae(&y_pred, &y_true) - 0.5).abs() < 1e-9);
/// ```
///
/// # Panics
///
/// Panics if slices have different lengths or are empty.
#[must_use]
pub fn mae(y_pred: &[f32], y_true: &[f32]) -> f64 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
    assert!(!y_true.is_empty(), "Vectors cannot be empty");

    let sum_abs_error: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(&t, &p)| (f64::from(t) - f64::from(p)).abs())
        .sum();

    sum_abs_error / y_true.len() as f64
}

/// Computes the Root Mean Squared Error (RMSE).
///
/// # Panics
///
/// Panics if slices have different lengths or are empty.
#[must_use]
pub fn rmse(y_pred: &[f32], y_true: &[f32]) -> f64 {
    mse(y_pred, y_true).sqrt()
}

#[cfg(test)]
#[path = "tests_regression_contract.rs"]
mod tests_regression_contract;
