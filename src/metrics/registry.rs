//! Metric catalogue and bootstrap confidence intervals.
//!
//! A [`MetricRegistry`] is an explicit value: the scoring engine receives
//! one at construction, so tests can swap in a minimal or fake catalogue.
//!
//! # Example
//!
//! ```
//! use evaluar::metrics::{CiConfig, MetricRegistry};
//!
//! let registry = MetricRegistry::new();
//! let mae = registry.get("mae").expect("built-in metric");
//!
//! let y_true = [1.0, 2.0, 3.0, 4.0];
//! let y_pred = [1.5, 2.0, 2.5, 4.0];
//! let (low, high) = registry
//!     .confidence_interval(mae, &y_true, &y_pred, None, &CiConfig::default())
//!     .expect("well-formed input");
//! assert!(low <= 0.25 && 0.25 <= high);
//! ```

use super::classification::{self, to_class_indices};
use crate::error::{EvaluarError, Result};
use crate::model_selection::rng_from;
use crate::primitives::Matrix;
use crate::stats::{bootstrap_indices, distinct_count, percentiles};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Prediction task a metric is valid for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemType {
    /// Discrete class labels.
    Classification,
    /// Continuous targets.
    Regression,
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemType::Classification => write!(f, "classification"),
            ProblemType::Regression => write!(f, "regression"),
        }
    }
}

/// What a metric function is scored against.
#[derive(Clone, Copy, Debug)]
pub enum MetricInput<'a> {
    /// Predicted labels (classification) or predicted values (regression).
    Labels(&'a [f32]),
    /// Class probabilities, one row per sample, one column per class.
    Proba(&'a Matrix<f32>),
}

impl MetricInput<'_> {
    /// Number of samples the input covers.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            MetricInput::Labels(v) => v.len(),
            MetricInput::Proba(m) => m.n_rows(),
        }
    }

    /// Returns true when the input covers no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Scoring function: `(y_true, predictions) -> score`, `None` when undefined.
pub type MetricFn = fn(&[f32], MetricInput<'_>) -> Option<f64>;

/// Named, immutable metric descriptor.
#[derive(Clone, Copy, Debug)]
pub struct Metric {
    /// Unique identifier.
    pub name: &'static str,
    /// Task type the metric applies to.
    pub ptype: ProblemType,
    /// Whether the metric consumes probabilities rather than labels.
    pub is_proba: bool,
    /// The scoring computation.
    pub function: MetricFn,
}

impl Metric {
    /// Creates a metric descriptor.
    #[must_use]
    pub const fn new(
        name: &'static str,
        ptype: ProblemType,
        is_proba: bool,
        function: MetricFn,
    ) -> Self {
        Self {
            name,
            ptype,
            is_proba,
            function,
        }
    }

    /// Runs the metric, treating non-finite results as undefined.
    #[must_use]
    pub fn evaluate(&self, y_true: &[f32], input: MetricInput<'_>) -> Option<f64> {
        (self.function)(y_true, input).filter(|v| v.is_finite())
    }
}

/// Bootstrap settings for confidence intervals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CiConfig {
    /// Number of bootstrap resamples.
    pub n_resamples: usize,
    /// Two-sided coverage, e.g. 0.95 for the 2.5th/97.5th percentiles.
    pub confidence: f64,
    /// Seed for the resampling RNG; `None` draws from OS entropy.
    pub random_state: Option<u64>,
}

impl Default for CiConfig {
    fn default() -> Self {
        Self {
            n_resamples: 100,
            confidence: 0.95,
            random_state: Some(42),
        }
    }
}

impl CiConfig {
    /// Set the number of resamples.
    #[must_use]
    pub fn with_n_resamples(mut self, n: usize) -> Self {
        self.n_resamples = n;
        self
    }

    /// Set the interval coverage.
    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Set the resampling seed.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.n_resamples == 0 {
            return Err(EvaluarError::InvalidInput(
                "n_resamples must be at least 1".into(),
            ));
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(EvaluarError::InvalidInput(format!(
                "confidence must be in (0, 1), got {}",
                self.confidence
            )));
        }
        Ok(())
    }
}

/// Outcome of resolving a requested metric-name list.
#[derive(Clone, Debug, Default)]
pub struct Resolved {
    /// Known metrics, in request order.
    pub metrics: Vec<Metric>,
    /// Requested names that the registry does not know.
    pub ignored: Vec<String>,
}

/// Catalogue of available metrics.
#[derive(Clone, Debug)]
pub struct MetricRegistry {
    metrics: Vec<Metric>,
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricRegistry {
    /// Registry holding every built-in metric.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metrics: builtin_metrics(),
        }
    }

    /// Registry with no metrics.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            metrics: Vec::new(),
        }
    }

    /// Adds a metric.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the name is already registered.
    pub fn register(&mut self, metric: Metric) -> Result<()> {
        if self.get(metric.name).is_some() {
            return Err(EvaluarError::InvalidInput(format!(
                "metric '{}' is already registered",
                metric.name
            )));
        }
        self.metrics.push(metric);
        Ok(())
    }

    /// Looks up a metric by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.name == name)
    }

    /// Registered names, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.metrics.iter().map(|m| m.name).collect()
    }

    /// Iterates over registered metrics.
    pub fn iter(&self) -> impl Iterator<Item = &Metric> {
        self.metrics.iter()
    }

    /// Number of registered metrics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Returns true when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Scores `input` against `y_true` with the named metric.
    ///
    /// # Errors
    ///
    /// `UnknownMetric` for an unregistered name, `ShapeMismatch` for
    /// misaligned inputs, `UndefinedMetric` when the metric has no value.
    pub fn call(&self, name: &str, y_true: &[f32], input: MetricInput<'_>) -> Result<f64> {
        let metric = self
            .get(name)
            .ok_or_else(|| EvaluarError::UnknownMetric(name.to_string()))?;
        check_aligned(y_true.len(), input.len())?;
        metric
            .evaluate(y_true, input)
            .ok_or_else(|| EvaluarError::UndefinedMetric(name.to_string()))
    }

    /// Maps requested names onto registered metrics.
    ///
    /// `None` selects every metric in registration order. Unknown names are
    /// dropped with a warning, or rejected when `strict` is set.
    ///
    /// # Errors
    ///
    /// `UnknownMetric` in strict mode.
    pub fn resolve<S: AsRef<str>>(&self, requested: Option<&[S]>, strict: bool) -> Result<Resolved> {
        let Some(requested) = requested else {
            return Ok(Resolved {
                metrics: self.metrics.clone(),
                ignored: Vec::new(),
            });
        };

        let mut resolved = Resolved::default();
        for name in requested {
            let name = name.as_ref();
            match self.get(name) {
                Some(metric) => {
                    if !resolved.metrics.iter().any(|m| m.name == metric.name) {
                        resolved.metrics.push(*metric);
                    }
                }
                None if strict => return Err(EvaluarError::UnknownMetric(name.to_string())),
                None => {
                    warn!(metric = name, "unknown metric requested, ignoring");
                    resolved.ignored.push(name.to_string());
                }
            }
        }
        Ok(resolved)
    }

    /// Bootstrap percentile interval around `metric`'s point estimate.
    ///
    /// The metric sees `y_proba` when it is probability-based and `y_pred`
    /// otherwise. A resample on which the metric is undefined (AUC with a
    /// single class drawn, say) does not collapse the interval: it is
    /// skipped and the percentiles come from the remaining resamples. Only
    /// when fewer than two usable resamples remain, or they hold a single
    /// distinct value, do both bounds equal the point estimate. The
    /// returned interval always contains the point estimate.
    ///
    /// # Errors
    ///
    /// `EmptyDataset` for zero rows, `ShapeMismatch` for misaligned inputs,
    /// `InvalidInput` for a probability metric without probabilities or a
    /// bad `config`, `UndefinedMetric` if the point estimate itself is undefined.
    pub fn confidence_interval(
        &self,
        metric: &Metric,
        y_true: &[f32],
        y_pred: &[f32],
        y_proba: Option<&Matrix<f32>>,
        config: &CiConfig,
    ) -> Result<(f64, f64)> {
        config.validate()?;
        let n = y_true.len();
        if n == 0 {
            return Err(EvaluarError::empty_dataset("no rows to resample"));
        }
        check_aligned(n, y_pred.len())?;
        if let Some(proba) = y_proba {
            check_aligned(n, proba.n_rows())?;
        }

        let input = if metric.is_proba {
            let proba = y_proba.ok_or_else(|| {
                EvaluarError::InvalidInput(format!(
                    "metric '{}' needs probability estimates",
                    metric.name
                ))
            })?;
            MetricInput::Proba(proba)
        } else {
            MetricInput::Labels(y_pred)
        };

        let point = metric
            .evaluate(y_true, input)
            .ok_or_else(|| EvaluarError::UndefinedMetric(metric.name.to_string()))?;

        let mut rng = rng_from(config.random_state);
        let mut samples = Vec::with_capacity(config.n_resamples);
        for _ in 0..config.n_resamples {
            let idx = bootstrap_indices(n, &mut rng);
            let y_b: Vec<f32> = idx.iter().map(|&i| y_true[i]).collect();
            let score = match input {
                MetricInput::Labels(pred) => {
                    let pred_b: Vec<f32> = idx.iter().map(|&i| pred[i]).collect();
                    metric.evaluate(&y_b, MetricInput::Labels(&pred_b))
                }
                MetricInput::Proba(proba) => {
                    let proba_b = proba.select_rows(&idx);
                    metric.evaluate(&y_b, MetricInput::Proba(&proba_b))
                }
            };
            if let Some(score) = score {
                samples.push(score);
            }
        }

        if samples.len() < 2 || distinct_count(&samples) < 2 {
            debug!(
                metric = metric.name,
                usable = samples.len(),
                "degenerate bootstrap, zero-width interval"
            );
            return Ok((point, point));
        }

        let tail = (1.0 - config.confidence) / 2.0 * 100.0;
        let bounds = percentiles(&samples, &[tail, 100.0 - tail])?;
        Ok((bounds[0].min(point), bounds[1].max(point)))
    }
}

fn check_aligned(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(EvaluarError::shape_mismatch("rows", expected, actual));
    }
    Ok(())
}

fn builtin_metrics() -> Vec<Metric> {
    use ProblemType::{Classification, Regression};
    vec![
        Metric::new("auc", Classification, true, auc_metric),
        Metric::new("log_loss", Classification, true, log_loss_metric),
        Metric::new("accuracy", Classification, false, accuracy_metric),
        Metric::new("recall", Classification, false, recall_metric),
        Metric::new("precision", Classification, false, precision_metric),
        Metric::new("f1", Classification, false, f1_metric),
        Metric::new("mae", Regression, false, mae_metric),
        Metric::new("mse", Regression, false, mse_metric),
        Metric::new("rmse", Regression, false, rmse_metric),
        Metric::new("r2", Regression, false, r2_metric),
    ]
}

// Built-in adapters. Each returns None instead of panicking on input the
// underlying metric cannot take.

fn class_pair(y_true: &[f32], input: MetricInput<'_>) -> Option<(Vec<usize>, Vec<usize>)> {
    let MetricInput::Labels(pred) = input else {
        return None;
    };
    if y_true.is_empty() || y_true.len() != pred.len() {
        return None;
    }
    Some((to_class_indices(y_true)?, to_class_indices(pred)?))
}

fn class_proba<'a>(y_true: &[f32], input: MetricInput<'a>) -> Option<(Vec<usize>, &'a Matrix<f32>)> {
    let MetricInput::Proba(proba) = input else {
        return None;
    };
    if y_true.is_empty() || y_true.len() != proba.n_rows() {
        return None;
    }
    Some((to_class_indices(y_true)?, proba))
}

fn value_pair<'a>(y_true: &[f32], input: MetricInput<'a>) -> Option<&'a [f32]> {
    match input {
        MetricInput::Labels(pred) if !pred.is_empty() && pred.len() == y_true.len() => Some(pred),
        _ => None,
    }
}

fn auc_metric(y_true: &[f32], input: MetricInput<'_>) -> Option<f64> {
    let (y, proba) = class_proba(y_true, input)?;
    classification::roc_auc(&y, proba)
}

fn log_loss_metric(y_true: &[f32], input: MetricInput<'_>) -> Option<f64> {
    let (y, proba) = class_proba(y_true, input)?;
    classification::log_loss(&y, proba)
}

fn accuracy_metric(y_true: &[f32], input: MetricInput<'_>) -> Option<f64> {
    let (y, pred) = class_pair(y_true, input)?;
    Some(classification::accuracy(&pred, &y))
}

fn recall_metric(y_true: &[f32], input: MetricInput<'_>) -> Option<f64> {
    let (y, pred) = class_pair(y_true, input)?;
    Some(classification::recall(&pred, &y))
}

fn precision_metric(y_true: &[f32], input: MetricInput<'_>) -> Option<f64> {
    let (y, pred) = class_pair(y_true, input)?;
    Some(classification::precision(&pred, &y))
}

fn f1_metric(y_true: &[f32], input: MetricInput<'_>) -> Option<f64> {
    let (y, pred) = class_pair(y_true, input)?;
    Some(classification::f1_score(&pred, &y))
}

fn mae_metric(y_true: &[f32], input: MetricInput<'_>) -> Option<f64> {
    value_pair(y_true, input).map(|pred| super::mae(pred, y_true))
}

fn mse_metric(y_true: &[f32], input: MetricInput<'_>) -> Option<f64> {
    value_pair(y_true, input).map(|pred| super::mse(pred, y_true))
}

fn rmse_metric(y_true: &[f32], input: MetricInput<'_>) -> Option<f64> {
    value_pair(y_true, input).map(|pred| super::rmse(pred, y_true))
}

fn r2_metric(y_true: &[f32], input: MetricInput<'_>) -> Option<f64> {
    let pred = value_pair(y_true, input)?;
    // R² has no meaning on a constant target.
    if super::total_sum_of_squares(y_true) == 0.0 {
        return None;
    }
    Some(super::r_squared(pred, y_true))
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
