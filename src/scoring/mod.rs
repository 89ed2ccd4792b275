//! Model scoring: metric values with confidence intervals, and a check of
//! how well the test set resembles the training set.
//!
//! Two reports are produced:
//!
//! | Report | Output | Meaning |
//! |--------|--------|---------|
//! | Value | metric name → score, CI low, CI high | How well the model does on the test set |
//! | Quality | `f64` in [0, 1] | How indistinguishable test rows are from training rows |
//!
//! The quality score trains an auxiliary random forest to tell training rows
//! from test rows. An AUC near 0.5 means the forest cannot separate them
//! (quality near 1.0); an AUC near 1.0 means the test set was drawn from a
//! different distribution (quality near 0.0).
//!
//! # Example
//!
//! ```
//! use evaluar::prelude::*;
//!
//! struct Echo;
//!
//! impl Predictor for Echo {
//!     fn predict(&self, x: Features<'_>) -> Result<Vector<f32>> {
//!         Ok(x.matrix().column(0))
//!     }
//! }
//!
//! let values = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).expect("valid shape");
//! let test = Dataset::new(values, Vector::from_slice(&[1.0, 2.0, 3.0, 4.0])).expect("aligned");
//!
//! let scoring = Scoring::new(ScoringConfig::default().with_metrics(["mae", "r2"]))
//!     .expect("known metrics");
//! let report = scoring
//!     .score_value_report(ModelRef::Point(&Echo), &test, None, None)
//!     .expect("scored");
//! assert_eq!(report["mae"].score_value, 0.0);
//! assert_eq!(report["r2"].score_value, 1.0);
//! ```

mod config;
mod report;

pub use config::{ScoringConfig, SeparationConfig};
pub use report::{ScoreEntry, ScoringReport, ValueReport};

use crate::data::Dataset;
use crate::error::{EvaluarError, Result};
use crate::metrics::classification::binary_roc_auc;
use crate::metrics::{Metric, MetricInput, MetricRegistry, ProblemType};
use crate::primitives::{Matrix, Vector};
use crate::traits::ModelRef;
use crate::tree::RandomForestClassifier;
use std::borrow::Cow;
use std::iter;
use tracing::{debug, info, warn};

/// Scoring engine bound to a metric registry and a configuration.
#[derive(Clone, Debug)]
pub struct Scoring {
    config: ScoringConfig,
    registry: MetricRegistry,
    metrics: Vec<Metric>,
}

impl Scoring {
    /// Engine over the built-in metrics.
    ///
    /// # Errors
    ///
    /// `UnknownMetric` if `config.strict_metrics` is set and a requested
    /// name is not registered.
    pub fn new(config: ScoringConfig) -> Result<Self> {
        Self::with_registry(MetricRegistry::new(), config)
    }

    /// Engine over a caller-supplied registry.
    ///
    /// # Errors
    ///
    /// Same as [`Scoring::new`].
    pub fn with_registry(registry: MetricRegistry, config: ScoringConfig) -> Result<Self> {
        let resolved = registry.resolve(config.metrics.as_deref(), config.strict_metrics)?;
        Ok(Self {
            config,
            registry,
            metrics: resolved.metrics,
        })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Registry the engine scores with.
    #[must_use]
    pub fn registry(&self) -> &MetricRegistry {
        &self.registry
    }

    /// Metrics selected for scoring, in request order.
    #[must_use]
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// Scores `model` on `test` with every selected metric of the model's
    /// problem type.
    ///
    /// Probabilistic models are scored as classifiers, point predictors as
    /// regressors. `y_proba` and `y_pred` replace the model's own
    /// predictions when given. Each value is rounded to
    /// `config.precision` decimals after its interval is computed. Metrics
    /// that are undefined on `test` are left out of the report.
    ///
    /// # Errors
    ///
    /// `EmptyDataset` for an empty test set; `ShapeMismatch` when
    /// predictions do not line up with `test` or a true label has no
    /// probability column; model errors are propagated.
    pub fn score_value_report(
        &self,
        model: ModelRef<'_>,
        test: &Dataset,
        y_proba: Option<&Matrix<f32>>,
        y_pred: Option<&[f32]>,
    ) -> Result<ValueReport> {
        if test.is_empty() {
            return Err(EvaluarError::empty_dataset("test set has no rows"));
        }
        let n_samples = test.n_samples();
        let y_true = test.target().as_slice();
        let features = model.features_for(test);
        info!(n_samples, metrics = self.metrics.len(), "scoring value report");

        let report = match model {
            ModelRef::Probabilistic(m) => {
                let proba = match y_proba {
                    Some(p) => Cow::Borrowed(p),
                    None => Cow::Owned(m.predict_proba(features)?),
                };
                if proba.n_rows() != n_samples {
                    return Err(EvaluarError::shape_mismatch(
                        "probability rows",
                        n_samples,
                        proba.n_rows(),
                    ));
                }

                let classes = m
                    .classes()
                    .unwrap_or_else(|| (0..proba.n_cols()).map(|c| c as f32).collect());
                let encoder = LabelEncoder::new(classes, proba.n_cols())?;
                let y_true_idx = encoder.encode_true(y_true)?;

                let y_pred_idx = match y_pred {
                    Some(pred) => {
                        check_predictions(n_samples, pred.len())?;
                        encoder.encode_pred(pred)
                    }
                    None => proba.argmax_rows().into_iter().map(|c| c as f32).collect(),
                };

                self.score_metrics(
                    ProblemType::Classification,
                    &y_true_idx,
                    &y_pred_idx,
                    Some(&*proba),
                )?
            }
            ModelRef::Point(_) => {
                if y_proba.is_some() {
                    debug!("probabilities ignored for a point predictor");
                }
                let pred = match y_pred {
                    Some(pred) => Cow::Borrowed(pred),
                    None => Cow::Owned(model.predict(features)?.into_vec()),
                };
                check_predictions(n_samples, pred.len())?;
                self.score_metrics(ProblemType::Regression, y_true, &pred, None)?
            }
        };

        info!(scored = report.len(), "value report finished");
        Ok(report)
    }

    fn score_metrics(
        &self,
        ptype: ProblemType,
        y_true: &[f32],
        y_pred: &[f32],
        y_proba: Option<&Matrix<f32>>,
    ) -> Result<ValueReport> {
        let precision = self.config.precision;
        let mut report = ValueReport::new();

        for metric in self.metrics.iter().filter(|m| m.ptype == ptype) {
            let input = match (metric.is_proba, y_proba) {
                (true, Some(proba)) => MetricInput::Proba(proba),
                (true, None) => continue,
                (false, _) => MetricInput::Labels(y_pred),
            };
            let Some(point) = metric.evaluate(y_true, input) else {
                warn!(metric = metric.name, "metric undefined on test set, skipping");
                continue;
            };
            let (low, high) = self.registry.confidence_interval(
                metric,
                y_true,
                y_pred,
                y_proba,
                &self.config.ci,
            )?;

            report.insert(
                metric.name.to_string(),
                ScoreEntry {
                    score_value: round_to(point, precision),
                    ci_low: round_to(low, precision),
                    ci_high: round_to(high, precision),
                },
            );
        }
        Ok(report)
    }

    /// Train/test separation quality in [0, 1].
    ///
    /// Rows of both sets are pooled, labelled by origin and split in half.
    /// A random forest learns origin on one half; its AUC on the other half
    /// gives `quality = clip(2 * (1 - AUC), 0, 1)`. If the held-out half
    /// contains a single origin the AUC is taken as 0.5.
    ///
    /// # Errors
    ///
    /// `EmptyDataset` if either set has no rows; `ShapeMismatch` if their
    /// feature columns differ.
    pub fn score_quality_report(&self, train: &Dataset, test: &Dataset) -> Result<f64> {
        if train.is_empty() {
            return Err(EvaluarError::empty_dataset("training set has no rows"));
        }
        if test.is_empty() {
            return Err(EvaluarError::empty_dataset("test set has no rows"));
        }
        let separation = &self.config.separation;
        info!(
            n_train = train.n_samples(),
            n_test = test.n_samples(),
            "scoring separation quality"
        );

        let mut pooled = Dataset::concat(&[train, test])?;
        let origin: Vec<f32> = iter::repeat(0.0)
            .take(train.n_samples())
            .chain(iter::repeat(1.0).take(test.n_samples()))
            .collect();
        pooled.set_target(Vector::from_vec(origin))?;

        let (fit_part, eval_part) = pooled.split(0.5, Some(separation.random_state))?;
        let fit_labels: Vec<usize> = fit_part
            .target()
            .as_slice()
            .iter()
            .map(|&v| v as usize)
            .collect();

        let mut forest = RandomForestClassifier::new(separation.n_estimators)
            .with_random_state(separation.random_state);
        if let Some(depth) = separation.max_depth {
            forest = forest.with_max_depth(depth);
        }
        forest.fit(fit_part.values(), &fit_labels)?;

        let proba = forest.predict_proba(eval_part.values())?;
        let scores: Vec<f32> = if proba.n_cols() > 1 {
            proba.column(1).into_vec()
        } else {
            vec![0.0; eval_part.n_samples()]
        };
        let is_test: Vec<bool> = eval_part
            .target()
            .as_slice()
            .iter()
            .map(|&v| v == 1.0)
            .collect();

        let auc = binary_roc_auc(&is_test, &scores).unwrap_or_else(|| {
            warn!("held-out half has a single origin, using AUC 0.5");
            0.5
        });
        let quality = round_to(2.0 * (1.0 - auc), 5).clamp(0.0, 1.0);
        info!(auc, quality, "separation quality finished");
        Ok(quality)
    }

    /// Runs both reports: `model` on `test`, and `train` against `test`.
    ///
    /// # Errors
    ///
    /// Any error of [`Scoring::score_value_report`] or
    /// [`Scoring::score_quality_report`].
    pub fn score_report(
        &self,
        model: ModelRef<'_>,
        train: &Dataset,
        test: &Dataset,
    ) -> Result<ScoringReport> {
        Ok(ScoringReport {
            metric_scores: self.score_value_report(model, test, None, None)?,
            separation_quality: self.score_quality_report(train, test)?,
        })
    }
}

/// Maps class labels onto probability-column indices.
struct LabelEncoder {
    classes: Vec<f32>,
}

impl LabelEncoder {
    fn new(classes: Vec<f32>, n_cols: usize) -> Result<Self> {
        if classes.len() != n_cols {
            return Err(EvaluarError::shape_mismatch(
                "probability columns",
                classes.len(),
                n_cols,
            ));
        }
        for (i, c) in classes.iter().enumerate() {
            if classes[..i].contains(c) {
                return Err(EvaluarError::InvalidInput(format!(
                    "duplicate class label {c}"
                )));
            }
        }
        Ok(Self { classes })
    }

    fn position(&self, label: f32) -> Option<usize> {
        self.classes.iter().position(|&c| c == label)
    }

    fn encode_true(&self, labels: &[f32]) -> Result<Vec<f32>> {
        labels
            .iter()
            .map(|&label| {
                self.position(label).map(|i| i as f32).ok_or_else(|| {
                    EvaluarError::ShapeMismatch {
                        expected: format!("a probability column for every label in {:?}", self.classes),
                        actual: format!("label {label}"),
                    }
                })
            })
            .collect()
    }

    /// Predicted labels outside the model's classes get fresh indices past
    /// the last column, so they count as misses.
    fn encode_pred(&self, labels: &[f32]) -> Vec<f32> {
        let mut extra: Vec<f32> = Vec::new();
        labels
            .iter()
            .map(|&label| {
                let idx = self.position(label).unwrap_or_else(|| {
                    let k = extra.iter().position(|&e| e == label).unwrap_or_else(|| {
                        extra.push(label);
                        extra.len() - 1
                    });
                    self.classes.len() + k
                });
                idx as f32
            })
            .collect()
    }
}

fn check_predictions(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(EvaluarError::shape_mismatch("predictions", expected, actual));
    }
    Ok(())
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests;
