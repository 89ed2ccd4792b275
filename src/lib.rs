//! Evaluar: model scoring with bootstrap confidence intervals and a
//! train/test separation check.
//!
//! Given a fitted model and a held-out dataset, evaluar reports every
//! applicable metric together with a bootstrap confidence interval. Given a
//! training and a test dataset, it estimates how hard the two are to tell
//! apart, which flags distribution shift between them.
//!
//! # Quick Start
//!
//! ```
//! use evaluar::prelude::*;
//!
//! /// Predicts the first feature.
//! struct Identity;
//!
//! impl Predictor for Identity {
//!     fn predict(&self, x: Features<'_>) -> Result<Vector<f32>> {
//!         Ok(x.matrix().column(0))
//!     }
//! }
//!
//! let x = Matrix::from_vec(5, 1, vec![1.0, 2.0, 3.0, 4.0, 5.0]).expect("valid shape");
//! let y = Vector::from_slice(&[1.1, 1.9, 3.2, 3.8, 5.0]);
//! let test = Dataset::new(x, y).expect("aligned");
//!
//! let scoring = Scoring::new(ScoringConfig::default()).expect("default metrics");
//! let report = scoring
//!     .score_value_report(ModelRef::Point(&Identity), &test, None, None)
//!     .expect("scored");
//!
//! let mae = report["mae"];
//! assert!(mae.ci_low <= mae.score_value && mae.score_value <= mae.ci_high);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`data`]: Dataset of features plus target
//! - [`model_selection`]: Seeded shuffling and splitting
//! - [`stats`]: Percentiles and bootstrap resampling
//! - [`metrics`]: Evaluation metrics and the metric registry
//! - [`tree`]: Decision tree and random forest classifiers
//! - [`traits`]: Model capability traits
//! - [`scoring`]: Value and quality reports

pub mod data;
pub mod error;
pub mod metrics;
pub mod model_selection;
pub mod prelude;
pub mod primitives;
pub mod scoring;
pub mod stats;
pub mod traits;
pub mod tree;

pub use error::{EvaluarError, Result};
pub use primitives::{Matrix, Vector};
