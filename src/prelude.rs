//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use evaluar::prelude::*;
//! ```

pub use crate::data::Dataset;
pub use crate::error::{EvaluarError, Result};
pub use crate::metrics::{CiConfig, MetricRegistry};
pub use crate::primitives::{Matrix, Vector};
pub use crate::scoring::{
    ScoreEntry, Scoring, ScoringConfig, ScoringReport, SeparationConfig, ValueReport,
};
pub use crate::traits::{Features, ModelRef, Predictor, ProbabilisticModel};
pub use crate::tree::RandomForestClassifier;
