//! Report types produced by the scoring engine.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Score of one metric with its bootstrap confidence bounds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Point estimate on the full evaluation set
    pub score_value: f64,
    /// Lower confidence bound
    pub ci_low: f64,
    /// Upper confidence bound
    pub ci_high: f64,
}

impl ScoreEntry {
    /// Width of the confidence interval.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.ci_high - self.ci_low
    }
}

/// Metric name to score, ordered by name.
pub type ValueReport = BTreeMap<String, ScoreEntry>;

/// Value report plus train/test separation quality.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringReport {
    /// Per-metric scores
    pub metric_scores: ValueReport,
    /// 1.0 = test set indistinguishable from training set, 0.0 = fully separable
    pub separation_quality: f64,
}

impl ScoringReport {
    /// Serializes the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `Config` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for ScoringReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Separation quality: {:.5}", self.separation_quality)?;
        for (name, entry) in &self.metric_scores {
            writeln!(
                f,
                "  {name:<10} {:.5}  [{:.5}, {:.5}]",
                entry.score_value, entry.ci_low, entry.ci_high
            )?;
        }
        Ok(())
    }
}
