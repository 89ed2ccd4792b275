//! Scoring configuration

use crate::error::Result;
use crate::metrics::CiConfig;
use serde::{Deserialize, Serialize};

/// Settings for the auxiliary train-vs-test classifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeparationConfig {
    /// Trees in the random forest
    pub n_estimators: usize,
    /// Depth limit per tree (None = grow until pure)
    pub max_depth: Option<usize>,
    /// Seed for the split and the forest
    pub random_state: u64,
}

impl Default for SeparationConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            random_state: 42,
        }
    }
}

/// Configuration for [`super::Scoring`].
///
/// # Examples
///
/// ```
/// use evaluar::scoring::ScoringConfig;
///
/// let config = ScoringConfig::from_json(r#"{"metrics": ["mae", "r2"], "precision": 3}"#)
///     .expect("valid config");
/// assert_eq!(config.metrics.as_deref(), Some(&["mae".to_string(), "r2".to_string()][..]));
/// assert_eq!(config.precision, 3);
/// assert_eq!(config.ci.n_resamples, 100);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Metric names to compute (None = every registered metric)
    pub metrics: Option<Vec<String>>,
    /// Fail on unknown metric names instead of skipping them
    pub strict_metrics: bool,
    /// Bootstrap interval settings
    pub ci: CiConfig,
    /// Decimal places kept in reported values
    pub precision: u32,
    /// Train/test separation classifier settings
    pub separation: SeparationConfig,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            metrics: None,
            strict_metrics: false,
            ci: CiConfig::default(),
            precision: 5,
            separation: SeparationConfig::default(),
        }
    }
}

impl ScoringConfig {
    /// Parses a configuration from JSON; missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the JSON is malformed or mistyped.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Restrict scoring to the named metrics.
    #[must_use]
    pub fn with_metrics<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metrics = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Reject unknown metric names.
    #[must_use]
    pub fn with_strict_metrics(mut self, strict: bool) -> Self {
        self.strict_metrics = strict;
        self
    }

    /// Set the bootstrap settings.
    #[must_use]
    pub fn with_ci(mut self, ci: CiConfig) -> Self {
        self.ci = ci;
        self
    }

    /// Set the number of decimal places in reports.
    #[must_use]
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Set the separation classifier settings.
    #[must_use]
    pub fn with_separation(mut self, separation: SeparationConfig) -> Self {
        self.separation = separation;
        self
    }

    /// Seed every random step: bootstrap, split and forest.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.ci.random_state = Some(seed);
        self.separation.random_state = seed;
        self
    }
}
