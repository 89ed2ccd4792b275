//! Error types for evaluar operations.
//!
//! Structural problems (mismatched shapes, empty datasets) are returned to
//! the caller immediately. Degenerate statistics never surface here; they
//! are absorbed where they occur.

use thiserror::Error;

/// Main error type for scoring operations.
///
/// # Examples
///
/// ```
/// use evaluar::error::EvaluarError;
///
/// let err = EvaluarError::ShapeMismatch {
///     expected: "10 rows".to_string(),
///     actual: "9 rows".to_string(),
/// };
/// assert!(err.to_string().contains("shape mismatch"));
/// ```
#[derive(Debug, Error)]
pub enum EvaluarError {
    /// Target, prediction, or probability shapes disagree.
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Expected shape description
        expected: String,
        /// Actual shape found
        actual: String,
    },

    /// A dataset with zero rows was given where rows are required.
    #[error("empty dataset: {0}")]
    EmptyDataset(String),

    /// A metric name is not present in the registry (strict mode only).
    #[error("unknown metric: {0}")]
    UnknownMetric(String),

    /// The metric is not defined for the given input.
    #[error("metric '{0}' is undefined for this input")]
    UndefinedMetric(String),

    /// Invalid argument or parameter.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Failure reported by the model under evaluation.
    #[error("model error: {0}")]
    Model(String),

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl EvaluarError {
    /// Create a shape mismatch error with descriptive context.
    #[must_use]
    pub fn shape_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create an empty dataset error.
    #[must_use]
    pub fn empty_dataset(context: &str) -> Self {
        Self::EmptyDataset(context.to_string())
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, EvaluarError>;
