//! `Dataset` module: feature matrix plus aligned target.
//!
//! A `Dataset` is what the scoring engine consumes. Every operation that
//! reshapes a dataset (`concat`, `split`) returns a new one; the caller's
//! data is never modified behind its back.

use crate::error::{EvaluarError, Result};
use crate::model_selection::split_indices;
use crate::primitives::{Matrix, Vector};

/// Feature matrix and target vector with optional column names.
///
/// # Examples
///
/// ```
/// use evaluar::data::Dataset;
/// use evaluar::primitives::{Matrix, Vector};
///
/// let values = Matrix::from_vec(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("valid shape");
/// let target = Vector::from_slice(&[0.0, 1.0, 0.0]);
/// let ds = Dataset::new(values, target).expect("aligned rows");
/// assert_eq!(ds.n_samples(), 3);
/// assert_eq!(ds.n_features(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    values: Matrix<f32>,
    target: Vector<f32>,
    feature_names: Option<Vec<String>>,
}

impl Dataset {
    /// Creates a dataset from features and target.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if the target length differs from the row count.
    pub fn new(values: Matrix<f32>, target: Vector<f32>) -> Result<Self> {
        if values.n_rows() != target.len() {
            return Err(EvaluarError::shape_mismatch(
                "target length",
                values.n_rows(),
                target.len(),
            ));
        }
        Ok(Self {
            values,
            target,
            feature_names: None,
        })
    }

    /// Attaches feature names.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if the name count differs from the column count,
    /// `InvalidInput` for empty or duplicate names.
    pub fn with_feature_names(mut self, names: Vec<String>) -> Result<Self> {
        if names.len() != self.values.n_cols() {
            return Err(EvaluarError::shape_mismatch(
                "feature names",
                self.values.n_cols(),
                names.len(),
            ));
        }
        if names.iter().any(String::is_empty) {
            return Err(EvaluarError::InvalidInput(
                "feature names cannot be empty".into(),
            ));
        }
        let mut sorted: Vec<&str> = names.iter().map(String::as_str).collect();
        sorted.sort_unstable();
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            return Err(EvaluarError::InvalidInput(
                "duplicate feature names not allowed".into(),
            ));
        }
        self.feature_names = Some(names);
        Ok(self)
    }

    /// Feature matrix (rows = samples).
    #[must_use]
    pub fn values(&self) -> &Matrix<f32> {
        &self.values
    }

    /// Target vector aligned with `values` rows.
    #[must_use]
    pub fn target(&self) -> &Vector<f32> {
        &self.target
    }

    /// Feature names, if any were attached.
    #[must_use]
    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    /// Number of rows.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.values.n_rows()
    }

    /// Number of feature columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.values.n_cols()
    }

    /// Returns true when the dataset has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n_samples() == 0
    }

    /// Row-wise union of several datasets, in the given order.
    ///
    /// Names carry over from the first dataset that has them.
    ///
    /// # Errors
    ///
    /// Returns `EmptyDataset` for an empty list and `ShapeMismatch` when
    /// feature columns are incompatible.
    pub fn concat(datasets: &[&Self]) -> Result<Self> {
        let first = datasets
            .first()
            .ok_or_else(|| EvaluarError::empty_dataset("nothing to concatenate"))?;

        let mut names: Option<&[String]> = None;
        for ds in datasets {
            if ds.n_features() != first.n_features() {
                return Err(EvaluarError::shape_mismatch(
                    "feature columns",
                    first.n_features(),
                    ds.n_features(),
                ));
            }
            match (names, ds.feature_names()) {
                (Some(known), Some(other)) if known != other => {
                    return Err(EvaluarError::ShapeMismatch {
                        expected: format!("features {known:?}"),
                        actual: format!("features {other:?}"),
                    });
                }
                (None, Some(other)) => names = Some(other),
                _ => {}
            }
        }

        let matrices: Vec<&Matrix<f32>> = datasets.iter().map(|d| &d.values).collect();
        let targets: Vec<&Vector<f32>> = datasets.iter().map(|d| &d.target).collect();

        Ok(Self {
            values: Matrix::vstack(&matrices)?,
            target: Vector::concat(&targets),
            feature_names: names.map(<[String]>::to_vec),
        })
    }

    /// Replaces the target vector.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if the length differs from `n_samples`.
    pub fn set_target(&mut self, target: Vector<f32>) -> Result<()> {
        if target.len() != self.n_samples() {
            return Err(EvaluarError::shape_mismatch(
                "target length",
                self.n_samples(),
                target.len(),
            ));
        }
        self.target = target;
        Ok(())
    }

    /// Rows at the given positions, in order, as a new dataset.
    #[must_use]
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            values: self.values.select_rows(indices),
            target: self.target.select(indices),
            feature_names: self.feature_names.clone(),
        }
    }

    /// Randomly partitions rows into `ratio : 1 - ratio` parts.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `ratio` is outside (0, 1) or a part would be empty.
    pub fn split(&self, ratio: f64, random_state: Option<u64>) -> Result<(Self, Self)> {
        let (first, second) = split_indices(self.n_samples(), ratio, random_state)?;
        Ok((self.select_rows(&first), self.select_rows(&second)))
    }
}
