//! Capability traits for models under evaluation.
//!
//! A model is anything that can predict on a feature matrix. Models that
//! also expose class probabilities implement [`ProbabilisticModel`] and are
//! scored as classifiers; plain [`Predictor`]s are scored as regressors.
//! The caller states which one it has through [`ModelRef`].

use crate::data::Dataset;
use crate::error::Result;
use crate::primitives::{Matrix, Vector};

/// Feature input handed to a model.
///
/// Models that need column names or the full table ask for it through
/// [`Predictor::accepts_dataset`]; everything else gets the raw matrix.
#[derive(Clone, Copy, Debug)]
pub enum Features<'a> {
    /// Raw feature matrix (rows = samples).
    Matrix(&'a Matrix<f32>),
    /// Whole evaluation dataset.
    Dataset(&'a Dataset),
}

impl<'a> Features<'a> {
    /// The feature matrix regardless of variant.
    #[must_use]
    pub fn matrix(&self) -> &'a Matrix<f32> {
        match *self {
            Features::Matrix(m) => m,
            Features::Dataset(d) => d.values(),
        }
    }

    /// Number of samples.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.matrix().n_rows()
    }
}

/// A fitted model that produces one prediction per sample.
///
/// # Examples
///
/// ```
/// use evaluar::prelude::*;
///
/// struct Doubler;
///
/// impl Predictor for Doubler {
///     fn predict(&self, x: Features<'_>) -> Result<Vector<f32>> {
///         let m = x.matrix();
///         Ok((0..m.n_rows()).map(|r| 2.0 * m.get(r, 0)).collect::<Vec<_>>().into())
///     }
/// }
///
/// let x = Matrix::from_vec(2, 1, vec![1.0, 3.0]).expect("valid shape");
/// let y = Doubler.predict(Features::Matrix(&x)).expect("prediction");
/// assert_eq!(y.as_slice(), &[2.0, 6.0]);
/// ```
pub trait Predictor {
    /// Predicts a label (classification) or value (regression) per sample.
    ///
    /// # Errors
    ///
    /// Implementations report their own failures, typically as
    /// [`crate::error::EvaluarError::Model`].
    fn predict(&self, x: Features<'_>) -> Result<Vector<f32>>;

    /// Whether the model wants [`Features::Dataset`] instead of the matrix.
    fn accepts_dataset(&self) -> bool {
        false
    }
}

/// A classifier that can also estimate class probabilities.
pub trait ProbabilisticModel: Predictor {
    /// Probability matrix, one row per sample and one column per class.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn predict_proba(&self, x: Features<'_>) -> Result<Matrix<f32>>;

    /// Class label for each probability column.
    ///
    /// `None` means column `j` holds class `j`.
    fn classes(&self) -> Option<Vec<f32>> {
        None
    }
}

/// Borrowed model tagged with the capability it is scored by.
#[derive(Clone, Copy)]
pub enum ModelRef<'a> {
    /// Classifier with probabilities.
    Probabilistic(&'a dyn ProbabilisticModel),
    /// Point predictor, scored with regression metrics.
    Point(&'a dyn Predictor),
}

impl<'a> ModelRef<'a> {
    /// Whether the underlying model asks for the whole dataset.
    #[must_use]
    pub fn accepts_dataset(&self) -> bool {
        match self {
            ModelRef::Probabilistic(m) => m.accepts_dataset(),
            ModelRef::Point(m) => m.accepts_dataset(),
        }
    }

    /// Chooses the feature representation for `data` once.
    #[must_use]
    pub fn features_for<'d>(&self, data: &'d Dataset) -> Features<'d> {
        if self.accepts_dataset() {
            Features::Dataset(data)
        } else {
            Features::Matrix(data.values())
        }
    }

    /// Point predictions from either kind of model.
    ///
    /// # Errors
    ///
    /// Propagates the model's error.
    pub fn predict(&self, x: Features<'_>) -> Result<Vector<f32>> {
        match self {
            ModelRef::Probabilistic(m) => m.predict(x),
            ModelRef::Point(m) => m.predict(x),
        }
    }
}

impl std::fmt::Debug for ModelRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelRef::Probabilistic(_) => f.write_str("ModelRef::Probabilistic"),
            ModelRef::Point(_) => f.write_str("ModelRef::Point"),
        }
    }
}
