//! Decision tree and random forest classifiers.
//!
//! CART trees split on Gini impurity. The forest bags trees over bootstrap
//! samples, draws a random feature subset at every split, and averages the
//! leaf class distributions of its trees. It backs the train/test
//! separation check in [`crate::scoring`].
//!
//! # Example
//!
//! ```
//! use evaluar::primitives::Matrix;
//! use evaluar::tree::RandomForestClassifier;
//!
//! let x = Matrix::from_vec(6, 1, vec![0.0, 0.1, 0.2, 5.0, 5.1, 5.2])
//!     .expect("valid shape");
//! let y = vec![0, 0, 0, 1, 1, 1];
//!
//! let mut forest = RandomForestClassifier::new(10).with_random_state(42);
//! forest.fit(&x, &y).expect("fit should succeed");
//!
//! let proba = forest.predict_proba(&x).expect("fitted");
//! assert_eq!(proba.shape(), (6, 2));
//! assert!(proba.get(5, 1) > proba.get(0, 1));
//! ```

mod helpers;

use crate::error::{EvaluarError, Result};
use crate::model_selection::rng_from;
use crate::primitives::{Matrix, Vector};
use crate::stats::bootstrap_indices;
use crate::traits::{Features, Predictor, ProbabilisticModel};
use helpers::{build_tree, GrowParams};
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Internal node in a decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Index of the feature to split on
    pub feature_idx: usize,
    /// Threshold value for the split
    pub threshold: f32,
    /// Left subtree (samples where feature <= threshold)
    pub left: Box<TreeNode>,
    /// Right subtree (samples where feature > threshold)
    pub right: Box<TreeNode>,
}

/// Leaf node in a decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaf {
    /// Most frequent class among the training samples in this leaf
    pub class_label: usize,
    /// Fraction of the leaf's training samples in each class
    pub distribution: Vec<f32>,
    /// Number of training samples in this leaf
    pub n_samples: usize,
}

/// A node in a decision tree (either internal node or leaf).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Internal decision node with split condition
    Node(Node),
    /// Leaf node with class prediction
    Leaf(Leaf),
}

impl TreeNode {
    /// Returns the depth of the tree rooted at this node.
    ///
    /// Leaf nodes have depth 0, internal nodes have depth 1 + max(left, right).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 0,
            TreeNode::Node(node) => 1 + node.left.depth().max(node.right.depth()),
        }
    }

    fn leaf_for(&self, sample: &[f32]) -> &Leaf {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf(leaf) => return leaf,
                TreeNode::Node(internal) => {
                    node = if sample[internal.feature_idx] <= internal.threshold {
                        &internal.left
                    } else {
                        &internal.right
                    };
                }
            }
        }
    }
}

/// Decision tree classifier using the CART algorithm.
///
/// Uses Gini impurity for splitting criterion and builds trees recursively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeClassifier {
    tree: Option<TreeNode>,
    max_depth: Option<usize>,
    max_features: Option<usize>,
    random_state: Option<u64>,
    n_features: Option<usize>,
    n_classes: usize,
}

impl DecisionTreeClassifier {
    /// Creates a new decision tree classifier with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: None,
            max_depth: None,
            max_features: None,
            random_state: None,
            n_features: None,
            n_classes: 0,
        }
    }

    /// Sets the maximum depth of the tree (root has depth 0).
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Sets how many features are considered at each split.
    ///
    /// Defaults to all features.
    #[must_use]
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = Some(max_features);
        self
    }

    /// Sets the random state used to order candidate features.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    /// Fits the decision tree to training data.
    ///
    /// # Arguments
    ///
    /// * `x` - Training features (n_samples × n_features)
    /// * `y` - Training labels (n_samples class indices)
    ///
    /// # Errors
    ///
    /// Returns an error if `x` and `y` disagree in length or are empty.
    pub fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        validate_fit_inputs(x, y)?;
        let n_classes = class_count(y);
        let mut rng = rng_from(self.random_state);
        self.grow(x, y, n_classes, &mut rng);
        Ok(())
    }

    fn grow(&mut self, x: &Matrix<f32>, y: &[usize], n_classes: usize, rng: &mut StdRng) {
        let params = GrowParams {
            max_depth: self.max_depth,
            max_features: self.max_features.unwrap_or(x.n_cols()).clamp(1, x.n_cols().max(1)),
            n_classes,
        };
        let indices: Vec<usize> = (0..y.len()).collect();
        self.n_features = Some(x.n_cols());
        self.n_classes = n_classes;
        self.tree = Some(build_tree(x, y, indices, 0, &params, rng));
    }

    /// Number of classes the model was fitted on (0 before fitting).
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Depth of the fitted tree.
    #[must_use]
    pub fn depth(&self) -> Option<usize> {
        self.tree.as_ref().map(TreeNode::depth)
    }

    /// Predicts class probabilities as the training class distribution of
    /// the leaf each sample falls into.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or the feature count
    /// differs from training.
    pub fn predict_proba(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let tree = self.fitted_tree(x)?;
        let mut proba = Matrix::zeros(x.n_rows(), self.n_classes);
        for row in 0..x.n_rows() {
            let leaf = tree.leaf_for(x.row_slice(row));
            for (class, &p) in leaf.distribution.iter().enumerate() {
                proba.set(row, class, p);
            }
        }
        Ok(proba)
    }

    /// Predicts class labels for samples.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::predict_proba`].
    pub fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        let tree = self.fitted_tree(x)?;
        Ok((0..x.n_rows())
            .map(|row| tree.leaf_for(x.row_slice(row)).class_label)
            .collect())
    }

    fn fitted_tree(&self, x: &Matrix<f32>) -> Result<&TreeNode> {
        let tree = self
            .tree
            .as_ref()
            .ok_or_else(|| EvaluarError::Model("decision tree is not fitted".into()))?;
        if let Some(expected) = self.n_features {
            if x.n_cols() != expected {
                return Err(EvaluarError::shape_mismatch("features", expected, x.n_cols()));
            }
        }
        Ok(tree)
    }
}

impl Default for DecisionTreeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Random Forest classifier.
///
/// Each tree is trained on a bootstrap sample with `sqrt(n_features)`
/// candidate features per split. Tree `i` draws from its own RNG seeded
/// with `random_state + i`, so a seeded forest is reproducible regardless
/// of how rayon schedules the trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    trees: Vec<DecisionTreeClassifier>,
    n_estimators: usize,
    max_depth: Option<usize>,
    max_features: Option<usize>,
    random_state: Option<u64>,
    n_classes: usize,
}

impl RandomForestClassifier {
    /// Creates a new Random Forest classifier.
    ///
    /// # Arguments
    ///
    /// * `n_estimators` - Number of trees in the forest
    #[must_use]
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            max_depth: None,
            max_features: None,
            random_state: None,
            n_classes: 0,
        }
    }

    /// Sets the maximum depth for each tree.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Sets the number of candidate features per split.
    #[must_use]
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = Some(max_features);
        self
    }

    /// Sets the random state for reproducibility.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    /// Number of trees configured.
    #[must_use]
    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

    /// Number of classes seen during fitting (0 before fitting).
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Fits the random forest to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if `n_estimators` is zero, or `x` and `y` disagree
    /// in length or are empty.
    pub fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        validate_fit_inputs(x, y)?;
        if self.n_estimators == 0 {
            return Err(EvaluarError::InvalidInput(
                "n_estimators must be at least 1".into(),
            ));
        }

        let n_samples = x.n_rows();
        let n_classes = class_count(y);
        let max_features = self
            .max_features
            .unwrap_or_else(|| (x.n_cols() as f64).sqrt() as usize)
            .max(1);
        let template = DecisionTreeClassifier {
            max_depth: self.max_depth,
            max_features: Some(max_features),
            ..DecisionTreeClassifier::new()
        };
        let random_state = self.random_state;

        self.trees = (0..self.n_estimators)
            .into_par_iter()
            .map(|i| {
                let mut rng = rng_from(random_state.map(|s| s.wrapping_add(i as u64)));
                let sample = bootstrap_indices(n_samples, &mut rng);
                let x_boot = x.select_rows(&sample);
                let y_boot: Vec<usize> = sample.iter().map(|&idx| y[idx]).collect();

                let mut tree = template.clone();
                tree.grow(&x_boot, &y_boot, n_classes, &mut rng);
                tree
            })
            .collect();
        self.n_classes = n_classes;

        debug!(
            n_estimators = self.n_estimators,
            n_samples,
            n_features = x.n_cols(),
            n_classes,
            "fitted random forest"
        );
        Ok(())
    }

    /// Predict class probabilities for input features.
    ///
    /// Averages the per-tree leaf distributions. Column `j` is class `j`;
    /// there are as many columns as `max(y) + 1` at fit time.
    ///
    /// # Errors
    ///
    /// Returns an error if the forest is not fitted or the feature count
    /// differs from training.
    pub fn predict_proba(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        if self.trees.is_empty() {
            return Err(EvaluarError::Model("random forest is not fitted".into()));
        }

        let per_tree: Vec<Matrix<f32>> = self
            .trees
            .par_iter()
            .map(|tree| tree.predict_proba(x))
            .collect::<Result<_>>()?;

        let n_trees = per_tree.len() as f32;
        let mut proba = Matrix::zeros(x.n_rows(), self.n_classes);
        for tree_proba in &per_tree {
            for row in 0..x.n_rows() {
                for class in 0..self.n_classes {
                    proba.set(row, class, proba.get(row, class) + tree_proba.get(row, class));
                }
            }
        }
        for row in 0..x.n_rows() {
            for class in 0..self.n_classes {
                proba.set(row, class, proba.get(row, class) / n_trees);
            }
        }
        Ok(proba)
    }

    /// Predicts the most probable class per sample.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::predict_proba`].
    pub fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        Ok(self.predict_proba(x)?.argmax_rows())
    }
}

impl Default for RandomForestClassifier {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Predictor for RandomForestClassifier {
    fn predict(&self, x: Features<'_>) -> Result<Vector<f32>> {
        let labels = RandomForestClassifier::predict(self, x.matrix())?;
        Ok(labels.into_iter().map(|c| c as f32).collect::<Vec<_>>().into())
    }
}

impl ProbabilisticModel for RandomForestClassifier {
    fn predict_proba(&self, x: Features<'_>) -> Result<Matrix<f32>> {
        RandomForestClassifier::predict_proba(self, x.matrix())
    }

    fn classes(&self) -> Option<Vec<f32>> {
        Some((0..self.n_classes).map(|c| c as f32).collect())
    }
}

fn validate_fit_inputs(x: &Matrix<f32>, y: &[usize]) -> Result<()> {
    if x.n_rows() != y.len() {
        return Err(EvaluarError::shape_mismatch("samples", x.n_rows(), y.len()));
    }
    if y.is_empty() {
        return Err(EvaluarError::empty_dataset("cannot fit with zero samples"));
    }
    Ok(())
}

fn class_count(y: &[usize]) -> usize {
    y.iter().max().map_or(0, |&m| m + 1)
}
