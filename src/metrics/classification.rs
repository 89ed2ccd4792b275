//! Classification metrics for evaluating classifier performance.
//!
//! Label-based metrics (accuracy, precision, recall, F1) take class indices;
//! precision, recall and F1 are macro averages over the classes present.
//! Probability-based metrics (ROC AUC, log loss) take a probability matrix
//! whose column `j` holds the probability of class index `j`.

use crate::primitives::Matrix;

/// Converts float-encoded labels into class indices.
///
/// Returns `None` if any value is negative, non-finite or fractional.
///
/// # Examples
///
/// ```
/// use evaluar::metrics::classification::to_class_indices;
///
/// assert_eq!(to_class_indices(&[0.0, 2.0, 1.0]), Some(vec![0, 2, 1]));
/// assert_eq!(to_class_indices(&[0.5]), None);
/// ```
#[must_use]
pub fn to_class_indices(labels: &[f32]) -> Option<Vec<usize>> {
    labels
        .iter()
        .map(|&v| {
            if v.is_finite() && v >= 0.0 && v.fract() == 0.0 {
                Some(v as usize)
            } else {
                None
            }
        })
        .collect()
}

/// Compute classification accuracy.
///
/// accuracy = `correct_predictions` / `total_predictions`
///
/// # Panics
///
/// Panics if slices have different lengths or are empty.
///
/// # Examples
///
/// ```
/// use evaluar::metrics::classification::accuracy;
///
/// let y_true = vec![0, 1, 2, 0, 1, 2];
/// let y_pred = vec![0, 2, 1, 0, 0, 1];
/// let acc = accuracy(&y_pred, &y_true);
/// assert!((acc - 1.0 / 3.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn accuracy(y_pred: &[usize], y_true: &[usize]) -> f64 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
    assert!(!y_true.is_empty(), "Vectors cannot be empty");

    let correct = y_pred
        .iter()
        .zip(y_true.iter())
        .filter(|(p, t)| p == t)
        .count();

    correct as f64 / y_true.len() as f64
}

/// Compute precision score.
///
/// precision = TP / (TP + FP)
///
/// # Panics
///
/// Panics if slices have different lengths or are empty.
///
/// # Examples
///
/// ```
/// use evaluar::metrics::classification::precision;
///
/// let y_true = vec![0, 1, 2, 0, 1, 2];
/// let y_pred = vec![0, 2, 1, 0, 0, 1];
/// let prec = precision(&y_pred, &y_true);
/// assert!((0.0..=1.0).contains(&prec));
/// ```
#[must_use]
pub fn precision(y_pred: &[usize], y_true: &[usize]) -> f64 {
    ClassCounts::new(y_pred, y_true).macro_average(|tp, fp, _| ratio(tp, tp + fp))
}

/// Compute recall score.
///
/// recall = TP / (TP + FN)
///
/// # Panics
///
/// Panics if slices have different lengths or are empty.
///
/// # Examples
///
/// ```
/// use evaluar::metrics::classification::recall;
///
/// let y_true = vec![0, 0, 1, 1];
/// let y_pred = vec![0, 1, 1, 1];
/// let rec = recall(&y_pred, &y_true);
/// assert!((rec - 0.75).abs() < 1e-9);
/// ```
#[must_use]
pub fn recall(y_pred: &[usize], y_true: &[usize]) -> f64 {
    ClassCounts::new(y_pred, y_true).macro_average(|tp, _, fn_count| ratio(tp, tp + fn_count))
}

/// Compute F1 score (harmonic mean of precision and recall).
///
/// # Panics
///
/// Panics if slices have different lengths or are empty.
#[must_use]
pub fn f1_score(y_pred: &[usize], y_true: &[usize]) -> f64 {
    ClassCounts::new(y_pred, y_true).macro_average(class_f1)
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Compute F1 score for a single class.
fn class_f1(tp: usize, fp: usize, fn_count: usize) -> f64 {
    let prec = ratio(tp, tp + fp);
    let rec = ratio(tp, tp + fn_count);
    if prec + rec == 0.0 {
        0.0
    } else {
        2.0 * prec * rec / (prec + rec)
    }
}

/// Per-class TP, FP, FN, indexed by rank among the labels that occur.
///
/// Labels are arbitrary integers; only the distinct values seen are given
/// a slot, so table size is bounded by the input length.
struct ClassCounts {
    tp: Vec<usize>,
    fp: Vec<usize>,
    fn_counts: Vec<usize>,
}

impl ClassCounts {
    fn new(y_pred: &[usize], y_true: &[usize]) -> Self {
        assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
        assert!(!y_true.is_empty(), "Vectors cannot be empty");

        let mut labels: Vec<usize> = y_true.iter().chain(y_pred.iter()).copied().collect();
        labels.sort_unstable();
        labels.dedup();
        let slot = |label: usize| labels.partition_point(|&l| l < label);

        let n_classes = labels.len();
        let mut counts = Self {
            tp: vec![0; n_classes],
            fp: vec![0; n_classes],
            fn_counts: vec![0; n_classes],
        };

        for (&true_label, &pred_label) in y_true.iter().zip(y_pred.iter()) {
            let t = slot(true_label);
            if true_label == pred_label {
                counts.tp[t] += 1;
            } else {
                counts.fp[slot(pred_label)] += 1;
                counts.fn_counts[t] += 1;
            }
        }

        counts
    }

    /// Unweighted mean of `per_class` over every label that occurs.
    fn macro_average<F>(&self, per_class: F) -> f64
    where
        F: Fn(usize, usize, usize) -> f64,
    {
        let n_classes = self.tp.len();
        if n_classes == 0 {
            return 0.0;
        }
        (0..n_classes)
            .map(|i| per_class(self.tp[i], self.fp[i], self.fn_counts[i]))
            .sum::<f64>()
            / n_classes as f64
    }
}

/// Binary ROC AUC via the rank-sum (Mann-Whitney U) statistic.
///
/// `y_true[i]` is true for the positive class. Tied scores receive their
/// average rank. Returns `None` when only one class is present.
///
/// # Examples
///
/// ```
/// use evaluar::metrics::classification::binary_roc_auc;
///
/// let y_true = [false, false, true, true];
/// let scores = [0.1, 0.4, 0.35, 0.8];
/// let auc = binary_roc_auc(&y_true, &scores).expect("both classes present");
/// assert!((auc - 0.75).abs() < 1e-9);
/// ```
///
/// # Panics
///
/// Panics if slices have different lengths.
#[must_use]
pub fn binary_roc_auc(y_true: &[bool], scores: &[f32]) -> Option<f64> {
    assert_eq!(y_true.len(), scores.len(), "Vectors must have same length");

    let n_pos = y_true.iter().filter(|&&p| p).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    // Sum of (1-based) ranks of the positives, ties averaged.
    let mut rank_sum = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        let avg_rank = (start + end + 1) as f64 / 2.0;
        let positives = order[start..end].iter().filter(|&&i| y_true[i]).count();
        rank_sum += avg_rank * positives as f64;
        start = end;
    }

    let n_pos_f = n_pos as f64;
    let u = rank_sum - n_pos_f * (n_pos_f + 1.0) / 2.0;
    Some(u / (n_pos_f * n_neg as f64))
}

/// ROC AUC from a probability matrix.
///
/// Two columns: AUC of column 1 against class 1. More columns: macro
/// average of one-vs-rest AUCs over the classes for which it is defined.
/// Returns `None` if no class yields a defined AUC.
///
/// # Panics
///
/// Panics if the row count differs from `y_true.len()`.
#[must_use]
pub fn roc_auc(y_true: &[usize], proba: &Matrix<f32>) -> Option<f64> {
    assert_eq!(proba.n_rows(), y_true.len(), "Vectors must have same length");

    let one_vs_rest = |class: usize| {
        let positives: Vec<bool> = y_true.iter().map(|&y| y == class).collect();
        let scores = proba.column(class);
        binary_roc_auc(&positives, scores.as_slice())
    };

    match proba.n_cols() {
        0 | 1 => None,
        2 => one_vs_rest(1),
        k => {
            let aucs: Vec<f64> = (0..k).filter_map(one_vs_rest).collect();
            if aucs.is_empty() {
                None
            } else {
                Some(aucs.iter().sum::<f64>() / aucs.len() as f64)
            }
        }
    }
}

/// Multi-class cross-entropy, with probabilities clipped to `[1e-15, 1 - 1e-15]`.
///
/// Returns `None` if a label has no probability column or the input is empty.
///
/// # Panics
///
/// Panics if the row count differs from `y_true.len()`.
#[must_use]
pub fn log_loss(y_true: &[usize], proba: &Matrix<f32>) -> Option<f64> {
    assert_eq!(proba.n_rows(), y_true.len(), "Vectors must have same length");
    const EPS: f64 = 1e-15;

    if y_true.is_empty() || y_true.iter().any(|&y| y >= proba.n_cols()) {
        return None;
    }

    let total: f64 = y_true
        .iter()
        .enumerate()
        .map(|(row, &y)| -f64::from(proba.get(row, y)).clamp(EPS, 1.0 - EPS).ln())
        .sum();

    Some(total / y_true.len() as f64)
}

#[cfg(test)]
#[path = "tests_classification_contract.rs"]
mod tests_classification_contract;
