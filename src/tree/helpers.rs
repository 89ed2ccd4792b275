//! Helper functions for tree building.
//!
//! Nodes work on index lists into the training matrix, so no rows are
//! copied while the tree grows.

use super::{Leaf, Node, TreeNode};
use crate::primitives::Matrix;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

// Smallest impurity decrease that counts as a split.
const MIN_GAIN: f64 = 1e-12;

pub(super) struct GrowParams {
    pub max_depth: Option<usize>,
    pub max_features: usize,
    pub n_classes: usize,
}

/// Best threshold found for one feature.
#[derive(Debug, Clone, Copy)]
pub(super) struct Candidate {
    pub feature_idx: usize,
    pub threshold: f32,
    /// Weighted Gini impurity of the two children.
    pub impurity: f64,
}

/// Calculate Gini impurity from class counts.
///
/// Formula: Gini = 1 - `Σ(p_i²)` where `p_i` is the proportion of class i
pub(super) fn gini_from_counts(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum::<f64>()
}

pub(super) fn class_counts(y: &[usize], indices: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0; n_classes];
    for &i in indices {
        counts[y[i]] += 1;
    }
    counts
}

/// Threshold strictly between `lo` and `hi` such that `lo <= t < hi`.
fn midpoint(lo: f32, hi: f32) -> f32 {
    let mid = lo + (hi - lo) / 2.0;
    if mid < hi {
        mid
    } else {
        lo
    }
}

/// Sweeps the sorted values of one feature, moving one sample at a time
/// from the right child to the left.
///
/// Returns `None` if the feature is constant over `indices`.
pub(super) fn best_split_for_feature(
    x: &Matrix<f32>,
    y: &[usize],
    indices: &[usize],
    feature_idx: usize,
    parent_counts: &[usize],
) -> Option<Candidate> {
    let n = indices.len();
    let mut order: Vec<usize> = indices.to_vec();
    order.sort_by(|&a, &b| x.get(a, feature_idx).total_cmp(&x.get(b, feature_idx)));

    let mut left = vec![0usize; parent_counts.len()];
    let mut right = parent_counts.to_vec();
    let mut best: Option<Candidate> = None;

    for pos in 0..n.saturating_sub(1) {
        let label = y[order[pos]];
        left[label] += 1;
        right[label] -= 1;

        let value = x.get(order[pos], feature_idx);
        let next = x.get(order[pos + 1], feature_idx);
        if value >= next {
            continue;
        }

        let n_left = pos + 1;
        let n_right = n - n_left;
        let impurity = (n_left as f64 * gini_from_counts(&left, n_left)
            + n_right as f64 * gini_from_counts(&right, n_right))
            / n as f64;

        if best.map_or(true, |b| impurity < b.impurity) {
            best = Some(Candidate {
                feature_idx,
                threshold: midpoint(value, next),
                impurity,
            });
        }
    }

    best
}

/// Searches features in random order until `max_features` non-constant
/// features have been examined and a split has been found.
pub(super) fn find_best_split(
    x: &Matrix<f32>,
    y: &[usize],
    indices: &[usize],
    parent_counts: &[usize],
    max_features: usize,
    rng: &mut StdRng,
) -> Option<Candidate> {
    let parent_impurity = gini_from_counts(parent_counts, indices.len());
    let mut features: Vec<usize> = (0..x.n_cols()).collect();
    features.shuffle(rng);

    let mut examined = 0;
    let mut best: Option<Candidate> = None;
    for feature_idx in features {
        if examined >= max_features && best.is_some() {
            break;
        }
        let Some(candidate) = best_split_for_feature(x, y, indices, feature_idx, parent_counts)
        else {
            continue;
        };
        examined += 1;
        if candidate.impurity < parent_impurity - MIN_GAIN
            && best.map_or(true, |b| candidate.impurity < b.impurity)
        {
            best = Some(candidate);
        }
    }
    best
}

fn make_leaf(counts: &[usize], n_samples: usize) -> TreeNode {
    let distribution = counts
        .iter()
        .map(|&c| c as f32 / n_samples as f32)
        .collect();
    // First maximum wins ties.
    let class_label = counts
        .iter()
        .enumerate()
        .fold((0, 0), |best, (class, &c)| if c > best.1 { (class, c) } else { best })
        .0;
    TreeNode::Leaf(Leaf {
        class_label,
        distribution,
        n_samples,
    })
}

/// Build a decision tree recursively over the rows in `indices`.
pub(super) fn build_tree(
    x: &Matrix<f32>,
    y: &[usize],
    indices: Vec<usize>,
    depth: usize,
    params: &GrowParams,
    rng: &mut StdRng,
) -> TreeNode {
    let n_samples = indices.len();
    let counts = class_counts(y, &indices, params.n_classes);

    let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
    let at_max_depth = params.max_depth.is_some_and(|max| depth >= max);
    if pure || at_max_depth || n_samples < 2 {
        return make_leaf(&counts, n_samples);
    }

    let Some(split) = find_best_split(x, y, &indices, &counts, params.max_features, rng) else {
        return make_leaf(&counts, n_samples);
    };

    let (left, right): (Vec<usize>, Vec<usize>) = indices
        .into_iter()
        .partition(|&i| x.get(i, split.feature_idx) <= split.threshold);

    let left_child = build_tree(x, y, left, depth + 1, params, rng);
    let right_child = build_tree(x, y, right, depth + 1, params, rng);

    TreeNode::Node(Node {
        feature_idx: split.feature_idx,
        threshold: split.threshold,
        left: Box::new(left_child),
        right: Box::new(right_child),
    })
}

#[cfg(test)]
#[path = "helpers_tests_gini.rs"]
mod tests;
