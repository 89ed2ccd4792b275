use super::*;
use rand::SeedableRng;

// ========================================================================
// Gini Impurity Tests
// ========================================================================

#[test]
fn test_gini_empty() {
    assert_eq!(gini_from_counts(&[0, 0], 0), 0.0);
}

#[test]
fn test_gini_pure_single_class() {
    assert!(gini_from_counts(&[4, 0], 4).abs() < 1e-12);
}

#[test]
fn test_gini_two_classes_balanced() {
    assert!((gini_from_counts(&[2, 2], 4) - 0.5).abs() < 1e-12);
}

#[test]
fn test_gini_two_classes_unbalanced() {
    // 1 - (0.75^2 + 0.25^2) = 0.375
    assert!((gini_from_counts(&[3, 1], 4) - 0.375).abs() < 1e-12);
}

#[test]
fn test_gini_three_classes_uniform() {
    let expected = 1.0 - 3.0 * (1.0_f64 / 3.0).powi(2);
    assert!((gini_from_counts(&[2, 2, 2], 6) - expected).abs() < 1e-12);
}

// ========================================================================
// Split Search Tests
// ========================================================================

#[test]
fn test_class_counts_over_subset() {
    let y = vec![0, 1, 1, 2, 0];
    assert_eq!(class_counts(&y, &[1, 2, 3], 3), vec![0, 2, 1]);
}

#[test]
fn test_midpoint_stays_below_upper() {
    assert_eq!(midpoint(1.0, 3.0), 2.0);
    let lo = 1.0_f32;
    let hi = f32::from_bits(lo.to_bits() + 1);
    let t = midpoint(lo, hi);
    assert!(lo <= t && t < hi);
}

#[test]
fn test_best_split_perfect_separation() {
    let x = Matrix::from_vec(4, 1, vec![3.0, 1.0, 4.0, 2.0]).expect("valid");
    let y = vec![1, 0, 1, 0];
    let indices: Vec<usize> = (0..4).collect();
    let counts = class_counts(&y, &indices, 2);

    let split = best_split_for_feature(&x, &y, &indices, 0, &counts).expect("non-constant");
    assert_eq!(split.feature_idx, 0);
    assert!((split.threshold - 2.5).abs() < 1e-6);
    assert!(split.impurity.abs() < 1e-12);
}

#[test]
fn test_best_split_constant_feature() {
    let x = Matrix::from_vec(3, 1, vec![1.0, 1.0, 1.0]).expect("valid");
    let y = vec![0, 1, 0];
    let indices: Vec<usize> = (0..3).collect();
    let counts = class_counts(&y, &indices, 2);
    assert!(best_split_for_feature(&x, &y, &indices, 0, &counts).is_none());
}

#[test]
fn test_find_best_split_skips_constant_feature() {
    // Feature 0 is constant, feature 1 separates the classes.
    let x = Matrix::from_vec(4, 2, vec![7.0, 0.0, 7.0, 1.0, 7.0, 10.0, 7.0, 11.0])
        .expect("valid");
    let y = vec![0, 0, 1, 1];
    let indices: Vec<usize> = (0..4).collect();
    let counts = class_counts(&y, &indices, 2);
    let mut rng = StdRng::seed_from_u64(0);

    let split = find_best_split(&x, &y, &indices, &counts, 1, &mut rng).expect("split");
    assert_eq!(split.feature_idx, 1);
}

#[test]
fn test_build_tree_respects_max_depth() {
    let x = Matrix::from_vec(6, 1, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).expect("valid");
    let y = vec![0, 1, 0, 1, 0, 1];
    let params = GrowParams {
        max_depth: Some(1),
        max_features: 1,
        n_classes: 2,
    };
    let mut rng = StdRng::seed_from_u64(0);
    let tree = build_tree(&x, &y, (0..6).collect(), 0, &params, &mut rng);
    assert!(tree.depth() <= 1);
}

#[test]
fn test_leaf_distribution_sums_to_one() {
    let TreeNode::Leaf(leaf) = make_leaf(&[1, 3, 0], 4) else {
        panic!("expected a leaf");
    };
    assert_eq!(leaf.class_label, 1);
    assert_eq!(leaf.n_samples, 4);
    let total: f32 = leaf.distribution.iter().sum();
    assert!((total - 1.0).abs() < 1e-6);
}
