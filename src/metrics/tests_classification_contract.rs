// =========================================================================
// FALSIFY-MC: classification metric contract
//
// References:
//   - Sokolova & Lapalme (2009) "A systematic analysis of performance measures"
//   - Hanley & McNeil (1982) "The meaning and use of the area under a ROC curve"
// =========================================================================

use super::*;

/// FALSIFY-MC-001: Accuracy ∈ [0, 1]
#[test]
fn falsify_mc_001_accuracy_bounded() {
    let y_true = vec![0, 1, 2, 0, 1, 2];
    let y_pred = vec![0, 2, 1, 0, 0, 1];

    let acc = accuracy(&y_pred, &y_true);
    assert!(
        (0.0..=1.0).contains(&acc),
        "FALSIFIED MC-001: accuracy={acc} not in [0, 1]"
    );
}

/// FALSIFY-MC-002: Perfect predictions → accuracy = F1 = 1.0
#[test]
fn falsify_mc_002_perfect_predictions() {
    let y = vec![0, 1, 2, 0, 1, 2];
    assert_eq!(accuracy(&y, &y), 1.0, "FALSIFIED MC-002: accuracy");
    assert!(
        (f1_score(&y, &y) - 1.0).abs() < 1e-12,
        "FALSIFIED MC-002: F1"
    );
}

/// FALSIFY-MC-003: 9 of 10 correct → accuracy is exactly 0.9
#[test]
fn falsify_mc_003_nine_of_ten() {
    let y_true = vec![0, 0, 0, 0, 0, 1, 1, 1, 1, 1];
    let y_pred = vec![0, 0, 0, 0, 1, 1, 1, 1, 1, 1];
    assert_eq!(accuracy(&y_pred, &y_true), 0.9);
}

/// FALSIFY-MC-004: Macro scores depend on which labels occur, not their values
#[test]
fn falsify_mc_004_macro_invariant_to_relabeling() {
    let y_true = vec![0, 1, 2, 2, 1, 0, 2];
    let y_pred = vec![0, 2, 2, 1, 1, 0, 0];
    let relabel = |v: &[usize]| v.iter().map(|&c| [3, 40, 7_000_000][c]).collect::<Vec<_>>();

    let (t2, p2) = (relabel(&y_true), relabel(&y_pred));
    assert!((precision(&y_pred, &y_true) - precision(&p2, &t2)).abs() < 1e-12);
    assert!((recall(&y_pred, &y_true) - recall(&p2, &t2)).abs() < 1e-12);
    assert!((f1_score(&y_pred, &y_true) - f1_score(&p2, &t2)).abs() < 1e-12);
}

/// FALSIFY-MC-005: Huge labels are counted without sizing tables by label value
#[test]
fn falsify_mc_005_huge_labels() {
    let huge = 1_000_000_000_000_000;
    let y_true = vec![huge, 0];
    let y_pred = vec![0, 0];

    // class 0: P=1/2, R=1, F1=2/3; class huge: P=R=F1=0.
    assert!((precision(&y_pred, &y_true) - 0.25).abs() < 1e-12);
    assert!((recall(&y_pred, &y_true) - 0.5).abs() < 1e-12);
    assert!((f1_score(&y_pred, &y_true) - 1.0 / 3.0).abs() < 1e-12);
}

/// FALSIFY-MC-006: AUC of a perfect ranking is 1, of a reversed ranking 0
#[test]
fn falsify_mc_006_auc_extremes() {
    let y = [false, false, true, true];
    let perfect = binary_roc_auc(&y, &[0.1, 0.2, 0.8, 0.9]).expect("defined");
    let reversed = binary_roc_auc(&y, &[0.9, 0.8, 0.2, 0.1]).expect("defined");
    assert_eq!(perfect, 1.0);
    assert_eq!(reversed, 0.0);
}

/// FALSIFY-MC-007: constant scores give AUC = 0.5
#[test]
fn falsify_mc_007_auc_ties() {
    let y = [false, true, false, true, true];
    let auc = binary_roc_auc(&y, &[0.3; 5]).expect("defined");
    assert!((auc - 0.5).abs() < 1e-12, "FALSIFIED MC-007: auc={auc}");
}

/// FALSIFY-MC-008: AUC undefined with a single class
#[test]
fn falsify_mc_008_auc_single_class() {
    assert!(binary_roc_auc(&[true, true], &[0.1, 0.9]).is_none());
    let proba = Matrix::from_vec(2, 2, vec![0.9, 0.1, 0.2, 0.8]).expect("valid");
    assert!(roc_auc(&[0, 0], &proba).is_none());
}

#[test]
fn test_roc_auc_binary_uses_second_column() {
    let proba = Matrix::from_vec(4, 2, vec![0.9, 0.1, 0.6, 0.4, 0.3, 0.7, 0.2, 0.8])
        .expect("valid");
    let auc = roc_auc(&[0, 0, 1, 1], &proba).expect("defined");
    assert_eq!(auc, 1.0);
}

#[test]
fn test_roc_auc_multiclass_macro() {
    // Each class gets the top score on its own rows: every one-vs-rest AUC is 1.
    let proba = Matrix::from_vec(
        3,
        3,
        vec![0.8, 0.1, 0.1, 0.1, 0.8, 0.1, 0.1, 0.1, 0.8],
    )
    .expect("valid");
    let auc = roc_auc(&[0, 1, 2], &proba).expect("defined");
    assert!((auc - 1.0).abs() < 1e-12);
}

#[test]
fn test_log_loss_confident_and_missing_column() {
    let proba = Matrix::from_vec(2, 2, vec![1.0, 0.0, 0.0, 1.0]).expect("valid");
    let ll = log_loss(&[0, 1], &proba).expect("defined");
    assert!(ll < 1e-10);
    assert!(log_loss(&[2, 0], &proba).is_none());
}

#[test]
fn test_log_loss_uniform_binary() {
    let proba = Matrix::from_vec(2, 2, vec![0.5, 0.5, 0.5, 0.5]).expect("valid");
    let ll = log_loss(&[0, 1], &proba).expect("defined");
    assert!((ll - std::f64::consts::LN_2).abs() < 1e-7);
}

#[test]
fn test_to_class_indices_rejects_non_labels() {
    assert_eq!(to_class_indices(&[1.0, 0.0]), Some(vec![1, 0]));
    assert!(to_class_indices(&[-1.0]).is_none());
    assert!(to_class_indices(&[f32::NAN]).is_none());
    assert!(to_class_indices(&[1.5]).is_none());
}
