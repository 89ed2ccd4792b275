// =========================================================================
// FALSIFY-MR: regression metric contract
//
// Each test tries to falsify one algebraic property of the regression
// metrics the scoring engine reports.
// =========================================================================

use super::*;

/// FALSIFY-MR-001: R² = 1.0 for perfect predictions
#[test]
fn falsify_mr_001_r2_perfect() {
    let y = [1.0, 2.0, 3.0, 4.0, 5.0];

    let r2 = r_squared(&y, &y);
    assert!(
        (r2 - 1.0).abs() < 1e-12,
        "FALSIFIED MR-001: R²={r2} for perfect predictions, expected 1.0"
    );
}

/// FALSIFY-MR-002: R² ≤ 1.0 always
#[test]
fn falsify_mr_002_r2_upper_bound() {
    let y_true = [1.0, 2.0, 3.0, 4.0, 5.0];
    let y_pred = [1.1, 2.2, 2.8, 4.1, 4.9];

    let r2 = r_squared(&y_pred, &y_true);
    assert!(r2 <= 1.0, "FALSIFIED MR-002: R²={r2} > 1.0");
}

/// FALSIFY-MR-003: R² < 0 when predictions are worse than the mean
#[test]
fn falsify_mr_003_r2_negative_for_bad_predictions() {
    let y_true = [1.0, 2.0, 3.0, 4.0, 5.0];
    let y_pred = [10.0, 20.0, 30.0, 40.0, 50.0];

    let r2 = r_squared(&y_pred, &y_true);
    assert!(r2 < 0.0, "FALSIFIED MR-003: R²={r2} >= 0 for terrible predictions");
}

/// FALSIFY-MR-004: R² is 0.0 on a constant target
#[test]
fn falsify_mr_004_r2_constant_target() {
    let y_true = [2.0, 2.0, 2.0];
    let y_pred = [1.0, 2.0, 3.0];

    assert_eq!(r_squared(&y_pred, &y_true), 0.0);
}

/// FALSIFY-MR-005: error metrics are zero for perfect predictions
#[test]
fn falsify_mr_005_errors_zero_when_perfect() {
    let y = [0.5, -1.0, 3.25, 8.0];

    assert_eq!(mse(&y, &y), 0.0, "FALSIFIED MR-005: MSE != 0");
    assert_eq!(mae(&y, &y), 0.0, "FALSIFIED MR-005: MAE != 0");
    assert_eq!(rmse(&y, &y), 0.0, "FALSIFIED MR-005: RMSE != 0");
}

/// FALSIFY-MR-006: RMSE = sqrt(MSE) and MAE ≤ RMSE
#[test]
fn falsify_mr_006_rmse_mae_relation() {
    let y_true = [3.0, -0.5, 2.0, 7.0];
    let y_pred = [2.5, 0.0, 2.0, 8.0];

    let m = mse(&y_pred, &y_true);
    let r = rmse(&y_pred, &y_true);
    let a = mae(&y_pred, &y_true);
    assert!((r - m.sqrt()).abs() < 1e-12, "FALSIFIED MR-006: RMSE != sqrt(MSE)");
    assert!(a <= r + 1e-12, "FALSIFIED MR-006: MAE={a} > RMSE={r}");
}

/// FALSIFY-MR-007: MSE is symmetric in its arguments
#[test]
fn falsify_mr_007_mse_symmetric() {
    let a = [1.0, 4.0, -2.0];
    let b = [0.0, 5.0, -1.5];

    assert_eq!(mse(&a, &b), mse(&b, &a));
}

#[test]
#[should_panic(expected = "Vectors must have same length")]
fn test_mse_length_mismatch_panics() {
    let _ = mse(&[1.0, 2.0], &[1.0]);
}
