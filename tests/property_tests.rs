//! Property-based tests using proptest.
//!
//! These tests verify invariants of metrics, intervals and the split.

use evaluar::metrics::{CiConfig, MetricInput, MetricRegistry};
use evaluar::model_selection::split_indices;
use evaluar::prelude::*;
use evaluar::stats::percentiles;
use proptest::prelude::*;

// Strategy for paired targets and predictions
fn regression_pair(len: usize) -> impl Strategy<Value = (Vec<f32>, Vec<f32>)> {
    (
        proptest::collection::vec(-100.0f32..100.0, len),
        proptest::collection::vec(-100.0f32..100.0, len),
    )
}

// Strategy for binary labels with matching class-1 probabilities
fn binary_case(len: usize) -> impl Strategy<Value = (Vec<f32>, Vec<f32>)> {
    (
        proptest::collection::vec(0u8..2, len),
        proptest::collection::vec(0.0f32..1.0, len),
    )
        .prop_map(|(labels, scores)| (labels.into_iter().map(f32::from).collect(), scores))
}

fn proba_matrix(scores: &[f32]) -> Matrix<f32> {
    let data = scores.iter().flat_map(|&p| [1.0 - p, p]).collect();
    Matrix::from_vec(scores.len(), 2, data).expect("Test data should be valid")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn regression_ci_contains_point((y_true, y_pred) in regression_pair(20), seed in 0u64..1000) {
        let registry = MetricRegistry::new();
        let config = CiConfig::default().with_n_resamples(30).with_random_state(seed);
        for name in ["mae", "mse", "rmse", "r2"] {
            let metric = registry.get(name).expect("built-in");
            let Some(point) = metric.evaluate(&y_true, MetricInput::Labels(&y_pred)) else {
                continue;
            };
            let (low, high) = registry
                .confidence_interval(metric, &y_true, &y_pred, None, &config)
                .expect("well-formed input");
            prop_assert!(low <= point && point <= high, "{}: {} <= {} <= {}", name, low, point, high);
        }
    }

    #[test]
    fn classification_ci_contains_point((y_true, scores) in binary_case(16)) {
        let registry = MetricRegistry::new();
        let proba = proba_matrix(&scores);
        let y_pred: Vec<f32> = scores.iter().map(|&p| if p > 0.5 { 1.0 } else { 0.0 }).collect();
        let config = CiConfig::default().with_n_resamples(30);

        for metric in registry.iter().filter(|m| m.ptype == evaluar::metrics::ProblemType::Classification) {
            let input = if metric.is_proba {
                MetricInput::Proba(&proba)
            } else {
                MetricInput::Labels(&y_pred)
            };
            let Some(point) = metric.evaluate(&y_true, input) else {
                continue;
            };
            let (low, high) = registry
                .confidence_interval(metric, &y_true, &y_pred, Some(&proba), &config)
                .expect("well-formed input");
            prop_assert!(low <= point && point <= high);
        }
    }

    #[test]
    fn bounded_metrics_stay_in_unit_interval((y_true, scores) in binary_case(12)) {
        let registry = MetricRegistry::new();
        let proba = proba_matrix(&scores);
        let y_pred: Vec<f32> = scores.iter().map(|&p| if p > 0.5 { 1.0 } else { 0.0 }).collect();

        for name in ["accuracy", "recall", "precision", "f1"] {
            let value = registry.call(name, &y_true, MetricInput::Labels(&y_pred)).expect("defined");
            prop_assert!((0.0..=1.0).contains(&value));
        }
        if let Ok(auc) = registry.call("auc", &y_true, MetricInput::Proba(&proba)) {
            prop_assert!((0.0..=1.0).contains(&auc));
        }
    }

    #[test]
    fn split_partitions_all_rows(n in 2usize..200, ratio in 0.1f64..0.9, seed in 0u64..1000) {
        if let Ok((first, second)) = split_indices(n, ratio, Some(seed)) {
            prop_assert_eq!(first.len() + second.len(), n);
            let mut all: Vec<usize> = first.iter().chain(second.iter()).copied().collect();
            all.sort_unstable();
            prop_assert_eq!(all, (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn percentiles_are_monotone(data in proptest::collection::vec(-1e6f64..1e6, 1..50)) {
        let bounds = percentiles(&data, &[2.5, 50.0, 97.5]).expect("finite data");
        prop_assert!(bounds[0] <= bounds[1] && bounds[1] <= bounds[2]);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn quality_stays_in_unit_interval(
        train in proptest::collection::vec(0.0f32..1.0, 40),
        test in proptest::collection::vec(0.0f32..2.0, 40),
    ) {
        let to_dataset = |values: Vec<f32>| {
            let x = Matrix::from_vec(20, 2, values).expect("Test data should be valid");
            Dataset::new(x, Vector::from_vec(vec![0.0; 20])).expect("aligned")
        };
        let config = ScoringConfig::default().with_separation(SeparationConfig {
            n_estimators: 10,
            ..SeparationConfig::default()
        });
        let scoring = Scoring::new(config).expect("engine");
        let quality = scoring
            .score_quality_report(&to_dataset(train), &to_dataset(test))
            .expect("quality");
        prop_assert!((0.0..=1.0).contains(&quality));
    }
}
