//! Tests for the scoring engine.

use super::*;
use crate::traits::{Features, Predictor, ProbabilisticModel};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Classifier that returns a fixed probability matrix.
struct FixedClassifier {
    proba: Matrix<f32>,
    classes: Option<Vec<f32>>,
}

impl Predictor for FixedClassifier {
    fn predict(&self, _x: Features<'_>) -> Result<Vector<f32>> {
        Ok(self
            .proba
            .argmax_rows()
            .into_iter()
            .map(|c| c as f32)
            .collect::<Vec<_>>()
            .into())
    }
}

impl ProbabilisticModel for FixedClassifier {
    fn predict_proba(&self, _x: Features<'_>) -> Result<Matrix<f32>> {
        Ok(self.proba.clone())
    }

    fn classes(&self) -> Option<Vec<f32>> {
        self.classes.clone()
    }
}

/// Regressor that predicts the first feature.
struct FirstColumn;

impl Predictor for FirstColumn {
    fn predict(&self, x: Features<'_>) -> Result<Vector<f32>> {
        Ok(x.matrix().column(0))
    }
}

/// Model that refuses the raw matrix.
struct NeedsDataset;

impl Predictor for NeedsDataset {
    fn predict(&self, x: Features<'_>) -> Result<Vector<f32>> {
        match x {
            Features::Dataset(d) => Ok(d.target().clone()),
            Features::Matrix(_) => Err(EvaluarError::Model("dataset required".into())),
        }
    }

    fn accepts_dataset(&self) -> bool {
        true
    }
}

fn binary_proba(p_one: &[f32]) -> Matrix<f32> {
    let data = p_one.iter().flat_map(|&p| [1.0 - p, p]).collect();
    Matrix::from_vec(p_one.len(), 2, data).expect("valid shape")
}

fn dataset(values: Vec<f32>, n_features: usize, target: Vec<f32>) -> Dataset {
    let n = target.len();
    Dataset::new(
        Matrix::from_vec(n, n_features, values).expect("valid shape"),
        Vector::from_vec(target),
    )
    .expect("aligned")
}

/// Ten rows, balanced classes, row 4 misclassified.
fn nine_of_ten() -> (Dataset, FixedClassifier) {
    let y = vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0];
    let test = dataset((0..10).map(|i| i as f32).collect(), 1, y);
    let model = FixedClassifier {
        proba: binary_proba(&[0.1, 0.2, 0.3, 0.2, 0.6, 0.7, 0.8, 0.9, 0.7, 0.8]),
        classes: None,
    };
    (test, model)
}

fn uniform_rows(n: usize, low: f32, high: f32, rng: &mut StdRng) -> Dataset {
    let values = (0..n * 2).map(|_| rng.gen_range(low..high)).collect();
    dataset(values, 2, vec![0.0; n])
}

fn fast_config() -> ScoringConfig {
    ScoringConfig::default().with_separation(SeparationConfig {
        n_estimators: 20,
        ..SeparationConfig::default()
    })
}

#[test]
fn test_classification_accuracy_nine_of_ten() {
    let (test, model) = nine_of_ten();
    let scoring = Scoring::new(ScoringConfig::default()).expect("engine");
    let report = scoring
        .score_value_report(ModelRef::Probabilistic(&model), &test, None, None)
        .expect("scored");

    let acc = report["accuracy"];
    assert_eq!(acc.score_value, 0.9);
    assert!(acc.ci_low <= 0.9 && 0.9 <= acc.ci_high);

    // Classification metrics only.
    for name in ["auc", "log_loss", "accuracy", "recall", "precision", "f1"] {
        assert!(report.contains_key(name), "missing {name}");
    }
    assert!(!report.contains_key("mae"));
}

#[test]
fn test_every_entry_brackets_its_score() {
    let (test, model) = nine_of_ten();
    let scoring = Scoring::new(ScoringConfig::default()).expect("engine");
    let report = scoring
        .score_value_report(ModelRef::Probabilistic(&model), &test, None, None)
        .expect("scored");
    for (name, entry) in &report {
        assert!(
            entry.ci_low <= entry.score_value && entry.score_value <= entry.ci_high,
            "{name}: {entry:?}"
        );
    }
}

#[test]
fn test_unknown_metrics_give_empty_report() {
    let (test, model) = nine_of_ten();
    let scoring = Scoring::new(ScoringConfig::default().with_metrics(["nonexistent"]))
        .expect("permissive");
    let report = scoring
        .score_value_report(ModelRef::Probabilistic(&model), &test, None, None)
        .expect("scored");
    assert!(report.is_empty());
}

#[test]
fn test_strict_metrics_rejects_unknown() {
    let config = ScoringConfig::default()
        .with_metrics(["accuracy", "nonexistent"])
        .with_strict_metrics(true);
    let err = Scoring::new(config).unwrap_err();
    assert!(matches!(err, EvaluarError::UnknownMetric(_)));
}

#[test]
fn test_regression_perfect_predictor() {
    let target = vec![1.5, -2.0, 3.0, 4.25, 0.0, 7.0];
    let test = dataset(target.clone(), 1, target);
    let scoring = Scoring::new(ScoringConfig::default()).expect("engine");
    let report = scoring
        .score_value_report(ModelRef::Point(&FirstColumn), &test, None, None)
        .expect("scored");

    for name in ["mae", "mse", "rmse"] {
        let entry = report[name];
        assert_eq!(entry.score_value, 0.0, "{name}");
        assert_eq!(entry.ci_low, 0.0, "{name}");
        assert_eq!(entry.ci_high, 0.0, "{name}");
    }
    assert_eq!(report["r2"].score_value, 1.0);
    assert!(!report.contains_key("accuracy"));
}

#[test]
fn test_supplied_predictions_override_model() {
    let (test, model) = nine_of_ten();
    let scoring = Scoring::new(ScoringConfig::default().with_metrics(["accuracy"]))
        .expect("engine");
    let perfect = test.target().as_slice().to_vec();
    let report = scoring
        .score_value_report(ModelRef::Probabilistic(&model), &test, None, Some(perfect.as_slice()))
        .expect("scored");
    assert_eq!(report["accuracy"].score_value, 1.0);

    let point = dataset(vec![0.0; 3], 1, vec![1.0, 2.0, 3.0]);
    let report = scoring
        .score_value_report(ModelRef::Point(&FirstColumn), &point, None, Some(&[1.0, 2.0][..]))
        .unwrap_err();
    assert!(matches!(report, EvaluarError::ShapeMismatch { .. }));
}

#[test]
fn test_supplied_probabilities_override_model() {
    let (test, model) = nine_of_ten();
    let scoring = Scoring::new(ScoringConfig::default().with_metrics(["auc"])).expect("engine");
    let perfect = binary_proba(&[0.0, 0.1, 0.2, 0.3, 0.4, 0.6, 0.7, 0.8, 0.9, 1.0]);
    let report = scoring
        .score_value_report(ModelRef::Probabilistic(&model), &test, Some(&perfect), None)
        .expect("scored");
    assert_eq!(report["auc"].score_value, 1.0);
}

#[test]
fn test_non_contiguous_class_labels() {
    let y = vec![3.0, 3.0, 7.0, 7.0];
    let test = dataset(vec![0.0; 4], 1, y);
    let model = FixedClassifier {
        proba: binary_proba(&[0.2, 0.4, 0.6, 0.9]),
        classes: Some(vec![3.0, 7.0]),
    };
    let scoring = Scoring::new(ScoringConfig::default()).expect("engine");
    let report = scoring
        .score_value_report(ModelRef::Probabilistic(&model), &test, None, None)
        .expect("scored");
    assert_eq!(report["accuracy"].score_value, 1.0);
    assert_eq!(report["auc"].score_value, 1.0);

    // Supplied labels are matched against the model's classes.
    let report = scoring
        .score_value_report(
            ModelRef::Probabilistic(&model),
            &test,
            None,
            Some(&[3.0, 5.0, 7.0, 7.0][..]),
        )
        .expect("scored");
    assert_eq!(report["accuracy"].score_value, 0.75);
}

#[test]
fn test_label_without_probability_column() {
    let test = dataset(vec![0.0; 3], 1, vec![0.0, 1.0, 2.0]);
    let model = FixedClassifier {
        proba: binary_proba(&[0.2, 0.7, 0.9]),
        classes: None,
    };
    let scoring = Scoring::new(ScoringConfig::default()).expect("engine");
    let err = scoring
        .score_value_report(ModelRef::Probabilistic(&model), &test, None, None)
        .unwrap_err();
    assert!(matches!(err, EvaluarError::ShapeMismatch { .. }));
}

#[test]
fn test_probability_shape_errors() {
    let (test, model) = nine_of_ten();
    let scoring = Scoring::new(ScoringConfig::default()).expect("engine");

    let short = binary_proba(&[0.5; 9]);
    let err = scoring
        .score_value_report(ModelRef::Probabilistic(&model), &test, Some(&short), None)
        .unwrap_err();
    assert!(matches!(err, EvaluarError::ShapeMismatch { .. }));

    let three_classes = FixedClassifier {
        proba: binary_proba(&[0.5; 10]),
        classes: Some(vec![0.0, 1.0, 2.0]),
    };
    let err = scoring
        .score_value_report(ModelRef::Probabilistic(&three_classes), &test, None, None)
        .unwrap_err();
    assert!(matches!(err, EvaluarError::ShapeMismatch { .. }));
}

#[test]
fn test_undefined_metric_is_skipped() {
    // A single class in the test set leaves AUC undefined.
    let test = dataset(vec![0.0; 4], 1, vec![1.0; 4]);
    let model = FixedClassifier {
        proba: binary_proba(&[0.6, 0.7, 0.8, 0.4]),
        classes: None,
    };
    let scoring = Scoring::new(ScoringConfig::default().with_metrics(["auc", "accuracy"]))
        .expect("engine");
    let report = scoring
        .score_value_report(ModelRef::Probabilistic(&model), &test, None, None)
        .expect("scored");
    assert!(!report.contains_key("auc"));
    assert_eq!(report["accuracy"].score_value, 0.75);
}

#[test]
fn test_empty_test_set() {
    let scoring = Scoring::new(ScoringConfig::default()).expect("engine");
    let empty = dataset(vec![], 1, vec![]);
    let err = scoring
        .score_value_report(ModelRef::Point(&FirstColumn), &empty, None, None)
        .unwrap_err();
    assert!(matches!(err, EvaluarError::EmptyDataset(_)));
}

#[test]
fn test_values_rounded_to_precision() {
    let test = dataset(vec![0.0, 0.0, 0.0], 1, vec![1.0, 2.0, 4.0]);
    let scoring =
        Scoring::new(ScoringConfig::default().with_metrics(["mae"]).with_precision(2))
            .expect("engine");
    let report = scoring
        .score_value_report(ModelRef::Point(&FirstColumn), &test, None, None)
        .expect("scored");
    // mae = 7 / 3
    assert_eq!(report["mae"].score_value, 2.33);
}

#[test]
fn test_dataset_features_for_capable_model() {
    let test = dataset(vec![9.0, 9.0], 1, vec![1.0, 2.0]);
    let scoring = Scoring::new(ScoringConfig::default().with_metrics(["mae"])).expect("engine");
    let report = scoring
        .score_value_report(ModelRef::Point(&NeedsDataset), &test, None, None)
        .expect("scored");
    assert_eq!(report["mae"].score_value, 0.0);
}

#[test]
fn test_custom_registry() {
    fn always_one(_: &[f32], _: MetricInput<'_>) -> Option<f64> {
        Some(1.0)
    }

    let mut registry = MetricRegistry::empty();
    registry
        .register(Metric::new("one", ProblemType::Regression, false, always_one))
        .expect("registered");
    let scoring = Scoring::with_registry(registry, ScoringConfig::default()).expect("engine");
    assert_eq!(scoring.metrics().len(), 1);

    let test = dataset(vec![1.0, 2.0], 1, vec![1.0, 2.0]);
    let report = scoring
        .score_value_report(ModelRef::Point(&FirstColumn), &test, None, None)
        .expect("scored");
    let entry = report["one"];
    assert_eq!((entry.score_value, entry.ci_low, entry.ci_high), (1.0, 1.0, 1.0));
}

#[test]
fn test_quality_disjoint_ranges_is_zero() {
    let mut rng = StdRng::seed_from_u64(3);
    let train = uniform_rows(60, 0.0, 1.0, &mut rng);
    let test = uniform_rows(60, 5.0, 6.0, &mut rng);
    let scoring = Scoring::new(fast_config()).expect("engine");
    let quality = scoring.score_quality_report(&train, &test).expect("quality");
    assert_eq!(quality, 0.0);
}

#[test]
fn test_quality_in_unit_interval_and_deterministic() {
    let mut rng = StdRng::seed_from_u64(11);
    let train = uniform_rows(40, 0.0, 1.0, &mut rng);
    let test = uniform_rows(40, 0.0, 1.0, &mut rng);
    let scoring = Scoring::new(fast_config()).expect("engine");

    let first = scoring.score_quality_report(&train, &test).expect("quality");
    let second = scoring.score_quality_report(&train, &test).expect("quality");
    assert!((0.0..=1.0).contains(&first));
    assert_eq!(first, second);
}

#[test]
fn test_quality_input_errors() {
    let scoring = Scoring::new(fast_config()).expect("engine");
    let rows = dataset(vec![0.0, 1.0, 2.0, 3.0], 2, vec![0.0, 0.0]);
    let empty = dataset(vec![], 2, vec![]);
    let narrow = dataset(vec![0.0, 1.0], 1, vec![0.0, 0.0]);

    assert!(matches!(
        scoring.score_quality_report(&empty, &rows),
        Err(EvaluarError::EmptyDataset(_))
    ));
    assert!(matches!(
        scoring.score_quality_report(&rows, &empty),
        Err(EvaluarError::EmptyDataset(_))
    ));
    assert!(matches!(
        scoring.score_quality_report(&rows, &narrow),
        Err(EvaluarError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_quality_with_single_row_sets() {
    let scoring = Scoring::new(fast_config()).expect("engine");
    let train = dataset(vec![0.0, 1.0], 2, vec![0.0]);
    let test = dataset(vec![2.0, 3.0], 2, vec![0.0]);

    let quality = scoring.score_quality_report(&train, &test).expect("quality");
    assert!((0.0..=1.0).contains(&quality));
}

#[test]
fn test_quality_independent_of_thread_count() {
    let mut rng = StdRng::seed_from_u64(29);
    let train = uniform_rows(60, 0.0, 1.0, &mut rng);
    let test = uniform_rows(60, 0.4, 1.4, &mut rng);
    let scoring = Scoring::new(fast_config()).expect("engine");

    let parallel = scoring.score_quality_report(&train, &test).expect("quality");
    let single = rayon::ThreadPoolBuilder::new()
        .num_threads(1)
        .build()
        .expect("thread pool")
        .install(|| scoring.score_quality_report(&train, &test))
        .expect("quality");
    assert_eq!(parallel, single);
}

#[test]
fn test_score_report_with_forest_model() {
    // One feature with a gap between the classes.
    let mut rng = StdRng::seed_from_u64(5);
    let values: Vec<f32> = (0..40)
        .map(|i| {
            if i % 2 == 0 {
                rng.gen_range(0.0..0.4)
            } else {
                rng.gen_range(0.6..1.0)
            }
        })
        .collect();
    let target: Vec<f32> = (0..40).map(|i| (i % 2) as f32).collect();
    let labels: Vec<usize> = target.iter().map(|&t| t as usize).collect();
    let data = dataset(values, 1, target);

    let mut forest = RandomForestClassifier::new(10).with_random_state(1);
    forest.fit(data.values(), &labels).expect("fit");

    let scoring = Scoring::new(fast_config().with_metrics(["accuracy", "auc"])).expect("engine");
    let report = scoring
        .score_report(ModelRef::Probabilistic(&forest), &data, &data)
        .expect("report");
    assert_eq!(report.metric_scores["accuracy"].score_value, 1.0);
    assert_eq!(report.metric_scores["auc"].score_value, 1.0);
    assert!((0.0..=1.0).contains(&report.separation_quality));

    let again = scoring
        .score_report(ModelRef::Probabilistic(&forest), &data, &data)
        .expect("report");
    assert_eq!(report, again);
}

#[test]
fn test_round_to() {
    assert_eq!(round_to(0.123_456_789, 5), 0.12346);
    assert_eq!(round_to(2.0, 0), 2.0);
}
