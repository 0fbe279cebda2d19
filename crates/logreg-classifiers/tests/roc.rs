//! Integration tests for the ROC threshold sweep and classification metrics.

use logreg_classifiers::config::{ThresholdGrid, TrainerConfig};
use logreg_classifiers::error::ClassifierError;
use logreg_classifiers::models::{fit_sgd, predict_probability};
use logreg_classifiers::stats::{classification_metrics, roc_curve};
use ndarray::{array, Array1, Array2};

fn perfect_ranking() -> (Array1<i32>, Array1<f64>) {
    (
        array![0, 0, 0, 1, 1, 1],
        array![0.12, 0.22, 0.32, 0.72, 0.82, 0.92],
    )
}

#[test]
fn default_grid_yields_twenty_ordered_points() {
    let (y, p) = perfect_ranking();
    let curve = roc_curve(&y, &p, &ThresholdGrid::default()).unwrap();
    assert_eq!(curve.len(), 20);
    assert!(curve
        .points
        .windows(2)
        .all(|w| w[0].threshold < w[1].threshold));
    for point in curve.iter() {
        assert!((0.0..=1.0).contains(&point.fpr));
        assert!((0.0..=1.0).contains(&point.tpr));
    }
}

#[test]
fn perfect_ranking_reaches_top_left_corner() {
    let (y, p) = perfect_ranking();
    let curve = roc_curve(&y, &p, &ThresholdGrid::default()).unwrap();
    assert!(curve.iter().any(|pt| pt.fpr == 0.0 && pt.tpr == 1.0));
}

#[test]
fn fpr_is_non_decreasing_as_threshold_decreases() {
    let (y, p) = perfect_ranking();
    let curve = roc_curve(&y, &p, &ThresholdGrid::default()).unwrap();
    let fpr: Vec<f64> = curve.fpr().into_iter().rev().collect();
    assert!(fpr.windows(2).all(|w| w[0] <= w[1]), "fpr = {:?}", fpr);
    let tpr: Vec<f64> = curve.tpr().into_iter().rev().collect();
    assert!(tpr.windows(2).all(|w| w[0] <= w[1]), "tpr = {:?}", tpr);
}

#[test]
fn threshold_zero_calls_everything_positive() {
    let y = array![1, 0, 1, 0];
    let p = array![0.6, 0.3, 0.01, 0.99];
    let curve = roc_curve(&y, &p, &ThresholdGrid::default()).unwrap();
    let first = curve.points[0];
    assert_eq!(first.threshold, 0.0);
    assert_eq!((first.fpr, first.tpr), (1.0, 1.0));
}

#[test]
fn scores_equal_to_a_threshold_are_excluded() {
    // 0.5 is the tenth grid threshold; the positive at 0.5 is neither TP nor FN.
    let y = array![1, 1, 0];
    let p = array![0.5, 0.9, 0.1];
    let curve = roc_curve(&y, &p, &ThresholdGrid::default()).unwrap();
    let at_half = curve.points[10];
    assert_eq!(at_half.threshold, 0.5);
    assert_eq!(at_half.counts.tied, 1);
    assert_eq!(at_half.counts.true_positives + at_half.counts.false_negatives, 1);
    assert_eq!(at_half.tpr, 1.0);
}

#[test]
fn curve_is_deterministic() {
    let (y, p) = perfect_ranking();
    let grid = ThresholdGrid::default();
    assert_eq!(roc_curve(&y, &p, &grid).unwrap(), roc_curve(&y, &p, &grid).unwrap());
}

#[test]
fn misaligned_inputs_fail() {
    let err = roc_curve(&array![1, 0, 1], &array![0.5, 0.2], &ThresholdGrid::default()).unwrap_err();
    assert_eq!(
        err,
        ClassifierError::LengthMismatch {
            what: "probabilities",
            expected: 3,
            found: 2
        }
    );
}

#[test]
fn custom_grid_is_respected() {
    let (y, p) = perfect_ranking();
    let grid = ThresholdGrid::new(0.25, 0.75, 0.25).unwrap();
    let curve = roc_curve(&y, &p, &grid).unwrap();
    let thresholds: Vec<f64> = curve.iter().map(|pt| pt.threshold).collect();
    assert_eq!(thresholds, vec![0.25, 0.5]);
}

#[test]
fn oversized_grid_is_an_error_not_a_panic() {
    let (y, p) = perfect_ranking();
    let grid = ThresholdGrid {
        start: 0.0,
        end: 1.0,
        step: 1e-300,
    };
    let err = roc_curve(&y, &p, &grid).unwrap_err();
    assert!(matches!(err, ClassifierError::InvalidGrid { .. }));
}

#[test]
fn trained_model_beats_random_ranking() {
    let n = 60;
    let mut data = Vec::with_capacity(n * 3);
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let a = (i % 10) as f64 / 10.0;
        let b = ((i * 7) % 13) as f64 / 13.0;
        data.extend_from_slice(&[1.0, a, b]);
        labels.push(if a + 0.3 * b > 0.6 { 1 } else { 0 });
    }
    let x = Array2::from_shape_vec((n, 3), data).unwrap();
    let y = Array1::from_vec(labels);

    let fit = fit_sgd(&x, &y, &TrainerConfig::new(0.1, 3000, 1e-8, 0.0)).unwrap();
    let p = predict_probability(&x, &fit.theta).unwrap();
    let curve = roc_curve(&y, &p, &ThresholdGrid::default()).unwrap();
    assert!(curve.auc() > 0.9, "auc = {}", curve.auc());

    let metrics = classification_metrics(&y, &p, 0.5).unwrap();
    assert!(metrics.accuracy > 0.8, "accuracy = {}", metrics.accuracy);
}
