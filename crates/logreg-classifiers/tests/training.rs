//! Integration tests for the SGD trainer and the prediction function.

use logreg_classifiers::config::TrainerConfig;
use logreg_classifiers::error::ClassifierError;
use logreg_classifiers::models::{fit_sgd, predict_probability, LogisticRegressionClassifier};
use ndarray::{array, Array1, Array2};

/// 40 rows `[1, t]` with `t` evenly spaced in [0, 1]; label 1 above 0.5
/// except for two flipped rows so the data is not separable.
fn noisy_line() -> (Array2<f64>, Array1<i32>) {
    let n = 40;
    let mut data = Vec::with_capacity(n * 2);
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let t = i as f64 / (n - 1) as f64;
        data.extend_from_slice(&[1.0, t]);
        let mut label = if t > 0.5 { 1 } else { 0 };
        if i == 5 || i == 30 {
            label = 1 - label;
        }
        labels.push(label);
    }
    (
        Array2::from_shape_vec((n, 2), data).unwrap(),
        Array1::from_vec(labels),
    )
}

fn l2_norm(v: &Array1<f64>) -> f64 {
    v.dot(v).sqrt()
}

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

#[test]
fn zero_theta_on_zero_row_predicts_half() {
    let x = Array2::<f64>::zeros((1, 3));
    let theta = Array1::<f64>::zeros(3);
    let p = predict_probability(&x, &theta).unwrap();
    assert_eq!(p.to_vec(), vec![0.5]);
}

#[test]
fn predict_probability_is_bit_identical_across_calls() {
    let (x, _) = noisy_line();
    let theta = array![-1.3, 2.7];
    let a = predict_probability(&x, &theta).unwrap();
    let b = predict_probability(&x, &theta).unwrap();
    assert!(a
        .iter()
        .zip(b.iter())
        .all(|(p, q)| p.to_bits() == q.to_bits()));
    assert!(a.iter().all(|&p| p > 0.0 && p < 1.0));
}

// ---------------------------------------------------------------------------
// Training
// ---------------------------------------------------------------------------

#[test]
fn separable_two_points_with_defaults() {
    // Bias column first: one all-zero negative, one positive with a large feature.
    let x = array![[1.0, 0.0, 0.0], [1.0, 0.0, 10.0]];
    let y = array![0, 1];

    let fit = fit_sgd(&x, &y, &TrainerConfig::default()).unwrap();
    let p = predict_probability(&x, &fit.theta).unwrap();

    assert!(p[0] < 0.5, "negative row scored {}", p[0]);
    assert!(p[1] > 0.5, "positive row scored {}", p[1]);
    assert!(fit.history.converged);
}

#[test]
fn large_epsilon_stops_after_one_epoch() {
    let x = array![[1.0, 0.0], [1.0, 1.0]];
    let y = array![0, 1];
    let params = TrainerConfig {
        convergence_epsilon: 1.0,
        ..TrainerConfig::default()
    };

    let fit = fit_sgd(&x, &y, &params).unwrap();
    assert_eq!(fit.history.epochs, 1);
    assert!(fit.history.converged);
    assert_eq!(fit.history.loss_history.len(), 1);
}

#[test]
fn epoch_cap_is_respected() {
    let (x, y) = noisy_line();
    let params = TrainerConfig::new(0.01, 7, 1e-300, 0.0);
    let fit = fit_sgd(&x, &y, &params).unwrap();
    assert_eq!(fit.history.epochs, 7);
    assert!(!fit.history.converged);
}

#[test]
fn stronger_l2_shrinks_theta() {
    let (x, y) = noisy_line();
    let norms: Vec<f64> = [0.0, 0.01, 0.1]
        .iter()
        .map(|&lambda| {
            let params = TrainerConfig::new(0.1, 200, 1e-300, lambda);
            l2_norm(&fit_sgd(&x, &y, &params).unwrap().theta)
        })
        .collect();

    assert!(norms[0] > norms[1], "norms = {:?}", norms);
    assert!(norms[1] > norms[2], "norms = {:?}", norms);
}

#[test]
fn training_is_deterministic() {
    let (x, y) = noisy_line();
    let params = TrainerConfig::new(0.05, 50, 1e-9, 0.001);
    let a = fit_sgd(&x, &y, &params).unwrap();
    let b = fit_sgd(&x, &y, &params).unwrap();
    assert_eq!(a, b);
}

#[test]
fn loss_decreases_on_learnable_data() {
    let (x, y) = noisy_line();
    let params = TrainerConfig::new(0.1, 100, 1e-300, 0.0);
    let fit = fit_sgd(&x, &y, &params).unwrap();
    let first = fit.history.loss_history[0];
    let last = fit.history.final_loss().unwrap();
    assert!(last < first, "loss went from {} to {}", first, last);
}

#[test]
fn mismatched_labels_fail_fast() {
    let (x, _) = noisy_line();
    let y = Array1::<i32>::zeros(3);
    let err = fit_sgd(&x, &y, &TrainerConfig::default()).unwrap_err();
    assert_eq!(
        err,
        ClassifierError::LengthMismatch {
            what: "labels",
            expected: 40,
            found: 3
        }
    );
}

#[test]
fn invalid_hyper_parameters_are_rejected() {
    let (x, y) = noisy_line();
    let params = TrainerConfig {
        convergence_epsilon: -1.0,
        ..TrainerConfig::default()
    };
    assert!(matches!(
        fit_sgd(&x, &y, &params),
        Err(ClassifierError::InvalidParameter {
            name: "convergence_epsilon",
            ..
        })
    ));
}

#[test]
fn classifier_separates_noisy_line_mostly() {
    let (x, y) = noisy_line();
    let mut model = LogisticRegressionClassifier::new(TrainerConfig::new(0.1, 2000, 1e-7, 0.0));
    model.fit(&x, &y).unwrap();

    let predicted = model.predict(&x, 0.5).unwrap();
    let correct = predicted.iter().zip(y.iter()).filter(|(p, t)| p == t).count();
    assert!(correct >= 36, "only {} of 40 rows correct", correct);
}
