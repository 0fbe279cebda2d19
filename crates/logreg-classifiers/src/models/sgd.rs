//! Online (per-sample) gradient descent for L2-regularized logistic regression.
//!
//! One epoch walks the rows in their original order. Each row's prediction is
//! made with the parameters left by the previous row, and the parameters are
//! updated before the next row is seen, so `theta` is a loop-carried value and
//! the rows of an epoch cannot be processed independently.
//!
//! The epoch loss is the total cross-entropy of the predictions recorded
//! *during* the pass, each made with the parameters in effect at that row,
//! rather than a fresh evaluation with the end-of-epoch parameters.
use log::{debug, info};
use ndarray::{Array1, Array2};

use crate::config::TrainerConfig;
use crate::error::{ensure_binary_labels, ClassifierError, Result};
use crate::models::logistic::sigmoid;

/// Probabilities are clamped into `[LOG_CLAMP, 1 - LOG_CLAMP]` before the
/// logarithms of the cross-entropy are taken.
pub const LOG_CLAMP: f64 = 1e-15;

/// Loss value the first epoch is compared against.
const INITIAL_PREVIOUS_LOSS: f64 = 1.0;

/// Per-epoch diagnostics of a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct FitHistory {
    /// Number of completed epochs.
    pub epochs: usize,
    /// True when training stopped on the loss tolerance rather than the epoch cap.
    pub converged: bool,
    /// Total cross-entropy of every completed epoch.
    pub loss_history: Vec<f64>,
}

impl FitHistory {
    pub fn final_loss(&self) -> Option<f64> {
        self.loss_history.last().copied()
    }
}

/// Result of [`fit_sgd`].
#[derive(Debug, Clone, PartialEq)]
pub struct SgdFit {
    pub theta: Array1<f64>,
    pub history: FitHistory,
}

/// Total binary cross-entropy, `-sum(y ln(p) + (1 - y) ln(1 - p))`.
///
/// Each probability is clamped into `[LOG_CLAMP, 1 - LOG_CLAMP]`, so a
/// saturated sigmoid output of exactly 0 or 1 yields a large but finite loss.
pub fn cross_entropy(y: &Array1<i32>, y_hat: &[f64]) -> Result<f64> {
    if y.len() != y_hat.len() {
        return Err(ClassifierError::LengthMismatch {
            what: "predictions",
            expected: y.len(),
            found: y_hat.len(),
        });
    }

    let loss = y
        .iter()
        .zip(y_hat.iter())
        .map(|(&label, &p)| {
            let p = p.clamp(LOG_CLAMP, 1.0 - LOG_CLAMP);
            let label = label as f64;
            -(label * p.ln() + (1.0 - label) * (1.0 - p).ln())
        })
        .sum();

    Ok(loss)
}

/// Fit logistic-regression parameters with per-sample gradient steps.
///
/// `x` is an `n x d` matrix that already carries its bias column, `y` holds
/// `n` labels in {0, 1}. Parameters start at zero. For every row `i`:
///
/// ```text
/// yhat_i = sigmoid(theta . x_i)
/// theta  = theta + learning_rate * (x_i * (y_i - yhat_i) - l2_lambda * theta)
/// ```
///
/// Training stops when the absolute change of the epoch loss falls below
/// `convergence_epsilon` (the first epoch is compared against a loss of 1.0)
/// or after `max_iterations` epochs.
///
/// # Errors
///
/// Fails before any update when the inputs are empty, the label count does not
/// match the row count, a label is not binary, or a hyper-parameter is invalid.
pub fn fit_sgd(x: &Array2<f64>, y: &Array1<i32>, params: &TrainerConfig) -> Result<SgdFit> {
    params.validate()?;

    let (n_samples, n_features) = x.dim();
    if n_samples == 0 {
        return Err(ClassifierError::EmptyInput("feature matrix"));
    }
    if n_features == 0 {
        return Err(ClassifierError::EmptyInput("feature columns"));
    }
    if y.len() != n_samples {
        return Err(ClassifierError::LengthMismatch {
            what: "labels",
            expected: n_samples,
            found: y.len(),
        });
    }
    ensure_binary_labels(y.iter())?;

    let learning_rate = params.learning_rate;
    let l2_lambda = params.l2_lambda;

    let mut theta = Array1::<f64>::zeros(n_features);
    let mut y_hat = Vec::with_capacity(n_samples);
    let mut previous_loss = INITIAL_PREVIOUS_LOSS;
    let mut loss_history = Vec::new();
    let mut converged = false;

    debug!(
        "Starting SGD on {} rows x {} features (lr = {}, lambda = {}, max epochs = {})",
        n_samples, n_features, learning_rate, l2_lambda, params.max_iterations
    );

    for epoch in 0..params.max_iterations {
        y_hat.clear();

        for (row, &label) in x.outer_iter().zip(y.iter()) {
            let p = sigmoid(row.dot(&theta));
            y_hat.push(p);

            let residual = label as f64 - p;
            theta.zip_mut_with(&row, |t, &xi| {
                *t += learning_rate * (xi * residual - l2_lambda * *t);
            });
        }

        let loss = cross_entropy(y, &y_hat)?;
        loss_history.push(loss);
        debug!("Epoch {}: loss = {:.6}", epoch + 1, loss);

        if (previous_loss - loss).abs() < params.convergence_epsilon {
            converged = true;
            break;
        }
        previous_loss = loss;
    }

    let history = FitHistory {
        epochs: loss_history.len(),
        converged,
        loss_history,
    };

    info!(
        "SGD finished after {} epochs (converged: {}), final loss {:.6}",
        history.epochs,
        history.converged,
        history.final_loss().unwrap_or(f64::NAN)
    );

    Ok(SgdFit { theta, history })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn cross_entropy_of_half_is_ln2_per_row() {
        let y = array![0, 1, 1];
        let loss = cross_entropy(&y, &[0.5, 0.5, 0.5]).unwrap();
        assert!((loss - 3.0 * std::f64::consts::LN_2).abs() < 1e-12);
    }

    #[test]
    fn cross_entropy_saturated_probability_is_finite() {
        let y = array![1, 0];
        let loss = cross_entropy(&y, &[0.0, 1.0]).unwrap();
        assert!(loss.is_finite());
        assert!(loss > 60.0);
    }

    #[test]
    fn cross_entropy_length_mismatch() {
        let y = array![1, 0];
        assert!(cross_entropy(&y, &[0.5]).is_err());
    }

    #[test]
    fn first_row_step_from_zero_theta() {
        // With theta = 0 the first prediction is 0.5 and the penalty term vanishes.
        let x = array![[1.0, 2.0]];
        let y = array![1];
        let params = TrainerConfig::new(0.1, 1, 1e-4, 0.5);
        let fit = fit_sgd(&x, &y, &params).unwrap();
        assert!((fit.theta[0] - 0.05).abs() < 1e-12);
        assert!((fit.theta[1] - 0.10).abs() < 1e-12);
        assert_eq!(fit.history.epochs, 1);
        assert!((fit.history.loss_history[0] - std::f64::consts::LN_2).abs() < 1e-12);
    }

    #[test]
    fn later_rows_see_earlier_updates() {
        // Two identical positive rows: the second prediction uses the
        // parameters left by the first, so it must exceed 0.5.
        let x = array![[1.0], [1.0]];
        let y = array![1, 1];
        let params = TrainerConfig::new(0.5, 1, 1e-4, 0.0);
        let fit = fit_sgd(&x, &y, &params).unwrap();

        let first = 0.5;
        let theta_after_first = 0.5 * (1.0 - first);
        let second = sigmoid(theta_after_first);
        let expected_theta = theta_after_first + 0.5 * (1.0 - second);
        assert!((fit.theta[0] - expected_theta).abs() < 1e-12);

        let expected_loss = -(first.ln() + second.ln());
        assert!((fit.history.loss_history[0] - expected_loss).abs() < 1e-12);
    }

    #[test]
    fn rejects_shape_mismatch_and_bad_labels() {
        let x = array![[1.0, 0.0], [1.0, 1.0]];
        let params = TrainerConfig::default();
        assert!(matches!(
            fit_sgd(&x, &array![1], &params),
            Err(ClassifierError::LengthMismatch { .. })
        ));
        assert!(matches!(
            fit_sgd(&x, &array![1, -1], &params),
            Err(ClassifierError::NonBinaryLabel { index: 1, value: -1 })
        ));
        let empty = Array2::<f64>::zeros((0, 2));
        assert!(matches!(
            fit_sgd(&empty, &Array1::zeros(0), &params),
            Err(ClassifierError::EmptyInput(_))
        ));
    }

    #[test]
    fn does_not_mutate_inputs() {
        let x = array![[1.0, 0.2], [1.0, 0.8]];
        let y = array![0, 1];
        let (x0, y0) = (x.clone(), y.clone());
        let _ = fit_sgd(&x, &y, &TrainerConfig::new(0.1, 10, 1e-6, 0.01)).unwrap();
        assert_eq!(x, x0);
        assert_eq!(y, y0);
    }
}
