use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::TrainerConfig;
use crate::error::{ClassifierError, Result};
use crate::models::sgd::{fit_sgd, FitHistory};

/// Logistic function `1 / (1 + e^-z)`.
#[inline]
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Apply `sigmoid(x . theta)` to every row of `x`.
///
/// Pure: the same `(x, theta)` always produces bit-identical output.
pub fn predict_probability(x: &Array2<f64>, theta: &Array1<f64>) -> Result<Array1<f64>> {
    if x.ncols() != theta.len() {
        return Err(ClassifierError::DimensionMismatch {
            features: x.ncols(),
            parameters: theta.len(),
        });
    }
    Ok(x.dot(theta).mapv(sigmoid))
}

/// Draw an untrained parameter vector with entries uniform in `[0, 1)`.
pub fn random_theta(n_features: usize, seed: u64) -> Array1<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n_features).map(|_| rng.gen::<f64>()).collect()
}

/// Binary logistic-regression classifier trained with online SGD.
#[derive(Debug, Clone)]
pub struct LogisticRegressionClassifier {
    theta: Option<Array1<f64>>,
    params: TrainerConfig,
    history: Option<FitHistory>,
}

impl LogisticRegressionClassifier {
    pub fn new(params: TrainerConfig) -> Self {
        LogisticRegressionClassifier {
            theta: None,
            params,
            history: None,
        }
    }

    /// Wrap an existing parameter vector, e.g. a random baseline.
    pub fn from_theta(theta: Array1<f64>) -> Self {
        LogisticRegressionClassifier {
            theta: Some(theta),
            params: TrainerConfig::default(),
            history: None,
        }
    }

    /// Fit the model. `y` uses 1 for the positive class and 0 for the negative one.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<i32>) -> Result<&FitHistory> {
        let fit = fit_sgd(x, y, &self.params)?;
        self.theta = Some(fit.theta);
        Ok(self.history.insert(fit.history))
    }

    /// Probability of the positive class for every row of `x`.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let theta = self.theta.as_ref().ok_or(ClassifierError::NotFitted)?;
        predict_probability(x, theta)
    }

    /// Hard 0/1 predictions using `p > cutoff`.
    pub fn predict(&self, x: &Array2<f64>, cutoff: f64) -> Result<Array1<i32>> {
        Ok(self
            .predict_proba(x)?
            .mapv(|p| if p > cutoff { 1 } else { 0 }))
    }

    pub fn theta(&self) -> Option<&Array1<f64>> {
        self.theta.as_ref()
    }

    pub fn history(&self) -> Option<&FitHistory> {
        self.history.as_ref()
    }

    pub fn params(&self) -> &TrainerConfig {
        &self.params
    }

    pub fn name(&self) -> &str {
        "logistic-sgd"
    }
}
