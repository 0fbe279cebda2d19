use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ClassifierError, Result};

/// Hyper-parameters of the online gradient-descent trainer.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct TrainerConfig {
    pub learning_rate: f64,
    /// Upper bound on the number of epochs (full passes over the data).
    pub max_iterations: usize,
    /// Training stops once the epoch-to-epoch change in loss drops below this.
    pub convergence_epsilon: f64,
    /// L2 regularization strength.
    pub l2_lambda: f64,
}

impl TrainerConfig {
    pub fn new(
        learning_rate: f64,
        max_iterations: usize,
        convergence_epsilon: f64,
        l2_lambda: f64,
    ) -> Self {
        Self {
            learning_rate,
            max_iterations,
            convergence_epsilon,
            l2_lambda,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ClassifierError::InvalidParameter {
                name: "learning_rate",
                value: self.learning_rate,
            });
        }
        if self.max_iterations == 0 {
            return Err(ClassifierError::InvalidParameter {
                name: "max_iterations",
                value: 0.0,
            });
        }
        if !(self.convergence_epsilon.is_finite() && self.convergence_epsilon > 0.0) {
            return Err(ClassifierError::InvalidParameter {
                name: "convergence_epsilon",
                value: self.convergence_epsilon,
            });
        }
        if !(self.l2_lambda.is_finite() && self.l2_lambda >= 0.0) {
            return Err(ClassifierError::InvalidParameter {
                name: "l2_lambda",
                value: self.l2_lambda,
            });
        }
        Ok(())
    }
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.001,
            max_iterations: 100_000,
            convergence_epsilon: 1e-4,
            l2_lambda: 0.001,
        }
    }
}

/// Upper bound on the number of thresholds a grid may produce.
pub const MAX_THRESHOLDS: f64 = 1e6;

/// Half-open grid of decision thresholds `[start, end)` sampled every `step`.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ThresholdGrid {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl ThresholdGrid {
    pub fn new(start: f64, end: f64, step: f64) -> Result<Self> {
        let grid = Self { start, end, step };
        grid.validate()?;
        Ok(grid)
    }

    pub fn validate(&self) -> Result<()> {
        let finite = self.start.is_finite() && self.end.is_finite() && self.step.is_finite();
        let count = ((self.end - self.start) / self.step).ceil();
        if !finite
            || self.step <= 0.0
            || self.end <= self.start
            || !count.is_finite()
            || count > MAX_THRESHOLDS
        {
            return Err(ClassifierError::InvalidGrid {
                start: self.start,
                end: self.end,
                step: self.step,
            });
        }
        Ok(())
    }

    /// Number of thresholds, `ceil((end - start) / step)`.
    pub fn len(&self) -> usize {
        ((self.end - self.start) / self.step).ceil() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Thresholds in ascending order, each computed as `start + i * step`.
    pub fn thresholds(&self) -> Vec<f64> {
        (0..self.len())
            .map(|i| self.start + i as f64 * self.step)
            .collect()
    }
}

impl Default for ThresholdGrid {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 1.0,
            step: 0.05,
        }
    }
}

/// How raw features are rescaled before training.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub enum ScalingMode {
    None,
    MinMax { low: f64, high: f64 },
}

impl Default for ScalingMode {
    fn default() -> Self {
        ScalingMode::MinMax {
            low: 0.0,
            high: 1.0,
        }
    }
}

impl FromStr for ScalingMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(ScalingMode::None),
            "minmax" | "min-max" => Ok(ScalingMode::default()),
            _ => Err(format!(
                "Unknown scaling mode: {}. Valid options are: none, minmax",
                s
            )),
        }
    }
}
