//! Labeled datasets and train/test partitioning.
use log::info;
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{ensure_binary_labels, ClassifierError, Result};

/// Feature matrix with index-aligned binary labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub x: Array2<f64>,
    pub y: Array1<i32>,
}

impl Dataset {
    /// Build a dataset, checking that every row has a 0/1 label.
    pub fn new(x: Array2<f64>, y: Array1<i32>) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(ClassifierError::LengthMismatch {
                what: "labels",
                expected: x.nrows(),
                found: y.len(),
            });
        }
        ensure_binary_labels(y.iter())?;
        Ok(Dataset { x, y })
    }

    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// `(positives, negatives)`
    pub fn class_counts(&self) -> (usize, usize) {
        let positives = self.y.iter().filter(|&&v| v == 1).count();
        (positives, self.y.len() - positives)
    }

    pub fn log_input_data_summary(&self, name: &str) {
        let (positives, negatives) = self.class_counts();
        info!(
            "{}: {} rows ({} positive, {} negative), {} feature columns",
            name,
            self.n_samples(),
            positives,
            negatives,
            self.n_features()
        );
    }

    /// Rows at `indices`, in that order.
    pub fn select_rows(&self, indices: &[usize]) -> Dataset {
        Dataset {
            x: self.x.select(Axis(0), indices),
            y: self.y.select(Axis(0), indices),
        }
    }

    /// Shuffle rows with a seeded RNG and split them into `(train, test)`.
    ///
    /// The training partition receives `floor(train_ratio * n)` rows and the
    /// test partition the rest. Both partitions must end up non-empty.
    pub fn train_test_split(&self, train_ratio: f64, seed: u64) -> Result<(Dataset, Dataset)> {
        if !(train_ratio > 0.0 && train_ratio < 1.0) {
            return Err(ClassifierError::InvalidParameter {
                name: "train_ratio",
                value: train_ratio,
            });
        }

        let n = self.n_samples();
        let n_train = (train_ratio * n as f64).floor() as usize;
        if n_train == 0 || n_train >= n {
            return Err(ClassifierError::InvalidParameter {
                name: "train_ratio",
                value: train_ratio,
            });
        }

        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let (train_idx, test_idx) = indices.split_at(n_train);
        Ok((self.select_rows(train_idx), self.select_rows(test_idx)))
    }
}
