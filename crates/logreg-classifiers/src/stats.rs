//! Threshold-sweep evaluation of probability scores.
//!
//! [`roc_curve`] classifies every row at each threshold of a [`ThresholdGrid`]
//! and turns the resulting confusion counts into (false-positive rate,
//! true-positive rate) pairs. [`classification_metrics`] summarises a single
//! cut-off as accuracy, precision and recall.
//!
//! Comparisons are strict on both sides: a score above the threshold is a
//! positive call, a score below it a negative call, and a score exactly equal
//! to the threshold is counted in neither. Such rows are reported in
//! [`ConfusionCounts::tied`].
use log::warn;
use ndarray::Array1;
use rayon::prelude::*;
use serde::Serialize;

use crate::config::ThresholdGrid;
use crate::error::{ensure_binary_labels, ClassifierError, Result};

/// Confusion-matrix counts at one decision threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
    /// Rows whose score equals the threshold exactly and were left unclassified.
    pub tied: usize,
}

impl ConfusionCounts {
    /// `TP / (TP + FN)`, or NaN when the denominator is zero.
    pub fn tpr(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// `FP / (FP + TN)`, or NaN when the denominator is zero.
    pub fn fpr(&self) -> f64 {
        ratio(self.false_positives, self.false_positives + self.true_negatives)
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        f64::NAN
    } else {
        num as f64 / den as f64
    }
}

/// One sampled point of a ROC curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RocPoint {
    pub threshold: f64,
    pub fpr: f64,
    pub tpr: f64,
    pub counts: ConfusionCounts,
}

/// ROC points ordered by increasing threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RocCurve {
    pub points: Vec<RocPoint>,
}

impl RocCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RocPoint> {
        self.points.iter()
    }

    pub fn fpr(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.fpr).collect()
    }

    pub fn tpr(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.tpr).collect()
    }

    /// Trapezoidal area under the sampled curve.
    ///
    /// Points with an undefined rate are skipped; the remaining points are
    /// sorted by fpr and anchored at (0, 0) and (1, 1).
    pub fn auc(&self) -> f64 {
        let mut pts: Vec<(f64, f64)> = self
            .points
            .iter()
            .filter(|p| p.fpr.is_finite() && p.tpr.is_finite())
            .map(|p| (p.fpr, p.tpr))
            .collect();
        pts.push((0.0, 0.0));
        pts.push((1.0, 1.0));
        pts.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

        pts.windows(2)
            .map(|w| (w[1].0 - w[0].0) * (w[0].1 + w[1].1) / 2.0)
            .sum()
    }
}

/// Count the confusion matrix of `y_prob` against `y_true` at `threshold`.
///
/// Inputs are assumed to be validated and index-aligned.
fn count_at(y_true: &Array1<i32>, y_prob: &Array1<f64>, threshold: f64) -> ConfusionCounts {
    let mut counts = ConfusionCounts::default();
    for (&label, &p) in y_true.iter().zip(y_prob.iter()) {
        if p > threshold {
            if label == 1 {
                counts.true_positives += 1;
            } else {
                counts.false_positives += 1;
            }
        } else if p < threshold {
            if label == 0 {
                counts.true_negatives += 1;
            } else {
                counts.false_negatives += 1;
            }
        } else {
            counts.tied += 1;
        }
    }
    counts
}

fn validate_scores(y_true: &Array1<i32>, y_prob: &Array1<f64>) -> Result<()> {
    if y_true.is_empty() {
        return Err(ClassifierError::EmptyInput("labels"));
    }
    if y_prob.len() != y_true.len() {
        return Err(ClassifierError::LengthMismatch {
            what: "probabilities",
            expected: y_true.len(),
            found: y_prob.len(),
        });
    }
    ensure_binary_labels(y_true.iter())?;
    if let Some((index, &value)) = y_prob
        .iter()
        .enumerate()
        .find(|(_, p)| !(0.0..=1.0).contains(*p))
    {
        return Err(ClassifierError::InvalidProbability { index, value });
    }
    Ok(())
}

/// Sweep `grid` over `y_prob` and return the ROC curve in threshold order.
///
/// # Errors
///
/// Fails on empty or misaligned inputs, non-binary labels, scores outside
/// [0, 1], an invalid grid, or when `y_true` holds a single class (every
/// rate of the absent class would be a division by zero).
///
/// When both classes are present but every row of one class ties with a
/// threshold, the matching rate of that point is NaN and a warning is logged.
pub fn roc_curve(y_true: &Array1<i32>, y_prob: &Array1<f64>, grid: &ThresholdGrid) -> Result<RocCurve> {
    validate_scores(y_true, y_prob)?;
    grid.validate()?;

    let positives = y_true.iter().filter(|&&l| l == 1).count();
    if positives == 0 {
        return Err(ClassifierError::SingleClass { label: 0 });
    }
    if positives == y_true.len() {
        return Err(ClassifierError::SingleClass { label: 1 });
    }

    let points: Vec<RocPoint> = grid
        .thresholds()
        .into_par_iter()
        .map(|threshold| {
            let counts = count_at(y_true, y_prob, threshold);
            RocPoint {
                threshold,
                fpr: counts.fpr(),
                tpr: counts.tpr(),
                counts,
            }
        })
        .collect();

    for p in points.iter().filter(|p| p.fpr.is_nan() || p.tpr.is_nan()) {
        warn!(
            "Undefined ROC rate at threshold {:.4}: {} rows tie with the threshold (fpr = {}, tpr = {})",
            p.threshold, p.counts.tied, p.fpr, p.tpr
        );
    }

    Ok(RocCurve { points })
}

/// Accuracy, precision and recall of hard predictions `p > cutoff`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    /// `TP / (TP + FP)`, 0 when nothing is predicted positive.
    pub precision: f64,
    /// `TP / (TP + FN)`, 0 when there are no positive labels.
    pub recall: f64,
    pub counts: ConfusionCounts,
}

pub fn classification_metrics(
    y_true: &Array1<i32>,
    y_prob: &Array1<f64>,
    cutoff: f64,
) -> Result<ClassificationMetrics> {
    validate_scores(y_true, y_prob)?;

    let mut counts = ConfusionCounts::default();
    for (&label, &p) in y_true.iter().zip(y_prob.iter()) {
        match (p > cutoff, label == 1) {
            (true, true) => counts.true_positives += 1,
            (true, false) => counts.false_positives += 1,
            (false, false) => counts.true_negatives += 1,
            (false, true) => counts.false_negatives += 1,
        }
    }

    let zero_if_nan = |v: f64| if v.is_nan() { 0.0 } else { v };
    let correct = counts.true_positives + counts.true_negatives;

    Ok(ClassificationMetrics {
        accuracy: correct as f64 / y_true.len() as f64,
        precision: zero_if_nan(ratio(
            counts.true_positives,
            counts.true_positives + counts.false_positives,
        )),
        recall: zero_if_nan(counts.tpr()),
        counts,
    })
}
