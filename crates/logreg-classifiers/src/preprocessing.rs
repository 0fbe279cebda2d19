//! Feature preprocessing shared by the CLI pipeline and tests.
//!
//! Provides a per-column min-max scaler and a helper that prepends the
//! constant bias column expected by the trainer.

use ndarray::{concatenate, s, Array2, ArrayView2, Axis};

use crate::error::{ClassifierError, Result};

/// Per-column min-max scaler mapping each feature into `[low, high]`.
#[derive(Clone, Debug, PartialEq)]
pub struct MinMaxScaler {
    pub min: Vec<f64>,
    pub max: Vec<f64>,
    pub low: f64,
    pub high: f64,
}

impl MinMaxScaler {
    /// Map every column of `x` into `[low, high]`.
    ///
    /// Columns that were constant when fitting map to `low`. Values outside the
    /// fitted range are extrapolated, not clipped.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.min.len() {
            return Err(ClassifierError::LengthMismatch {
                what: "feature columns",
                expected: self.min.len(),
                found: x.ncols(),
            });
        }

        let span = self.high - self.low;
        let mut out = x.clone();
        for (c, mut column) in out.axis_iter_mut(Axis(1)).enumerate() {
            let range = self.max[c] - self.min[c];
            let min = self.min[c];
            let low = self.low;
            if range > 0.0 {
                column.mapv_inplace(|v| (v - min) / range * span + low);
            } else {
                column.fill(low);
            }
        }
        Ok(out)
    }
}

/// Fit a [`MinMaxScaler`] on the rows of all `parts` taken together.
///
/// Fitting on several partitions at once (e.g. train and test) gives them a
/// common scale.
pub fn fit_min_max(parts: &[ArrayView2<f64>], low: f64, high: f64) -> Result<MinMaxScaler> {
    if !(low.is_finite() && high.is_finite() && low < high) {
        return Err(ClassifierError::InvalidParameter {
            name: "feature_range",
            value: high - low,
        });
    }
    let Some(first) = parts.first() else {
        return Err(ClassifierError::EmptyInput("feature matrix"));
    };
    let ncols = first.ncols();
    if let Some(bad) = parts.iter().find(|p| p.ncols() != ncols) {
        return Err(ClassifierError::LengthMismatch {
            what: "feature columns",
            expected: ncols,
            found: bad.ncols(),
        });
    }
    let stacked = concatenate(Axis(0), parts).map_err(|_| ClassifierError::EmptyInput("feature matrix"))?;
    if stacked.nrows() == 0 || ncols == 0 {
        return Err(ClassifierError::EmptyInput("feature matrix"));
    }

    let mut min = vec![f64::INFINITY; ncols];
    let mut max = vec![f64::NEG_INFINITY; ncols];
    for row in stacked.outer_iter() {
        for (c, &v) in row.iter().enumerate() {
            min[c] = min[c].min(v);
            max[c] = max[c].max(v);
        }
    }

    Ok(MinMaxScaler {
        min,
        max,
        low,
        high,
    })
}

/// Return `x` with a leading column of ones.
pub fn prepend_bias(x: &Array2<f64>) -> Array2<f64> {
    let mut out = Array2::<f64>::ones((x.nrows(), x.ncols() + 1));
    out.slice_mut(s![.., 1..]).assign(x);
    out
}
