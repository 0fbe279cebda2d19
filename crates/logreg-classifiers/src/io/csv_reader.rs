//! Delimited-text reader for labeled feature tables.
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use csv::StringRecord;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::data_handling::Dataset;

/// Configuration for reading a labeled feature table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvReaderConfig {
    pub delimiter: char,
    pub has_headers: bool,
    /// Zero-based index of the 0/1 label column. `None` selects the last column.
    pub label_column: Option<usize>,
    /// Zero-based feature column indices, in order.
    /// When `None`, every column except the label is a feature.
    pub feature_columns: Option<Vec<usize>>,
}

impl Default for CsvReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_headers: false,
            label_column: None,
            feature_columns: None,
        }
    }
}

/// Read a headerless comma-separated file whose last column is the label.
pub fn read_labeled_csv<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    read_labeled_csv_with_config(path, &CsvReaderConfig::default())
}

/// Read a labeled feature table using a custom configuration.
pub fn read_labeled_csv_with_config<P: AsRef<Path>>(path: P, config: &CsvReaderConfig) -> Result<Dataset> {
    if !config.delimiter.is_ascii() {
        bail!("Delimiter '{}' is not a single-byte character", config.delimiter);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter as u8)
        .has_headers(config.has_headers)
        .from_path(&path)
        .with_context(|| format!("Failed to open data file: {}", path.as_ref().display()))?;

    // Without a header row this peeks at the first record; it is still yielded below.
    let first = reader
        .headers()
        .context("Failed to read first row")?
        .clone();
    let (label_idx, feature_indices) = resolve_columns(&first, config)?;

    let mut features = Vec::new();
    let mut labels = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;

        let label = parse_label(record.get(label_idx), row_idx)?;
        labels.push(label);

        for &idx in &feature_indices {
            let value = record
                .get(idx)
                .ok_or_else(|| anyhow!("Missing feature column {} at row {}", idx, row_idx + 1))?;
            let parsed = value.trim().parse::<f64>().with_context(|| {
                format!("Invalid feature value '{}' in column {} at row {}", value, idx, row_idx + 1)
            })?;
            features.push(parsed);
        }
    }

    if labels.is_empty() {
        bail!("Data file {} contains no rows", path.as_ref().display());
    }

    let n_samples = labels.len();
    let x = Array2::from_shape_vec((n_samples, feature_indices.len()), features)
        .context("Failed to build feature matrix")?;
    let y = Array1::from_vec(labels);

    log::debug!(
        "Read {} rows with {} features from {}",
        n_samples,
        feature_indices.len(),
        path.as_ref().display()
    );

    Dataset::new(x, y).context("Invalid labeled data")
}

fn resolve_columns(record: &StringRecord, config: &CsvReaderConfig) -> Result<(usize, Vec<usize>)> {
    let width = record.len();
    if width < 2 {
        bail!("Expected at least one feature column and a label column, found {} columns", width);
    }

    let label_idx = config.label_column.unwrap_or(width - 1);
    if label_idx >= width {
        bail!("Label column {} is out of range for {} columns", label_idx, width);
    }

    let feature_indices = match &config.feature_columns {
        Some(indices) => {
            if let Some(&bad) = indices.iter().find(|&&i| i >= width || i == label_idx) {
                bail!("Feature column {} is out of range or is the label column", bad);
            }
            indices.clone()
        }
        None => (0..width).filter(|&i| i != label_idx).collect(),
    };
    if feature_indices.is_empty() {
        bail!("No feature columns selected");
    }

    Ok((label_idx, feature_indices))
}

fn parse_label(value: Option<&str>, row_idx: usize) -> Result<i32> {
    let value = value
        .ok_or_else(|| anyhow!("Missing label value at row {}", row_idx + 1))?
        .trim();
    let parsed = value
        .parse::<f64>()
        .with_context(|| format!("Invalid label '{}' at row {}", value, row_idx + 1))?;
    if parsed == 0.0 {
        Ok(0)
    } else if parsed == 1.0 {
        Ok(1)
    } else {
        bail!("Label '{}' at row {} is not 0 or 1", value, row_idx + 1)
    }
}
