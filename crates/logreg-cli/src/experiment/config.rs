use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use logreg_classifiers::config::{ScalingMode, ThresholdGrid, TrainerConfig};
use logreg_classifiers::io::CsvReaderConfig;

/// Everything one experiment run needs: inputs, partitioning, scaling,
/// trainer hyper-parameters, evaluation grid and outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Labeled feature table. The command line argument takes precedence.
    pub data_file: Option<PathBuf>,
    pub reader: CsvReaderConfig,
    /// Fraction of rows used for training.
    pub train_ratio: f64,
    /// Seeds both the train/test shuffle and the random baseline parameters.
    pub seed: u64,
    pub scaling: ScalingMode,
    pub trainer: TrainerConfig,
    pub grid: ThresholdGrid,
    /// Hard predictions are `p > cutoff` when computing accuracy/precision/recall.
    pub cutoff: f64,
    /// Also evaluate an untrained random parameter vector.
    pub baseline: bool,
    pub output_dir: PathBuf,
    pub write_plots: bool,
    pub write_report: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            reader: CsvReaderConfig::default(),
            train_ratio: 0.5,
            seed: 0,
            scaling: ScalingMode::default(),
            trainer: TrainerConfig::default(),
            grid: ThresholdGrid::default(),
            cutoff: 0.5,
            baseline: true,
            output_dir: PathBuf::from("."),
            write_plots: true,
            write_report: true,
        }
    }
}

pub fn load_experiment_config<P: AsRef<Path>>(path: P) -> Result<ExperimentConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: ExperimentConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}
