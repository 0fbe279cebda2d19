use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use maud::html;
use ndarray::{Array1, Array2};
use serde::Serialize;

use logreg_classifiers::config::ScalingMode;
use logreg_classifiers::data_handling::Dataset;
use logreg_classifiers::io::read_labeled_csv_with_config;
use logreg_classifiers::models::{random_theta, FitHistory, LogisticRegressionClassifier};
use logreg_classifiers::preprocessing::{fit_min_max, prepend_bias, MinMaxScaler};
use logreg_classifiers::report::plots::{plot_loss_history, plot_roc_curve, plot_roc_curves};
use logreg_classifiers::report::report::{metrics_table, roc_table, Report, ReportSection};
use logreg_classifiers::stats::{classification_metrics, roc_curve, ClassificationMetrics, RocCurve};

use crate::experiment::config::ExperimentConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    /// Random, untrained parameters.
    Before,
    /// Parameters fitted on the training partition.
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Partition {
    Train,
    Test,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Stage::Before => write!(f, "before"),
            Stage::After => write!(f, "after"),
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Partition::Train => write!(f, "train"),
            Partition::Test => write!(f, "test"),
        }
    }
}

/// Metrics and ROC curve of one parameter vector on one partition.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub stage: Stage,
    pub partition: Partition,
    pub metrics: ClassificationMetrics,
    /// `None` when the partition holds a single class.
    pub roc: Option<RocCurve>,
}

impl Evaluation {
    pub fn label(&self) -> String {
        format!("{}-train {}", self.stage, self.partition)
    }

    /// File name of the standalone ROC plot.
    pub fn plot_file_name(&self) -> String {
        format!("roc_curve_{}_{}data.html", self.stage, self.partition)
    }
}

#[derive(Debug, Clone)]
pub struct ExperimentResult {
    pub config: ExperimentConfig,
    pub theta: Array1<f64>,
    pub history: FitHistory,
    pub scaler: Option<MinMaxScaler>,
    pub evaluations: Vec<Evaluation>,
}

impl ExperimentResult {
    pub fn evaluation(&self, stage: Stage, partition: Partition) -> Option<&Evaluation> {
        self.evaluations
            .iter()
            .find(|e| e.stage == stage && e.partition == partition)
    }
}

fn evaluate(
    model: &LogisticRegressionClassifier,
    x: &Array2<f64>,
    data: &Dataset,
    stage: Stage,
    partition: Partition,
    config: &ExperimentConfig,
) -> Result<Evaluation> {
    let y_prob = model.predict_proba(x)?;
    let metrics = classification_metrics(&data.y, &y_prob, config.cutoff)?;

    let roc = match roc_curve(&data.y, &y_prob, &config.grid) {
        Ok(curve) => Some(curve),
        Err(e) => {
            warn!("Skipping ROC curve for {}-train {}: {}", stage, partition, e);
            None
        }
    };

    info!(
        "{}-train {}: accuracy {:.6}, precision {:.6}, recall {:.6}",
        stage, partition, metrics.accuracy, metrics.precision, metrics.recall
    );

    Ok(Evaluation {
        stage,
        partition,
        metrics,
        roc,
    })
}

/// Run the full experiment described by `config`.
///
/// Rows are split with the configured seed, scaled with a scaler fitted on
/// both partitions, and given a leading bias column. The bias column is added
/// after scaling so it keeps the value 1.
pub fn run_experiment(config: &ExperimentConfig) -> Result<ExperimentResult> {
    let data_file = config
        .data_file
        .as_ref()
        .ok_or_else(|| anyhow!("No data file given on the command line or in the config"))?;
    config.trainer.validate()?;
    config.grid.validate()?;

    let dataset = read_labeled_csv_with_config(data_file, &config.reader)?;
    dataset.log_input_data_summary("Input");

    let (train, test) = dataset.train_test_split(config.train_ratio, config.seed)?;
    train.log_input_data_summary("Train");
    test.log_input_data_summary("Test");

    let (x_train, x_test, scaler) = match config.scaling {
        ScalingMode::None => (train.x.clone(), test.x.clone(), None),
        ScalingMode::MinMax { low, high } => {
            let scaler = fit_min_max(&[train.x.view(), test.x.view()], low, high)?;
            (scaler.transform(&train.x)?, scaler.transform(&test.x)?, Some(scaler))
        }
    };
    let x_train = prepend_bias(&x_train);
    let x_test = prepend_bias(&x_test);

    let mut evaluations = Vec::with_capacity(4);

    if config.baseline {
        let baseline = LogisticRegressionClassifier::from_theta(random_theta(x_train.ncols(), config.seed));
        evaluations.push(evaluate(&baseline, &x_train, &train, Stage::Before, Partition::Train, config)?);
        evaluations.push(evaluate(&baseline, &x_test, &test, Stage::Before, Partition::Test, config)?);
    }

    let mut model = LogisticRegressionClassifier::new(config.trainer);
    info!("Training {} with {:?}", model.name(), model.params());
    let history = model.fit(&x_train, &train.y)?.clone();

    evaluations.push(evaluate(&model, &x_train, &train, Stage::After, Partition::Train, config)?);
    evaluations.push(evaluate(&model, &x_test, &test, Stage::After, Partition::Test, config)?);

    let theta = model
        .theta()
        .cloned()
        .ok_or_else(|| anyhow!("Model has no parameters after fitting"))?;

    Ok(ExperimentResult {
        config: config.clone(),
        theta,
        history,
        scaler,
        evaluations,
    })
}

#[derive(Serialize)]
struct ThetaOutput<'a> {
    theta: Vec<f64>,
    epochs: usize,
    converged: bool,
    loss_history: &'a [f64],
}

/// Write the fitted parameters and training history as JSON.
pub fn write_theta(result: &ExperimentResult, path: &Path) -> Result<()> {
    let output = ThetaOutput {
        theta: result.theta.to_vec(),
        epochs: result.history.epochs,
        converged: result.history.converged,
        loss_history: &result.history.loss_history,
    };
    let json = serde_json::to_string_pretty(&output).context("Failed to serialize theta")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// Write one standalone HTML ROC plot per evaluation that has a curve.
pub fn write_roc_plots(result: &ExperimentResult, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for eval in &result.evaluations {
        let Some(curve) = &eval.roc else {
            continue;
        };
        let path = dir.join(eval.plot_file_name());
        let plot = plot_roc_curve(curve, &format!("ROC curve ({})", eval.label()))?;
        std::fs::write(&path, plot.to_html())
            .with_context(|| format!("Failed to write ROC plot: {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

/// Write the HTML report: metrics, loss history and ROC curves.
pub fn write_report(result: &ExperimentResult, path: &Path) -> Result<()> {
    let mut report = Report::new("Logistic regression (online SGD)");

    let mut summary = ReportSection::new("Configuration");
    let config_json = serde_json::to_string_pretty(&result.config)
        .context("Failed to serialize experiment config for the report")?;
    summary.add_content(html! { pre { (config_json) } });
    report.add_section(summary);

    let mut training = ReportSection::new("Training");
    let final_loss = result
        .history
        .final_loss()
        .map(|l| format!("{:.6}", l))
        .unwrap_or_else(|| "n/a".to_string());
    let theta = format!("{:?}", result.theta.to_vec());
    training.add_content(html! {
        p { "Epochs: " (result.history.epochs.to_string()) ", converged: " (result.history.converged.to_string()) ", final loss: " (final_loss) }
        p { "Theta: " code { (theta) } }
    });
    training.add_plot(plot_loss_history(&result.history, "Cross-entropy per epoch")?);
    report.add_section(training);

    let mut metrics = ReportSection::new("Classification metrics");
    let labels: Vec<String> = result.evaluations.iter().map(|e| e.label()).collect();
    let rows: Vec<(&str, &ClassificationMetrics)> = labels
        .iter()
        .map(String::as_str)
        .zip(result.evaluations.iter().map(|e| &e.metrics))
        .collect();
    metrics.add_content(metrics_table(&rows));
    report.add_section(metrics);

    for partition in [Partition::Train, Partition::Test] {
        let curves: Vec<(&Evaluation, &RocCurve)> = result
            .evaluations
            .iter()
            .filter(|e| e.partition == partition)
            .filter_map(|e| e.roc.as_ref().map(|c| (e, c)))
            .collect();
        if curves.is_empty() {
            continue;
        }

        let mut section = ReportSection::new(&format!("ROC curves ({} partition)", partition));
        let names: Vec<String> = curves.iter().map(|(e, _)| e.label()).collect();
        let named: Vec<(&str, &RocCurve)> = names
            .iter()
            .map(String::as_str)
            .zip(curves.iter().map(|(_, c)| *c))
            .collect();
        section.add_plot(plot_roc_curves(&named, &format!("ROC ({} partition)", partition))?);
        for (name, (_, curve)) in names.iter().zip(curves.iter()) {
            section.add_content(html! {
                h3 { (name) " (AUC " (format!("{:.4}", curve.auc())) ")" }
                (roc_table(curve))
            });
        }
        report.add_section(section);
    }

    report.save_to_file(path)
}

/// Write every enabled output into `config.output_dir`.
pub fn write_outputs(result: &ExperimentResult) -> Result<Vec<PathBuf>> {
    let dir = &result.config.output_dir;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let mut written = Vec::new();

    let theta_path = dir.join("theta.json");
    write_theta(result, &theta_path)?;
    written.push(theta_path);

    if result.config.write_plots {
        written.extend(write_roc_plots(result, dir)?);
    }

    if result.config.write_report {
        let report_path = dir.join("logreg_report.html");
        write_report(result, &report_path)?;
        written.push(report_path);
    }

    Ok(written)
}
