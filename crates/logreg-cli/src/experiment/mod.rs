pub mod config;
pub mod run;

pub use config::{load_experiment_config, ExperimentConfig};
pub use run::{
    run_experiment, write_outputs, write_report, write_roc_plots, write_theta, Evaluation,
    ExperimentResult, Partition, Stage,
};
