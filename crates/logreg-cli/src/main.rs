use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;

use logreg_classifiers::config::ScalingMode;
use logreg_cli::experiment::{
    load_experiment_config, run_experiment, write_outputs, ExperimentConfig, Partition, Stage,
};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(
            env_logger::Env::default()
                .filter_or("LOGREG_LOG", "error,logreg=info,logreg_cli=info,logreg_classifiers=info"),
        )
        .init();

    let matches = Command::new("logreg")
        .version(clap::crate_version!())
        .about("Binary logistic regression trained with online SGD, evaluated with ROC sweeps")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run")
                .about("Split, scale, train and evaluate on a labeled CSV file")
                .arg(
                    Arg::new("data")
                        .help("Labeled CSV file. Overrides data_file in the configuration file.")
                        .required(false)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help("Path to an experiment JSON configuration file")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_dir")
                        .short('o')
                        .long("output-dir")
                        .help("Directory for theta.json, ROC plots and the HTML report")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Seed for the train/test shuffle and the random baseline")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("train_ratio")
                        .long("train-ratio")
                        .help("Fraction of rows used for training")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("scaling")
                        .long("scaling")
                        .help("Feature scaling applied before the bias column is added.")
                        .value_parser(["none", "minmax"])
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("no_baseline")
                        .long("no-baseline")
                        .help("Skip evaluating the untrained random parameters.")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no_plots")
                        .long("no-plots")
                        .help("Disable standalone ROC plot files.")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no_report")
                        .long("no-report")
                        .help("Disable HTML report generation.")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("default-config")
                .about("Print the default experiment configuration as JSON"),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("run", run_matches)) => handle_run(run_matches),
        Some(("default-config", _)) => {
            println!("{}", serde_json::to_string_pretty(&ExperimentConfig::default())?);
            Ok(())
        }
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn config_from_arguments(matches: &ArgMatches) -> Result<ExperimentConfig> {
    let mut config = if let Some(config_path) = matches.get_one::<PathBuf>("config") {
        eprintln!("[logreg] Using config: {:?}", config_path);
        load_experiment_config(config_path)?
    } else {
        eprintln!("[logreg] No config provided; using defaults.");
        ExperimentConfig::default()
    };

    if let Some(data) = matches.get_one::<PathBuf>("data") {
        config.data_file = Some(data.clone());
    }
    if let Some(dir) = matches.get_one::<PathBuf>("output_dir") {
        config.output_dir = dir.clone();
    }
    if let Some(&seed) = matches.get_one::<u64>("seed") {
        config.seed = seed;
    }
    if let Some(&ratio) = matches.get_one::<f64>("train_ratio") {
        config.train_ratio = ratio;
    }
    if let Some(scaling) = matches.get_one::<String>("scaling") {
        config.scaling = ScalingMode::from_str(scaling).map_err(anyhow::Error::msg)?;
    }
    if matches.get_flag("no_baseline") {
        config.baseline = false;
    }
    if matches.get_flag("no_plots") {
        config.write_plots = false;
    }
    if matches.get_flag("no_report") {
        config.write_report = false;
    }
    Ok(config)
}

fn handle_run(matches: &ArgMatches) -> Result<()> {
    let config = config_from_arguments(matches)?;

    let result = match run_experiment(&config) {
        Ok(result) => result,
        Err(e) => {
            log::error!("Experiment failed: {:#}", e);
            std::process::exit(1)
        }
    };

    for stage in [Stage::Before, Stage::After] {
        for partition in [Partition::Train, Partition::Test] {
            let Some(eval) = result.evaluation(stage, partition) else {
                continue;
            };
            let m = &eval.metrics;
            println!("Logreg {}-train {} accuracy: {:.6}", stage, partition, m.accuracy);
            println!("Logreg {}-train {} precision: {:.6}", stage, partition, m.precision);
            println!("Logreg {}-train {} recall: {:.6}", stage, partition, m.recall);
            if let Some(curve) = &eval.roc {
                println!("Logreg {}-train {} AUC: {:.6}", stage, partition, curve.auc());
            }
        }
    }
    println!("Theta: {:?}", result.theta.to_vec());

    let written = write_outputs(&result)?;
    for path in &written {
        eprintln!("[logreg] Wrote {}", path.display());
    }
    eprintln!(
        "[logreg] Completed {} epochs (converged: {}).",
        result.history.epochs, result.history.converged
    );
    Ok(())
}
