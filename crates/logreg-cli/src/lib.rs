//! Experiment orchestration for the `logreg` command-line tool.
//!
//! Loads a labeled table, splits and scales it, scores an untrained random
//! parameter vector as a baseline, trains the SGD classifier and writes the
//! fitted parameters, ROC plots and an HTML report.
pub mod experiment;
