//! logreg-classifiers: online logistic regression and ROC evaluation.
//!
//! This crate provides a per-sample (stochastic) gradient descent trainer for
//! binary logistic regression with L2 regularization, a threshold-sweep ROC
//! evaluator, and the small helpers a complete experiment needs around them:
//! CSV loading, train/test splitting, min-max scaling, classification metrics
//! and plotly/maud reporting.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod io;
pub mod models;
pub mod preprocessing;
pub mod report;
pub mod stats;
