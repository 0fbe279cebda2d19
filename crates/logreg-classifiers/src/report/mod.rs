//! Reporting and plotting helpers.
//!
//! This module wraps plotting helpers (Plotly) and a small maud-rendered HTML
//! report. Plots are small helper functions converting ROC curves and training
//! histories into `plotly::Plot`.
pub mod plots;
pub mod report;
