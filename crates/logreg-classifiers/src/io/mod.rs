//! IO utilities for loading labeled feature tables.

pub mod csv_reader;

pub use csv_reader::{read_labeled_csv, read_labeled_csv_with_config, CsvReaderConfig};
