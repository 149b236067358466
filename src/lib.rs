//! # watering-dashboard
//!
//! Terminal dashboard for a plant-watering setup: shows the humidity trend
//! from `test-hydro.csv` against the dry/wet thresholds and edits the
//! calibration stored in `calibration.csv`.
//!
//! Features:
//! - Calibration form (dry threshold, wet threshold, watering volume)
//! - Humidity chart with threshold reference lines
//! - Calibration written back after every interaction
//! - Headless single cycle and reading recorder

pub mod calibration;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod logging;
pub mod persistence;
pub mod series;
pub mod ui;
