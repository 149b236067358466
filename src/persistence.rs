//! Writer abstraction for the calibration record.
//!
//! This module defines the CalibrationWriter trait and the concrete
//! destinations a cycle can persist to (the calibration file, or nowhere).

use crate::calibration::CalibrationRecord;
use crate::error::Result;
use std::path::PathBuf;
use tracing::{debug, info};

/// Trait for persisting the calibration at the end of a cycle
#[cfg_attr(test, mockall::automock)]
pub trait CalibrationWriter {
    /// Persist the record
    fn write(&self, record: &CalibrationRecord) -> Result<()>;

    /// Short description for the status bar
    fn describe(&self) -> String;
}

/// Overwrites the calibration CSV in place on every write.
///
/// No diffing and no write-then-rename: identical content is rewritten and
/// a concurrent session writing the same file wins or loses silently.
pub struct CsvFileWriter {
    path: PathBuf,
}

impl CsvFileWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CalibrationWriter for CsvFileWriter {
    fn write(&self, record: &CalibrationRecord) -> Result<()> {
        record.save(&self.path)?;
        debug!(
            "Wrote calibration dry={} wet={} volume={} to {}",
            record.dry,
            record.wet,
            record.volume_ml,
            self.path.display()
        );
        Ok(())
    }

    fn describe(&self) -> String {
        format!("saving to {}", self.path.display())
    }
}

/// Writer used with `--read-only`
pub struct NoOpWriter;

impl CalibrationWriter for NoOpWriter {
    fn write(&self, record: &CalibrationRecord) -> Result<()> {
        info!(
            "Read-only: not writing dry={} wet={} volume={}",
            record.dry, record.wet, record.volume_ml
        );
        Ok(())
    }

    fn describe(&self) -> String {
        "read-only".to_string()
    }
}
