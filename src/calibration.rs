//! Calibration record persisted in `calibration.csv`.
//!
//! The file is a single-column table with the header `values` followed by
//! exactly three rows: dry threshold, wet threshold and watering volume in
//! milliliters. An external actuator reads the same file later.

use crate::error::DataError;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Header of the single calibration column
pub const VALUES_COLUMN: &str = "values";

/// Number of value rows in a calibration file
pub const VALUE_ROWS: usize = 3;

/// The three persisted calibration numbers, in file order
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationRecord {
    /// Upper sensor reading above which the soil counts as dry
    pub dry: f64,
    /// Lower sensor reading below which the soil counts as wet
    pub wet: f64,
    /// Amount of water to give when dry
    pub volume_ml: f64,
}

impl CalibrationRecord {
    pub fn new(dry: f64, wet: f64, volume_ml: f64) -> Self {
        Self { dry, wet, volume_ml }
    }

    /// Values in file order (dry, wet, volume)
    pub fn values(&self) -> [f64; VALUE_ROWS] {
        [self.dry, self.wet, self.volume_ml]
    }

    pub fn from_values(values: [f64; VALUE_ROWS]) -> Self {
        let [dry, wet, volume_ml] = values;
        Self { dry, wet, volume_ml }
    }

    /// Load the record from a calibration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| DataError::io(path, e))?;
        let record = Self::from_reader(file, path)?;
        debug!(
            "Loaded calibration from {}: dry={} wet={} volume={}",
            path.display(),
            record.dry,
            record.wet,
            record.volume_ml
        );
        Ok(record)
    }

    /// Parse a record from any reader; `path` is only used for error context
    pub fn from_reader<R: Read>(reader: R, path: &Path) -> Result<Self, DataError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let column = csv_reader
            .headers()
            .map_err(|e| DataError::csv(path, e))?
            .iter()
            .position(|h| h == VALUES_COLUMN)
            .ok_or_else(|| DataError::MissingColumn {
                path: path.to_path_buf(),
                column: VALUES_COLUMN.to_string(),
            })?;

        let mut values = Vec::with_capacity(VALUE_ROWS);
        let mut ignored = 0usize;
        for (index, record) in csv_reader.records().enumerate() {
            let record = record.map_err(|e| DataError::csv(path, e))?;
            if values.len() == VALUE_ROWS {
                ignored += 1;
                continue;
            }

            let cell = record.get(column).unwrap_or_default();
            let value = cell.parse::<f64>().map_err(|_| DataError::InvalidNumber {
                path: path.to_path_buf(),
                row: index + 1,
                value: cell.to_string(),
            })?;
            values.push(value);
        }

        if ignored > 0 {
            warn!(
                "Ignoring {} extra rows after the calibration values in {}",
                ignored,
                path.display()
            );
        }

        match <[f64; VALUE_ROWS]>::try_from(values) {
            Ok(values) => Ok(Self::from_values(values)),
            Err(values) => Err(DataError::TooFewRows {
                path: path.to_path_buf(),
                found: values.len(),
            }),
        }
    }

    /// Serialize as header plus three rows
    pub fn write_to<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        csv_writer.write_record([VALUES_COLUMN])?;
        for value in self.values() {
            csv_writer.write_record([value.to_string()])?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> String {
        let mut buf = Vec::new();
        // Infallible for a Vec.
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Overwrite `path` in place with this record.
    ///
    /// The file is truncated first, so a failure half way leaves it
    /// truncated.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DataError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| DataError::io(path, e))?;
        self.write_to(file).map_err(|e| DataError::csv(path, e))
    }
}
