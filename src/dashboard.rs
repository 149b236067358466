//! Dashboard session: load, edit, overlay, persist.
//!
//! A [`Session`] replaces the "re-run everything on each input" model with
//! an explicit handler. Each handled [`FormAction`] is one cycle: the action
//! is applied to the form, then the current values are written through the
//! session's [`CalibrationWriter`]. The chart overlay is derived on demand
//! from the loaded series and the committed form values.

use crate::calibration::CalibrationRecord;
use crate::config::FilesConfig;
use crate::error::{ConfigError, Result};
use crate::form::CalibrationForm;
use crate::persistence::CalibrationWriter;
use crate::series::{ChartTable, HydroSeries};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Locations of the two data files, resolved once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct DataPaths {
    pub dir: PathBuf,
    pub calibration: PathBuf,
    pub series: PathBuf,
    pub delimiter: u8,
}

impl DataPaths {
    pub fn new(dir: impl Into<PathBuf>, files: &FilesConfig) -> Result<Self> {
        let dir = dir.into();
        let delimiter = files.delimiter_byte().ok_or_else(|| ConfigError::InvalidValue {
            field: "files.series_delimiter".to_string(),
            message: "must be a single ASCII character".to_string(),
        })?;
        Ok(Self {
            calibration: dir.join(&files.calibration),
            series: dir.join(&files.series),
            dir,
            delimiter,
        })
    }

    /// Default file names inside `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let files = FilesConfig::default();
        Self {
            calibration: dir.join(&files.calibration),
            series: dir.join(&files.series),
            dir,
            delimiter: b';',
        }
    }
}

/// Operator actions that run a full cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    /// Add one step to the selected field
    StepUp,
    /// Subtract one step from the selected field
    StepDown,
    /// Commit the text typed into the selected field
    Commit,
    /// Re-read both files; the form takes the on-disk values
    ReloadFromDisk,
    /// Return the form to the values last loaded from disk, without reading
    DiscardEdits,
}

/// Outcome of one cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    pub calibration: CalibrationRecord,
    pub series_rows: usize,
    pub series_columns: Vec<String>,
    pub saved_at: DateTime<Local>,
}

/// State held between interactions
pub struct Session {
    paths: DataPaths,
    writer: Box<dyn CalibrationWriter>,
    baseline: CalibrationRecord,
    form: CalibrationForm,
    series: HydroSeries,
    last_saved: Option<DateTime<Local>>,
}

impl Session {
    /// Load both files. Fails if either is missing or malformed.
    pub fn open(paths: DataPaths, step: f64, writer: Box<dyn CalibrationWriter>) -> Result<Self> {
        let (baseline, series) = load_files(&paths)?;
        info!(
            "Opened {} ({} readings, {})",
            paths.dir.display(),
            series.len(),
            writer.describe()
        );

        Ok(Self {
            form: CalibrationForm::new(&baseline, step),
            paths,
            writer,
            baseline,
            series,
            last_saved: None,
        })
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    pub fn form(&self) -> &CalibrationForm {
        &self.form
    }

    /// Form access for UI-only changes (selection, typing)
    pub fn form_mut(&mut self) -> &mut CalibrationForm {
        &mut self.form
    }

    pub fn series(&self) -> &HydroSeries {
        &self.series
    }

    /// Record last loaded from disk
    pub fn baseline(&self) -> &CalibrationRecord {
        &self.baseline
    }

    pub fn last_saved(&self) -> Option<DateTime<Local>> {
        self.last_saved
    }

    pub fn writer_description(&self) -> String {
        self.writer.describe()
    }

    /// Series with the current thresholds overlaid
    pub fn chart_table(&self) -> ChartTable {
        let record = self.form.record();
        self.series.with_thresholds(record.dry, record.wet)
    }

    /// Apply an action, then persist.
    ///
    /// A failing action skips the write; the form keeps its previous values.
    pub fn handle(&mut self, action: FormAction) -> Result<CycleReport> {
        match action {
            FormAction::StepUp => self.form.selected_input_mut().increment(),
            FormAction::StepDown => self.form.selected_input_mut().decrement(),
            FormAction::Commit => {
                self.form.selected_input_mut().commit()?;
            }
            FormAction::ReloadFromDisk => self.reload_from_disk()?,
            FormAction::DiscardEdits => self.discard_edits(),
        }
        self.persist()
    }

    /// Write the committed values. Runs unconditionally, even if unchanged.
    pub fn persist(&mut self) -> Result<CycleReport> {
        let record = self.form.record();
        if let Err(e) = self.writer.write(&record) {
            error!("Failed to save calibration: {}", e);
            return Err(e);
        }

        let saved_at = Local::now();
        self.last_saved = Some(saved_at);
        Ok(CycleReport {
            calibration: record,
            series_rows: self.series.len(),
            series_columns: self.series.headers().to_vec(),
            saved_at,
        })
    }

    fn reload_from_disk(&mut self) -> Result<()> {
        let (baseline, series) = load_files(&self.paths)?;
        info!(
            "Reloaded from disk: dry={} wet={} volume={} ({} readings)",
            baseline.dry,
            baseline.wet,
            baseline.volume_ml,
            series.len()
        );
        self.baseline = baseline;
        self.series = series;
        self.form.load(&self.baseline);
        Ok(())
    }

    fn discard_edits(&mut self) {
        info!("Discarding edits");
        self.form.load(&self.baseline);
    }

    /// Re-read only the series file. The form is left alone and nothing is
    /// written. Returns whether the series changed.
    pub fn refresh_series(&mut self) -> Result<bool> {
        let series = HydroSeries::load(&self.paths.series, self.paths.delimiter)?;
        if series == self.series {
            return Ok(false);
        }
        self.series = series;
        Ok(true)
    }
}

fn load_files(paths: &DataPaths) -> Result<(CalibrationRecord, HydroSeries)> {
    let record = CalibrationRecord::load(&paths.calibration)?;
    let series = HydroSeries::load(&paths.series, paths.delimiter)?;
    if series.is_empty() {
        warn!("{} has no readings yet", paths.series.display());
    }
    Ok((record, series))
}

/// Headless run: open, one cycle, report
pub fn run_once(paths: DataPaths, step: f64, writer: Box<dyn CalibrationWriter>) -> Result<CycleReport> {
    let mut session = Session::open(paths, step, writer)?;
    session.persist()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, DataError, FormError};
    use crate::form::{DEFAULT_STEP, Field};
    use crate::persistence::{CsvFileWriter, MockCalibrationWriter};
    use crate::series::{DRY_COLUMN, WET_COLUMN};
    use std::fs;
    use tempfile::TempDir;

    fn data_dir(calibration: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("calibration.csv"), calibration).unwrap();
        let mut series = String::from("Zeit;Frequenz in Hz\n");
        for i in 0..10 {
            series.push_str(&format!("{i};{}\n", 400 + i * 5));
        }
        fs::write(dir.path().join("test-hydro.csv"), series).unwrap();
        dir
    }

    fn open(dir: &TempDir) -> Session {
        let paths = DataPaths::in_dir(dir.path());
        let writer = Box::new(CsvFileWriter::new(&paths.calibration));
        Session::open(paths, DEFAULT_STEP, writer).unwrap()
    }

    fn calibration_file(dir: &TempDir) -> String {
        fs::read_to_string(dir.path().join("calibration.csv")).unwrap()
    }

    #[test]
    fn test_form_prefilled_from_file() {
        let dir = data_dir("values\n500\n300\n250");
        let session = open(&dir);
        let shown: Vec<String> = session.form().inputs().map(|(_, i)| i.display()).collect();
        assert_eq!(shown, ["500", "300", "250"]);
    }

    #[test]
    fn test_unedited_cycle_round_trips() {
        let dir = data_dir("values\n500\n300\n250\n");
        let mut session = open(&dir);
        let report = session.persist().unwrap();

        assert_eq!(report.calibration, CalibrationRecord::new(500.0, 300.0, 250.0));
        assert_eq!(calibration_file(&dir), "values\n500\n300\n250\n");
    }

    #[test]
    fn test_repeated_cycles_are_byte_identical() {
        let dir = data_dir("values\n500\n300\n250");
        run_once(
            DataPaths::in_dir(dir.path()),
            DEFAULT_STEP,
            Box::new(CsvFileWriter::new(dir.path().join("calibration.csv"))),
        )
        .unwrap();
        let first = fs::read(dir.path().join("calibration.csv")).unwrap();

        run_once(
            DataPaths::in_dir(dir.path()),
            DEFAULT_STEP,
            Box::new(CsvFileWriter::new(dir.path().join("calibration.csv"))),
        )
        .unwrap();
        let second = fs::read(dir.path().join("calibration.csv")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_edit_dry_threshold_is_saved() {
        let dir = data_dir("values\n500\n300\n250");
        let mut session = open(&dir);

        for c in "600".chars() {
            session.form_mut().selected_input_mut().push_char(c);
        }
        session.handle(FormAction::Commit).unwrap();

        assert_eq!(calibration_file(&dir), "values\n600\n300\n250\n");
    }

    #[test]
    fn test_step_buttons_save_each_cycle() {
        let dir = data_dir("values\n500\n300\n250");
        let mut session = open(&dir);
        session.form_mut().select(Field::Volume);

        session.handle(FormAction::StepUp).unwrap();
        assert_eq!(calibration_file(&dir), "values\n500\n300\n350\n");

        session.handle(FormAction::StepDown).unwrap();
        session.handle(FormAction::StepDown).unwrap();
        assert_eq!(calibration_file(&dir), "values\n500\n300\n150\n");
    }

    #[test]
    fn test_overlay_follows_committed_thresholds() {
        let dir = data_dir("values\n500\n300\n250");
        let mut session = open(&dir);
        session.handle(FormAction::StepUp).unwrap();

        let table = session.chart_table();
        assert_eq!(table.rows(), 10);
        assert_eq!(table.columns().len(), 2 + 2);
        assert_eq!(table.column(DRY_COLUMN).unwrap().values, vec![Some(600.0); 10]);
        assert_eq!(table.column(WET_COLUMN).unwrap().values, vec![Some(300.0); 10]);
    }

    #[test]
    fn test_missing_series_fails_to_open() {
        let dir = data_dir("values\n500\n300\n250");
        fs::remove_file(dir.path().join("test-hydro.csv")).unwrap();

        let paths = DataPaths::in_dir(dir.path());
        let mut writer = MockCalibrationWriter::new();
        writer.expect_describe().never();
        writer.expect_write().never();

        let err = Session::open(paths, DEFAULT_STEP, Box::new(writer)).err().unwrap();
        assert!(matches!(err, AppError::Data(DataError::Io { .. })));
    }

    #[test]
    fn test_short_calibration_fails_to_open() {
        let dir = data_dir("values\n500\n300\n");
        let paths = DataPaths::in_dir(dir.path());
        let err = Session::open(paths, DEFAULT_STEP, Box::new(MockCalibrationWriter::new()))
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Data(DataError::TooFewRows { found: 2, .. })));
    }

    #[test]
    fn test_each_cycle_writes_once() {
        let dir = data_dir("values\n500\n300\n250");
        let paths = DataPaths::in_dir(dir.path());

        let mut writer = MockCalibrationWriter::new();
        writer.expect_describe().returning(|| "mock".to_string());
        writer
            .expect_write()
            .withf(|record| record.values() == [500.0, 300.0, 250.0])
            .times(2)
            .returning(|_| Ok(()));

        let mut session = Session::open(paths, DEFAULT_STEP, Box::new(writer)).unwrap();
        session.persist().unwrap();
        session.handle(FormAction::DiscardEdits).unwrap();
        assert!(session.last_saved().is_some());
    }

    #[test]
    fn test_invalid_commit_skips_write() {
        let dir = data_dir("values\n500\n300\n250");
        let paths = DataPaths::in_dir(dir.path());

        let mut writer = MockCalibrationWriter::new();
        writer.expect_describe().returning(|| "mock".to_string());
        writer.expect_write().never();

        let mut session = Session::open(paths, DEFAULT_STEP, Box::new(writer)).unwrap();
        session.form_mut().selected_input_mut().push_char('-');
        let err = session.handle(FormAction::Commit).unwrap_err();
        assert!(matches!(err, AppError::Form(FormError::NotANumber(_))));
        assert_eq!(session.form().record().dry, 500.0);
    }

    #[test]
    fn test_write_failure_is_reported() {
        let dir = data_dir("values\n500\n300\n250");
        let paths = DataPaths::in_dir(dir.path());

        let mut writer = MockCalibrationWriter::new();
        writer.expect_describe().returning(|| "mock".to_string());
        writer.expect_write().times(1).returning(|_| {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only fs").into())
        });

        let mut session = Session::open(paths, DEFAULT_STEP, Box::new(writer)).unwrap();
        assert!(session.handle(FormAction::StepUp).is_err());
        assert_eq!(session.last_saved(), None);
    }

    #[test]
    fn test_reload_from_disk_takes_external_values() {
        let dir = data_dir("values\n500\n300\n250");
        let mut session = open(&dir);
        session.form_mut().selected_input_mut().push_char('7');

        fs::write(dir.path().join("calibration.csv"), "values\n900\n100\n50\n").unwrap();
        fs::write(dir.path().join("test-hydro.csv"), "Frequenz in Hz\n1\n2\n").unwrap();
        session.handle(FormAction::ReloadFromDisk).unwrap();

        assert_eq!(session.form().record(), CalibrationRecord::new(900.0, 100.0, 50.0));
        assert_eq!(*session.baseline(), CalibrationRecord::new(900.0, 100.0, 50.0));
        assert!(!session.form().is_editing());
        assert_eq!(session.series().len(), 2);
        assert_eq!(calibration_file(&dir), "values\n900\n100\n50\n");
    }

    #[test]
    fn test_failed_reload_keeps_state() {
        let dir = data_dir("values\n500\n300\n250");
        let mut session = open(&dir);
        fs::remove_file(dir.path().join("test-hydro.csv")).unwrap();

        assert!(session.handle(FormAction::ReloadFromDisk).is_err());
        assert_eq!(session.series().len(), 10);
        assert_eq!(session.form().record().dry, 500.0);
    }

    #[test]
    fn test_discard_edits_restores_baseline_without_reading() {
        let dir = data_dir("values\n500\n300\n250");
        let mut session = open(&dir);
        session.handle(FormAction::StepUp).unwrap();
        assert_eq!(calibration_file(&dir), "values\n600\n300\n250\n");

        // A change on disk is not picked up by discard.
        fs::write(dir.path().join("test-hydro.csv"), "Frequenz in Hz\n").unwrap();
        session.handle(FormAction::DiscardEdits).unwrap();

        assert_eq!(session.form().record(), CalibrationRecord::new(500.0, 300.0, 250.0));
        assert_eq!(session.series().len(), 10);
        assert_eq!(calibration_file(&dir), "values\n500\n300\n250\n");
    }

    #[test]
    fn test_refresh_series_leaves_form_alone() {
        let dir = data_dir("values\n500\n300\n250");
        let mut session = open(&dir);
        session.form_mut().selected_input_mut().push_char('8');

        assert!(!session.refresh_series().unwrap());
        crate::series::append_reading(dir.path().join("test-hydro.csv"), 470.0, 900, "x").unwrap();
        assert!(session.refresh_series().unwrap());

        assert_eq!(session.series().len(), 11);
        assert_eq!(session.form().input(Field::Dry).buffer(), Some("8"));
    }

    #[test]
    fn test_paths_from_config() {
        let files = FilesConfig {
            calibration: "cal.csv".to_string(),
            series: "hydro.csv".to_string(),
            series_delimiter: ",".to_string(),
        };
        let paths = DataPaths::new("/data", &files).unwrap();
        assert_eq!(paths.calibration, PathBuf::from("/data/cal.csv"));
        assert_eq!(paths.series, PathBuf::from("/data/hydro.csv"));
        assert_eq!(paths.delimiter, b',');
    }
}
