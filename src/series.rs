//! Humidity series loaded from `test-hydro.csv` and its chart overlay.

use crate::error::DataError;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Name of the overlay column holding the dry threshold
pub const DRY_COLUMN: &str = "dry";
/// Name of the overlay column holding the wet threshold
pub const WET_COLUMN: &str = "wet";

/// Raw table of readings, column names preserved
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HydroSeries {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl HydroSeries {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Load the series from a delimited file
    pub fn load<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Self, DataError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| DataError::io(path, e))?;
        let series = Self::from_reader(file, delimiter, path)?;
        debug!(
            "Loaded {} rows x {} columns from {}",
            series.len(),
            series.headers.len(),
            path.display()
        );
        Ok(series)
    }

    /// Parse a series from any reader; `path` is only used for error context
    pub fn from_reader<R: Read>(reader: R, delimiter: u8, path: &Path) -> Result<Self, DataError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .map_err(|e| DataError::csv(path, e))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(DataError::NoHeader {
                path: path.to_path_buf(),
            });
        }

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record.map_err(|e| DataError::csv(path, e))?;
            rows.push(record.iter().take(headers.len()).map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Numeric view of every column plus the two constant threshold columns.
    ///
    /// An existing column named `dry` or `wet` is replaced by the overlay.
    pub fn with_thresholds(&self, dry: f64, wet: f64) -> ChartTable {
        let rows = self.rows.len();
        let mut columns: Vec<ChartColumn> = self
            .headers
            .iter()
            .enumerate()
            .filter(|(_, name)| name.as_str() != DRY_COLUMN && name.as_str() != WET_COLUMN)
            .map(|(index, name)| ChartColumn {
                name: name.clone(),
                values: self
                    .rows
                    .iter()
                    .map(|row| row.get(index).and_then(|cell| cell.trim().parse::<f64>().ok()))
                    .collect(),
                threshold: false,
            })
            .collect();

        columns.push(ChartColumn::constant(DRY_COLUMN, dry, rows));
        columns.push(ChartColumn::constant(WET_COLUMN, wet, rows));

        ChartTable { columns, rows }
    }
}

/// One chart line
#[derive(Debug, Clone, PartialEq)]
pub struct ChartColumn {
    pub name: String,
    /// One entry per series row; `None` where the cell is empty or not numeric
    pub values: Vec<Option<f64>>,
    /// Set for the derived dry/wet reference lines
    pub threshold: bool,
}

impl ChartColumn {
    fn constant(name: &str, value: f64, rows: usize) -> Self {
        Self {
            name: name.to_string(),
            values: vec![Some(value); rows],
            threshold: true,
        }
    }

    /// Whether the column has anything to draw
    pub fn is_numeric(&self) -> bool {
        self.values.iter().any(Option::is_some)
    }

    /// Points for a line chart, x = row index
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(x, y)| y.map(|y| (x as f64, y)))
            .collect()
    }
}

/// Series augmented with the threshold overlay
#[derive(Debug, Clone, PartialEq)]
pub struct ChartTable {
    columns: Vec<ChartColumn>,
    rows: usize,
}

impl ChartTable {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> &[ChartColumn] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ChartColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns that produce a line
    pub fn plottable(&self) -> impl Iterator<Item = &ChartColumn> {
        self.columns.iter().filter(|c| c.is_numeric())
    }

    /// Min and max over every plottable value
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        self.plottable()
            .flat_map(|c| c.values.iter().flatten().copied())
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((min, max)) => Some((min.min(v), max.max(v))),
            })
    }
}

/// Append one reading to the series file, keeping at most `history_len` rows.
///
/// A missing or empty file is created with `header`. Once the history is
/// full the oldest reading is dropped and the file rewritten. Returns the
/// number of readings now stored.
pub fn append_reading<P: AsRef<Path>>(
    path: P,
    value: f64,
    history_len: usize,
    header: &str,
) -> Result<usize, DataError> {
    let path = path.as_ref();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => return Err(DataError::io(path, e)),
    };

    let mut lines = content.lines();
    let existing_header = lines.next().map(str::trim).filter(|h| !h.is_empty());
    let mut readings: Vec<String> = lines
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();
    let reading = format!("{value:.0}");

    let result = match existing_header {
        Some(_) if readings.len() < history_len => {
            let mut file = OpenOptions::new()
                .append(true)
                .open(path)
                .map_err(|e| DataError::io(path, e))?;
            let separator = if content.ends_with('\n') { "" } else { "\n" };
            writeln!(file, "{separator}{reading}").map_err(|e| DataError::io(path, e))?;
            readings.len() + 1
        }
        _ => {
            readings.push(reading);
            let overflow = readings.len().saturating_sub(history_len);
            readings.drain(..overflow);

            let mut out = String::with_capacity(content.len() + 16);
            out.push_str(existing_header.unwrap_or(header));
            out.push('\n');
            for line in &readings {
                out.push_str(line);
                out.push('\n');
            }
            fs::write(path, out).map_err(|e| DataError::io(path, e))?;
            readings.len()
        }
    };

    info!("Recorded reading {:.0} in {} ({} stored)", value, path.display(), result);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn parse(content: &str) -> HydroSeries {
        HydroSeries::from_reader(content.as_bytes(), b';', &PathBuf::from("test-hydro.csv")).unwrap()
    }

    fn ten_rows() -> String {
        let mut content = String::from("time;Frequenz in Hz\n");
        for i in 0..10 {
            content.push_str(&format!("2020-07-02 10:{i:02};{}\n", 1000 + i * 10));
        }
        content
    }

    #[test]
    fn test_semicolon_columns_preserved() {
        let series = parse(&ten_rows());
        assert_eq!(series.headers(), ["time", "Frequenz in Hz"]);
        assert_eq!(series.len(), 10);
        assert_eq!(series.rows()[3][1], "1030");
    }

    #[test]
    fn test_overlay_adds_two_constant_columns() {
        let series = parse(&ten_rows());
        let table = series.with_thresholds(500.0, 300.0);

        assert_eq!(table.rows(), 10);
        assert_eq!(table.columns().len(), series.headers().len() + 2);

        let dry = table.column(DRY_COLUMN).unwrap();
        let wet = table.column(WET_COLUMN).unwrap();
        assert_eq!(dry.values, vec![Some(500.0); 10]);
        assert_eq!(wet.values, vec![Some(300.0); 10]);
        assert!(dry.threshold && wet.threshold);
    }

    #[test]
    fn test_non_numeric_column_is_not_plotted() {
        let table = parse(&ten_rows()).with_thresholds(500.0, 300.0);
        let names: Vec<&str> = table.plottable().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Frequenz in Hz", "dry", "wet"]);
    }

    #[test]
    fn test_overlay_on_empty_series() {
        let table = parse("Frequenz in Hz\n").with_thresholds(1.0, 2.0);
        assert_eq!(table.rows(), 0);
        assert!(table.column(DRY_COLUMN).unwrap().values.is_empty());
        assert_eq!(table.value_bounds(), None);
    }

    #[test]
    fn test_existing_threshold_column_is_replaced() {
        let table = parse("reading;dry\n1;9\n2;9\n").with_thresholds(5.0, 3.0);
        assert_eq!(table.columns().len(), 3);
        assert_eq!(table.column(DRY_COLUMN).unwrap().values, vec![Some(5.0); 2]);
    }

    #[test]
    fn test_value_bounds_include_thresholds() {
        let table = parse("reading\n400\n450\n").with_thresholds(500.0, 300.0);
        assert_eq!(table.value_bounds(), Some((300.0, 500.0)));
    }

    #[test]
    fn test_points_skip_gaps() {
        let table = parse("reading\n1\n\n3\nx\n5\n").with_thresholds(0.0, 0.0);
        let reading = table.column("reading").unwrap();
        assert_eq!(reading.points(), vec![(0.0, 1.0), (1.0, 3.0), (3.0, 5.0)]);
    }

    #[test]
    fn test_empty_file_has_no_header() {
        let err = HydroSeries::from_reader("".as_bytes(), b';', &PathBuf::from("x.csv")).unwrap_err();
        assert!(matches!(err, DataError::NoHeader { .. }));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = HydroSeries::load(dir.path().join("test-hydro.csv"), b';').unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }

    #[test]
    fn test_append_creates_file_with_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test-hydro.csv");

        assert_eq!(append_reading(&path, 1234.4, 900, "Frequenz in Hz").unwrap(), 1);
        assert_eq!(append_reading(&path, 1250.6, 900, "Frequenz in Hz").unwrap(), 2);

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Frequenz in Hz\n1234\n1251\n"
        );
    }

    #[test]
    fn test_append_without_trailing_newline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test-hydro.csv");
        fs::write(&path, "Hz\n10").unwrap();

        append_reading(&path, 20.0, 900, "ignored").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Hz\n10\n20\n");
    }

    #[test]
    fn test_append_drops_oldest_when_full() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test-hydro.csv");
        fs::write(&path, "Hz\n1\n2\n3\n").unwrap();

        assert_eq!(append_reading(&path, 4.0, 3, "Hz").unwrap(), 3);
        assert_eq!(fs::read_to_string(&path).unwrap(), "Hz\n2\n3\n4\n");

        let series = HydroSeries::load(&path, b';').unwrap();
        assert_eq!(series.len(), 3);
    }
}
