//! Application configuration management.
//!
//! This module handles loading, parsing, and validating the dashboard
//! configuration from an optional TOML file and environment variables, with
//! support for runtime overrides from CLI arguments.

use crate::error::{ConfigError, Result};
use config::{Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

/// Environment variable prefix, e.g. `WATERING_DASHBOARD__UI__TICK_RATE_MS`
pub const ENV_PREFIX: &str = "WATERING_DASHBOARD";

/// Config file looked up in the data directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";

/// Top-level application configuration
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub files: FilesConfig,
    pub form: FormConfig,
    pub series: SeriesConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

/// Names of the data files inside the data directory
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FilesConfig {
    pub calibration: String,
    pub series: String,
    pub series_delimiter: String,
}

/// Calibration form behaviour
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FormConfig {
    pub step: f64,
}

/// Humidity series handling
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SeriesConfig {
    /// Readings kept by `--record`
    pub history_len: usize,
    /// Header written when `--record` creates the file
    pub header: String,
    /// Re-read the series this often in the TUI, 0 disables
    pub refresh_secs: u64,
}

/// Terminal UI settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct UiConfig {
    pub tick_rate_ms: u64,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub json: bool,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            calibration: "calibration.csv".to_string(),
            series: "test-hydro.csv".to_string(),
            series_delimiter: ";".to_string(),
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            step: crate::form::DEFAULT_STEP,
        }
    }
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            history_len: 900,
            header: "Frequenz in Hz".to_string(),
            refresh_secs: 0,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 250 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            json: false,
        }
    }
}

impl FilesConfig {
    /// The series delimiter as a single byte
    pub fn delimiter_byte(&self) -> Option<u8> {
        match self.series_delimiter.as_bytes() {
            [byte] if byte.is_ascii() => Some(*byte),
            _ => None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, then the environment.
    ///
    /// With `required = false` a missing file leaves every key at its default.
    pub fn load<P: AsRef<Path>>(path: P, required: bool) -> Result<Self> {
        let path = path.as_ref();
        let settings = config::Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        let config: AppConfig = settings
            .try_deserialize()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = config::Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        for (field, name) in [
            ("files.calibration", &self.files.calibration),
            ("files.series", &self.files.series),
        ] {
            if name.trim().is_empty() {
                return Err(invalid(field, "cannot be empty"));
            }
        }

        if self.files.delimiter_byte().is_none() {
            return Err(invalid(
                "files.series_delimiter",
                "must be a single ASCII character",
            ));
        }

        if !(self.form.step.is_finite() && self.form.step > 0.0) {
            return Err(invalid("form.step", "must be greater than 0"));
        }

        if self.series.history_len == 0 {
            return Err(invalid("series.history_len", "must be greater than 0"));
        }

        if self.ui.tick_rate_ms == 0 {
            return Err(invalid("ui.tick_rate_ms", "must be greater than 0"));
        }

        Ok(())
    }

    /// Apply CLI argument overrides to configuration
    pub fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(level) = cli.log_level {
            self.logging.level = level.to_filter_string().to_string();
        }

        if let Some(file) = &cli.log_file {
            self.logging.file = Some(file.clone());
        }
    }
}

fn invalid(field: &str, message: &str) -> crate::error::AppError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
    .into()
}
