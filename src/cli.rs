//! Command-line interface argument parsing.
//!
//! This module defines the CLI structure and parsing logic using gumdrop.
//! The only positional argument is the data directory.

use gumdrop::Options;
use std::path::PathBuf;
use std::str::FromStr;

/// Log level for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Show all messages including trace
    Trace,
    /// Show debug messages and above
    Debug,
    /// Show info messages and above (default)
    Info,
    /// Show warnings and errors only
    Warn,
    /// Show errors only
    Error,
}

impl LogLevel {
    /// Convert LogLevel to an EnvFilter directive
    pub fn to_filter_string(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

/// Watering dashboard: view the humidity trend and edit the calibration
#[derive(Debug, Options)]
pub struct Cli {
    #[options(help = "print help message")]
    pub help: bool,

    #[options(short = "V", help = "print version")]
    pub version: bool,

    #[options(help = "config file (default: DIR/dashboard.toml)", meta = "FILE")]
    pub config: Option<PathBuf>,

    #[options(help = "log level: trace, debug, info, warn, error", meta = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[options(no_short, help = "write logs to this file", meta = "FILE")]
    pub log_file: Option<String>,

    #[options(no_short, help = "run one cycle without the UI and print a JSON summary")]
    pub once: bool,

    #[options(no_short, help = "append one humidity reading to the series and exit", meta = "VALUE")]
    pub record: Option<f64>,

    #[options(no_short, help = "never write the calibration file")]
    pub read_only: bool,

    #[options(free, help = "directory holding calibration.csv and test-hydro.csv")]
    pub free: Vec<String>,
}

impl Cli {
    /// Parse command-line arguments, printing usage and exiting on error
    pub fn parse_args() -> Self {
        Self::parse_args_default_or_exit()
    }

    /// The data directory, `.` when none is given
    pub fn data_dir(&self) -> Result<PathBuf, String> {
        match self.free.as_slice() {
            [] => Ok(PathBuf::from(".")),
            [dir] => Ok(PathBuf::from(dir)),
            [_, extra @ ..] => Err(format!("unexpected arguments: {}", extra.join(" "))),
        }
    }
}
