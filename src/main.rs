//! Main entry point for the watering dashboard.
//!
//! The binary performs the following steps:
//! 1. Parses the command line and loads the optional config file.
//! 2. Sets up logging (to a file or nowhere while the TUI owns the terminal).
//! 3. With `--record`, appends one reading to the series and exits.
//! 4. Loads the calibration and the series; any failure ends the program
//!    before the UI is drawn.
//! 5. Runs the interactive dashboard, or a single headless cycle with
//!    `--once` or when stdout is not a terminal.

use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use watering_dashboard::cli::Cli;
use watering_dashboard::config::{AppConfig, DEFAULT_CONFIG_FILE};
use watering_dashboard::dashboard::{self, DataPaths, Session};
use watering_dashboard::logging::{self, LogTarget};
use watering_dashboard::persistence::{CalibrationWriter, CsvFileWriter, NoOpWriter};
use watering_dashboard::series;
use watering_dashboard::ui::{self, App};

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    if cli.version {
        println!("watering-dashboard {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let dir = cli.data_dir().map_err(anyhow::Error::msg)?;

    // Load config
    let (config_path, required) = match &cli.config {
        Some(path) => (path.clone(), true),
        None => (dir.join(DEFAULT_CONFIG_FILE), false),
    };
    let mut config = AppConfig::load(&config_path, required)?;
    config.apply_cli_overrides(&cli);

    let interactive = cli.record.is_none() && !cli.once && atty::is(atty::Stream::Stdout);
    let target = if interactive { LogTarget::Discard } else { LogTarget::Stderr };
    logging::init(&config.logging, target)?;

    let paths = DataPaths::new(&dir, &config.files)?;

    if let Some(value) = cli.record {
        let stored = series::append_reading(
            &paths.series,
            value,
            config.series.history_len,
            &config.series.header,
        )?;
        println!("{} readings in {}", stored, paths.series.display());
        return Ok(());
    }

    let writer: Box<dyn CalibrationWriter> = if cli.read_only {
        info!("Calibration writes disabled");
        Box::new(NoOpWriter)
    } else {
        Box::new(CsvFileWriter::new(&paths.calibration))
    };

    if !interactive {
        if !cli.once {
            warn!("stdout is not a terminal, running a single cycle");
        }
        let report = dashboard::run_once(paths, config.form.step, writer)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let session = Session::open(paths, config.form.step, writer)?;
    let mut app = App::new(session);
    app.start();

    let refresh = match config.series.refresh_secs {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };
    ui::run(&mut app, Duration::from_millis(config.ui.tick_rate_ms), refresh)?;
    Ok(())
}
