//! Application state management for the TUI.
//!
//! This module wraps the dashboard session with the UI-only state (help
//! panel, messages) and turns input actions into session calls.

use crate::dashboard::{FormAction, Session};
use crate::ui::input::InputAction;
use tracing::warn;

/// Application state
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,
    /// Show help panel
    pub show_help: bool,
    /// Loaded data and form
    pub session: Session,
    /// Status message
    pub status_message: Option<String>,
    /// Error message of the last failed cycle
    pub error_message: Option<String>,
}

impl App {
    /// Create a new application state
    pub fn new(session: Session) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            session,
            status_message: Some("Dashboard started".to_string()),
            error_message: None,
        }
    }

    /// First cycle after loading: write the loaded values back
    pub fn start(&mut self) {
        match self.session.persist() {
            Ok(_) => self.set_status(format!("Loaded {}", self.session.paths().dir.display())),
            Err(e) => self.set_error(e.to_string()),
        }
    }

    /// Whether keys should go to the selected field's text
    pub fn is_editing(&self) -> bool {
        self.session.form().is_editing()
    }

    /// Apply one input action
    pub fn apply(&mut self, action: InputAction) {
        match action {
            InputAction::Quit => self.should_quit = true,
            InputAction::ToggleHelp => self.toggle_help(),
            InputAction::NextField => self.session.form_mut().select_next(),
            InputAction::PrevField => self.session.form_mut().select_prev(),
            InputAction::Type(c) => {
                self.session.form_mut().selected_input_mut().push_char(c);
            }
            InputAction::Backspace => self.session.form_mut().selected_input_mut().backspace(),
            InputAction::CancelEdit => self.session.form_mut().selected_input_mut().cancel(),
            InputAction::StepUp => self.run_cycle(FormAction::StepUp),
            InputAction::StepDown => self.run_cycle(FormAction::StepDown),
            InputAction::Commit => self.run_cycle(FormAction::Commit),
            InputAction::ReloadFromDisk => self.run_cycle(FormAction::ReloadFromDisk),
            InputAction::DiscardEdits => self.run_cycle(FormAction::DiscardEdits),
            InputAction::None => {}
        }
    }

    fn run_cycle(&mut self, action: FormAction) {
        match self.session.handle(action) {
            Ok(report) => {
                self.clear_error();
                let message = match action {
                    FormAction::ReloadFromDisk => "Reloaded from disk".to_string(),
                    FormAction::DiscardEdits => "Edits discarded".to_string(),
                    _ => format!(
                        "Saved dry={} wet={} volume={}",
                        report.calibration.dry, report.calibration.wet, report.calibration.volume_ml
                    ),
                };
                self.set_status(message);
            }
            Err(e) => {
                warn!("Cycle {:?} failed: {}", action, e);
                self.set_error(e.to_string());
            }
        }
    }

    /// Re-read the series file on the refresh timer
    pub fn refresh_series(&mut self) {
        match self.session.refresh_series() {
            Ok(true) => self.set_status(format!("{} readings", self.session.series().len())),
            Ok(false) => {}
            Err(e) => {
                warn!("Series refresh failed: {}", e);
                self.set_error(e.to_string());
            }
        }
    }

    /// Toggle help panel
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Set status message
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    /// Set error message
    pub fn set_error(&mut self, message: String) {
        self.error_message = Some(message);
    }

    /// Clear error message
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }
}
