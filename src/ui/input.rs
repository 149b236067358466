//! Input handling for the TUI.
//!
//! This module handles keyboard input and translates it into application actions.
//! While a field has pending text, keys go to that text first.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Actions that can be performed based on user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Quit the application
    Quit,
    /// Select next field
    NextField,
    /// Select previous field
    PrevField,
    /// Add one step to the selected field
    StepUp,
    /// Subtract one step from the selected field
    StepDown,
    /// Type a character into the selected field
    Type(char),
    /// Delete the last typed character
    Backspace,
    /// Commit the typed value
    Commit,
    /// Drop the typed value
    CancelEdit,
    /// Re-read calibration and series from disk
    ReloadFromDisk,
    /// Return to the values last loaded from disk
    DiscardEdits,
    /// Toggle help panel
    ToggleHelp,
    /// No action
    None,
}

/// Handle keyboard input and return the corresponding action
pub fn handle_input(timeout: Duration, editing: bool) -> std::io::Result<InputAction> {
    if event::poll(timeout)? {
        if let Event::Key(key_event) = event::read()? {
            if key_event.kind == KeyEventKind::Press {
                return Ok(map_key_to_action(key_event, editing));
            }
        }
    }
    Ok(InputAction::None)
}

/// Map a key event to an application action
pub fn map_key_to_action(key_event: KeyEvent, editing: bool) -> InputAction {
    if key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL) {
        return InputAction::Quit;
    }

    if editing {
        return match key_event.code {
            KeyCode::Char(c @ ('0'..='9' | '.' | '-')) => InputAction::Type(c),
            KeyCode::Backspace => InputAction::Backspace,
            KeyCode::Enter => InputAction::Commit,
            KeyCode::Esc => InputAction::CancelEdit,
            KeyCode::Up | KeyCode::BackTab => InputAction::PrevField,
            KeyCode::Down | KeyCode::Tab => InputAction::NextField,
            _ => InputAction::None,
        };
    }

    match key_event.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') => InputAction::Quit,
        KeyCode::Esc => InputAction::Quit,

        // Navigate fields
        KeyCode::Up | KeyCode::BackTab | KeyCode::Char('k') | KeyCode::Char('K') => {
            InputAction::PrevField
        }
        KeyCode::Down | KeyCode::Tab | KeyCode::Char('j') | KeyCode::Char('J') => {
            InputAction::NextField
        }

        // Step buttons
        KeyCode::Right | KeyCode::Char('+') => InputAction::StepUp,
        KeyCode::Left | KeyCode::Char('-') => InputAction::StepDown,

        // Start typing a value
        KeyCode::Char(c @ ('0'..='9' | '.')) => InputAction::Type(c),
        KeyCode::Enter => InputAction::Commit,

        // Reload
        KeyCode::Char('r') | KeyCode::Char('R') => InputAction::ReloadFromDisk,
        KeyCode::Char('u') | KeyCode::Char('U') => InputAction::DiscardEdits,

        // Help
        KeyCode::Char('?') | KeyCode::F(1) => InputAction::ToggleHelp,

        _ => InputAction::None,
    }
}
