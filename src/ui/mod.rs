//! Terminal UI module using ratatui.
//!
//! This module provides the interactive dashboard: the calibration form, the
//! monitoring chart and the automation (watering volume) panel.

pub mod app;
pub mod input;
pub mod widgets;

pub use app::App;
pub use input::{handle_input, InputAction};

use crate::error::{Result, UiError};
use crate::form::Field;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    DefaultTerminal, Frame,
};
use std::time::{Duration, Instant};
use tracing::info;

/// Take over the terminal and run until the operator quits
pub fn run(app: &mut App, tick_rate: Duration, refresh: Option<Duration>) -> Result<()> {
    let mut terminal =
        ratatui::try_init().map_err(|e| UiError::InitializationError(e.to_string()))?;
    info!("Terminal UI started");

    let result = event_loop(&mut terminal, app, tick_rate, refresh);

    ratatui::restore();
    info!("Terminal UI stopped");
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    tick_rate: Duration,
    refresh: Option<Duration>,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    while !app.should_quit {
        terminal
            .draw(|frame| draw(frame, app))
            .map_err(|e| UiError::RenderError(e.to_string()))?;

        let action = handle_input(tick_rate, app.is_editing())
            .map_err(|e| UiError::InputError(e.to_string()))?;
        app.apply(action);

        if let Some(period) = refresh {
            if last_refresh.elapsed() >= period {
                app.refresh_series();
                last_refresh = Instant::now();
            }
        }
    }

    Ok(())
}

/// Draw the whole dashboard
pub fn draw(frame: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_title(frame, rows[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(46), Constraint::Min(20)])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(5)])
        .split(body[0]);

    let form = app.session.form();
    widgets::render_form_section(frame, left[0], "Calibration", form, &[Field::Dry, Field::Wet]);
    widgets::render_form_section(frame, left[1], "Automation", form, &[Field::Volume]);
    widgets::render_chart(frame, body[1], &app.session.chart_table());

    widgets::render_status_bar(
        frame,
        rows[2],
        &app.session.writer_description(),
        app.session.last_saved(),
        app.status_message.as_deref(),
        app.error_message.as_deref(),
    );

    if app.show_help {
        widgets::render_help(frame, centered_rect(60, 70, frame.area()));
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let title = Line::from(vec![
        Span::styled(
            "Watering Control",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            app.session.paths().dir.display().to_string(),
            Style::default().fg(Color::Gray),
        ),
        Span::raw("  "),
        Span::styled("? for help", Style::default().fg(Color::Yellow)),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(title).block(block), area);
}

/// Rectangle of the given percentage size centered in `area`
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::app::tests::app_in;
    use ratatui::{backend::TestBackend, Terminal};
    use tempfile::TempDir;

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 32)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_form_shows_loaded_values() {
        let dir = TempDir::new().unwrap();
        let app = app_in(&dir);
        let text = screen(&app);

        assert!(text.contains("Calibration"));
        assert!(text.contains("Monitoring"));
        assert!(text.contains("Automation"));
        assert!(text.contains("[ 500 ]"));
        assert!(text.contains("[ 300 ]"));
        assert!(text.contains("[ 250 ]"));
        assert!(text.contains("NOT SAVED"));
    }

    #[test]
    fn test_typed_text_and_help_are_drawn() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.apply(InputAction::Type('7'));
        app.apply(InputAction::ToggleHelp);
        let text = screen(&app);

        assert!(text.contains("[ 7_ ]"));
        assert!(text.contains("Keyboard Shortcuts"));
    }

    #[test]
    fn test_error_is_shown_in_status_bar() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.set_error("disk full".to_string());
        assert!(screen(&app).contains("ERROR: disk full"));
    }
}
