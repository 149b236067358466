//! Status bar widget.

use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the status bar
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    writer: &str,
    last_saved: Option<DateTime<Local>>,
    status_message: Option<&str>,
    error_message: Option<&str>,
) {
    let mut spans = vec![];

    // Save status
    let (saved_text, saved_color) = match last_saved {
        Some(at) => (format!("SAVED {}", at.format("%H:%M:%S")), Color::Green),
        None => ("NOT SAVED".to_string(), Color::Yellow),
    };
    spans.push(Span::styled(
        saved_text,
        Style::default().fg(saved_color).add_modifier(Modifier::BOLD),
    ));

    spans.push(Span::raw(" │ "));
    spans.push(Span::styled(writer.to_string(), Style::default().fg(Color::DarkGray)));

    // Error message takes priority
    if let Some(error) = error_message {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!("ERROR: {}", error),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    } else if let Some(status) = status_message {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(status.to_string(), Style::default().fg(Color::Gray)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}
