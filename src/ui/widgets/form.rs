//! Number input panels of the calibration form.

use crate::form::{CalibrationForm, Field};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render a titled panel holding the given form fields
pub fn render_form_section(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    form: &CalibrationForm,
    fields: &[Field],
) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let mut lines = Vec::with_capacity(fields.len() * 3);
    for &field in fields {
        let input = form.input(field);
        let selected = form.selected() == field;

        let marker = if selected { "▶ " } else { "  " };
        let label_style = if selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Yellow)),
            Span::styled(input.label(), label_style),
        ]));

        let value = match input.buffer() {
            Some(text) => Span::styled(
                format!("[ {}_ ]", text),
                Style::default().fg(Color::Black).bg(Color::Yellow),
            ),
            None => Span::styled(
                format!("[ {} ]", input.value()),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        };
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled("- ", Style::default().fg(Color::DarkGray)),
            value,
            Span::styled(" +", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("  step {}", input.step()), Style::default().fg(Color::DarkGray)),
        ]));
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
