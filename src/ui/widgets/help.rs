//! Help panel widget.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Form",
        &[
            ("↑/↓ Tab", "Select field"),
            ("+/→", "Step up"),
            ("-/←", "Step down"),
            ("0-9 .", "Type a value"),
            ("Enter", "Save typed value"),
            ("Esc", "Drop typed value"),
        ],
    ),
    (
        "Data",
        &[
            ("r", "Reload files from disk"),
            ("u", "Discard edits (back to last load)"),
        ],
    ),
    (
        "Other",
        &[("?/F1", "Toggle this help"), ("q/Esc", "Quit application")],
    ),
];

/// Render the help panel
pub fn render_help(frame: &mut Frame, area: Rect) {
    // Clear the area first
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let mut help_text = vec![Line::from("")];
    for (title, keys) in SECTIONS {
        help_text.push(Line::from(Span::styled(
            *title,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        for (key, description) in *keys {
            help_text.push(Line::from(vec![
                Span::styled(format!("  {:<9}", key), Style::default().fg(Color::Cyan)),
                Span::raw(format!("- {}", description)),
            ]));
        }
        help_text.push(Line::from(""));
    }
    help_text.push(Line::from("Every step, save, reload or discard rewrites the calibration file."));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}
