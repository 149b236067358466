//! Chart widget for the humidity series and the threshold overlay.

use crate::series::{ChartTable, DRY_COLUMN};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Colors for measured columns, cycled
const SERIES_COLORS: [Color; 4] = [Color::Cyan, Color::Green, Color::Magenta, Color::White];

/// Render the monitoring chart: one line per numeric column
pub fn render_chart(frame: &mut Frame, area: Rect, table: &ChartTable) {
    let block = Block::default()
        .title(" Monitoring (lower = wetter) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let Some((min, max)) = table.value_bounds() else {
        let chart = Chart::new(vec![])
            .block(block)
            .x_axis(Axis::default().title("Samples").bounds([0.0, 1.0]))
            .y_axis(Axis::default().title("Reading").bounds([0.0, 1.0]));
        frame.render_widget(chart, area);
        return;
    };

    let columns: Vec<_> = table.plottable().collect();
    let points: Vec<Vec<(f64, f64)>> = columns.iter().map(|c| c.points()).collect();

    let mut measured = 0;
    let datasets: Vec<Dataset> = columns
        .iter()
        .zip(points.iter())
        .map(|(column, data)| {
            let color = if column.threshold {
                if column.name == DRY_COLUMN { Color::Red } else { Color::Blue }
            } else {
                measured += 1;
                SERIES_COLORS[(measured - 1) % SERIES_COLORS.len()]
            };
            Dataset::default()
                .name(column.name.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color))
                .data(data)
        })
        .collect();

    let (y_min, y_max) = padded(min, max);
    let x_max = table.rows().saturating_sub(1).max(1) as f64;

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("Samples")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max])
                .labels(["0".to_string(), format!("{}", table.rows())]),
        )
        .y_axis(
            Axis::default()
                .title("Reading")
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels([
                    format!("{:.0}", y_min),
                    format!("{:.0}", (y_min + y_max) / 2.0),
                    format!("{:.0}", y_max),
                ]),
        );

    frame.render_widget(chart, area);
}

/// Add 5% headroom so flat threshold lines do not sit on the border
fn padded(min: f64, max: f64) -> (f64, f64) {
    let span = max - min;
    let pad = if span > 0.0 { span / 20.0 } else { min.abs().max(1.0) / 20.0 };
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_range() {
        assert_eq!(padded(300.0, 500.0), (290.0, 510.0));
        let (lo, hi) = padded(400.0, 400.0);
        assert!(lo < 400.0 && hi > 400.0);
    }
}
