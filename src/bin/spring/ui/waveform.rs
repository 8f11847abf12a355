//! Position oscilloscope widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Render the scope over a fixed vertical range
pub fn render_waveform(frame: &mut Frame, area: Rect, buffer: &[f32], bounds: [f64; 2]) {
    let block = Block::default().title(" Position ").borders(Borders::ALL);

    let data: Vec<(f64, f64)> = buffer
        .iter()
        .enumerate()
        .map(|(i, &sample)| {
            let x = i as f64 / buffer.len() as f64;
            (x, sample as f64)
        })
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds(bounds)
                .labels(vec![
                    format!("{:.0}", bounds[0]),
                    format!("{:.0}", (bounds[0] + bounds[1]) / 2.0),
                    format!("{:.0}", bounds[1]),
                ])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
