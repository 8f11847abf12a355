//! Parameter panel widget - knob values and the difference light

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use super::{UiStateInit, UiStateUpdate};

pub fn render_panel(
    frame: &mut Frame,
    area: Rect,
    static_state: &UiStateInit,
    dynamic_state: &UiStateUpdate,
    knobs: &[f32],
    selected: usize,
) {
    let block = Block::default().title(" Panel ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(24)])
        .split(inner);

    let lines: Vec<Line> = static_state
        .params
        .iter()
        .zip(knobs)
        .enumerate()
        .map(|(i, (spec, &value))| {
            let marker = if i == selected { "▸ " } else { "  " };
            let style = if i == selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(vec![
                Span::styled(format!("{}{:<10}", marker, spec.name()), style),
                Span::styled(
                    format!("{:>8.3}  ", value),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(spec.format(value), style),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), chunks[0]);

    let brightness = dynamic_state.outputs.difference_brightness();
    let light = Gauge::default()
        .block(Block::default().title("Difference").borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::White).bg(Color::Black))
        .ratio(brightness as f64);
    frame.render_widget(light, chunks[1]);
}
