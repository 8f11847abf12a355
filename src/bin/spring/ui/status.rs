//! Status bar widget - variant, gate, outputs and audio stats

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{UiStateInit, UiStateUpdate};

/// Signal statistics for display
pub struct ScopeStats {
    pub peak: f32,
    pub rms: f32,
}

impl ScopeStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

pub fn render_status(
    frame: &mut Frame,
    area: Rect,
    static_state: &UiStateInit,
    dynamic_state: &UiStateUpdate,
    stats: &ScopeStats,
) {
    let block = Block::default().title(" spring ").borders(Borders::ALL);

    let outputs = &dynamic_state.outputs;
    let gate_symbol = if dynamic_state.gate { "●" } else { "○" };

    let line = Line::from(vec![
        Span::styled(
            format!(" {}  ", static_state.variant),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("{} gate  ", gate_symbol),
            Style::default().fg(if dynamic_state.gate {
                Color::Green
            } else {
                Color::DarkGray
            }),
        ),
        Span::styled(
            format!(
                "acc {:+.2}  vel {:+.2}  pos {:+.3}  ",
                outputs.acceleration, outputs.velocity, outputs.position
            ),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!(
                "k {:.1}  c {:.2}  ",
                dynamic_state.coefficients.stiffness, dynamic_state.coefficients.friction
            ),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!(
                "{:.1}kHz x{}  ",
                static_state.sample_rate / 1000.0,
                static_state.channels
            ),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}  ", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(
            format!("recoveries {}", dynamic_state.recoveries),
            Style::default().fg(if dynamic_state.recoveries > 0 {
                Color::Red
            } else {
                Color::DarkGray
            }),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}
