//! TUI module for spring
//!
//! Shows the panel, live outputs, a position scope and its spectrum, and
//! turns key presses into control messages for the audio thread.

mod panel;
mod spectrum;
pub mod state;
mod status;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use spring_theory::{
    engine::SpringParam,
    graph::{SpringHandle, SpringMessage},
};
use std::time::{Duration, Instant};

pub use state::{UiStateInit, UiStateUpdate};

use panel::render_panel;
use spectrum::{render_spectrum, SpectrumAnalyzer};
use status::{render_status, ScopeStats};
use waveform::render_waveform;

/// Scope buffer size (decimated samples)
pub const SCOPE_BUFFER_SIZE: usize = 4096;
/// How long a key press holds the reset gate high
const GATE_HOLD: Duration = Duration::from_millis(20);
/// Knob steps per full range
const COARSE_STEPS: f32 = 100.0;
const FINE_STEPS: f32 = 1000.0;

pub struct UiApp {
    scope_rx: Consumer<f32>,
    state_rx: Consumer<UiStateUpdate>,
    handle: SpringHandle,
    init: UiStateInit,
    current_state: UiStateUpdate,
    /// Knob values in panel order; the UI owns these
    knobs: Vec<f32>,
    selected: usize,
    scope_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    gate_release: Option<Instant>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        scope_rx: Consumer<f32>,
        state_rx: Consumer<UiStateUpdate>,
        handle: SpringHandle,
        init: UiStateInit,
    ) -> Self {
        let knobs = init.params.iter().map(|spec| spec.default).collect();
        let spectrum = SpectrumAnalyzer::new(SCOPE_BUFFER_SIZE, init.scope_rate);
        Self {
            scope_rx,
            state_rx,
            handle,
            init,
            current_state: UiStateUpdate::default(),
            knobs,
            selected: 0,
            scope_buffer: vec![0.0; SCOPE_BUFFER_SIZE],
            spectrum,
            gate_release: None,
            should_quit: false,
        }
    }

    pub fn recoveries(&self) -> u64 {
        self.current_state.recoveries
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_scope();
            self.poll_state();
            self.release_gate();

            terminal.draw(|frame| self.render(frame))?;

            // Non-blocking, ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn poll_scope(&mut self) {
        let mut received = false;
        while let Ok(sample) = self.scope_rx.pop() {
            self.scope_buffer.push(sample);
            received = true;
        }

        if received {
            if self.scope_buffer.len() > SCOPE_BUFFER_SIZE {
                let excess = self.scope_buffer.len() - SCOPE_BUFFER_SIZE;
                self.scope_buffer.drain(0..excess);
            }
            self.spectrum.update(&self.scope_buffer);
        }
    }

    /// Keep only the latest state
    fn poll_state(&mut self) {
        while let Ok(state) = self.state_rx.pop() {
            self.current_state = state;
        }
    }

    fn release_gate(&mut self) {
        if let Some(release) = self.gate_release {
            if Instant::now() >= release && self.handle.gate_off() {
                self.gate_release = None;
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let fine = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up => {
                self.selected = self.selected.checked_sub(1).unwrap_or(self.knobs.len() - 1);
            }
            KeyCode::Down => {
                self.selected = (self.selected + 1) % self.knobs.len();
            }
            KeyCode::Left => self.nudge(-1.0, fine),
            KeyCode::Right => self.nudge(1.0, fine),
            KeyCode::Char('o') | KeyCode::Char('O') => self.toggle_offset(),
            KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Char(' ') => self.pulse_gate(),
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.handle.send(SpringMessage::Clear);
            }
            _ => {}
        }
    }

    fn nudge(&mut self, direction: f32, fine: bool) {
        let spec = self.init.params[self.selected];
        if spec.param == SpringParam::Offset {
            self.toggle_offset();
            return;
        }

        let steps = if fine { FINE_STEPS } else { COARSE_STEPS };
        let step = (spec.max - spec.min) / steps;
        let value = spec.clamp(self.knobs[self.selected] + direction * step);
        self.knobs[self.selected] = value;
        self.handle.set_knob(spec.param, value);
    }

    fn toggle_offset(&mut self) {
        if let Some(index) = self
            .init
            .params
            .iter()
            .position(|spec| spec.param == SpringParam::Offset)
        {
            let value = if self.knobs[index] >= 0.5 { 0.0 } else { 1.0 };
            self.knobs[index] = value;
            self.handle.set_knob(SpringParam::Offset, value);
        }
    }

    fn pulse_gate(&mut self) {
        if self.handle.gate_on() {
            self.gate_release = Some(Instant::now() + GATE_HOLD);
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),                                // Status bar
                Constraint::Length(self.knobs.len() as u16 + 2),      // Panel
                Constraint::Min(8),                                   // Scope
                Constraint::Length(10),                               // Spectrum
                Constraint::Length(1),                                // Help bar
            ])
            .split(area);

        let stats = ScopeStats::from_buffer(&self.scope_buffer);
        render_status(frame, chunks[0], &self.init, &self.current_state, &stats);
        render_panel(
            frame,
            chunks[1],
            &self.init,
            &self.current_state,
            &self.knobs,
            self.selected,
        );
        render_waveform(frame, chunks[2], &self.scope_buffer, [-5.0, 10.0]);
        render_spectrum(frame, chunks[3], &self.spectrum);

        let help = Paragraph::new(
            " [Q] Quit  [↑↓] Select  [←→] Adjust (Shift fine)  [O] Offset  [R] Reset  [C] Clear",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[4]);
    }
}
