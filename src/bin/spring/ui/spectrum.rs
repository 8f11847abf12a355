//! Spectrum analyzer widget
//!
//! FFT of the decimated position signal, averaged into log-spaced bands.
//! The spring mostly moves at sub-audio rates, so the bands start well below
//! 20 Hz, and the strongest bin is reported so it can be read against the
//! frequency knob.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::{ops::Range, sync::Arc};

const SPECTRUM_BANDS: usize = 48;
/// Lowest displayed frequency in Hz
const MIN_FREQUENCY: f32 = 0.5;
const FLOOR_DB: f64 = -120.0;
/// Below this the signal is treated as silent and no peak is reported.
const SILENCE_POWER: f32 = 1e-9;

/// A displayed point: its centre frequency and the FFT bins it averages.
struct Band {
    center: f64,
    bins: Range<usize>,
}

fn hann(len: usize) -> Vec<f32> {
    if len < 2 {
        return vec![1.0; len];
    }
    let denom = (len - 1) as f32;
    (0..len)
        .map(|i| 0.5 - 0.5 * (std::f32::consts::TAU * i as f32 / denom).cos())
        .collect()
}

/// Log-spaced bands from MIN_FREQUENCY up to Nyquist. Every band owns at
/// least one bin, so low bands overlap when the resolution is coarse.
fn log_bands(len: usize, sample_rate: f32) -> Vec<Band> {
    let half = (len / 2).max(1);
    let resolution = sample_rate as f64 / len.max(1) as f64;
    let nyquist = (sample_rate as f64 / 2.0).max(1.0);
    let lowest = (MIN_FREQUENCY as f64).min(nyquist);
    let span = nyquist / lowest;

    let edge = |i: usize| lowest * span.powf(i as f64 / SPECTRUM_BANDS as f64);

    (0..SPECTRUM_BANDS)
        .map(|i| {
            let (lo, hi) = (edge(i), edge(i + 1));
            let start = ((lo / resolution).floor() as usize).min(half - 1);
            let end = ((hi / resolution).ceil() as usize).clamp(start + 1, half);
            Band {
                center: (lo * hi).sqrt(),
                bins: start..end,
            }
        })
        .collect()
}

pub struct SpectrumAnalyzer {
    window: Vec<f32>,
    bands: Vec<Band>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// Hz per FFT bin
    resolution: f64,
    /// (centre_hz, power_db) per band
    spectrum: Vec<(f64, f64)>,
    peak: Option<f64>,
}

impl SpectrumAnalyzer {
    /// `buffer_len` must match the scope buffer length; `sample_rate` is the
    /// rate of the analysed (decimated) signal.
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let fft = FftPlanner::new().plan_fft_forward(buffer_len);
        let bands = log_bands(buffer_len, sample_rate);
        let spectrum = bands.iter().map(|band| (band.center, FLOOR_DB)).collect();

        Self {
            window: hann(buffer_len),
            bands,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            resolution: sample_rate as f64 / buffer_len.max(1) as f64,
            spectrum,
            peak: None,
        }
    }

    /// Recompute the spectrum. Ignores buffers of the wrong length.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() || buffer.is_empty() {
            return;
        }

        // Remove DC so the resting position does not swamp the plot
        let mean = buffer.iter().sum::<f32>() / buffer.len() as f32;
        for ((slot, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *slot = Complex::new((sample - mean) * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let half = (self.scratch.len() / 2).max(1);
        let powers = &self.scratch[..half];

        for (point, band) in self.spectrum.iter_mut().zip(&self.bands) {
            let bins = &powers[band.bins.clone()];
            let mean_power = bins.iter().map(|c| c.norm_sqr()).sum::<f32>() / bins.len() as f32;
            point.1 = (10.0 * (mean_power.max(1e-12) as f64).log10()).max(FLOOR_DB);
        }

        let first = ((MIN_FREQUENCY as f64 / self.resolution).ceil() as usize).clamp(1, half);
        self.peak = powers[first..]
            .iter()
            .enumerate()
            .map(|(offset, c)| (first + offset, c.norm_sqr()))
            .filter(|&(_, power)| power > SILENCE_POWER)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index as f64 * self.resolution);
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }

    /// Frequency of the strongest bin, if the signal is not silent.
    pub fn peak_frequency(&self) -> Option<f64> {
        self.peak
    }
}

/// Render the spectrum on a log10 frequency axis
pub fn render_spectrum(frame: &mut Frame, area: Rect, analyzer: &SpectrumAnalyzer) {
    let title = match analyzer.peak_frequency() {
        Some(freq) => format!(" Spectrum  peak {:.2} Hz ", freq),
        None => " Spectrum ".to_string(),
    };
    let block = Block::default().title(title).borders(Borders::ALL);

    let data: Vec<(f64, f64)> = analyzer
        .data()
        .iter()
        .map(|&(freq, db)| (freq.log10(), db))
        .collect();

    let min_x = data.first().map_or(0.0, |&(x, _)| x);
    let max_x = data.last().map_or(1.0, |&(x, _)| x).max(min_x + 1.0);
    let max_db = data.iter().map(|&(_, db)| db).fold(-100.0, f64::max);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([min_x, max_x])
                .labels(vec![
                    format!("{:.1}Hz", 10f64.powf(min_x)),
                    format!("{:.0}Hz", 10f64.powf(max_x)),
                ])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-100.0, max_db.max(0.0) + 10.0])
                .labels(vec!["-100", "-60", "-20", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
