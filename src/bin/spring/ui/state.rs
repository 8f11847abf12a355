//! Shared state types for UI communication
//!
//! Static data is built once before the stream starts; the per-callback
//! update is `Copy` so the audio thread can send it without allocating.

use spring_theory::{dsp::Coefficients, engine::ParamSpec, TickOutputs, Variant};

/// Static state built once at startup (can allocate)
#[derive(Clone)]
pub struct UiStateInit {
    pub variant: Variant,
    /// Audio sample rate in Hz
    pub sample_rate: f32,
    pub channels: usize,
    /// Rate of the decimated scope signal in Hz
    pub scope_rate: f32,
    /// Panel in display order
    pub params: &'static [ParamSpec],
}

/// Dynamic state sent from the audio thread after every callback
#[derive(Clone, Copy, Debug, Default)]
pub struct UiStateUpdate {
    pub outputs: TickOutputs,
    pub coefficients: Coefficients,
    pub recoveries: u64,
    /// Whether the reset gate is currently held
    pub gate: bool,
}

impl UiStateInit {
    pub fn new(variant: Variant, sample_rate: f32, channels: usize, scope_rate: f32) -> Self {
        Self {
            variant,
            sample_rate,
            channels,
            scope_rate,
            params: variant.params(),
        }
    }
}
