//! The per-sample spring engine.
//!
//! `SpringEngine` wires the primitives in `dsp` into one tick:
//!
//! ```text
//! controls ─→ normalize ─→ coefficient model ─→ trigger ─→ integrate/reset ─→ outputs
//! ```
//!
//! Only the spring state and the trigger state survive between ticks;
//! everything else is recomputed from the inputs each call.

pub mod config;
pub mod params;

pub use config::SpringConfig;
pub use params::{ControlSet, ParamSpec, SpringParam, Taper, Variant};

use crate::{
    dsp::{
        coefficients::{CoefficientModel, Coefficients},
        normalize::{finite_or_zero, resolve_target, saturate, Control},
        spring::Spring,
        trigger::{SchmittTrigger, TriggerState},
    },
    error::ConfigError,
};

/// Everything a tick reads. Supplied fresh by the caller each sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInputs<C> {
    pub offset: bool,
    pub coefficients: C,
    /// Target position. A patched signal overrides the knob.
    pub position: Control,
    pub reset: f32,
    /// Integration step in seconds. Non-positive values hold the state.
    pub sample_time: f32,
}

impl<C: ControlSet> TickInputs<C> {
    /// Inputs at the panel defaults.
    pub fn new(sample_time: f32) -> Self {
        Self {
            offset: true,
            coefficients: C::default(),
            position: Control::knob(-5.0),
            reset: 0.0,
            sample_time,
        }
    }

    pub fn control(&self, param: SpringParam) -> Option<&Control> {
        match param {
            SpringParam::Position => Some(&self.position),
            SpringParam::Offset => None,
            _ => self.coefficients.control(param),
        }
    }

    pub fn knob(&self, param: SpringParam) -> Option<f32> {
        match param {
            SpringParam::Offset => Some(if self.offset { 1.0 } else { 0.0 }),
            _ => self.control(param).map(|control| control.knob),
        }
    }

    /// Set a knob. The offset switch reads values >= 0.5 as on.
    pub fn set_knob(&mut self, param: SpringParam, value: f32) {
        match param {
            SpringParam::Offset => self.offset = value >= 0.5,
            SpringParam::Position => self.position.knob = value,
            _ => {
                if let Some(control) = self.coefficients.control_mut(param) {
                    control.knob = value;
                }
            }
        }
    }

    /// Patch (`Some`) or unpatch (`None`) the external signal of a control.
    pub fn set_signal(&mut self, param: SpringParam, signal: Option<f32>) {
        match param {
            SpringParam::Offset => {}
            SpringParam::Position => self.position.signal = signal,
            _ => {
                if let Some(control) = self.coefficients.control_mut(param) {
                    control.signal = signal;
                }
            }
        }
    }
}

/// Everything a tick produces.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickOutputs {
    /// Clamped to +/- `output_limit`.
    pub acceleration: f32,
    /// Clamped to +/- `output_limit`.
    pub velocity: f32,
    pub position: f32,
    /// |position - target| * `difference_scale`. Not clamped above 1.
    pub difference: f32,
}

impl TickOutputs {
    /// Difference indicator clamped to [0, 1] for lights and meters.
    pub fn difference_brightness(&self) -> f32 {
        self.difference.clamp(0.0, 1.0)
    }
}

pub struct SpringEngine<M: CoefficientModel> {
    model: M,
    config: SpringConfig,
    trigger: SchmittTrigger,
    spring: Spring,
    coefficients: Coefficients,
    recoveries: u64,
}

impl<M: CoefficientModel> SpringEngine<M> {
    /// Engine with the stock configuration.
    pub fn new(model: M) -> Self {
        Self::build(model, SpringConfig::default())
    }

    pub fn with_config(model: M, config: SpringConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(model, config))
    }

    fn build(model: M, config: SpringConfig) -> Self {
        log::debug!("spring engine created: {:?}", config);
        Self {
            model,
            trigger: SchmittTrigger::with_thresholds(config.trigger_low, config.trigger_high),
            config,
            spring: Spring::new(),
            coefficients: Coefficients::default(),
            recoveries: 0,
        }
    }

    /// Process one sample.
    pub fn tick(&mut self, inputs: &TickInputs<M::Controls>) -> TickOutputs {
        let range = self.config.range(inputs.offset);
        let coefficients = self.model.coefficients(&inputs.coefficients);
        let target = resolve_target(&inputs.position, &range);
        let reset = self.trigger.process(inputs.reset);

        let sample_time = if inputs.sample_time.is_finite() && inputs.sample_time > 0.0 {
            inputs.sample_time
        } else {
            0.0
        };

        let step = self.spring.step(coefficients, target, sample_time, &range);
        if step.recovered {
            self.recoveries = self.recoveries.saturating_add(1);
        }

        // Overrides the integrated state; `step` still describes the old one.
        if reset {
            self.spring.reset_to(target);
        }

        self.coefficients = coefficients;

        let limit = self.config.output_limit;
        TickOutputs {
            acceleration: saturate(step.acceleration, limit),
            velocity: saturate(self.spring.velocity(), limit),
            position: self.spring.position(),
            difference: finite_or_zero(step.difference.abs() * self.config.difference_scale),
        }
    }

    /// Return to the construction state: at rest at 0, trigger low.
    pub fn reset(&mut self) {
        self.spring = Spring::new();
        self.trigger.reset();
        self.coefficients = Coefficients::default();
    }

    pub fn position(&self) -> f32 {
        self.spring.position()
    }

    pub fn velocity(&self) -> f32 {
        self.spring.velocity()
    }

    /// Coefficients used by the most recent tick.
    pub fn coefficients(&self) -> Coefficients {
        self.coefficients
    }

    pub fn trigger_state(&self) -> TriggerState {
        self.trigger.state()
    }

    /// Number of ticks whose state went non-finite and was rolled back.
    pub fn recoveries(&self) -> u64 {
        self.recoveries
    }

    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    pub fn model(&self) -> &M {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::coefficients::{
        Direct, DirectControls, FrequencyFriction, FrequencyFrictionControls,
    };

    const SAMPLE_TIME: f32 = 1.0 / 1_000.0;

    fn direct_inputs(stiffness: f32, friction: f32, target: f32) -> TickInputs<DirectControls> {
        let mut inputs = TickInputs::<DirectControls>::new(SAMPLE_TIME);
        inputs.offset = false;
        inputs.coefficients.stiffness = Control::knob(stiffness);
        inputs.coefficients.friction = Control::knob(friction);
        inputs.position = Control::knob(target);
        inputs
    }

    #[test]
    fn starts_at_rest_at_zero() {
        let engine = SpringEngine::new(Direct);
        assert_eq!(engine.position(), 0.0);
        assert_eq!(engine.velocity(), 0.0);
        assert_eq!(engine.trigger_state(), TriggerState::Low);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = SpringConfig::default().with_trigger_thresholds(2.0, 1.0);
        assert!(SpringEngine::with_config(Direct, config).is_err());
    }

    #[test]
    fn reset_tick_still_reports_pre_reset_difference() {
        let mut engine = SpringEngine::new(Direct);
        let mut inputs = direct_inputs(100.0, 0.0, 2.0);

        inputs.reset = 5.0;
        let out = engine.tick(&inputs);

        // State reflects the reset, outputs still describe the old distance
        assert_eq!(engine.position(), 2.0);
        assert_eq!(engine.velocity(), 0.0);
        assert!((out.difference - 0.2).abs() < 1e-6);
        assert_eq!(out.acceleration, 5.0);
        assert_eq!(out.position, 2.0);
        assert_eq!(out.velocity, 0.0);

        // Next tick the outputs catch up
        let out = engine.tick(&inputs);
        assert_eq!(out.difference, 0.0);
        assert_eq!(out.acceleration, 0.0);
    }

    #[test]
    fn offset_default_targets_zero() {
        let mut engine = SpringEngine::new(FrequencyFriction::default());
        let mut inputs = TickInputs::<FrequencyFrictionControls>::new(SAMPLE_TIME);
        inputs.reset = 10.0;
        engine.tick(&inputs);
        assert_eq!(engine.position(), 0.0);
    }

    #[test]
    fn invalid_sample_time_holds_state() {
        let mut engine = SpringEngine::new(Direct);
        let mut inputs = direct_inputs(100.0, 1.0, 3.0);
        inputs.sample_time = 0.0;
        let out = engine.tick(&inputs);
        assert_eq!(engine.position(), 0.0);
        assert_eq!(out.acceleration, 5.0);

        inputs.sample_time = f32::NAN;
        engine.tick(&inputs);
        assert_eq!(engine.position(), 0.0);
        assert_eq!(engine.velocity(), 0.0);
    }

    #[test]
    fn runaway_stiffness_is_recovered() {
        let mut engine = SpringEngine::new(Direct);
        let inputs = direct_inputs(f32::MAX, 0.0, 4.0);
        for _ in 0..100 {
            let out = engine.tick(&inputs);
            assert!(out.position.is_finite());
            assert!(out.velocity.abs() <= 5.0);
            assert!(out.acceleration.abs() <= 5.0);
        }
        assert!(engine.recoveries() > 0);
        assert!((-5.0..=5.0).contains(&engine.position()));
    }

    #[test]
    fn knob_accessors_address_controls_by_name() {
        let mut inputs = TickInputs::<FrequencyFrictionControls>::new(SAMPLE_TIME);
        inputs.set_knob(SpringParam::Friction, 4.0);
        inputs.set_knob(SpringParam::Offset, 0.0);
        inputs.set_signal(SpringParam::Position, Some(1.0));
        inputs.set_knob(SpringParam::Stiffness, 9.0);

        assert_eq!(inputs.knob(SpringParam::Friction), Some(4.0));
        assert_eq!(inputs.knob(SpringParam::Offset), Some(0.0));
        assert!(!inputs.offset);
        assert_eq!(inputs.position.signal, Some(1.0));
        // Not a control of this strategy
        assert_eq!(inputs.knob(SpringParam::Stiffness), None);
    }

    #[test]
    fn difference_brightness_clamps_to_unit() {
        let out = TickOutputs {
            difference: 1.7,
            ..Default::default()
        };
        assert_eq!(out.difference_brightness(), 1.0);
    }
}
