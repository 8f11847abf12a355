//! Coefficient models: map controls to stiffness and friction.

use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::normalize::{finite_or_zero, Control},
    engine::params::ControlSet,
    error::{require_positive, ConfigError},
};

/*
Coefficient Models
==================

The integrator only understands two numbers: stiffness and friction. Sound
designers may want to dial those directly, musicians usually think in pitch
and decay time. A coefficient model is the translation layer between the two.

Vocabulary
----------

  stiffness         Spring constant k. Force per unit displacement.
                    Unit mass is assumed, so k = ω².

  friction          Damping coefficient c. Force per unit velocity.

  angular velocity  ω = 2π·f, radians per second.

  damping ratio     ζ = c / (2·sqrt(k)). ζ = 1 is critical damping:
                    the fastest return to rest without overshoot.

  decay rate        σ = ζ·ω. The envelope of a damped oscillation falls
                    as e^(-σ·t).


Frequency to Stiffness
----------------------

The frequency control is exponential, one unit per octave:

    f = base · 2^control          (base = 2 Hz)
    ω = 2π·f
    k = ω²

    control   -5      0      5
    f        1/16 Hz  2 Hz   64 Hz


Attack Time to Friction
-----------------------

We want the oscillation to fall below an unnoticeable amplitude (one cent,
1/1200 of full scale) exactly when the attack time has elapsed:

    e^(-σ·T) = 1/1200
    σ = -ln(1/1200) / T
    ζ = σ / ω
    c = 2·sqrt(k)·ζ

The attack time itself comes from an exponential taper over three decades
(1ms to 10s) so the knob spacing feels even:

    ratio = 10s / 1ms = 10000
    T = (ratio^knob + ratio^(signal · 0.1)) · 1ms

The knob term and the signal term are SUMMED. Patching a signal lengthens
the time set by the knob rather than replacing it. With nothing patched the
signal term is ratio^0 = 1, adding one minimum time.


Strategies
----------

  Direct               k and c straight from the controls, floored at 0.
  FrequencyFriction    k from frequency, c straight from the control.
  FrequencyAttack      k from frequency, c from the attack time.
*/

pub const DEFAULT_BASE_FREQUENCY: f32 = 2.0;
pub const DEFAULT_CONTROL_LIMIT: f32 = 5.0;
/// One cent of full scale.
pub const UNNOTICEABLE_AMPLITUDE: f32 = 1.0 / (12.0 * 100.0);
pub const MINIMUM_ATTACK_TIME: f32 = 0.001;
pub const MAXIMUM_ATTACK_TIME: f32 = 10.0;
/// Scales an attack signal (volts) into taper exponent units.
pub const ATTACK_SIGNAL_SCALE: f32 = 0.1;

/// The two physical coefficients consumed by the integrator.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Coefficients {
    pub stiffness: f32,
    pub friction: f32,
}

/// Strategy for deriving `Coefficients` from a variant's controls.
pub trait CoefficientModel: Send {
    type Controls: ControlSet;

    fn coefficients(&self, controls: &Self::Controls) -> Coefficients;
}

#[inline]
pub fn frequency_from_control(base_frequency: f32, control: f32) -> f32 {
    base_frequency * 2.0_f32.powf(control)
}

#[inline]
pub fn angular_velocity(frequency: f32) -> f32 {
    TAU * frequency
}

#[inline]
pub fn stiffness_from_frequency(frequency: f32) -> f32 {
    let omega = angular_velocity(frequency);
    omega * omega
}

/// Exponential-taper attack time in seconds.
#[inline]
pub fn attack_time(knob: f32, signal: f32, minimum_time: f32, maximum_time: f32) -> f32 {
    let ratio = maximum_time / minimum_time;
    (ratio.powf(knob) + ratio.powf(signal * ATTACK_SIGNAL_SCALE)) * minimum_time
}

/// Friction that decays the envelope to `UNNOTICEABLE_AMPLITUDE` within
/// `attack_time` seconds.
#[inline]
pub fn friction_from_attack(stiffness: f32, attack_time: f32) -> f32 {
    let angular_velocity = stiffness.sqrt();
    let decay_rate = -UNNOTICEABLE_AMPLITUDE.ln() / attack_time;
    let damping_ratio = decay_rate / angular_velocity;
    2.0 * stiffness.sqrt() * damping_ratio
}

/// Stiffness and friction dialed directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct Direct;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectControls {
    pub stiffness: Control,
    pub friction: Control,
}

impl Default for DirectControls {
    fn default() -> Self {
        Self {
            stiffness: Control::knob(100.0),
            friction: Control::knob(1.0),
        }
    }
}

impl CoefficientModel for Direct {
    type Controls = DirectControls;

    fn coefficients(&self, controls: &DirectControls) -> Coefficients {
        Coefficients {
            stiffness: controls.stiffness.floored(),
            friction: controls.friction.floored(),
        }
    }
}

/// Stiffness from an exponential frequency control, friction dialed directly.
#[derive(Debug, Clone, Copy)]
pub struct FrequencyFriction {
    base_frequency: f32,
    control_limit: f32,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyFrictionControls {
    pub frequency: Control,
    pub friction: Control,
}

impl Default for FrequencyFrictionControls {
    fn default() -> Self {
        Self {
            frequency: Control::knob(0.0),
            friction: Control::knob(1.0),
        }
    }
}

impl FrequencyFriction {
    pub fn new(base_frequency: f32, control_limit: f32) -> Result<Self, ConfigError> {
        Ok(Self {
            base_frequency: require_positive("base_frequency", base_frequency)?,
            control_limit: require_positive("control_limit", control_limit)?,
        })
    }

    pub fn base_frequency(&self) -> f32 {
        self.base_frequency
    }

    /// Oscillation frequency in Hz for a frequency control.
    pub fn frequency(&self, control: &Control) -> f32 {
        let clamped = control
            .combined()
            .clamp(-self.control_limit, self.control_limit);
        frequency_from_control(self.base_frequency, clamped)
    }
}

impl Default for FrequencyFriction {
    fn default() -> Self {
        Self {
            base_frequency: DEFAULT_BASE_FREQUENCY,
            control_limit: DEFAULT_CONTROL_LIMIT,
        }
    }
}

impl CoefficientModel for FrequencyFriction {
    type Controls = FrequencyFrictionControls;

    fn coefficients(&self, controls: &FrequencyFrictionControls) -> Coefficients {
        Coefficients {
            stiffness: stiffness_from_frequency(self.frequency(&controls.frequency)),
            friction: controls.friction.floored(),
        }
    }
}

/// Stiffness from frequency, friction from an attack/decay time.
#[derive(Debug, Clone, Copy)]
pub struct FrequencyAttack {
    frequency: FrequencyFriction,
    minimum_time: f32,
    maximum_time: f32,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyAttackControls {
    pub frequency: Control,
    pub attack: Control,
}

impl Default for FrequencyAttackControls {
    fn default() -> Self {
        Self {
            frequency: Control::knob(0.0),
            attack: Control::knob(0.5),
        }
    }
}

impl FrequencyAttack {
    pub fn new(
        base_frequency: f32,
        control_limit: f32,
        minimum_time: f32,
        maximum_time: f32,
    ) -> Result<Self, ConfigError> {
        let frequency = FrequencyFriction::new(base_frequency, control_limit)?;
        let minimum_time = require_positive("minimum_time", minimum_time)?;
        let maximum_time = require_positive("maximum_time", maximum_time)?;
        if minimum_time >= maximum_time {
            return Err(ConfigError::InvertedTimes {
                minimum: minimum_time,
                maximum: maximum_time,
            });
        }
        Ok(Self {
            frequency,
            minimum_time,
            maximum_time,
        })
    }

    pub fn frequency(&self, control: &Control) -> f32 {
        self.frequency.frequency(control)
    }

    /// Attack time in seconds. Knob and signal each contribute a taper term.
    pub fn attack_time(&self, control: &Control) -> f32 {
        attack_time(
            finite_or_zero(control.knob),
            finite_or_zero(control.signal.unwrap_or(0.0)),
            self.minimum_time,
            self.maximum_time,
        )
    }
}

impl Default for FrequencyAttack {
    fn default() -> Self {
        Self {
            frequency: FrequencyFriction::default(),
            minimum_time: MINIMUM_ATTACK_TIME,
            maximum_time: MAXIMUM_ATTACK_TIME,
        }
    }
}

impl CoefficientModel for FrequencyAttack {
    type Controls = FrequencyAttackControls;

    fn coefficients(&self, controls: &FrequencyAttackControls) -> Coefficients {
        let stiffness = stiffness_from_frequency(self.frequency(&controls.frequency));
        let attack_time = self.attack_time(&controls.attack);
        Coefficients {
            stiffness,
            friction: friction_from_attack(stiffness, attack_time).max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_control_is_one_octave_per_unit() {
        assert!((frequency_from_control(2.0, 0.0) - 2.0).abs() < 1e-6);
        assert!((frequency_from_control(2.0, 1.0) - 4.0).abs() < 1e-6);
        assert!((frequency_from_control(2.0, -1.0) - 1.0).abs() < 1e-6);
        assert!((frequency_from_control(2.0, 5.0) - 64.0).abs() < 1e-4);
    }

    #[test]
    fn one_hertz_stiffness() {
        let k = stiffness_from_frequency(1.0);
        assert!((k - 39.478_42).abs() < 1e-3);
    }

    #[test]
    fn direct_floors_negative_controls() {
        let controls = DirectControls {
            stiffness: Control::knob(10.0).with_signal(-20.0),
            friction: Control::knob(0.5).with_signal(-1.0),
        };
        let c = Direct.coefficients(&controls);
        assert_eq!(c.stiffness, 0.0);
        assert_eq!(c.friction, 0.0);
    }

    #[test]
    fn frequency_control_clamps_after_combining() {
        let model = FrequencyFriction::default();
        let wide = Control::knob(8.0).with_signal(3.0);
        assert_eq!(model.frequency(&wide), model.frequency(&Control::knob(5.0)));

        let low = Control::knob(-10.0);
        assert_eq!(model.frequency(&low), model.frequency(&Control::knob(-5.0)));
    }

    #[test]
    fn frequency_friction_passes_friction_through() {
        let model = FrequencyFriction::default();
        let controls = FrequencyFrictionControls {
            frequency: Control::knob(0.0),
            friction: Control::knob(3.0).with_signal(1.5),
        };
        let c = model.coefficients(&controls);
        assert_eq!(c.friction, 4.5);
        assert_eq!(c.stiffness, stiffness_from_frequency(2.0));
    }

    #[test]
    fn attack_time_spans_three_decades() {
        // Unpatched signal contributes one minimum time
        let shortest = attack_time(0.0, 0.0, 0.001, 10.0);
        assert!((shortest - 0.002).abs() < 1e-6);

        let longest = attack_time(1.0, 0.0, 0.001, 10.0);
        assert!((longest - 10.001).abs() < 1e-3);
    }

    #[test]
    fn attack_signal_adds_to_knob_time() {
        let model = FrequencyAttack::default();
        let knob_only = model.attack_time(&Control::knob(0.5));
        let patched = model.attack_time(&Control::knob(0.5).with_signal(5.0));
        assert!(patched > knob_only);
    }

    #[test]
    fn attack_friction_decays_to_one_cent() {
        let k = stiffness_from_frequency(2.0);
        let t = 0.5;
        let c = friction_from_attack(k, t);
        // Envelope e^(-c/2 · t) reaches the threshold at t
        let envelope = (-(c / 2.0) * t).exp();
        assert!((envelope - UNNOTICEABLE_AMPLITUDE).abs() < 1e-5);
    }

    #[test]
    fn invalid_strategy_config_is_rejected() {
        assert!(FrequencyFriction::new(0.0, 5.0).is_err());
        assert!(FrequencyFriction::new(2.0, -1.0).is_err());
        assert_eq!(
            FrequencyAttack::new(2.0, 5.0, 10.0, 0.001).unwrap_err(),
            ConfigError::InvertedTimes {
                minimum: 10.0,
                maximum: 0.001
            }
        );
    }
}
