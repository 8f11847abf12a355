//! Panel parameters: semantic names, ranges and display tapers per variant.

use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dsp::{
    coefficients::{DirectControls, FrequencyAttackControls, FrequencyFrictionControls},
    normalize::Control,
};

/// Every control a spring module can expose.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpringParam {
    Offset,
    Stiffness,
    Frequency,
    Friction,
    Attack,
    Position,
}

impl SpringParam {
    pub fn name(&self) -> &'static str {
        match self {
            SpringParam::Offset => "Offset",
            SpringParam::Stiffness => "Stiffness",
            SpringParam::Frequency => "Frequency",
            SpringParam::Friction => "Friction",
            SpringParam::Attack => "Attack",
            SpringParam::Position => "Position",
        }
    }
}

/// The coefficient controls of one strategy, addressable by `SpringParam`.
pub trait ControlSet: Copy + Default + fmt::Debug + Send + 'static {
    /// Coefficient params in panel order.
    const PARAMS: &'static [SpringParam];

    fn control(&self, param: SpringParam) -> Option<&Control>;

    fn control_mut(&mut self, param: SpringParam) -> Option<&mut Control>;
}

impl ControlSet for DirectControls {
    const PARAMS: &'static [SpringParam] = &[SpringParam::Stiffness, SpringParam::Friction];

    fn control(&self, param: SpringParam) -> Option<&Control> {
        match param {
            SpringParam::Stiffness => Some(&self.stiffness),
            SpringParam::Friction => Some(&self.friction),
            _ => None,
        }
    }

    fn control_mut(&mut self, param: SpringParam) -> Option<&mut Control> {
        match param {
            SpringParam::Stiffness => Some(&mut self.stiffness),
            SpringParam::Friction => Some(&mut self.friction),
            _ => None,
        }
    }
}

impl ControlSet for FrequencyFrictionControls {
    const PARAMS: &'static [SpringParam] = &[SpringParam::Frequency, SpringParam::Friction];

    fn control(&self, param: SpringParam) -> Option<&Control> {
        match param {
            SpringParam::Frequency => Some(&self.frequency),
            SpringParam::Friction => Some(&self.friction),
            _ => None,
        }
    }

    fn control_mut(&mut self, param: SpringParam) -> Option<&mut Control> {
        match param {
            SpringParam::Frequency => Some(&mut self.frequency),
            SpringParam::Friction => Some(&mut self.friction),
            _ => None,
        }
    }
}

impl ControlSet for FrequencyAttackControls {
    const PARAMS: &'static [SpringParam] = &[SpringParam::Frequency, SpringParam::Attack];

    fn control(&self, param: SpringParam) -> Option<&Control> {
        match param {
            SpringParam::Frequency => Some(&self.frequency),
            SpringParam::Attack => Some(&self.attack),
            _ => None,
        }
    }

    fn control_mut(&mut self, param: SpringParam) -> Option<&mut Control> {
        match param {
            SpringParam::Frequency => Some(&mut self.frequency),
            SpringParam::Attack => Some(&mut self.attack),
            _ => None,
        }
    }
}

/// How a raw knob value maps to its displayed value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Taper {
    Linear,
    /// display = multiplier * base^value + floor
    Exponential {
        base: f32,
        multiplier: f32,
        floor: f32,
    },
}

/// Declared range, default and display of one knob.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub param: SpringParam,
    pub min: f32,
    pub max: f32,
    pub default: f32,
    pub unit: &'static str,
    pub taper: Taper,
}

impl ParamSpec {
    pub fn name(&self) -> &'static str {
        self.param.name()
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    pub fn display_value(&self, value: f32) -> f32 {
        match self.taper {
            Taper::Linear => value,
            Taper::Exponential {
                base,
                multiplier,
                floor,
            } => multiplier * base.powf(value) + floor,
        }
    }

    /// Human readable value with unit, e.g. `"2.000 Hz"`.
    pub fn format(&self, value: f32) -> String {
        if self.unit.is_empty() {
            format!("{:.3}", self.display_value(value))
        } else {
            format!("{:.3} {}", self.display_value(value), self.unit)
        }
    }
}

const OFFSET: ParamSpec = ParamSpec {
    param: SpringParam::Offset,
    min: 0.0,
    max: 1.0,
    default: 1.0,
    unit: "",
    taper: Taper::Linear,
};

const POSITION: ParamSpec = ParamSpec {
    param: SpringParam::Position,
    min: -5.0,
    max: 5.0,
    default: -5.0,
    unit: "m",
    taper: Taper::Linear,
};

const FRICTION: ParamSpec = ParamSpec {
    param: SpringParam::Friction,
    min: 0.0,
    max: 10.0,
    default: 1.0,
    unit: "Ns/m",
    taper: Taper::Linear,
};

const STIFFNESS: ParamSpec = ParamSpec {
    param: SpringParam::Stiffness,
    min: 0.0,
    max: 1000.0,
    default: 100.0,
    unit: "N/m",
    taper: Taper::Linear,
};

const FREQUENCY: ParamSpec = ParamSpec {
    param: SpringParam::Frequency,
    min: -5.0,
    max: 5.0,
    default: 0.0,
    unit: "Hz",
    taper: Taper::Exponential {
        base: 2.0,
        multiplier: 2.0,
        floor: 0.0,
    },
};

const WIDE_FREQUENCY: ParamSpec = ParamSpec {
    min: -10.0,
    max: 10.0,
    ..FREQUENCY
};

// The unpatched attack jack still adds its ratio^0 term, one minimum time.
const ATTACK: ParamSpec = ParamSpec {
    param: SpringParam::Attack,
    min: 0.0,
    max: 1.0,
    default: 0.5,
    unit: "s",
    taper: Taper::Exponential {
        base: 10_000.0,
        multiplier: 0.001,
        floor: 0.001,
    },
};

static DIRECT_PARAMS: [ParamSpec; 4] = [STIFFNESS, FRICTION, POSITION, OFFSET];
static FREQUENCY_PARAMS: [ParamSpec; 4] = [FREQUENCY, FRICTION, POSITION, OFFSET];
static WIDE_FREQUENCY_PARAMS: [ParamSpec; 4] = [WIDE_FREQUENCY, FRICTION, POSITION, OFFSET];
static ATTACK_PARAMS: [ParamSpec; 4] = [FREQUENCY, ATTACK, POSITION, OFFSET];

/// The four spring modules. Each pairs a coefficient strategy with a panel.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Stiffness and friction knobs.
    Direct,
    /// Frequency knob over [-5, 5] and friction knob.
    Frequency,
    /// Frequency knob over [-10, 10] and friction knob.
    WideFrequency,
    /// Frequency knob and attack time knob.
    Attack,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::Direct,
        Variant::Frequency,
        Variant::WideFrequency,
        Variant::Attack,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Variant::Direct => "direct",
            Variant::Frequency => "frequency",
            Variant::WideFrequency => "wide",
            Variant::Attack => "attack",
        }
    }

    /// Full panel in display order.
    pub fn params(&self) -> &'static [ParamSpec] {
        match self {
            Variant::Direct => &DIRECT_PARAMS,
            Variant::Frequency => &FREQUENCY_PARAMS,
            Variant::WideFrequency => &WIDE_FREQUENCY_PARAMS,
            Variant::Attack => &ATTACK_PARAMS,
        }
    }

    pub fn spec(&self, param: SpringParam) -> Option<&'static ParamSpec> {
        self.params().iter().find(|spec| spec.param == param)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown variant `{0}`, expected one of: direct, frequency, wide, attack")]
pub struct ParseVariantError(pub String);

impl FromStr for Variant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|variant| variant.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseVariantError(s.to_string()))
    }
}
