#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{
        normalize::OperatingRange,
        trigger::{DEFAULT_HIGH_THRESHOLD, DEFAULT_LOW_THRESHOLD},
    },
    error::{require_finite, require_non_negative, require_positive, ConfigError},
};

/// Fixed constants of the engine. `Default` gives the stock module behaviour.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    /// Shift applied to the position range when the offset switch is on.
    pub offset_amount: f32,
    /// Distance from the unshifted centre to either position bound.
    pub half_range: f32,
    /// Acceleration and velocity outputs are clamped to +/- this.
    pub output_limit: f32,
    /// Difference indicator = |difference| * this.
    pub difference_scale: f32,
    pub trigger_low: f32,
    pub trigger_high: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            offset_amount: 5.0,
            half_range: 5.0,
            output_limit: 5.0,
            difference_scale: 0.1,
            trigger_low: DEFAULT_LOW_THRESHOLD,
            trigger_high: DEFAULT_HIGH_THRESHOLD,
        }
    }
}

impl SpringConfig {
    pub fn with_offset_amount(mut self, offset_amount: f32) -> Self {
        self.offset_amount = offset_amount;
        self
    }

    pub fn with_half_range(mut self, half_range: f32) -> Self {
        self.half_range = half_range;
        self
    }

    pub fn with_output_limit(mut self, output_limit: f32) -> Self {
        self.output_limit = output_limit;
        self
    }

    pub fn with_difference_scale(mut self, difference_scale: f32) -> Self {
        self.difference_scale = difference_scale;
        self
    }

    pub fn with_trigger_thresholds(mut self, low: f32, high: f32) -> Self {
        self.trigger_low = low;
        self.trigger_high = high;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative("offset_amount", self.offset_amount)?;
        require_positive("half_range", self.half_range)?;
        require_positive("output_limit", self.output_limit)?;
        require_non_negative("difference_scale", self.difference_scale)?;
        let low = require_finite("trigger_low", self.trigger_low)?;
        let high = require_finite("trigger_high", self.trigger_high)?;
        if low >= high {
            return Err(ConfigError::InvertedThresholds { low, high });
        }
        Ok(())
    }

    /// Position range for the given switch state.
    #[inline]
    pub fn range(&self, offset_switch: bool) -> OperatingRange {
        OperatingRange::new(offset_switch, self.offset_amount, self.half_range)
    }
}
