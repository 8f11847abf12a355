//! Input and output normalization for the spring engine.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Normalization
=============

Controls arrive as raw floats: a knob position plus, optionally, an external
control signal patched into the matching jack. Before the physics sees them
they are combined and pushed into legal ranges. Nothing here ever fails;
every constraint is enforced by clamping or flooring.

Vocabulary
----------

  knob      The value dialed on the panel. Always present.

  signal    An external control voltage. `None` means the jack is not
            patched, which is different from a patched jack carrying 0.

  offset    A switch that shifts the whole operating range up by a fixed
            amount (5 units by default):

                offset off:  [-5, 5]
                offset on:   [ 0, 10]

  target    The equilibrium point the mass is pulled toward.


Additive vs Override
--------------------

Most controls ADD the signal to the knob:

    value = knob + signal

The position control is the exception. When a signal is patched it REPLACES
the knob entirely, so the spring follows the external control exactly:

    target = signal                  (patched)
    target = knob + offset           (unpatched)

Both paths end clamped into the operating range so a reset can never place
the mass outside it.
*/

/// The legal position range for one tick, derived from the offset switch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingRange {
    pub offset: f32,
    pub minimum: f32,
    pub maximum: f32,
}

impl OperatingRange {
    /// Build the range for a given switch state.
    ///
    /// `offset_amount` is how far the switch shifts the range, `half_range`
    /// is the distance from the unshifted centre to either bound.
    pub fn new(offset_switch: bool, offset_amount: f32, half_range: f32) -> Self {
        let offset = if offset_switch { offset_amount } else { 0.0 };
        Self {
            offset,
            minimum: -half_range + offset,
            maximum: half_range + offset,
        }
    }

    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.minimum, self.maximum)
    }

    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        (self.minimum..=self.maximum).contains(&value)
    }
}

/// A knob with an optional external signal patched next to it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Control {
    pub knob: f32,
    pub signal: Option<f32>,
}

impl Control {
    pub fn knob(knob: f32) -> Self {
        Self { knob, signal: None }
    }

    pub fn with_signal(mut self, signal: f32) -> Self {
        self.signal = Some(signal);
        self
    }

    /// Knob plus signal. Non-finite parts count as zero.
    #[inline]
    pub fn combined(&self) -> f32 {
        finite_or_zero(self.knob) + finite_or_zero(self.signal.unwrap_or(0.0))
    }

    /// Combined value floored at zero, for physical coefficients.
    #[inline]
    pub fn floored(&self) -> f32 {
        self.combined().max(0.0)
    }
}

#[inline]
pub fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Resolve the target position for this tick.
///
/// A patched signal overrides the knob; otherwise the knob is shifted by the
/// range offset.
pub fn resolve_target(position: &Control, range: &OperatingRange) -> f32 {
    let target = match position.signal {
        Some(signal) => finite_or_zero(signal),
        None => finite_or_zero(position.knob) + range.offset,
    };
    range.clamp(target)
}

/// Clamp an output to `[-limit, limit]`, mapping NaN to zero.
#[inline]
pub fn saturate(value: f32, limit: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-limit, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_shifts_both_bounds() {
        let off = OperatingRange::new(false, 5.0, 5.0);
        assert_eq!((off.minimum, off.maximum), (-5.0, 5.0));

        let on = OperatingRange::new(true, 5.0, 5.0);
        assert_eq!((on.minimum, on.maximum), (0.0, 10.0));
        assert_eq!(on.offset, 5.0);
    }

    #[test]
    fn signal_adds_to_knob() {
        let control = Control::knob(1.5).with_signal(-0.5);
        assert_eq!(control.combined(), 1.0);
    }

    #[test]
    fn floored_never_goes_negative() {
        let control = Control::knob(1.0).with_signal(-4.0);
        assert_eq!(control.floored(), 0.0);
    }

    #[test]
    fn non_finite_parts_count_as_zero() {
        let control = Control::knob(2.0).with_signal(f32::NAN);
        assert_eq!(control.combined(), 2.0);

        let control = Control::knob(f32::INFINITY);
        assert_eq!(control.combined(), 0.0);
    }

    #[test]
    fn unpatched_target_uses_offset_knob() {
        let range = OperatingRange::new(true, 5.0, 5.0);
        let target = resolve_target(&Control::knob(-5.0), &range);
        assert_eq!(target, 0.0);
    }

    #[test]
    fn patched_target_replaces_knob_and_clamps() {
        let range = OperatingRange::new(false, 5.0, 5.0);
        let target = resolve_target(&Control::knob(3.0).with_signal(1.25), &range);
        assert_eq!(target, 1.25);

        // The offset is not added to a patched signal
        let shifted = OperatingRange::new(true, 5.0, 5.0);
        let target = resolve_target(&Control::knob(3.0).with_signal(1.25), &shifted);
        assert_eq!(target, 1.25);

        let target = resolve_target(&Control::knob(0.0).with_signal(-12.0), &shifted);
        assert_eq!(target, 0.0);
    }

    #[test]
    fn saturate_handles_nan_and_infinities() {
        assert_eq!(saturate(f32::NAN, 5.0), 0.0);
        assert_eq!(saturate(f32::INFINITY, 5.0), 5.0);
        assert_eq!(saturate(f32::NEG_INFINITY, 5.0), -5.0);
        assert_eq!(saturate(2.5, 5.0), 2.5);
    }
}
