//! Mass-spring-damper state and its per-sample integration step.

use crate::dsp::{coefficients::Coefficients, normalize::OperatingRange};

/*
Damped Spring
=============

A unit mass hangs on a spring pulled toward a target position, with friction
opposing its motion. Each sample we advance the state by one time step.

Vocabulary
----------

  difference    position - target. How far the mass is from rest.

  tension       -stiffness · difference. The restoring force, always
                pointing back toward the target.

  damping       -friction · velocity. Opposes motion, bleeds energy.

  sample time   dt = 1 / sample_rate. The integration step.


The Step
--------

    acceleration = tension + damping
    velocity    += acceleration · dt
    position    += velocity · dt          (uses the NEW velocity)
    position     = clamp(position, minimum, maximum)

Updating position with the freshly updated velocity keeps an undamped spring
circling at constant amplitude instead of spiralling outward.

The position clamp is a hard wall. It does not reflect or touch velocity, so
a mass pinned at a wall keeps pushing into it until tension turns it around.


Stability
---------

Explicit stepping goes unstable once stiffness · dt² grows past 4
(ω·dt > 2). At 48kHz that is a stiffness near 9.2e9, far beyond the
frequency range of the controls, but the direct strategy can dial stiffness
freely and low sample rates shrink the margin. Heavy friction has its own
limit: friction · dt past 2 makes velocity overshoot and ring. Pick sample
rates accordingly.

If the state ever becomes non-finite we recover: velocity goes to 0 and
position holds its last valid (clamped) value.


Reset
-----

A reset overrides the integrated result AFTER the step ran: velocity = 0,
position = target. The difference and acceleration returned by that step
still describe the pre-reset state, so outputs lag the reset by one tick.
*/

/// Quantities computed during one integration step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpringStep {
    pub difference: f32,
    pub tension: f32,
    pub damping: f32,
    pub acceleration: f32,
    /// The step produced non-finite state and was rolled back.
    pub recovered: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Spring {
    position: f32,
    velocity: f32,
}

impl Spring {
    pub fn new() -> Self {
        Self {
            position: 0.0,
            velocity: 0.0,
        }
    }

    /// Advance one sample toward `target`.
    pub fn step(
        &mut self,
        coefficients: Coefficients,
        target: f32,
        sample_time: f32,
        range: &OperatingRange,
    ) -> SpringStep {
        let previous = range.clamp(self.position);

        let difference = self.position - target;
        let tension = -coefficients.stiffness * difference;
        let damping = -coefficients.friction * self.velocity;
        let acceleration = tension + damping;

        self.velocity += acceleration * sample_time;
        self.position += self.velocity * sample_time;
        self.position = range.clamp(self.position);

        let recovered = !(self.velocity.is_finite() && self.position.is_finite());
        if recovered {
            self.velocity = 0.0;
            self.position = if previous.is_finite() {
                previous
            } else {
                range.clamp(target)
            };
        }

        SpringStep {
            difference,
            tension,
            damping,
            acceleration,
            recovered,
        }
    }

    /// Snap to rest at `target`.
    pub fn reset_to(&mut self, target: f32) {
        self.velocity = 0.0;
        self.position = target;
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }
}
