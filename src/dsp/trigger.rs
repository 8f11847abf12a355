//! Hysteresis edge detector for reset/gate signals.

/*
Schmitt Trigger
===============

A single threshold turns a noisy signal sitting near that threshold into a
burst of false edges. A Schmitt trigger uses two thresholds instead:

    signal
      │        ┌──────┐
  1.0 ┤- - - - ┼ - - -│- - - -  high threshold: Low → High
      │       ╱       │
  0.1 ┤- - - ╱- - - - ┼ - - -  low threshold:  High → Low
      │     ╱         └──
      └──────────────────────→ time
             ↑
           edge (one tick)

Between the thresholds the state is held, so wobble inside the band cannot
re-fire. The detector emits `true` only on the tick where the state moves
Low → High. It is an edge pulse, not a level.

NaN compares false against both thresholds and therefore holds the state.
*/

pub const DEFAULT_LOW_THRESHOLD: f32 = 0.1;
pub const DEFAULT_HIGH_THRESHOLD: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Low,
    High,
}

#[derive(Debug, Clone)]
pub struct SchmittTrigger {
    state: TriggerState,
    low_threshold: f32,
    high_threshold: f32,
}

impl SchmittTrigger {
    pub fn new() -> Self {
        Self::with_thresholds(DEFAULT_LOW_THRESHOLD, DEFAULT_HIGH_THRESHOLD)
    }

    /// Thresholds are expected to satisfy `low < high`; `SpringConfig`
    /// validates this before an engine is built.
    pub fn with_thresholds(low_threshold: f32, high_threshold: f32) -> Self {
        Self {
            state: TriggerState::Low,
            low_threshold,
            high_threshold,
        }
    }

    /// Feed one sample. Returns `true` on the rising edge only.
    #[inline]
    pub fn process(&mut self, signal: f32) -> bool {
        match self.state {
            TriggerState::Low if signal >= self.high_threshold => {
                self.state = TriggerState::High;
                true
            }
            TriggerState::High if signal <= self.low_threshold => {
                self.state = TriggerState::Low;
                false
            }
            _ => false,
        }
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    pub fn is_high(&self) -> bool {
        self.state == TriggerState::High
    }

    pub fn reset(&mut self) {
        self.state = TriggerState::Low;
    }
}

impl Default for SchmittTrigger {
    fn default() -> Self {
        Self::new()
    }
}
