//! Low-level primitives behind the spring engine.
//!
//! These components are allocation-free and realtime-safe. Each covers one
//! stage of the per-sample pipeline so the engine can wire them together and
//! graph nodes can layer block rendering on top.

/// Stiffness/friction derivation strategies.
pub mod coefficients;
/// Control combination, range shifting and output clamping.
pub mod normalize;
/// Damped spring state and explicit integration step.
pub mod spring;
/// Hysteresis edge detection for reset signals.
pub mod trigger;

pub use coefficients::{CoefficientModel, Coefficients};
pub use normalize::{Control, OperatingRange};
pub use spring::Spring;
pub use trigger::{SchmittTrigger, TriggerState};
