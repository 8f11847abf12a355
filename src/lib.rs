pub mod dsp; // Per-sample primitives
pub mod engine; // Spring engine and variants
pub mod error;
pub mod graph; // Block-rendering nodes

pub use dsp::coefficients::{
    Direct, DirectControls, FrequencyAttack, FrequencyAttackControls, FrequencyFriction,
    FrequencyFrictionControls,
};
pub use engine::{SpringConfig, SpringEngine, SpringParam, TickInputs, TickOutputs, Variant};
pub use error::ConfigError;

pub const MAX_BLOCK_SIZE: usize = 2048;
