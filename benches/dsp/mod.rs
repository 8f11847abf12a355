//! Benchmarks for low-level primitives.

mod engine;
mod trigger;

pub use engine::bench_engine;
pub use trigger::bench_trigger;
