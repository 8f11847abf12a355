//! Real-world scenario benchmarks.
//!
//! A patch usually runs several springs at once, e.g. one per modulation
//! lane, each rendered block by block through the graph node.

mod instances;

pub use instances::bench_instances;
