//! Benchmarks for the Schmitt trigger.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use spring_theory::dsp::SchmittTrigger;

use crate::BLOCK_SIZES;

pub fn bench_trigger(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/trigger");

    for &size in BLOCK_SIZES {
        // Square wave toggling every 16 samples: worst case, constant edges
        let signal: Vec<f32> = (0..size)
            .map(|i| if (i / 16) % 2 == 0 { 0.0 } else { 5.0 })
            .collect();
        let mut trigger = SchmittTrigger::new();

        group.bench_with_input(BenchmarkId::new("square", size), &size, |b, _| {
            b.iter(|| {
                let mut edges = 0u32;
                for &s in black_box(&signal) {
                    edges += trigger.process(s) as u32;
                }
                black_box(edges)
            })
        });
    }

    group.finish();
}
