//! Benchmarks for many spring nodes rendered side by side.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use spring_theory::{
    engine::SpringParam,
    graph::{GraphNode, RenderCtx, SpringNode, SpringOutput},
    FrequencyAttack, FrequencyFriction,
};

use crate::BLOCK_SIZES;

const INSTANCES: usize = 16;

pub fn bench_instances(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/instances");
    let ctx = RenderCtx::new(48_000.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === FREQUENCY BANK ===
        // Springs spread over the frequency range, all swinging
        let mut bank: Vec<Box<dyn GraphNode>> = (0..INSTANCES)
            .map(|i| {
                let mut node = SpringNode::new(FrequencyFriction::default());
                node.set_knob(SpringParam::Frequency, -5.0 + i as f32 * 10.0 / INSTANCES as f32);
                node.set_knob(SpringParam::Friction, 0.2);
                node.set_knob(SpringParam::Position, 5.0);
                Box::new(node) as Box<dyn GraphNode>
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("frequency_bank", size), &size, |b, _| {
            b.iter(|| {
                for node in bank.iter_mut() {
                    node.render_block(black_box(&mut buffer), black_box(&ctx));
                }
            })
        });

        // === RETRIGGERED ATTACK ===
        // Gate toggled every block, velocity output
        let mut attack = SpringNode::new(FrequencyAttack::default()).output(SpringOutput::Velocity);
        let mut gate = false;

        group.bench_with_input(BenchmarkId::new("retriggered_attack", size), &size, |b, _| {
            b.iter(|| {
                gate = !gate;
                if gate {
                    attack.note_on(&ctx);
                } else {
                    attack.note_off(&ctx);
                }
                attack.render_block(black_box(&mut buffer), black_box(&ctx));
            })
        });
    }

    group.finish();
}
