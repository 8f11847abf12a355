//! Benchmarks for one engine tick per variant.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use spring_theory::{
    dsp::CoefficientModel,
    engine::{SpringEngine, TickInputs, TickOutputs},
    Direct, FrequencyAttack, FrequencyFriction,
};

use crate::BLOCK_SIZES;

const SAMPLE_TIME: f32 = 1.0 / 48_000.0;

fn render<M: CoefficientModel>(
    engine: &mut SpringEngine<M>,
    inputs: &TickInputs<M::Controls>,
    out: &mut [TickOutputs],
) {
    for sample in out.iter_mut() {
        *sample = engine.tick(inputs);
    }
}

fn bench_model<M: CoefficientModel + Clone>(c: &mut Criterion, name: &str, model: M) {
    let mut group = c.benchmark_group(format!("dsp/engine/{}", name));

    for &size in BLOCK_SIZES {
        let mut buffer = vec![TickOutputs::default(); size];
        let mut engine = SpringEngine::new(model.clone());
        let mut inputs = TickInputs::<M::Controls>::new(SAMPLE_TIME);
        inputs.offset = false;
        inputs.position.knob = 2.5;

        group.bench_with_input(BenchmarkId::new("tick", size), &size, |b, _| {
            b.iter(|| {
                render(&mut engine, black_box(&inputs), black_box(&mut buffer));
            })
        });
    }

    group.finish();
}

pub fn bench_engine(c: &mut Criterion) {
    bench_model(c, "direct", Direct);
    bench_model(c, "frequency", FrequencyFriction::default());
    bench_model(c, "attack", FrequencyAttack::default());
}
