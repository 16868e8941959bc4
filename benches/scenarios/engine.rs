//! Benchmarks for full engine blocks, queues and reverb included.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voicegraph::{
    io::{AudioInput, AudioOutput},
    EngineBuilder, EngineConfig,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");
    let input = AudioInput::default();

    for &size in BLOCK_SIZES {
        for (name, reverb) in [("dry", false), ("reverb", true)] {
            let config = EngineConfig {
                sample_rate: SAMPLE_RATE,
                max_block_size: size,
                reverb,
                ..EngineConfig::default()
            };
            let (mut engine, mut handle) = EngineBuilder::new(config).build().unwrap();
            for note in [48, 52, 55, 59, 62, 64, 67, 71] {
                handle.note_on(note, 0.7);
            }
            let mut output = AudioOutput::new(2, size);

            group.bench_with_input(BenchmarkId::new(format!("8-voices-{name}"), size), &size, |b, _| {
                b.iter(|| engine.process_block(black_box(&input), black_box(&mut output)).unwrap())
            });
        }
    }

    group.finish();
}
