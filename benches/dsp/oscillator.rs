//! Benchmarks for the phase-accumulator oscillators.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voicegraph::dsp::{SineOsc, TriOsc};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let mut sine = SineOsc::new(SAMPLE_RATE);
        sine.set_frequency(440.0);
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| sine.render(black_box(&mut buffer)))
        });

        let mut tri = TriOsc::new(SAMPLE_RATE);
        tri.set_frequency(440.0);
        group.bench_with_input(BenchmarkId::new("triangle", size), &size, |b, _| {
            b.iter(|| tri.render(black_box(&mut buffer)))
        });
    }

    group.finish();
}
