//! Benchmarks for 2x up/down sampling.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voicegraph::dsp::{Downsample2x, Upsample2x};

use crate::BLOCK_SIZES;

pub fn bench_halfband(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/halfband");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin()).collect();
        let mut doubled = vec![0.0f32; size * 2];
        let mut output = vec![0.0f32; size];

        let mut up = Upsample2x::new();
        let mut down = Downsample2x::new();
        group.bench_with_input(BenchmarkId::new("round-trip", size), &size, |b, _| {
            b.iter(|| {
                up.process(black_box(&input), &mut doubled);
                down.process(&doubled, black_box(&mut output));
            })
        });
    }

    group.finish();
}
