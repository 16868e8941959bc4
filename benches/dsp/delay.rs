//! Benchmarks for the delay lines.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voicegraph::dsp::{AllpassDelay, LinearDelay, SampleDelay};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| if i % 64 == 0 { 1.0 } else { 0.0 }).collect();
        let mut buffer = input.clone();

        let mut plain = SampleDelay::new();
        plain.set_sample_rate(SAMPLE_RATE).unwrap();
        plain.resize(1.0).unwrap();
        plain.set_delay(0.25);
        group.bench_with_input(BenchmarkId::new("sample", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                plain.render(black_box(&mut buffer));
            })
        });

        // feedback echo with a modulated tap, as in a chorus
        let mut linear = LinearDelay::new();
        linear.set_sample_rate(SAMPLE_RATE).unwrap();
        linear.resize(1.0).unwrap();
        linear.set_fixed_delay(0.25);
        linear.set_mod_delay(0.0123);
        linear.set_mix_params(0.7, 0.7, -0.5);
        group.bench_with_input(BenchmarkId::new("linear", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                linear.render(black_box(&mut buffer));
            })
        });

        let mut allpass = AllpassDelay::new();
        allpass.set_sample_rate(SAMPLE_RATE).unwrap();
        allpass.resize(1.0).unwrap();
        allpass.set_fixed_delay(0.25);
        allpass.set_mod_delay(0.0123);
        allpass.set_mix_params(0.7, 0.7, -0.5);
        group.bench_with_input(BenchmarkId::new("allpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                allpass.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
