//! Benchmarks for the biquad in its common configurations.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voicegraph::dsp::Biquad;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_biquad(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/biquad");

    for &size in BLOCK_SIZES {
        // sawtooth-like ramp
        let input: Vec<f32> = (0..size).map(|i| (i as f32 / size as f32) * 2.0 - 1.0).collect();
        let mut buffer = input.clone();

        let configs: [(&str, fn(&mut Biquad)); 4] = [
            ("lowpass", |f| f.set_lopass(1000.0, 0.707)),
            ("highpass", |f| f.set_hipass(1000.0, 0.707)),
            ("bandpass", |f| f.set_bandpass(1000.0, 2.0)),
            ("peak", |f| f.set_peak_notch(1000.0, 1.0, 6.0)),
        ];
        for (name, configure) in configs {
            let mut filter = Biquad::with_sample_rate(SAMPLE_RATE);
            configure(&mut filter);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    filter.render(black_box(&mut buffer));
                })
            });
        }

        // coefficient updates are per block in the filter node
        let mut filter = Biquad::with_sample_rate(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("retune+lowpass", size), &size, |b, _| {
            let mut cutoff = 200.0;
            b.iter(|| {
                cutoff = if cutoff > 8000.0 { 200.0 } else { cutoff * 1.01 };
                filter.set_lopass(black_box(cutoff), 0.707);
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
