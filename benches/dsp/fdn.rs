//! Benchmarks for the feedback delay network at 4, 8 and 16 lines.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voicegraph::dsp::Fdn;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_fdn(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/fdn");

    for lines in [4, 8, 16] {
        let mut fdn = Fdn::new();
        fdn.resize(lines);
        fdn.set_sample_rate(SAMPLE_RATE).unwrap();
        fdn.set_delay_lengths(0.08);
        fdn.set_feedback_amp(0.8);
        fdn.set_lopass(6000.0);

        for &size in BLOCK_SIZES {
            let input: Vec<f32> = (0..size).map(|i| ((i * 7919) % 101) as f32 / 50.0 - 1.0).collect();
            group.bench_with_input(BenchmarkId::new(format!("{lines}-lines"), size), &size, |b, _| {
                b.iter(|| {
                    let mut acc = 0.0;
                    for &x in &input {
                        acc += fdn.process_sample(black_box(x));
                    }
                    acc
                })
            });
        }
    }

    group.finish();
}
