//! Benchmarks for voice allocation and signal writing.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voicegraph::synth::{ControlEvent, InputToSignals};

use crate::SAMPLE_RATE;

const BLOCK: usize = 256;

pub fn bench_allocator(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/allocator");

    for voices in [8, 16, 64] {
        let mut input = InputToSignals::new(SAMPLE_RATE, voices, BLOCK, 64).unwrap();

        // held chord, no events: the per-block signal cost
        let chord: Vec<_> = (0..voices.min(8) as u8)
            .map(|i| ControlEvent::note_on(48 + i * 3, 0.8, 0))
            .collect();
        input.process(&chord, BLOCK);
        let quiet: &[ControlEvent] = &[];
        group.bench_with_input(BenchmarkId::new("held", voices), &voices, |b, _| {
            b.iter(|| input.process(black_box(quiet), BLOCK))
        });

        // a burst that overflows the voices every block
        let burst: Vec<_> = (0..32u8)
            .flat_map(|i| {
                [
                    ControlEvent::note_on(36 + i, 0.8, i as usize * 4),
                    ControlEvent::note_off(36 + (i + 16) % 32, i as usize * 4 + 2),
                ]
            })
            .collect();
        input.reset();
        group.bench_with_input(BenchmarkId::new("burst", voices), &voices, |b, _| {
            b.iter(|| input.process(black_box(&burst), BLOCK))
        });
    }

    group.finish();
}
