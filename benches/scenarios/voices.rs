//! Benchmarks for complete voice chains outside the engine.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use voicegraph::graph::{
    amp::GateAmpNode,
    extensions::NodeExt,
    filter::FilterNode,
    node::{GraphNode, RenderCtx},
    oscillator::OscNode,
    registry::NodeRegistry,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let ctx = RenderCtx::new(SAMPLE_RATE);
    let max = *BLOCK_SIZES.last().unwrap_or(&512);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === SIMPLE VOICE ===
        // triangle → lowpass → gate, the default engine chain
        let mut lead = OscNode::triangle()
            .through(FilterNode::lowpass().with_cutoff(2500.0, 0.707))
            .through(GateAmpNode::new());
        lead.prepare(SAMPLE_RATE, max).unwrap();
        group.bench_with_input(BenchmarkId::new("lead", size), &size, |b, _| {
            b.iter(|| lead.render_block(black_box(&mut buffer), black_box(&ctx)))
        });

        // === OVERSAMPLED SOURCE ===
        let mut oversampled = OscNode::sine()
            .oversampled()
            .through(FilterNode::lowpass().with_cutoff(8000.0, 0.707));
        oversampled.prepare(SAMPLE_RATE, max).unwrap();
        group.bench_with_input(BenchmarkId::new("oversampled", size), &size, |b, _| {
            b.iter(|| oversampled.render_block(black_box(&mut buffer), black_box(&ctx)))
        });

        // === REGISTRY CHAIN ===
        // same shape as "lead" but through boxed nodes
        let registry = NodeRegistry::with_builtin();
        let mut boxed = registry.build_chain(&["osc.tri", "filter.lowpass", "amp.gate"]).unwrap();
        boxed.prepare(SAMPLE_RATE, max).unwrap();
        group.bench_with_input(BenchmarkId::new("registry", size), &size, |b, _| {
            b.iter(|| boxed.render_block(black_box(&mut buffer), black_box(&ctx)))
        });
    }

    group.finish();
}
