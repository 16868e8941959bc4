//! Real-world scenario benchmarks.
//!
//! These benchmarks model actual usage patterns: single voice graphs, the
//! allocator under note pressure, and whole engine blocks.

mod allocator;
mod engine;
mod voices;

pub use allocator::bench_allocator;
pub use engine::bench_engine;
pub use voices::bench_voices;
