//! Benchmarks for low-level DSP primitives.

mod biquad;
mod delay;
mod fdn;
mod halfband;
mod oscillator;

pub use biquad::bench_biquad;
pub use delay::bench_delay;
pub use fdn::bench_fdn;
pub use halfband::bench_halfband;
pub use oscillator::bench_oscillator;
