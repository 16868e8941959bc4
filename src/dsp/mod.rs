//! Low-level DSP primitives used by the graph nodes.
//!
//! Everything here processes one sample at a time with fixed state, so it can
//! be embedded directly inside voices and nodes. Only the `resize`-style setup
//! calls allocate; `process_sample` and `render` never do.

/// Two-pole IIR filter with RBJ cookbook coefficient setters.
pub mod biquad;
/// Circular delay lines with integer, linear and allpass taps.
pub mod delay;
/// Feedback delay network for reverberation.
pub mod fdn;
/// Polyphase half-band filter and 2x resamplers.
pub mod halfband;
/// Integer phase-accumulator oscillators.
pub mod oscillator;

pub use biquad::Biquad;
pub use delay::{AllpassDelay, LinearDelay, SampleDelay};
pub use fdn::Fdn;
pub use halfband::{Downsample2x, HalfBandFilter, Upsample2x};
pub use oscillator::{SineOsc, TriOsc};
