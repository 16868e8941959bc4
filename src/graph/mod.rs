//! Per-voice processing graphs built from the DSP primitives.
//!
//! Graph nodes wrap the low-level blocks in `dsp` for use inside a voice:
//! they render in place, read the voice's control signals from the render
//! context, and pick up engine parameters at block boundaries. Chains are
//! composed with `through` or built from type tags by the registry.

/// Amp-signal VCA with a click-free ramp.
pub mod amp;
/// Feedback echo on a linear delay line.
pub mod delay;
/// Fluent combinators (`.through()`, `.oversampled()`, `.boxed()`).
pub mod extensions;
/// Biquad filter node with key tracking.
pub mod filter;
/// Core traits shared by all graph nodes.
pub mod node;
/// Sine and triangle oscillators following voice pitch.
pub mod oscillator;
/// 2x oversampling wrapper.
pub mod oversample;
/// Tag-keyed node factories.
pub mod registry;
/// Stereo FDN reverb for the voice mix.
pub mod reverb;
/// Serial chaining of two nodes (source → effect).
pub mod through;

pub use amp::GateAmpNode;
pub use delay::DelayNode;
pub use extensions::NodeExt;
pub use filter::{FilterMode, FilterNode};
pub use node::{GraphNode, RenderCtx};
pub use oscillator::{OscNode, Waveform};
pub use oversample::Oversampled;
pub use registry::{NodeCategory, NodeFactory, NodeInfo, NodeRegistry};
pub use reverb::ReverbNode;
pub use through::Through;
