pub mod dsp; // Per-sample filters, delays, oscillators
pub mod engine; // Audio-thread engine and control handle
pub mod error;
pub mod graph; // Composable audio graph nodes
pub mod io;
pub mod params; // Published parameters and their atomics
pub mod synth; // Voice management and polyphony
pub mod tuning;

pub use engine::{Engine, EngineBuilder, EngineConfig, EngineHandle};
pub use error::EngineError;
pub use synth::{ControlEvent, EventKind};

/// Largest block any engine can be configured for.
pub const MAX_BLOCK_SIZE: usize = 2048;
