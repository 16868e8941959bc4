//! Scale and keyboard-mapping engine.

pub mod scale;

pub use scale::{
    Interval, Scale, ScaleDefinition, TuningTable, NUM_RATIOS, NUM_SCALE_NOTES, REFERENCE_NOTE,
};
