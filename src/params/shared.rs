use std::sync::atomic::{AtomicU32, Ordering};

use super::engine_params::EngineParam;

/// An `f32` stored in an `AtomicU32`, for wait-free parameter updates.
#[derive(Debug)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub const fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn set(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

impl Default for AtomicF32 {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// One atomic cell per [`EngineParam`], shared between the control thread
/// (writer) and the audio thread (reader).
///
/// Values are validated before they get here; the audio side reads them once
/// per block through [`SharedParams::snapshot`].
#[derive(Debug)]
pub struct SharedParams {
    values: [AtomicF32; EngineParam::COUNT],
}

impl Default for SharedParams {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedParams {
    /// Every cell starts at its published default.
    pub fn new() -> Self {
        Self {
            values: std::array::from_fn(|i| AtomicF32::new(EngineParam::ALL[i].spec().default)),
        }
    }

    #[inline]
    pub fn get(&self, param: EngineParam) -> f32 {
        self.values[param.index()].get()
    }

    #[inline]
    pub fn set(&self, param: EngineParam, value: f32) {
        self.values[param.index()].set(value);
    }

    /// Copy every cell. No allocation.
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            values: std::array::from_fn(|i| self.values[i].get()),
        }
    }
}

/// Block-rate copy of the engine parameters handed to voices and nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSnapshot {
    values: [f32; EngineParam::COUNT],
}

impl Default for ParamSnapshot {
    fn default() -> Self {
        Self {
            values: std::array::from_fn(|i| EngineParam::ALL[i].spec().default),
        }
    }
}

impl ParamSnapshot {
    #[inline]
    pub fn get(&self, param: EngineParam) -> f32 {
        self.values[param.index()]
    }

    #[inline]
    pub fn flag(&self, param: EngineParam) -> bool {
        self.get(param) >= 0.5
    }

    pub fn set(&mut self, param: EngineParam, value: f32) {
        self.values[param.index()] = value;
    }
}
