#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{error::EngineError, MAX_BLOCK_SIZE};

/// Upper bound on allocated voices.
pub const MAX_VOICES: usize = 64;

/// Everything fixed at build time. Changing any of it means rebuilding the
/// engine through [`Engine::into_builder`](super::Engine::into_builder).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct EngineConfig {
    pub sample_rate: f32,
    /// Largest block `process_block` will be handed.
    pub max_block_size: usize,
    /// Voices allocated; the `voices` parameter picks how many are used.
    pub max_voices: usize,
    /// Control events accepted per block. Extra events wait for the next one.
    pub event_capacity: usize,
    pub command_capacity: usize,
    /// Registry tags of the per-voice chain, source first.
    pub voice_chain: Vec<String>,
    /// Run the FDN reverb on the voice mix.
    pub reverb: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            max_block_size: 512,
            max_voices: 16,
            event_capacity: 256,
            command_capacity: 32,
            voice_chain: vec!["osc.tri".into(), "filter.lowpass".into(), "amp.gate".into()],
            reverb: true,
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(text: &str) -> Result<Self, EngineError> {
        let config: Self = toml::from_str(text).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "serde")]
    pub fn to_toml_string(&self) -> Result<String, EngineError> {
        toml::to_string(self).map_err(|e| EngineError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        crate::error::check_sample_rate(self.sample_rate)?;
        if self.max_block_size == 0 || self.max_block_size > MAX_BLOCK_SIZE {
            return Err(EngineError::InvalidBlockSize {
                requested: self.max_block_size,
                max: MAX_BLOCK_SIZE,
            });
        }
        if self.max_voices == 0 || self.max_voices > MAX_VOICES {
            return Err(EngineError::InvalidVoiceCount {
                requested: self.max_voices,
                max: MAX_VOICES,
            });
        }
        if self.event_capacity == 0 || self.command_capacity == 0 {
            return Err(EngineError::Config("queue capacities must be non-zero".into()));
        }
        if self.voice_chain.is_empty() {
            return Err(EngineError::Config("voice chain is empty".into()));
        }
        Ok(())
    }
}
