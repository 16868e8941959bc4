// Purpose - external interfaces: raw MIDI in, audio buffers across the
// process call

pub mod converter;
pub mod midi;

/// Per-channel input samples for one block.
#[derive(Debug, Default, Clone)]
pub struct AudioInput {
    pub buffers: Vec<Vec<f32>>,
}

/// Per-channel output samples for one block.
#[derive(Debug, Default, Clone)]
pub struct AudioOutput {
    pub buffers: Vec<Vec<f32>>,
}

impl AudioInput {
    pub fn new(channels: usize, frames: usize) -> Self {
        Self {
            buffers: vec![vec![0.0; frames]; channels],
        }
    }

    /// Shortest channel length, 0 with no channels.
    pub fn frames(&self) -> usize {
        self.buffers.iter().map(Vec::len).min().unwrap_or(0)
    }
}

impl AudioOutput {
    pub fn new(channels: usize, frames: usize) -> Self {
        Self {
            buffers: vec![vec![0.0; frames]; channels],
        }
    }

    /// Shortest channel length, 0 with no channels.
    pub fn frames(&self) -> usize {
        self.buffers.iter().map(Vec::len).min().unwrap_or(0)
    }
}
