use crate::{
    error::EngineError,
    params::ParamSnapshot,
    synth::signals::{VoiceSignal, VoiceSignals},
};

/// Frequency in Hz of a log pitch in octaves relative to A440.
#[inline]
pub fn pitch_to_freq(pitch: f32) -> f32 {
    440.0 * pitch.exp2()
}

/// Context passed to graph nodes during rendering
///
/// - sample_rate: rate the node is running at, already multiplied by the
///   oversampling factor
/// - oversample: samples rendered per control-signal sample (1 or 2)
/// - voice / signals: the voice being rendered and its control signals, or
///   `None` for global nodes such as the reverb
#[derive(Clone, Copy)]
pub struct RenderCtx<'a> {
    pub sample_rate: f32,
    pub oversample: usize,
    pub voice: usize,
    pub signals: Option<&'a VoiceSignals>,
}

impl<'a> RenderCtx<'a> {
    /// Context without voice signals.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            oversample: 1,
            voice: 0,
            signals: None,
        }
    }

    pub fn for_voice(sample_rate: f32, signals: &'a VoiceSignals, voice: usize) -> Self {
        Self {
            sample_rate,
            oversample: 1,
            voice,
            signals: Some(signals),
        }
    }

    /// The same context running `factor` times faster.
    pub fn oversampled(&self, factor: usize) -> Self {
        Self {
            sample_rate: self.sample_rate * factor as f32,
            oversample: self.oversample * factor,
            ..*self
        }
    }

    /// Control signal at output sample `i`, or `None` outside a voice.
    #[inline]
    pub fn signal(&self, kind: VoiceSignal, i: usize) -> Option<f32> {
        self.signals
            .map(|signals| signals.value(self.voice, kind, i / self.oversample))
    }
}

/// Core trait for audio processing graph nodes
///
/// Nodes render blocks in place. Voice nodes read gate, pitch and friends
/// from the control signals in [`RenderCtx`] rather than receiving note
/// events, so a node never needs to know how voices are allocated.
pub trait GraphNode: Send {
    /// Size internal buffers for `sample_rate` and blocks of up to
    /// `max_frames`. Called once while the engine is built; the only place a
    /// node may allocate.
    fn prepare(&mut self, _sample_rate: f32, _max_frames: usize) -> Result<(), EngineError> {
        Ok(())
    }

    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Pick up parameter values at a block boundary.
    fn apply_params(&mut self, _params: &ParamSnapshot) {}

    /// Clear filter and delay memory.
    fn reset(&mut self) {}
}

/// Allow boxed graph nodes to be used as graph nodes (for dynamic dispatch)
impl GraphNode for Box<dyn GraphNode> {
    fn prepare(&mut self, sample_rate: f32, max_frames: usize) -> Result<(), EngineError> {
        (**self).prepare(sample_rate, max_frames)
    }

    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(out, ctx)
    }

    fn apply_params(&mut self, params: &ParamSnapshot) {
        (**self).apply_params(params)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}
