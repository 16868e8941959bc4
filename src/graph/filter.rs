use crate::{
    dsp::biquad::Biquad,
    error::{check_sample_rate, EngineError},
    graph::node::{GraphNode, RenderCtx},
    params::{EngineParam, ParamSnapshot},
    synth::signals::VoiceSignal,
};

/*
Biquad Filter Node
==================

Wraps `dsp::Biquad` as a voice effect. Cutoff and resonance come from the
engine parameters; key tracking moves the cutoff with the note:

  cutoff_eff = cutoff · 2^(key_track · pitch)

  key_track = 0   cutoff fixed in Hz
  key_track = 1   cutoff follows the keyboard octave for octave

Coefficients are recomputed at most once per block, from the pitch at the
first sample, and only when the effective cutoff or Q actually moved. The
cutoff is held below 0.45 of the sample rate; the RBJ formulas are not
defined at or above Nyquist.

Modes:
  Lowpass   passes below the cutoff, 12 dB/octave above
  Highpass  passes above the cutoff
  Bandpass  constant 0 dB peak gain around the cutoff
  Notch     removes a band around the cutoff

Example usage:
  let dark = OscNode::triangle().through(FilterNode::lowpass());
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Lowpass,
    Highpass,
    Bandpass,
    Notch,
}

pub struct FilterNode {
    filter: Biquad,
    mode: FilterMode,
    sample_rate: f32,
    cutoff: f32,
    resonance: f32,
    key_track: f32,
    /// Effective (cutoff, q) the coefficients were last computed for.
    current: (f32, f32),
}

impl FilterNode {
    pub fn new(mode: FilterMode) -> Self {
        Self {
            filter: Biquad::new(),
            mode,
            sample_rate: 48_000.0,
            cutoff: EngineParam::Cutoff.spec().default,
            resonance: EngineParam::Resonance.spec().default,
            key_track: 0.0,
            current: (f32::NAN, f32::NAN),
        }
    }

    pub fn lowpass() -> Self {
        Self::new(FilterMode::Lowpass)
    }

    pub fn highpass() -> Self {
        Self::new(FilterMode::Highpass)
    }

    pub fn bandpass() -> Self {
        Self::new(FilterMode::Bandpass)
    }

    pub fn notch() -> Self {
        Self::new(FilterMode::Notch)
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Fixed cutoff and Q, for use outside the engine's parameter flow.
    pub fn with_cutoff(mut self, cutoff: f32, resonance: f32) -> Self {
        self.cutoff = cutoff;
        self.resonance = resonance;
        self
    }

    fn update(&mut self, pitch: f32) {
        let nyquist_guard = 0.45 * self.sample_rate;
        let cutoff = (self.cutoff * (self.key_track * pitch).exp2()).clamp(10.0, nyquist_guard);
        let q = self.resonance;
        if (cutoff, q) == self.current {
            return;
        }
        self.current = (cutoff, q);
        match self.mode {
            FilterMode::Lowpass => self.filter.set_lopass(cutoff, q),
            FilterMode::Highpass => self.filter.set_hipass(cutoff, q),
            FilterMode::Bandpass => self.filter.set_bandpass(cutoff, q),
            FilterMode::Notch => self.filter.set_notch(cutoff, q),
        }
    }
}

impl GraphNode for FilterNode {
    fn prepare(&mut self, sample_rate: f32, _max_frames: usize) -> Result<(), EngineError> {
        self.sample_rate = check_sample_rate(sample_rate)?;
        self.filter.set_sample_rate(self.sample_rate);
        self.current = (f32::NAN, f32::NAN);
        Ok(())
    }

    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let pitch = ctx.signal(VoiceSignal::Pitch, 0).unwrap_or(0.0);
        self.update(pitch);
        self.filter.render(out);
    }

    fn apply_params(&mut self, params: &ParamSnapshot) {
        self.cutoff = params.get(EngineParam::Cutoff);
        self.resonance = params.get(EngineParam::Resonance);
        self.key_track = params.get(EngineParam::KeyTrack);
    }

    fn reset(&mut self) {
        self.filter.clear();
    }
}
