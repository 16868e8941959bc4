use crate::{
    dsp::fdn::Fdn,
    error::EngineError,
    graph::node::{GraphNode, RenderCtx},
    params::{EngineParam, ParamSnapshot},
};

/*
Reverb Node
===========

A stereo reverb on a feedback delay network (`dsp::fdn`). The network's
lines are split by parity to make the two channels:

  dry ──→ [FDN, 8 lines] ──┬─ odd lines  ──→ left wet
                           └─ even lines ──→ right wet

  left  = dry · (1 - mix) + left wet  · mix
  right = dry · (1 - mix) + right wet · mix

Line lengths fall geometrically from LONGEST_LINE_SECONDS (the network's
0.925 spacing), and the Householder matrix spreads every line into every
other, so the tail is dense within a few passes.

Parameters
----------

reverb_feedback  gain around the loop, 0 to 0.98. Higher = longer tail.
reverb_damping   one-pole lowpass cutoff in every line. Lower = darker.
reverb_mix       dry/wet blend.

The engine runs one instance on the summed voices; it is not a voice node,
and it keeps its tail across notes.
*/

const LINES: usize = 8;
const LONGEST_LINE_SECONDS: f32 = 0.08;

pub struct ReverbNode {
    fdn: Fdn,
    feedback: f32,
    damping: f32,
    mix: f32,
    /// Scales each half-sum back to roughly unity.
    wet_gain: f32,
}

impl Default for ReverbNode {
    fn default() -> Self {
        Self::new()
    }
}

impl ReverbNode {
    pub fn new() -> Self {
        let mut fdn = Fdn::new();
        fdn.resize(LINES);
        Self {
            fdn,
            feedback: EngineParam::ReverbFeedback.spec().default,
            damping: EngineParam::ReverbDamping.spec().default,
            mix: EngineParam::ReverbMix.spec().default,
            wet_gain: 2.0 / LINES as f32,
        }
    }

    pub fn with_settings(mut self, feedback: f32, damping: f32, mix: f32) -> Self {
        self.feedback = feedback;
        self.damping = damping;
        self.mix = mix.clamp(0.0, 1.0);
        self.fdn.set_feedback_amp(self.feedback);
        self.fdn.set_lopass(self.damping);
        self
    }

    pub fn mix(&self) -> f32 {
        self.mix
    }

    /// Process `input` into separate left and right outputs.
    pub fn render_stereo(&mut self, input: &[f32], left: &mut [f32], right: &mut [f32]) {
        let dry_gain = 1.0 - self.mix;
        let wet_gain = self.mix * self.wet_gain;
        for ((x, l), r) in input.iter().zip(left.iter_mut()).zip(right.iter_mut()) {
            self.fdn.process_sample(*x);
            *l = x * dry_gain + self.fdn.odd_outputs() * wet_gain;
            *r = x * dry_gain + self.fdn.even_outputs() * wet_gain;
        }
    }
}

impl GraphNode for ReverbNode {
    fn prepare(&mut self, sample_rate: f32, _max_frames: usize) -> Result<(), EngineError> {
        self.fdn.set_sample_rate(sample_rate)?;
        self.fdn.set_delay_lengths(LONGEST_LINE_SECONDS);
        self.fdn.set_feedback_amp(self.feedback);
        self.fdn.set_lopass(self.damping);
        Ok(())
    }

    /// Mono render: the average of both channels.
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        let dry_gain = 1.0 - self.mix;
        let wet_gain = self.mix * self.wet_gain * 0.5;
        for sample in out.iter_mut() {
            let wet = self.fdn.process_sample(*sample);
            *sample = *sample * dry_gain + wet * wet_gain;
        }
    }

    fn apply_params(&mut self, params: &ParamSnapshot) {
        let feedback = params.get(EngineParam::ReverbFeedback);
        if feedback != self.feedback {
            self.feedback = feedback;
            self.fdn.set_feedback_amp(feedback);
        }
        let damping = params.get(EngineParam::ReverbDamping);
        if damping != self.damping {
            self.damping = damping;
            self.fdn.set_lopass(damping);
        }
        self.mix = params.get(EngineParam::ReverbMix).clamp(0.0, 1.0);
    }

    fn reset(&mut self) {
        self.fdn.clear();
    }
}
