use crate::{
    error::{check_sample_rate, EngineError},
    graph::node::{GraphNode, RenderCtx},
    synth::signals::VoiceSignal,
};

/// Ramp time constant for amp changes.
const RAMP_SECONDS: f32 = 0.003;

/// Multiplies the block by the voice's amp signal through a one-pole
/// smoother. Note starts, releases and steals all become short ramps instead
/// of steps. Outside a voice the target is 1.
pub struct GateAmpNode {
    level: f32,
    coeff: f32,
}

impl Default for GateAmpNode {
    fn default() -> Self {
        Self::new()
    }
}

impl GateAmpNode {
    pub fn new() -> Self {
        let mut node = Self {
            level: 0.0,
            coeff: 0.0,
        };
        node.set_sample_rate(48_000.0);
        node
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.coeff = 1.0 - (-1.0 / (RAMP_SECONDS * sample_rate)).exp();
    }

    pub fn level(&self) -> f32 {
        self.level
    }
}

impl GraphNode for GateAmpNode {
    fn prepare(&mut self, sample_rate: f32, _max_frames: usize) -> Result<(), EngineError> {
        self.set_sample_rate(check_sample_rate(sample_rate)?);
        Ok(())
    }

    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for (i, sample) in out.iter_mut().enumerate() {
            let target = ctx.signal(VoiceSignal::Amp, i).unwrap_or(1.0);
            self.level += (target - self.level) * self.coeff;
            *sample *= self.level;
        }
    }

    fn reset(&mut self) {
        self.level = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::{input::InputToSignals, message::ControlEvent};

    #[test]
    fn ramps_instead_of_stepping() {
        let sample_rate = 48_000.0;
        let mut input = InputToSignals::new(sample_rate, 1, 1024, 4).unwrap();
        let mut node = GateAmpNode::new();
        node.prepare(sample_rate, 1024).unwrap();

        input.process(&[ControlEvent::note_on(60, 0.5, 0)], 1024);
        let mut buffer = vec![1.0; 1024];
        node.render_block(&mut buffer, &RenderCtx::for_voice(sample_rate, input.signals(), 0));

        assert!(buffer[0] < 0.01);
        assert!(buffer.windows(2).all(|w| w[1] >= w[0]));
        assert!((buffer[1023] - 0.5).abs() < 0.01);

        input.process(&[ControlEvent::note_off(60, 0)], 1024);
        let mut buffer = vec![1.0; 1024];
        node.render_block(&mut buffer, &RenderCtx::for_voice(sample_rate, input.signals(), 0));
        assert!(buffer[0] > 0.45);
        assert!(buffer[1023] < 0.01);
    }

    #[test]
    fn unity_outside_a_voice() {
        let mut node = GateAmpNode::new();
        let mut buffer = vec![1.0; 2048];
        node.render_block(&mut buffer, &RenderCtx::new(48_000.0));
        assert!((buffer[2047] - 1.0).abs() < 1e-3);
    }
}
