use crate::{
    dsp::oscillator::{SineOsc, TriOsc},
    error::{check_sample_rate, EngineError},
    graph::node::{pitch_to_freq, GraphNode, RenderCtx},
    synth::signals::VoiceSignal,
};

/*
Audio Oscillator
================

The sound source at the head of a voice chain. The node follows the voice's
pitch signal sample by sample, so glides, pitch bend and drift all arrive
without the oscillator knowing about notes:

  pitch signal (octaves re A440) ──→ 440 · 2^(pitch + detune) ──→ phase step

Sine: the cubic approximation from `dsp::oscillator`. A single partial,
  useful under a filter as a sub or on its own as a test tone.

Triangle: odd harmonics falling off as 1/n². Soft, and it gives the filter
  something to work on.

Outside a voice (no signals in the context) the node plays its fixed
frequency, 440 Hz unless set.

Example usage:
  let voice = OscNode::triangle()
      .with_detune(7.0)
      .through(FilterNode::lowpass())
      .through(GateAmpNode::new());
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
}

#[derive(Debug, Clone)]
enum Osc {
    Sine(SineOsc),
    Triangle(TriOsc),
}

pub struct OscNode {
    osc: Osc,
    /// Detune in cents (100 cents = 1 semitone).
    detune_cents: f32,
    /// Used when there is no pitch signal to follow.
    fixed_frequency: f32,
    /// Pitch the phase step was last computed for.
    last_pitch: f32,
}

impl OscNode {
    pub fn new(waveform: Waveform) -> Self {
        // Real rate arrives in `prepare`.
        let osc = match waveform {
            Waveform::Sine => Osc::Sine(SineOsc::new(48_000.0)),
            Waveform::Triangle => Osc::Triangle(TriOsc::new(48_000.0)),
        };
        Self {
            osc,
            detune_cents: 0.0,
            fixed_frequency: 440.0,
            last_pitch: f32::NAN,
        }
    }

    pub fn sine() -> Self {
        Self::new(Waveform::Sine)
    }

    pub fn triangle() -> Self {
        Self::new(Waveform::Triangle)
    }

    pub fn waveform(&self) -> Waveform {
        match self.osc {
            Osc::Sine(_) => Waveform::Sine,
            Osc::Triangle(_) => Waveform::Triangle,
        }
    }

    pub fn with_detune(mut self, cents: f32) -> Self {
        self.detune_cents = cents;
        self
    }

    pub fn with_frequency(mut self, freq: f32) -> Self {
        self.fixed_frequency = freq;
        self
    }

    #[inline]
    fn set_pitch(&mut self, pitch: f32) {
        if pitch == self.last_pitch {
            return;
        }
        self.last_pitch = pitch;
        let freq = pitch_to_freq(pitch + self.detune_cents / 1200.0);
        match &mut self.osc {
            Osc::Sine(osc) => osc.set_frequency(freq),
            Osc::Triangle(osc) => osc.set_frequency(freq),
        }
    }

    #[inline]
    fn next(&mut self) -> f32 {
        match &mut self.osc {
            Osc::Sine(osc) => osc.process_sample(),
            Osc::Triangle(osc) => osc.process_sample(),
        }
    }
}

impl GraphNode for OscNode {
    fn prepare(&mut self, sample_rate: f32, _max_frames: usize) -> Result<(), EngineError> {
        let sample_rate = check_sample_rate(sample_rate)?;
        match &mut self.osc {
            Osc::Sine(osc) => osc.set_sample_rate(sample_rate),
            Osc::Triangle(osc) => osc.set_sample_rate(sample_rate),
        }
        self.last_pitch = f32::NAN;
        Ok(())
    }

    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        if ctx.signals.is_none() {
            let pitch = (self.fixed_frequency / 440.0).log2();
            self.set_pitch(pitch);
            for sample in out.iter_mut() {
                *sample = self.next();
            }
            return;
        }

        for (i, sample) in out.iter_mut().enumerate() {
            let pitch = ctx.signal(VoiceSignal::Pitch, i).unwrap_or(0.0);
            self.set_pitch(pitch);
            *sample = self.next();
        }
    }

    fn reset(&mut self) {
        match &mut self.osc {
            Osc::Sine(osc) => osc.clear(),
            Osc::Triangle(osc) => osc.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::{input::InputToSignals, message::ControlEvent};

    /// Rising zero crossings per second.
    fn measured_freq(buffer: &[f32], sample_rate: f32) -> f32 {
        let crossings = buffer.windows(2).filter(|w| w[0] < 0.0 && w[1] >= 0.0).count();
        crossings as f32 * sample_rate / buffer.len() as f32
    }

    #[test]
    fn fixed_frequency_without_voice() {
        for mut node in [OscNode::sine(), OscNode::triangle()] {
            node.prepare(48_000.0, 4800).unwrap();
            let mut buffer = vec![0.0; 4800];
            node.render_block(&mut buffer, &RenderCtx::new(48_000.0));
            let freq = measured_freq(&buffer, 48_000.0);
            assert!((freq - 440.0).abs() <= 10.0, "{:?}: {freq}", node.waveform());
            assert!(buffer.iter().all(|x| x.abs() <= 1.001));
        }
    }

    #[test]
    fn follows_voice_pitch() {
        let sample_rate = 8000.0;
        let mut input = InputToSignals::new(sample_rate, 1, 800, 4).unwrap();
        input.process(&[ControlEvent::note_on(81, 1.0, 0)], 800);

        let mut node = OscNode::sine();
        node.prepare(sample_rate, 800).unwrap();
        let mut buffer = vec![0.0; 800];
        let ctx = RenderCtx::for_voice(sample_rate, input.signals(), 0);
        node.render_block(&mut buffer, &ctx);

        let freq = measured_freq(&buffer, sample_rate);
        assert!((freq - 880.0).abs() <= 20.0, "{freq}");
    }

    #[test]
    fn detune_raises_pitch() {
        let mut node = OscNode::triangle().with_detune(1200.0).with_frequency(220.0);
        node.prepare(48_000.0, 4800).unwrap();
        let mut buffer = vec![0.0; 4800];
        node.render_block(&mut buffer, &RenderCtx::new(48_000.0));
        assert!((measured_freq(&buffer, 48_000.0) - 440.0).abs() <= 10.0);
    }

    #[test]
    fn rejects_bad_sample_rate() {
        assert!(OscNode::sine().prepare(f32::NAN, 64).is_err());
    }
}
