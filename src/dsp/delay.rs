use crate::error::{check_sample_rate, EngineError};

/*
Circular Delay Buffers
======================

All three delays share the same storage trick: the buffer length is a power
of two, so wrapping an index is a single AND with `len - 1` instead of a
modulo. The write index only ever increments (wrapping), and a tap `d` samples
back is read at

    (write - d) & mask

Masking keeps every read in bounds, but a delay longer than the buffer silently
aliases to a shorter one. Call `resize` with the longest delay you need during
setup; `resize` allocates and must never run on the audio thread.

Taps
----

  SampleDelay    one integer tap, no mixing
  LinearDelay    fixed integer feedback tap + linear-interpolated modulated tap
  AllpassDelay   fixed integer feedback tap + allpass-interpolated modulated tap

The mixing delays compute, per sample:

    sum  = x - feedback * fixed_tap_out      (written into the buffer)
    out  = sum * blend + mod_tap * feed_forward

Setting (blend, feed_forward, feedback) = (0, 1, 0) gives a plain modulated
delay; (1, 0, g) gives a feedback comb on the fixed tap.
*/

#[derive(Debug, Clone)]
struct DelayBuffer {
    buffer: Vec<f32>,
    write_index: usize,
    length_mask: usize,
    sample_rate: f32,
}

impl DelayBuffer {
    fn new() -> Self {
        Self {
            buffer: vec![0.0; 1],
            write_index: 0,
            length_mask: 0,
            sample_rate: 0.0,
        }
    }

    fn set_sample_rate(&mut self, sample_rate: f32) -> Result<(), EngineError> {
        self.sample_rate = check_sample_rate(sample_rate)?;
        Ok(())
    }

    fn resize(&mut self, duration: f32) -> Result<(), EngineError> {
        check_sample_rate(self.sample_rate)?;
        if !(duration.is_finite() && duration > 0.0) {
            return Err(EngineError::InvalidDuration(duration));
        }
        let samples = (duration * self.sample_rate).ceil() as usize;
        let length = samples.max(1).next_power_of_two();
        self.buffer = vec![0.0; length];
        self.length_mask = length - 1;
        self.write_index = 0;
        Ok(())
    }

    fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_index = 0;
    }

    #[inline]
    fn write(&mut self, x: f32) {
        self.write_index &= self.length_mask;
        self.buffer[self.write_index] = x;
    }

    /// Read `delay` samples behind the most recent write.
    #[inline]
    fn read(&self, delay: usize) -> f32 {
        self.buffer[self.write_index.wrapping_sub(delay) & self.length_mask]
    }

    #[inline]
    fn advance(&mut self) {
        self.write_index = self.write_index.wrapping_add(1);
    }

    fn seconds_to_samples(&self, seconds: f32) -> f32 {
        seconds * self.sample_rate
    }

    fn len(&self) -> usize {
        self.buffer.len()
    }
}

/// A delay in whole samples with no mixing.
#[derive(Debug, Clone)]
pub struct SampleDelay {
    line: DelayBuffer,
    delay_in_samples: usize,
}

impl Default for SampleDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleDelay {
    pub fn new() -> Self {
        Self {
            line: DelayBuffer::new(),
            delay_in_samples: 0,
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) -> Result<(), EngineError> {
        self.line.set_sample_rate(sample_rate)
    }

    /// Allocate room for at least `duration` seconds. Setup only.
    pub fn resize(&mut self, duration: f32) -> Result<(), EngineError> {
        self.line.resize(duration)
    }

    pub fn clear(&mut self) {
        self.line.clear();
    }

    pub fn set_delay(&mut self, seconds: f32) {
        self.delay_in_samples = self.line.seconds_to_samples(seconds).max(0.0) as usize;
    }

    pub fn set_delay_samples(&mut self, samples: usize) {
        self.delay_in_samples = samples;
    }

    pub fn capacity(&self) -> usize {
        self.line.len()
    }

    #[inline]
    pub fn process_sample(&mut self, x: f32) -> f32 {
        self.line.write(x);
        let out = self.line.read(self.delay_in_samples);
        self.line.advance();
        out
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct MixParams {
    blend: f32,
    feed_forward: f32,
    feedback: f32,
}

impl Default for MixParams {
    fn default() -> Self {
        Self {
            blend: 0.0,
            feed_forward: 1.0,
            feedback: 0.0,
        }
    }
}

/// Fixed feedback tap plus a linearly interpolated modulation tap.
#[derive(Debug, Clone)]
pub struct LinearDelay {
    line: DelayBuffer,
    mix: MixParams,
    fixed_delay_in_samples: usize,
    mod_delay_in_samples: f32,
    fixed_tap_out: f32,
}

impl Default for LinearDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearDelay {
    pub fn new() -> Self {
        Self {
            line: DelayBuffer::new(),
            mix: MixParams::default(),
            fixed_delay_in_samples: 0,
            mod_delay_in_samples: 0.0,
            fixed_tap_out: 0.0,
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) -> Result<(), EngineError> {
        self.line.set_sample_rate(sample_rate)
    }

    /// Allocate room for at least `duration` seconds. Setup only.
    pub fn resize(&mut self, duration: f32) -> Result<(), EngineError> {
        self.line.resize(duration)
    }

    pub fn clear(&mut self) {
        self.line.clear();
        self.fixed_tap_out = 0.0;
    }

    pub fn capacity(&self) -> usize {
        self.line.len()
    }

    pub fn set_mix_params(&mut self, blend: f32, feed_forward: f32, feedback: f32) {
        self.mix = MixParams {
            blend,
            feed_forward,
            feedback,
        };
    }

    pub fn set_fixed_delay(&mut self, seconds: f32) {
        self.fixed_delay_in_samples = self.line.seconds_to_samples(seconds).max(0.0) as usize;
    }

    pub fn set_fixed_delay_samples(&mut self, samples: usize) {
        self.fixed_delay_in_samples = samples;
    }

    pub fn set_mod_delay(&mut self, seconds: f32) {
        self.mod_delay_in_samples = self.line.seconds_to_samples(seconds).max(0.0);
    }

    pub fn set_mod_delay_samples(&mut self, samples: f32) {
        self.mod_delay_in_samples = samples.max(0.0);
    }

    #[inline]
    pub fn process_sample(&mut self, x: f32) -> f32 {
        let sum = x - self.mix.feedback * self.fixed_tap_out;
        self.line.write(sum);

        let delay_floor = self.mod_delay_in_samples.floor();
        let delay_int = delay_floor as usize;
        let frac = self.mod_delay_in_samples - delay_floor;

        let a = self.line.read(delay_int);
        let b = self.line.read(delay_int + 1);
        let mod_tap_out = a + (b - a) * frac;

        self.fixed_tap_out = self.line.read(self.fixed_delay_in_samples);
        self.line.advance();

        sum * self.mix.blend + mod_tap_out * self.mix.feed_forward
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }
}

/// Fixed feedback tap plus an allpass-interpolated modulation tap.
///
/// Allpass interpolation keeps the magnitude response flat, so it suits
/// delays inside feedback loops where linear interpolation would darken the
/// sound on every pass.
#[derive(Debug, Clone)]
pub struct AllpassDelay {
    line: DelayBuffer,
    mix: MixParams,
    fixed_delay_in_samples: usize,
    mod_delay_in_samples: f32,
    fixed_tap_out: f32,
    x1: f32,
    y1: f32,
}

impl Default for AllpassDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl AllpassDelay {
    pub fn new() -> Self {
        Self {
            line: DelayBuffer::new(),
            mix: MixParams::default(),
            fixed_delay_in_samples: 0,
            mod_delay_in_samples: 0.0,
            fixed_tap_out: 0.0,
            x1: 0.0,
            y1: 0.0,
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) -> Result<(), EngineError> {
        self.line.set_sample_rate(sample_rate)
    }

    /// Allocate room for at least `duration` seconds. Setup only.
    pub fn resize(&mut self, duration: f32) -> Result<(), EngineError> {
        self.line.resize(duration)
    }

    pub fn clear(&mut self) {
        self.line.clear();
        self.x1 = 0.0;
        self.y1 = 0.0;
        self.fixed_tap_out = 0.0;
    }

    pub fn capacity(&self) -> usize {
        self.line.len()
    }

    pub fn set_mix_params(&mut self, blend: f32, feed_forward: f32, feedback: f32) {
        self.mix = MixParams {
            blend,
            feed_forward,
            feedback,
        };
    }

    pub fn set_fixed_delay(&mut self, seconds: f32) {
        self.fixed_delay_in_samples = self.line.seconds_to_samples(seconds).max(0.0) as usize;
    }

    pub fn set_fixed_delay_samples(&mut self, samples: usize) {
        self.fixed_delay_in_samples = samples;
    }

    pub fn set_mod_delay(&mut self, seconds: f32) {
        self.mod_delay_in_samples = self.line.seconds_to_samples(seconds).max(0.0);
    }

    pub fn set_mod_delay_samples(&mut self, samples: f32) {
        self.mod_delay_in_samples = samples.max(0.0);
    }

    #[inline]
    pub fn process_sample(&mut self, x: f32) -> f32 {
        let sum = x - self.mix.feedback * self.fixed_tap_out;
        self.line.write(sum);

        let delay_floor = self.mod_delay_in_samples.floor();
        let mut delay_int = delay_floor as usize;
        let mut frac = self.mod_delay_in_samples - delay_floor;

        // keep the fractional part in [0.5, 1.5) so alpha stays well inside (-1, 1)
        if frac < 0.5 && delay_int > 0 {
            frac += 1.0;
            delay_int -= 1;
        }
        let alpha = (1.0 - frac) / (1.0 + frac);

        let allpass_in = self.line.read(delay_int);
        let allpass_out = alpha * allpass_in + self.x1 - alpha * self.y1;
        self.x1 = allpass_in;
        self.y1 = allpass_out;

        self.fixed_tap_out = self.line.read(self.fixed_delay_in_samples);
        self.line.advance();

        sum * self.mix.blend + allpass_out * self.mix.feed_forward
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }
}
