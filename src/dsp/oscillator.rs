/*
Phase-Accumulator Oscillators
=============================

Both oscillators here keep their phase in a 32-bit unsigned integer and let it
overflow. One full cycle of the waveform is exactly 2^32 counts, so

    phase = phase.wrapping_add(step)

is the whole "modulo 1" operation: no branch, no drift, no loss of precision
over long runs. The increment is derived once per frequency change:

    step = f * 2^32 / sample_rate

Reading the phase as a *signed* 32-bit number splits the cycle into two halves,
[-2^31, 0) and [0, 2^31). The sign bit is what folds the ramp into a triangle.

Sine
----

The sine is a cubic polynomial evaluated over a triangle:

    x     = triangle in [-sqrt(2), sqrt(2)]
    sine ~ x * (1 - x^2 / 6) * scale

`x - x^3/6` is the first two Taylor terms of sin(x). Over +/- sqrt(2) it is
monotonic and peaks at sqrt(2) * 2/3, so `scale` normalizes the peak to 1.0.
The waveform starts at its positive peak (phase 0), so it is a cosine.

Triangle
--------

The signed phase is scaled to [-2, 2), folded to [0, 2] and centered to
[-1, 1]. Not band-limited.
*/

const INT_DOMAIN: f32 = 4_294_967_296.0; // 2^32

const ROOT_X: f32 = std::f32::consts::SQRT_2;
const ONE_SIXTH: f32 = 1.0 / 6.0;
const SINE_RANGE: f32 = ROOT_X - ROOT_X * ROOT_X * ROOT_X * ONE_SIXTH;
const SINE_DOMAIN: f32 = ROOT_X * 4.0;
const SINE_SCALE: f32 = 1.0 / SINE_RANGE;
const SINE_DOMAIN_SCALE: f32 = SINE_DOMAIN / INT_DOMAIN;
const FLIP_OFFSET: f32 = ROOT_X * 2.0;

const TRI_DOMAIN_SCALE: f32 = 4.0 / INT_DOMAIN;

/// 1.0 for the non-negative half of the cycle, 0.0 for the negative half.
#[inline]
fn upper_half(phase: u32) -> f32 {
    ((!phase) >> 31) as f32
}

/// Frequency in Hz to a 32-bit phase increment. Negative frequencies wrap to
/// the equivalent backwards step.
#[inline]
fn phase_step(inv_sr_domain: f32, frequency: f32) -> u32 {
    (inv_sr_domain * frequency) as i64 as u32
}

#[derive(Debug, Clone)]
pub struct SineOsc {
    phase: u32,
    step: u32,
    inv_sr_domain: f32,
}

impl SineOsc {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            phase: 0,
            step: 0,
            inv_sr_domain: INT_DOMAIN / sample_rate,
        }
    }

    pub fn clear(&mut self) {
        self.phase = 0;
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.inv_sr_domain = INT_DOMAIN / sample_rate;
    }

    #[inline]
    pub fn set_frequency(&mut self, frequency: f32) {
        self.step = phase_step(self.inv_sr_domain, frequency);
    }

    pub fn phase(&self) -> u32 {
        self.phase
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    /// Skip `samples` steps at once. Lands on the same phase as calling
    /// `process_sample` that many times.
    pub fn advance(&mut self, samples: u32) {
        self.phase = self.phase.wrapping_add(self.step.wrapping_mul(samples));
    }

    #[inline]
    pub fn process_sample(&mut self) -> f32 {
        self.phase = self.phase.wrapping_add(self.step);

        let omega = (self.phase as i32) as f32 * SINE_DOMAIN_SCALE + ROOT_X;

        // fold the upper half back down to make a triangle in [-root2, root2]
        let x = omega + upper_half(self.phase) * (FLIP_OFFSET - omega - omega);

        x * (1.0 - ONE_SIXTH * x * x) * SINE_SCALE
    }

    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.process_sample();
        }
    }
}

#[derive(Debug, Clone)]
pub struct TriOsc {
    phase: u32,
    step: u32,
    inv_sr_domain: f32,
}

impl TriOsc {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            phase: 0,
            step: 0,
            inv_sr_domain: INT_DOMAIN / sample_rate,
        }
    }

    pub fn clear(&mut self) {
        self.phase = 0;
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.inv_sr_domain = INT_DOMAIN / sample_rate;
    }

    #[inline]
    pub fn set_frequency(&mut self, frequency: f32) {
        self.step = phase_step(self.inv_sr_domain, frequency);
    }

    pub fn phase(&self) -> u32 {
        self.phase
    }

    pub fn advance(&mut self, samples: u32) {
        self.phase = self.phase.wrapping_add(self.step.wrapping_mul(samples));
    }

    #[inline]
    pub fn process_sample(&mut self) -> f32 {
        self.phase = self.phase.wrapping_add(self.step);

        // scale to [-2, 2)
        let omega = (self.phase as i32) as f32 * TRI_DOMAIN_SCALE;

        // reverse the lower half, then center
        let s = upper_half(self.phase);
        2.0 * s * omega - omega - 1.0
    }

    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.process_sample();
        }
    }
}
