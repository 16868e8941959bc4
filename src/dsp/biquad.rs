use std::f32::consts::TAU;

/*
Biquad Filter
=============

A second-order IIR section. Every response type below is just a different set
of five coefficients run through the same difference equation:

    y[n] = a0*x[n] + a1*x[n-1] + a2*x[n-2] - b1*y[n-1] - b2*y[n-2]

Note the naming: `a` are feedforward (numerator) and `b` feedback (denominator)
terms, already normalized so the leading denominator term is 1.

| setter              | response                        | source                  |
| ------------------- | ------------------------------- | ----------------------- |
| set_lopass          | 12 dB/oct low-pass              | RBJ cookbook LPF        |
| set_hipass          | 12 dB/oct high-pass             | RBJ cookbook HPF        |
| set_bandpass        | constant 0 dB peak band-pass    | RBJ cookbook BPF        |
| set_notch           | band-stop                       | RBJ cookbook notch      |
| set_peak_notch      | peaking EQ                      | RBJ cookbook peakingEQ  |
| set_lo_shelf        | low shelf                       | RBJ cookbook lowShelf   |
| set_hi_shelf        | high shelf                      | RBJ cookbook highShelf  |
| set_one_pole        | 6 dB/oct low-pass               | impulse-invariant pole  |
| set_allpass_alpha   | first-order allpass             | a0 = a, b1 = a          |
| set_allpass1        | fractional delay allpass        | a = (1 - d) / (1 + d)   |
| set_allpass2        | second-order allpass at f, r    | pole pair at r e^±jw    |
| set_differentiate   | first difference                | y = x[n] - x[n-1]       |

Gains for the peaking and shelving modes are linear amplitude. The cookbook's
`A` is the square root of that gain.

Frequencies at or above Nyquist are not clamped. The response there is
undefined and keeping it in range is the caller's job.
*/

#[derive(Debug, Clone)]
pub struct Biquad {
    pub a0: f32,
    pub a1: f32,
    pub a2: f32,
    pub b1: f32,
    pub b2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
    inv_sr: f32,
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

impl Biquad {
    pub fn new() -> Self {
        Self {
            a0: 0.0,
            a1: 0.0,
            a2: 0.0,
            b1: 0.0,
            b2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
            inv_sr: 1.0,
        }
    }

    pub fn with_sample_rate(sample_rate: f32) -> Self {
        let mut filter = Self::new();
        filter.set_sample_rate(sample_rate);
        filter
    }

    /// Clear the input/output history. Coefficients are kept.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.inv_sr = 1.0 / sample_rate;
    }

    #[inline]
    fn omega(&self, f: f32) -> f32 {
        TAU * f * self.inv_sr
    }

    pub fn set_lopass(&mut self, f: f32, q: f32) {
        let omega = self.omega(f);
        let cos_omega = omega.cos();
        let alpha = omega.sin() / (2.0 * q);
        let b0 = 1.0 / (1.0 + alpha);

        self.a0 = (1.0 - cos_omega) * 0.5 * b0;
        self.a1 = (1.0 - cos_omega) * b0;
        self.a2 = self.a0;
        self.b1 = -2.0 * cos_omega * b0;
        self.b2 = (1.0 - alpha) * b0;
    }

    pub fn set_hipass(&mut self, f: f32, q: f32) {
        let omega = self.omega(f);
        let cos_omega = omega.cos();
        let alpha = omega.sin() / (2.0 * q);
        let b0 = 1.0 / (1.0 + alpha);

        self.a0 = (1.0 + cos_omega) * 0.5 * b0;
        self.a1 = -(1.0 + cos_omega) * b0;
        self.a2 = self.a0;
        self.b1 = -2.0 * cos_omega * b0;
        self.b2 = (1.0 - alpha) * b0;
    }

    pub fn set_bandpass(&mut self, f: f32, q: f32) {
        let omega = self.omega(f);
        let cos_omega = omega.cos();
        let alpha = omega.sin() / (2.0 * q);
        let b0 = 1.0 / (1.0 + alpha);

        self.a0 = alpha * b0;
        self.a1 = 0.0;
        self.a2 = -alpha * b0;
        self.b1 = -2.0 * cos_omega * b0;
        self.b2 = (1.0 - alpha) * b0;
    }

    pub fn set_notch(&mut self, f: f32, q: f32) {
        let omega = self.omega(f);
        let cos_omega = omega.cos();
        let alpha = omega.sin() / (2.0 * q);
        let b0 = 1.0 / (1.0 + alpha);

        self.a0 = b0;
        self.a1 = -2.0 * cos_omega * b0;
        self.a2 = b0;
        self.b1 = -2.0 * cos_omega * b0;
        self.b2 = (1.0 - alpha) * b0;
    }

    pub fn set_peak_notch(&mut self, f: f32, q: f32, gain: f32) {
        let omega = self.omega(f);
        let cos_omega = omega.cos();
        let alpha = omega.sin() / (2.0 * q);
        let a = gain.sqrt();
        let b0 = 1.0 / (1.0 + alpha / a);

        self.a0 = (1.0 + alpha * a) * b0;
        self.a1 = -2.0 * cos_omega * b0;
        self.a2 = (1.0 - alpha * a) * b0;
        self.b1 = -2.0 * cos_omega * b0;
        self.b2 = (1.0 - alpha / a) * b0;
    }

    pub fn set_lo_shelf(&mut self, f: f32, q: f32, gain: f32) {
        let omega = self.omega(f);
        let cos_omega = omega.cos();
        let a = gain.sqrt();
        let beta = 2.0 * a.sqrt() * omega.sin() / (2.0 * q);
        let b0 = 1.0 / ((a + 1.0) + (a - 1.0) * cos_omega + beta);

        self.a0 = a * ((a + 1.0) - (a - 1.0) * cos_omega + beta) * b0;
        self.a1 = 2.0 * a * ((a - 1.0) - (a + 1.0) * cos_omega) * b0;
        self.a2 = a * ((a + 1.0) - (a - 1.0) * cos_omega - beta) * b0;
        self.b1 = -2.0 * ((a - 1.0) + (a + 1.0) * cos_omega) * b0;
        self.b2 = ((a + 1.0) + (a - 1.0) * cos_omega - beta) * b0;
    }

    pub fn set_hi_shelf(&mut self, f: f32, q: f32, gain: f32) {
        let omega = self.omega(f);
        let cos_omega = omega.cos();
        let a = gain.sqrt();
        let beta = 2.0 * a.sqrt() * omega.sin() / (2.0 * q);
        let b0 = 1.0 / ((a + 1.0) - (a - 1.0) * cos_omega + beta);

        self.a0 = a * ((a + 1.0) + (a - 1.0) * cos_omega + beta) * b0;
        self.a1 = -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_omega) * b0;
        self.a2 = a * ((a + 1.0) + (a - 1.0) * cos_omega - beta) * b0;
        self.b1 = 2.0 * ((a - 1.0) - (a + 1.0) * cos_omega) * b0;
        self.b2 = ((a + 1.0) - (a - 1.0) * cos_omega - beta) * b0;
    }

    /// One-pole low-pass: `y = (1 - x) * in + x * y[n-1]` with `x = e^(-2 pi f / sr)`.
    pub fn set_one_pole(&mut self, f: f32) {
        let x = (-self.omega(f)).exp();
        self.a0 = 1.0 - x;
        self.a1 = 0.0;
        self.a2 = 0.0;
        self.b1 = -x;
        self.b2 = 0.0;
    }

    pub fn set_allpass_alpha(&mut self, a: f32) {
        self.a0 = a;
        self.a1 = 1.0;
        self.a2 = 0.0;
        self.b1 = a;
        self.b2 = 0.0;
    }

    /// First-order allpass approximating a delay of `d` samples (best near d = 1).
    pub fn set_allpass1(&mut self, d: f32) {
        self.set_allpass_alpha((1.0 - d) / (1.0 + d));
    }

    /// Second-order allpass with a pole pair at radius `r` and frequency `f`.
    pub fn set_allpass2(&mut self, f: f32, r: f32) {
        let c = -2.0 * r * self.omega(f).cos();
        self.a0 = r * r;
        self.a1 = c;
        self.a2 = 1.0;
        self.b1 = c;
        self.b2 = r * r;
    }

    pub fn set_differentiate(&mut self) {
        self.a0 = 1.0;
        self.a1 = -1.0;
        self.a2 = 0.0;
        self.b1 = 0.0;
        self.b2 = 0.0;
    }

    pub fn set_coefficients(&mut self, a0: f32, a1: f32, a2: f32, b1: f32, b2: f32) {
        self.a0 = a0;
        self.a1 = a1;
        self.a2 = a2;
        self.b1 = b1;
        self.b2 = b2;
    }

    #[inline]
    pub fn process_sample(&mut self, x: f32) -> f32 {
        let out = self.a0 * x + self.a1 * self.x1 + self.a2 * self.x2
            - self.b1 * self.y1
            - self.b2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = out;
        out
    }

    /// Filter a block in place.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }
}
