/*
Half-Band Filter and 2x Resamplers
==================================

A polyphase IIR half-band low-pass built from two parallel chains of
second-order allpass sections:

    x ──┬──→ [A0] → [A1] ─────────────→ (+) → × 0.5 → y
        └──→ [B0] → [B1] → [z^-1] ───────↑

Each section is H(z) = (a + z^-2) / (1 + a z^-2), so both chains have unit
magnitude everywhere and only their phases differ. Below fs/4 the chains are
in phase and add; above fs/4 they are in opposition and cancel. The four
coefficients give a stopband better than 60 dB above 0.3 fs with a
passband flat to within 1e-6.

Resampling
----------

  Upsample2x      zero-stuff each input sample, then filter. The stuffed
                  stream carries half the energy, so the input is doubled to
                  keep unity gain at DC.
  Downsample2x    filter both samples of every pair, keep the second one.

Group delay is around three samples at the higher rate.
*/

const A0: f32 = 0.079_866_43;
const A1: f32 = 0.545_353_65;
const B0: f32 = 0.283_829_35;
const B1: f32 = 0.834_411_9;

/// Second-order allpass with taps two samples apart.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllpassSection {
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
    a: f32,
}

impl AllpassSection {
    pub fn new(a: f32) -> Self {
        Self {
            a,
            ..Self::default()
        }
    }

    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    #[inline]
    pub fn process_sample(&mut self, x: f32) -> f32 {
        let y = self.x2 + (x - self.y2) * self.a;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HalfBandFilter {
    a0: AllpassSection,
    a1: AllpassSection,
    b0: AllpassSection,
    b1: AllpassSection,
    prev_b: f32,
}

impl Default for HalfBandFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl HalfBandFilter {
    pub fn new() -> Self {
        Self {
            a0: AllpassSection::new(A0),
            a1: AllpassSection::new(A1),
            b0: AllpassSection::new(B0),
            b1: AllpassSection::new(B1),
            prev_b: 0.0,
        }
    }

    pub fn clear(&mut self) {
        self.a0.clear();
        self.a1.clear();
        self.b0.clear();
        self.b1.clear();
        self.prev_b = 0.0;
    }

    #[inline]
    pub fn process_sample(&mut self, x: f32) -> f32 {
        let a = self.a1.process_sample(self.a0.process_sample(x));
        let b = self.b1.process_sample(self.b0.process_sample(x));
        let y = (a + self.prev_b) * 0.5;
        self.prev_b = b;
        y
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Upsample2x {
    filter: HalfBandFilter,
}

impl Upsample2x {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.filter.clear();
    }

    /// Fill `dest` (twice as long as `src`) with the interpolated signal.
    pub fn process(&mut self, src: &[f32], dest: &mut [f32]) {
        debug_assert_eq!(dest.len(), src.len() * 2);
        for (x, pair) in src.iter().zip(dest.chunks_exact_mut(2)) {
            pair[0] = self.filter.process_sample(*x * 2.0);
            pair[1] = self.filter.process_sample(0.0);
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Downsample2x {
    filter: HalfBandFilter,
}

impl Downsample2x {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.filter.clear();
    }

    /// Fill `dest` (half as long as `src`) with the decimated signal.
    pub fn process(&mut self, src: &[f32], dest: &mut [f32]) {
        debug_assert_eq!(src.len(), dest.len() * 2);
        for (pair, y) in src.chunks_exact(2).zip(dest.iter_mut()) {
            self.filter.process_sample(pair[0]);
            *y = self.filter.process_sample(pair[1]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    /// Peak amplitude of the filtered sinusoid after the transient has passed.
    fn steady_state_peak(freq_ratio: f32) -> f32 {
        let mut filter = HalfBandFilter::new();
        let mut peak = 0.0f32;
        for n in 0..4096 {
            let x = (TAU * freq_ratio * n as f32).sin();
            let y = filter.process_sample(x);
            if n >= 2048 {
                peak = peak.max(y.abs());
            }
        }
        peak
    }

    #[test]
    fn allpass_section_passes_dc() {
        let mut section = AllpassSection::new(0.3);
        let mut y = 0.0;
        for _ in 0..200 {
            y = section.process_sample(1.0);
        }
        assert!((y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn dc_passes_at_unity() {
        let mut filter = HalfBandFilter::new();
        let mut y = 0.0;
        for _ in 0..500 {
            y = filter.process_sample(1.0);
        }
        assert!((y - 1.0).abs() < 1e-4, "dc gain {y}");
    }

    #[test]
    fn nyquist_is_cancelled() {
        let mut filter = HalfBandFilter::new();
        let mut last = 1.0f32;
        for n in 0..500 {
            let x = if n % 2 == 0 { 1.0 } else { -1.0 };
            last = filter.process_sample(x);
        }
        assert!(last.abs() < 1e-3, "nyquist leaked {last}");
    }

    #[test]
    fn passband_is_flat_and_stopband_is_deep() {
        let pass = steady_state_peak(0.05);
        assert!((pass - 1.0).abs() < 0.01, "passband peak {pass}");

        let stop = steady_state_peak(0.4);
        assert!(stop < 0.01, "stopband peak {stop}");
    }

    #[test]
    fn upsampled_dc_keeps_unity_gain() {
        let mut up = Upsample2x::new();
        let src = [1.0f32; 256];
        let mut dest = [0.0f32; 512];
        up.process(&src, &mut dest);
        for &y in &dest[400..] {
            assert!((y - 1.0).abs() < 1e-3, "upsampled dc {y}");
        }
    }

    #[test]
    fn downsampled_dc_keeps_unity_gain() {
        let mut down = Downsample2x::new();
        let src = [0.5f32; 512];
        let mut dest = [0.0f32; 256];
        down.process(&src, &mut dest);
        assert!((dest[255] - 0.5).abs() < 1e-4);
    }

    #[test]
    fn clear_resets_history() {
        let mut filter = HalfBandFilter::new();
        let fresh: Vec<f32> = {
            let mut f = HalfBandFilter::new();
            (0..32).map(|n| f.process_sample(n as f32)).collect()
        };
        for _ in 0..100 {
            filter.process_sample(0.7);
        }
        filter.clear();
        let replay: Vec<f32> = (0..32).map(|n| filter.process_sample(n as f32)).collect();
        assert_eq!(fresh, replay);
    }
}
