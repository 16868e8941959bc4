//! Frequency-domain checks of the DSP primitives, measured with an FFT.

use rustfft::{num_complex::Complex, FftPlanner};
use voicegraph::dsp::{Biquad, SineOsc, TriOsc};

const SR: f32 = 48_000.0;
// 10 Hz bins at 48 kHz
const N: usize = 4800;

fn spectrum(samples: &[f32]) -> Vec<f32> {
    let mut buffer: Vec<Complex<f32>> = samples.iter().map(|&x| Complex::new(x, 0.0)).collect();
    FftPlanner::<f32>::new().plan_fft_forward(buffer.len()).process(&mut buffer);
    buffer.iter().map(|c| c.norm()).collect()
}

fn bin(hz: f32) -> usize {
    (hz * N as f32 / SR).round() as usize
}

fn impulse_response(filter: &mut Biquad) -> Vec<f32> {
    let mut samples = vec![0.0; N];
    samples[0] = 1.0;
    filter.render(&mut samples);
    samples
}

fn response(configure: impl FnOnce(&mut Biquad)) -> Vec<f32> {
    let mut filter = Biquad::with_sample_rate(SR);
    configure(&mut filter);
    spectrum(&impulse_response(&mut filter))
}

fn assert_close(actual: f32, expected: f32, tolerance: f32, what: &str) {
    assert!(
        (actual - expected).abs() < tolerance,
        "{what}: got {actual}, expected {expected}"
    );
}

#[test]
fn lowpass_passes_dc_and_sits_at_q_on_cutoff() {
    let h = response(|f| f.set_lopass(1000.0, 0.707));
    assert_close(h[0], 1.0, 1e-3, "dc");
    assert_close(h[bin(1000.0)], 0.707, 5e-3, "cutoff");
    assert!(h[bin(10_000.0)] < 0.02, "stopband {}", h[bin(10_000.0)]);
}

#[test]
fn highpass_mirrors_lowpass() {
    let h = response(|f| f.set_hipass(1000.0, 0.707));
    assert!(h[0] < 1e-3);
    assert_close(h[bin(1000.0)], 0.707, 5e-3, "cutoff");
    assert_close(h[bin(20_000.0)], 1.0, 5e-3, "passband");
}

#[test]
fn resonance_raises_the_cutoff_gain() {
    let h = response(|f| f.set_lopass(2000.0, 4.0));
    assert_close(h[bin(2000.0)], 4.0, 0.05, "resonant peak");
}

#[test]
fn bandpass_peaks_at_unity() {
    let h = response(|f| f.set_bandpass(3000.0, 2.0));
    assert_close(h[bin(3000.0)], 1.0, 5e-3, "centre");
    assert!(h[bin(300.0)] < 0.1);
    assert!(h[bin(20_000.0)] < 0.2);
}

#[test]
fn notch_removes_its_frequency() {
    let h = response(|f| f.set_notch(5000.0, 1.0));
    assert!(h[bin(5000.0)] < 1e-2, "notch depth {}", h[bin(5000.0)]);
    assert_close(h[0], 1.0, 1e-3, "dc");
}

#[test]
fn peaking_eq_applies_its_gain_at_centre() {
    let h = response(|f| f.set_peak_notch(1000.0, 1.0, 2.0));
    assert_close(h[bin(1000.0)], 2.0, 0.01, "boost");
    assert_close(h[0], 1.0, 1e-3, "dc");
}

#[test]
fn second_order_allpass_is_flat() {
    let h = response(|f| f.set_allpass2(2000.0, 0.9));
    for hz in [0.0, 500.0, 2000.0, 8000.0, 20_000.0] {
        assert_close(h[bin(hz)], 1.0, 1e-3, "allpass magnitude");
    }
}

#[test]
fn differentiator_rises_with_frequency() {
    let h = response(|f| f.set_differentiate());
    assert!(h[0] < 1e-6);
    // |1 - e^-jw| at a quarter of the sample rate
    assert_close(h[bin(12_000.0)], std::f32::consts::SQRT_2, 1e-3, "quarter rate");
}

#[test]
fn sine_is_nearly_pure() {
    let mut osc = SineOsc::new(SR);
    osc.set_frequency(1000.0);
    let mut samples = vec![0.0; N];
    osc.render(&mut samples);

    let h = spectrum(&samples);
    let peak = (1..N / 2).max_by(|&a, &b| h[a].total_cmp(&h[b])).unwrap();
    assert_eq!(peak, bin(1000.0));
    assert!(h[bin(3000.0)] / h[peak] < 0.02);
}

#[test]
fn triangle_has_odd_inverse_square_harmonics() {
    let mut osc = TriOsc::new(SR);
    osc.set_frequency(1000.0);
    let mut samples = vec![0.0; N];
    osc.render(&mut samples);

    let h = spectrum(&samples);
    let fundamental = h[bin(1000.0)];
    assert_close(h[bin(3000.0)] / fundamental, 1.0 / 9.0, 0.01, "3rd");
    assert_close(h[bin(5000.0)] / fundamental, 1.0 / 25.0, 0.01, "5th");
    assert!(h[bin(2000.0)] / fundamental < 0.01);
}
