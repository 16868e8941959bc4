//! Feedback Delay Network - dense reverberation from N coupled delay lines.
//!
//! ```text
//!            ┌──────────────────────────────────────────────┐
//!            │            ┌──────────┐   ┌────────┐         │
//! x ──┬─→ (+)┴→ [delay 0] ┼→ [damp 0] → (× g) ─┐  │         │
//!     ├─→ (+)──→ [delay 1] ┼→ [damp 1] → (× g) ─┤  │ N×N     │
//!     ├─→  ⋮        ⋮      │      ⋮         ⋮   ├─→│ matrix ─┘
//!     └─→ (+)──→ [delay N] ┼→ [damp N] → (× g) ─┘  │
//!                         └──→ Σ ──→ output
//! ```
//!
//! Every line's input is the dry signal plus a matrix-weighted sum of all
//! lines' previous damped outputs, so each echo spreads to every other line
//! and the echo density grows quickly.
//!
//! # Stability
//!
//! The loop gain is `‖matrix‖ × feedback_amp × |damping filter|`. With an
//! orthogonal matrix (spectral norm 1), a one-pole low-pass (gain ≤ 1) and
//! `feedback_amp < 1` the network always decays. The default matrix is the
//! Householder reflection `I - (2/N)·11ᵀ`, which is orthogonal for any N and
//! mixes every line into every other.
//!
//! # Delay lengths
//!
//! `set_delay_lengths(max)` gives line k a length of `max · freq_mul^k`. The
//! default multiplier of 0.925 keeps lengths close but incommensurate so the
//! echoes don't pile up on common multiples.

use super::{biquad::Biquad, delay::LinearDelay};
use crate::error::{check_sample_rate, EngineError};

/// Longest line length the network can be asked for, in seconds.
pub const MAX_FDN_DELAY_SECONDS: f32 = 1.0;

const DEFAULT_FREQ_MUL: f32 = 0.925;

#[derive(Debug, Clone)]
pub struct Fdn {
    size: usize,
    delays: Vec<LinearDelay>,
    filters: Vec<Biquad>,
    matrix: Vec<f32>,
    line_inputs: Vec<f32>,
    line_outputs: Vec<f32>,
    feedback_outputs: Vec<f32>,
    delay_time: f32,
    lopass_hz: f32,
    feedback_amp: f32,
    freq_mul: f32,
    sample_rate: f32,
}

impl Default for Fdn {
    fn default() -> Self {
        Self::new()
    }
}

impl Fdn {
    pub fn new() -> Self {
        Self {
            size: 0,
            delays: Vec::new(),
            filters: Vec::new(),
            matrix: Vec::new(),
            line_inputs: Vec::new(),
            line_outputs: Vec::new(),
            feedback_outputs: Vec::new(),
            delay_time: 0.0,
            lopass_hz: 0.0,
            feedback_amp: 0.0,
            freq_mul: DEFAULT_FREQ_MUL,
            sample_rate: 0.0,
        }
    }

    /// Set the number of delay lines. Allocates; setup only.
    ///
    /// Resets the matrix to the Householder default. Call `set_sample_rate`
    /// afterwards to size the new lines.
    pub fn resize(&mut self, n: usize) {
        self.size = n;
        self.delays = (0..n).map(|_| LinearDelay::new()).collect();
        self.filters = (0..n).map(|_| Biquad::new()).collect();
        self.line_inputs = vec![0.0; n];
        self.line_outputs = vec![0.0; n];
        self.feedback_outputs = vec![0.0; n];
        self.matrix = vec![0.0; n * n];
        self.set_householder_matrix();
    }

    /// Size every line for `MAX_FDN_DELAY_SECONDS` at this rate. Allocates; setup only.
    pub fn set_sample_rate(&mut self, sample_rate: f32) -> Result<(), EngineError> {
        self.sample_rate = check_sample_rate(sample_rate)?;
        for delay in &mut self.delays {
            delay.set_sample_rate(sample_rate)?;
            delay.resize(MAX_FDN_DELAY_SECONDS)?;
            delay.set_mix_params(0.0, 1.0, 0.0);
        }
        for filter in &mut self.filters {
            filter.set_sample_rate(sample_rate);
        }
        if self.delay_time > 0.0 {
            self.set_delay_lengths(self.delay_time);
        }
        if self.lopass_hz > 0.0 {
            self.set_lopass(self.lopass_hz);
        }
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn clear(&mut self) {
        for delay in &mut self.delays {
            delay.clear();
        }
        for filter in &mut self.filters {
            filter.clear();
        }
        self.line_inputs.fill(0.0);
        self.line_outputs.fill(0.0);
        self.feedback_outputs.fill(0.0);
    }

    pub fn set_identity_matrix(&mut self) {
        let n = self.size;
        self.matrix.fill(0.0);
        for i in 0..n {
            self.matrix[i * n + i] = 1.0;
        }
    }

    pub fn set_householder_matrix(&mut self) {
        let n = self.size;
        if n == 0 {
            return;
        }
        let off = -2.0 / n as f32;
        for i in 0..n {
            for j in 0..n {
                self.matrix[i * n + j] = if i == j { 1.0 + off } else { off };
            }
        }
    }

    /// Replace the mixing matrix (row-major, `size × size`).
    pub fn set_matrix(&mut self, matrix: &[f32]) -> Result<(), EngineError> {
        let expected = self.size * self.size;
        if matrix.len() != expected {
            return Err(EngineError::MatrixSize {
                expected,
                actual: matrix.len(),
            });
        }
        self.matrix.copy_from_slice(matrix);
        Ok(())
    }

    pub fn matrix(&self) -> &[f32] {
        &self.matrix
    }

    pub fn set_freq_mul(&mut self, m: f32) {
        self.freq_mul = m;
    }

    /// Line k gets `max_length · freq_mul^k` seconds, clamped to the buffer.
    pub fn set_delay_lengths(&mut self, max_length: f32) {
        self.delay_time = max_length;
        let mut t = max_length.clamp(0.0, MAX_FDN_DELAY_SECONDS);
        for delay in &mut self.delays {
            delay.set_mod_delay(t);
            t *= self.freq_mul;
        }
    }

    pub fn set_feedback_amp(&mut self, amp: f32) {
        self.feedback_amp = amp;
    }

    /// Damping cutoff for every line.
    pub fn set_lopass(&mut self, f: f32) {
        self.lopass_hz = f;
        for filter in &mut self.filters {
            filter.set_one_pole(f);
        }
    }

    #[inline]
    pub fn process_sample(&mut self, x: f32) -> f32 {
        let n = self.size;

        // every input comes from last sample's outputs, so mix before writing
        for (j, input) in self.line_inputs.iter_mut().enumerate() {
            let row = &self.matrix[j * n..(j + 1) * n];
            let feedback: f32 = row
                .iter()
                .zip(&self.feedback_outputs)
                .map(|(m, y)| m * y)
                .sum();
            *input = x + feedback;
        }

        let mut sum = 0.0;
        for j in 0..n {
            let out = self.delays[j].process_sample(self.line_inputs[j]);
            self.line_outputs[j] = out;
            self.feedback_outputs[j] = self.filters[j].process_sample(out) * self.feedback_amp;
            sum += out;
        }
        sum
    }

    /// Sum of the odd-numbered lines' latest outputs.
    pub fn odd_outputs(&self) -> f32 {
        self.line_outputs.iter().skip(1).step_by(2).sum()
    }

    /// Sum of the even-numbered lines' latest outputs.
    pub fn even_outputs(&self) -> f32 {
        self.line_outputs.iter().step_by(2).sum()
    }
}
