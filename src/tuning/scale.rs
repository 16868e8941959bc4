//! Microtonal scales and keyboard mapping.
//!
//! A [`Scale`] holds an ordered list of interval ratios starting at unison
//! and ending at the period (usually the octave). `recalc_ratios` tiles that
//! list across a table of [`NUM_RATIOS`] scale steps, anchored so that step
//! 69 is the reference ratio 1.0. The keyboard mapping then picks one scale
//! step for each of the [`NUM_SCALE_NOTES`] keys.
//!
//! The audio thread never touches a `Scale`. It gets a [`TuningTable`], a
//! flat `Copy` snapshot of the per-key pitches that can travel through a ring
//! buffer without allocating.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Scale steps in the ratio table.
pub const NUM_RATIOS: usize = 256;
/// Keys in the keyboard mapping.
pub const NUM_SCALE_NOTES: usize = 128;
/// Scale step (and default tonic key) that plays the reference ratio 1.0.
pub const REFERENCE_NOTE: i32 = 69;

/// One scale degree, in cents or as a rational ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Interval {
    Cents(f64),
    Ratio(u32, u32),
}

/// Scale data as it comes from outside: a Scala-style interval list (unison
/// implied, last entry is the period) plus the tonic key.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScaleDefinition {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub intervals: Vec<Interval>,
    #[cfg_attr(feature = "serde", serde(default = "default_tonic"))]
    pub tonic: u8,
}

#[cfg(feature = "serde")]
fn default_tonic() -> u8 {
    REFERENCE_NOTE as u8
}

impl ScaleDefinition {
    /// `divisions` equal steps per octave.
    pub fn equal(divisions: u32) -> Self {
        let step = 1200.0 / divisions as f64;
        Self {
            name: format!("{divisions}-equal"),
            description: format!("{divisions} equal divisions of the octave."),
            intervals: (1..=divisions)
                .map(|i| Interval::Cents(step * i as f64))
                .collect(),
            tonic: REFERENCE_NOTE as u8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scale {
    name: String,
    description: String,
    ratio_list: Vec<f64>,
    tonic: i32,
    ratios: [f32; NUM_RATIOS],
    pitches: [f32; NUM_RATIOS],
    notes: [u16; NUM_SCALE_NOTES],
}

impl Default for Scale {
    fn default() -> Self {
        Self::new()
    }
}

impl Scale {
    /// The 12-tone equal-tempered scale with the tonic on key 69.
    pub fn new() -> Self {
        let mut scale = Self {
            name: String::new(),
            description: String::new(),
            ratio_list: Vec::with_capacity(13),
            tonic: REFERENCE_NOTE,
            ratios: [1.0; NUM_RATIOS],
            pitches: [0.0; NUM_RATIOS],
            notes: [REFERENCE_NOTE as u16; NUM_SCALE_NOTES],
        };
        scale.set_name("12-equal");
        scale.set_description("The chromatic equal-tempered scale.");
        scale.clear();
        for i in 1..=12 {
            scale.ratio_list.push(cents_to_ratio(100.0 * i as f64));
        }
        scale.fill_ratio_tables();
        scale.set_default_mapping();
        scale
    }

    /// Build a scale from external data, replacing everything.
    pub fn load(definition: &ScaleDefinition) -> Result<Self, EngineError> {
        let mut scale = Self::new();
        scale.clear();
        scale.set_name(&definition.name);
        scale.set_description(&definition.description);
        for interval in &definition.intervals {
            match *interval {
                Interval::Cents(c) => scale.add_ratio_cents(c)?,
                Interval::Ratio(n, d) => scale.add_ratio(n, d)?,
            }
        }
        scale.recalc_ratios()?;
        scale.set_tonic(definition.tonic as i32);
        tracing::info!(
            name = %scale.name,
            notes = scale.notes_in_octave(),
            tonic = scale.tonic,
            "loaded scale"
        );
        Ok(scale)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_owned();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_owned();
    }

    /// Drop all degrees, leaving only the unison.
    pub fn clear(&mut self) {
        self.ratio_list.clear();
        self.ratio_list.push(1.0);
    }

    pub fn add_ratio_cents(&mut self, cents: f64) -> Result<(), EngineError> {
        if !cents.is_finite() {
            return Err(EngineError::InvalidRatio(format!("{cents} cents")));
        }
        self.ratio_list.push(cents_to_ratio(cents));
        Ok(())
    }

    pub fn add_ratio(&mut self, numerator: u32, denominator: u32) -> Result<(), EngineError> {
        if numerator == 0 || denominator == 0 {
            return Err(EngineError::InvalidRatio(format!(
                "{numerator}/{denominator}"
            )));
        }
        self.ratio_list
            .push(numerator as f64 / denominator as f64);
        Ok(())
    }

    /// Degrees per period, not counting the unison.
    pub fn notes_in_octave(&self) -> usize {
        self.ratio_list.len().saturating_sub(1)
    }

    /// Rebuild the ratio and pitch tables from the interval list.
    pub fn recalc_ratios(&mut self) -> Result<(), EngineError> {
        if self.ratio_list.len() < 2 {
            return Err(EngineError::ScaleTooSmall(self.ratio_list.len()));
        }
        self.fill_ratio_tables();
        tracing::debug!(name = %self.name, notes = self.notes_in_octave(), "recalculated ratios");
        Ok(())
    }

    fn fill_ratio_tables(&mut self) {
        let notes_in_octave = self.notes_in_octave() as i32;
        let octave_ratio = self.ratio_list[notes_in_octave as usize];

        for i in 0..NUM_RATIOS {
            let relative = i as i32 - REFERENCE_NOTE;
            let octave = relative.div_euclid(notes_in_octave);
            let degree = relative.rem_euclid(notes_in_octave) as usize;
            let ratio = octave_ratio.powi(octave) * self.ratio_list[degree];
            self.ratios[i] = ratio as f32;
            self.pitches[i] = ratio.log2() as f32;
        }
    }

    pub fn tonic(&self) -> i32 {
        self.tonic
    }

    /// Move the tonic key and rebuild the default mapping around it.
    pub fn set_tonic(&mut self, note: i32) {
        self.tonic = note.clamp(0, NUM_SCALE_NOTES as i32 - 1);
        self.set_default_mapping();
    }

    /// Map keys to scale steps so keyboard octaves land on scale periods.
    ///
    /// A keyboard cycle is the smallest multiple of 12 keys that holds every
    /// degree. Smaller scales repeat degrees across neighbouring keys, larger
    /// ones take more than one keyboard octave per period.
    ///
    /// The tonic key plays degree 0: the reference step 69 moved by whole
    /// periods, as many as the tonic sits keyboard cycles from key 69
    /// (rounded to nearest).
    pub fn set_default_mapping(&mut self) {
        let scale_size = self.notes_in_octave() as i32;
        if scale_size < 1 {
            self.notes.fill(REFERENCE_NOTE as u16);
            return;
        }
        let key_cycle = ((scale_size + 11) / 12) * 12;
        let periods = (self.tonic - REFERENCE_NOTE + key_cycle / 2).div_euclid(key_cycle);
        let tonic_step = REFERENCE_NOTE + periods * scale_size;

        for (key, note) in self.notes.iter_mut().enumerate() {
            let relative = key as i32 - self.tonic;
            let octave = relative.div_euclid(key_cycle);
            let key_in_cycle = relative.rem_euclid(key_cycle);
            let degree = key_in_cycle * scale_size / key_cycle;
            let step = tonic_step + octave * scale_size + degree;
            *note = step.clamp(0, NUM_RATIOS as i32 - 1) as u16;
        }
    }

    /// Frequency ratio (relative to the reference) for a possibly fractional key.
    pub fn note_to_pitch(&self, note: f32) -> f32 {
        self.note_to_log_pitch(note).exp2()
    }

    /// Octaves above the reference for a possibly fractional key.
    ///
    /// Fractional keys interpolate in log space, so a glide between two keys
    /// moves evenly in pitch.
    pub fn note_to_log_pitch(&self, note: f32) -> f32 {
        interpolate_keys(note, |key| self.pitches[self.notes[key] as usize])
    }

    /// Snap a log pitch down to the nearest scale step at or below it.
    pub fn quantize_pitch(&self, log_pitch: f32) -> f32 {
        quantize(&self.pitches, log_pitch)
    }

    /// Ratio of one scale step.
    pub fn step_ratio(&self, step: usize) -> f32 {
        self.ratios[step.min(NUM_RATIOS - 1)]
    }

    /// Snapshot for the audio thread.
    pub fn table(&self) -> TuningTable {
        let mut key_pitches = [0.0; NUM_SCALE_NOTES];
        for (pitch, &step) in key_pitches.iter_mut().zip(&self.notes) {
            *pitch = self.pitches[step as usize];
        }
        TuningTable {
            key_pitches,
            pitches: self.pitches,
        }
    }
}

/// Flat per-key pitch table. `Copy`, no heap, safe to send to the audio thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TuningTable {
    key_pitches: [f32; NUM_SCALE_NOTES],
    pitches: [f32; NUM_RATIOS],
}

impl Default for TuningTable {
    fn default() -> Self {
        Scale::new().table()
    }
}

impl TuningTable {
    pub fn note_to_log_pitch(&self, note: f32) -> f32 {
        interpolate_keys(note, |key| self.key_pitches[key])
    }

    pub fn note_to_pitch(&self, note: f32) -> f32 {
        self.note_to_log_pitch(note).exp2()
    }

    pub fn quantize_pitch(&self, log_pitch: f32) -> f32 {
        quantize(&self.pitches, log_pitch)
    }
}

fn cents_to_ratio(cents: f64) -> f64 {
    (cents / 1200.0).exp2()
}

#[inline]
fn interpolate_keys(note: f32, pitch_of: impl Fn(usize) -> f32) -> f32 {
    let last = (NUM_SCALE_NOTES - 1) as f32;
    let n = if note.is_nan() { 0.0 } else { note.clamp(0.0, last) };
    let i = n as usize;
    let j = (i + 1).min(NUM_SCALE_NOTES - 1);
    let frac = n - i as f32;
    let a = pitch_of(i);
    let b = pitch_of(j);
    a + (b - a) * frac
}

/// Downward linear search; below the table returns the lowest step.
#[inline]
fn quantize(pitches: &[f32; NUM_RATIOS], log_pitch: f32) -> f32 {
    pitches[1..]
        .iter()
        .rev()
        .find(|&&p| p <= log_pitch)
        .copied()
        .unwrap_or(pitches[0])
}
