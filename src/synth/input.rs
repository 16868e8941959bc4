/*
Input to Signals
================

`InputToSignals` is the voice allocator. Each block it takes the block's
control events, already sorted by time, and turns them into per-voice control
signals that the voice graphs read:

    events ──→ handle() ──→ per-voice change lists ──→ write_signals() ──→ VoiceSignals
                 │
                 ├─ note-on     find a voice: free → oldest sustained → oldest active
                 ├─ note-off    release, or mark sustaining while the pedal is down
                 ├─ sustain     pedal up releases every sustaining voice
                 ├─ controller  CC n, n+1, n+2 → mod A, B, C
                 └─ bend, pressure

Voice lifecycle:

    Free ──note-on──→ Active ──note-off (pedal down)──→ Sustaining
     ▲                  │                                   │
     └────note-off──────┴──────────pedal up─────────────────┘

A held note that loses its voice to a newer one is remembered in the pending
list. When a voice frees up, the most recently stolen note that is still held
gets it back. If the pending list is full the oldest stolen note is forgotten
and counted as dropped.

In unison mode every voice plays the newest held key, spread in pitch. Key
releases fall back to the previous held key, legato unless retrigger is on.

Nothing here allocates after construction.
*/

use crate::{
    error::EngineError,
    params::{EngineParam, ParamSnapshot},
    synth::{
        change_list::ChangeList,
        message::{ControlEvent, EventKind},
        signals::{VoiceSignal, VoiceSignals},
        voice::{Voice, VoiceState},
    },
    tuning::TuningTable,
};

/// Held keys remembered for unison fallback.
pub const MAX_HELD_NOTES: usize = 128;
/// Stolen notes waiting for a voice.
pub const MAX_PENDING_NOTES: usize = 32;

pub struct InputToSignals {
    voices: Vec<Voice>,
    signals: VoiceSignals,
    current_voices: usize,
    max_frames: usize,
    sample_rate: f32,

    held: Vec<ControlEvent>,
    pending: Vec<ControlEvent>,

    bend: ChangeList,
    channel_pressure: ChangeList,
    bend_buffer: Vec<f32>,
    pressure_buffer: Vec<f32>,
    drift_buffer: Vec<f32>,

    tuning: TuningTable,
    sustain: bool,
    unison: bool,
    rotate: bool,
    retrig: bool,
    rotate_offset: usize,
    glide: f32,
    bend_range: f32,
    controller_number: i32,
    drift: f32,
    unison_spread: f32,

    dropped_notes: usize,
    steal_count: usize,
}

impl InputToSignals {
    /// Allocate `max_voices` voices with signal buffers for `max_frames`
    /// samples. `event_capacity` bounds the events one block may carry.
    pub fn new(
        sample_rate: f32,
        max_voices: usize,
        max_frames: usize,
        event_capacity: usize,
    ) -> Result<Self, EngineError> {
        let sample_rate = crate::error::check_sample_rate(sample_rate)?;
        if max_voices == 0 {
            return Err(EngineError::InvalidVoiceCount {
                requested: 0,
                max: max_voices,
            });
        }
        if max_frames == 0 {
            return Err(EngineError::InvalidBlockSize {
                requested: 0,
                max: max_frames,
            });
        }

        // Each event touches a list at most three times (a retrigger dip plus
        // its own change), with a little room for pedal and parameter changes.
        let change_capacity = 3 * event_capacity + 4;
        let voices = (0..max_voices)
            .map(|v| Voice::new(change_capacity, 0x5eed_0000 + v as u64))
            .collect();

        tracing::debug!(max_voices, max_frames, event_capacity, "allocating voices");

        Ok(Self {
            voices,
            signals: VoiceSignals::new(max_voices, max_frames),
            current_voices: max_voices,
            max_frames,
            sample_rate,
            held: Vec::with_capacity(MAX_HELD_NOTES),
            pending: Vec::with_capacity(MAX_PENDING_NOTES),
            bend: ChangeList::new(change_capacity),
            channel_pressure: ChangeList::new(change_capacity),
            bend_buffer: vec![0.0; max_frames],
            pressure_buffer: vec![0.0; max_frames],
            drift_buffer: vec![0.0; max_frames],
            tuning: TuningTable::default(),
            sustain: false,
            unison: false,
            rotate: false,
            retrig: false,
            rotate_offset: 0,
            glide: 0.0,
            bend_range: 2.0,
            controller_number: 1,
            drift: 0.0,
            unison_spread: 0.0,
            dropped_notes: 0,
            steal_count: 0,
        })
    }

    pub fn signals(&self) -> &VoiceSignals {
        &self.signals
    }

    pub fn voice(&self, v: usize) -> &Voice {
        &self.voices[v]
    }

    pub fn max_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn current_voices(&self) -> usize {
        self.current_voices
    }

    /// Notes lost because no voice or pending slot could hold them.
    pub fn dropped_notes(&self) -> usize {
        self.dropped_notes
    }

    /// Voices taken from a sounding note.
    pub fn steal_count(&self) -> usize {
        self.steal_count
    }

    pub fn sustain_down(&self) -> bool {
        self.sustain
    }

    pub fn set_tuning(&mut self, tuning: TuningTable) {
        self.tuning = tuning;
    }

    /// Active voices, clamped to `1..=max_voices`. Voices above the new
    /// count are released.
    pub fn set_voice_count(&mut self, count: usize) {
        let count = count.clamp(1, self.voices.len());
        if count < self.current_voices {
            for voice in &mut self.voices[count..self.current_voices] {
                if !voice.is_free() {
                    voice.release(0);
                }
            }
        }
        self.current_voices = count;
        self.rotate_offset %= count;
    }

    /// Switching unison on or off ends every note.
    pub fn set_unison(&mut self, unison: bool) {
        if unison != self.unison {
            self.all_notes_off(0);
            self.unison = unison;
        }
    }

    pub fn set_rotate(&mut self, rotate: bool) {
        self.rotate = rotate;
        if !rotate {
            self.rotate_offset = 0;
        }
    }

    pub fn set_retrig(&mut self, retrig: bool) {
        self.retrig = retrig;
    }

    /// Pitch glide time in seconds.
    pub fn set_glide(&mut self, seconds: f32) {
        self.glide = seconds.max(0.0);
        for voice in &mut self.voices {
            voice.pitch_list.set_glide_time(self.glide, self.sample_rate);
        }
    }

    /// Pitch wheel range in semitones.
    pub fn set_bend_range(&mut self, semitones: f32) {
        self.bend_range = semitones;
    }

    /// First of the three controller numbers routed to mod A/B/C.
    pub fn set_controller_number(&mut self, number: i32) {
        self.controller_number = number;
    }

    pub fn set_drift(&mut self, amount: f32) {
        self.drift = amount.clamp(0.0, 1.0);
    }

    /// Unison pitch spread in semitones, end to end.
    pub fn set_unison_spread(&mut self, semitones: f32) {
        self.unison_spread = semitones.max(0.0);
    }

    /// Pick up voice parameters from a block snapshot.
    pub fn apply_params(&mut self, params: &ParamSnapshot) {
        self.set_voice_count(params.get(EngineParam::Voices).round() as usize);
        self.set_bend_range(params.get(EngineParam::BendRange));
        self.set_controller_number(params.get(EngineParam::ModCc).round() as i32);
        self.set_unison(params.flag(EngineParam::Unison));
        self.set_unison_spread(params.get(EngineParam::UnisonSpread));
        self.set_rotate(params.flag(EngineParam::Rotate));
        self.set_retrig(params.flag(EngineParam::Retrig));
        self.set_drift(params.get(EngineParam::Drift));
        let glide = params.get(EngineParam::Glide);
        if glide != self.glide {
            self.set_glide(glide);
        }
    }

    /// Release every voice and forget held and pending notes.
    pub fn all_notes_off(&mut self, time: usize) {
        for voice in &mut self.voices {
            if !voice.is_free() {
                voice.release(time);
            }
        }
        self.held.clear();
        self.pending.clear();
        self.sustain = false;
    }

    /// Drop all voice state, as after construction.
    pub fn reset(&mut self) {
        for voice in &mut self.voices {
            voice.clear_state();
        }
        self.held.clear();
        self.pending.clear();
        self.bend.reset(0.0);
        self.channel_pressure.reset(0.0);
        self.sustain = false;
        self.rotate_offset = 0;
    }

    /// Handle one block of events, ordered by time, then write `frames`
    /// samples of every voice signal. Event times past the block end are
    /// pulled onto its last sample.
    pub fn process(&mut self, events: &[ControlEvent], frames: usize) {
        let frames = frames.clamp(1, self.max_frames);
        for event in events {
            let mut event = *event;
            event.time = event.time.min(frames - 1);
            self.handle(&event);
        }
        self.write_signals(frames);
        for voice in &mut self.voices {
            voice.add_age(frames);
        }
    }

    fn handle(&mut self, event: &ControlEvent) {
        match event.kind {
            EventKind::NoteOn if event.value2 > 0.0 => self.note_on(event),
            EventKind::NoteOn | EventKind::NoteOff => self.note_off(event),
            EventKind::Sustain => self.sustain_pedal(event),
            EventKind::Controller => self.controller(event),
            EventKind::PitchWheel => {
                let bend = event.value1.clamp(-1.0, 1.0) * self.bend_range / 12.0;
                self.bend.add_change(bend, event.time);
            }
            EventKind::NotePressure => {
                for voice in &mut self.voices[..self.current_voices] {
                    if !voice.is_free() && voice.instigator_id() == event.id {
                        voice.note_pressure.add_change(event.value2, event.time);
                    }
                }
            }
            EventKind::ChannelPressure => {
                self.channel_pressure.add_change(event.value1, event.time);
            }
        }
    }

    fn note_on(&mut self, event: &ControlEvent) {
        if self.held.len() == MAX_HELD_NOTES {
            self.held.remove(0);
        }
        self.held.push(*event);

        if self.unison {
            self.unison_play(event);
            return;
        }

        let v = match self.find_free_voice() {
            Some(v) => v,
            None => match self.find_sustained_voice().or_else(|| self.find_oldest_voice()) {
                Some(v) => {
                    self.steal(v, event.time);
                    v
                }
                None => {
                    self.dropped_notes += 1;
                    return;
                }
            },
        };
        self.start_voice(v, event, true);
    }

    fn note_off(&mut self, event: &ControlEvent) {
        self.held.retain(|e| e.id != event.id);
        self.pending.retain(|e| e.id != event.id);

        if self.unison {
            self.unison_release(event);
            return;
        }

        for v in 0..self.current_voices {
            let voice = &mut self.voices[v];
            if voice.state() != VoiceState::Active || voice.instigator_id() != event.id {
                continue;
            }
            if self.sustain {
                voice.sustain();
            } else {
                voice.release(event.time);
                self.replay_pending(v, event.time);
            }
        }
    }

    fn sustain_pedal(&mut self, event: &ControlEvent) {
        let down = event.value1 >= 0.5;
        self.sustain = down;
        if down {
            return;
        }
        for v in 0..self.current_voices {
            if self.voices[v].state() == VoiceState::Sustaining {
                self.voices[v].release(event.time);
                if !self.unison {
                    self.replay_pending(v, event.time);
                }
            }
        }
    }

    fn controller(&mut self, event: &ControlEvent) {
        let number = event.value1.round() as i32;
        let offset = number - self.controller_number;
        if !(0..3).contains(&offset) {
            return;
        }
        for voice in &mut self.voices {
            let list = match offset {
                0 => &mut voice.mod_a,
                1 => &mut voice.mod_b,
                _ => &mut voice.mod_c,
            };
            list.add_change(event.value2, event.time);
        }
    }

    /// Free voice, searching from the rotate offset.
    pub fn find_free_voice(&self) -> Option<usize> {
        let n = self.current_voices;
        (0..n)
            .map(|i| (i + self.rotate_offset) % n)
            .find(|&v| self.voices[v].is_free())
    }

    /// Oldest voice held only by the sustain pedal.
    pub fn find_sustained_voice(&self) -> Option<usize> {
        self.oldest_where(|voice| voice.state() == VoiceState::Sustaining)
    }

    /// Oldest sounding voice of any kind.
    pub fn find_oldest_voice(&self) -> Option<usize> {
        self.oldest_where(|voice| !voice.is_free())
    }

    // Ties go to the lowest index: `max_by_key` keeps the last maximum, and
    // the search runs in reverse.
    fn oldest_where(&self, pred: impl Fn(&Voice) -> bool) -> Option<usize> {
        (0..self.current_voices)
            .rev()
            .filter(|&v| pred(&self.voices[v]))
            .max_by_key(|&v| self.voices[v].age())
    }

    fn steal(&mut self, v: usize, time: usize) {
        self.steal_count += 1;
        let voice = &self.voices[v];
        if voice.state() != VoiceState::Active {
            return;
        }
        if self.pending.len() == MAX_PENDING_NOTES {
            self.pending.remove(0);
            self.dropped_notes += 1;
        }
        self.pending.push(voice.current_event(time));
    }

    fn replay_pending(&mut self, v: usize, time: usize) {
        if let Some(mut event) = self.pending.pop() {
            // Restart one sample after the release so the gate is seen low.
            event.time = time + 1;
            self.start_voice(v, &event, false);
        }
    }

    fn start_voice(&mut self, v: usize, event: &ControlEvent, retrig: bool) {
        let pitch = self.tuning.note_to_log_pitch(event.value1);
        self.voices[v].start(event, pitch, retrig);
        if self.rotate {
            self.rotate_offset = (v + 1) % self.current_voices;
        }
    }

    fn spread_offset(&self, v: usize) -> f32 {
        let n = self.current_voices;
        if n < 2 {
            return 0.0;
        }
        self.unison_spread / 12.0 * (v as f32 / (n - 1) as f32 - 0.5)
    }

    fn unison_play(&mut self, event: &ControlEvent) {
        let pitch = self.tuning.note_to_log_pitch(event.value1);
        for v in 0..self.current_voices {
            let offset = self.spread_offset(v);
            self.voices[v].start(event, pitch + offset, self.retrig);
        }
    }

    fn unison_release(&mut self, event: &ControlEvent) {
        let sounding = self.voices[0].instigator_id() == event.id;
        if !sounding {
            return;
        }
        match self.held.last().copied() {
            Some(mut previous) => {
                previous.time = event.time;
                self.unison_play(&previous);
            }
            None => {
                for voice in &mut self.voices[..self.current_voices] {
                    if voice.state() != VoiceState::Active {
                        continue;
                    }
                    if self.sustain {
                        voice.sustain();
                    } else {
                        voice.release(event.time);
                    }
                }
            }
        }
    }

    fn write_signals(&mut self, frames: usize) {
        self.signals.set_frames(frames);
        let bend = &mut self.bend_buffer[..frames];
        let pressure = &mut self.pressure_buffer[..frames];
        let drift = &mut self.drift_buffer[..frames];
        self.bend.write_to_signal(bend);
        self.channel_pressure.write_to_signal(pressure);

        for (v, voice) in self.voices.iter_mut().enumerate() {
            voice.update_drift(self.drift, frames);
            voice.drift.write_to_signal(drift);

            let pitch = self.signals.signal_mut(v, VoiceSignal::Pitch);
            voice.pitch_list.write_to_signal(pitch);
            for ((p, b), d) in pitch.iter_mut().zip(bend.iter()).zip(drift.iter()) {
                *p += b + d;
            }

            voice.gate.write_to_signal(self.signals.signal_mut(v, VoiceSignal::Gate));
            voice.amp.write_to_signal(self.signals.signal_mut(v, VoiceSignal::Amp));
            voice
                .velocity_list
                .write_to_signal(self.signals.signal_mut(v, VoiceSignal::Velocity));
            voice
                .note_pressure
                .write_to_signal(self.signals.signal_mut(v, VoiceSignal::NotePressure));
            voice.mod_a.write_to_signal(self.signals.signal_mut(v, VoiceSignal::ModA));
            voice.mod_b.write_to_signal(self.signals.signal_mut(v, VoiceSignal::ModB));
            voice.mod_c.write_to_signal(self.signals.signal_mut(v, VoiceSignal::ModC));
            self.signals.signal_mut(v, VoiceSignal::Voice).fill(v as f32);
            self.signals
                .signal_mut(v, VoiceSignal::ChannelPressure)
                .copy_from_slice(pressure);
        }
    }
}
