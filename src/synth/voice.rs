use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::synth::{change_list::ChangeList, message::ControlEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,       // Available for allocation
    Active,     // Key held, gate high
    Sustaining, // Key released while the sustain pedal is down
}

/// Drift in octaves at full drift amount: a fixed per-voice detune plus a
/// slow random walk.
const DRIFT_CONSTANT_OCTAVES: f32 = 0.004;
const DRIFT_RANDOM_OCTAVES: f32 = 0.003;
/// Blocks between new random-walk targets.
const DRIFT_INTERVAL_BLOCKS: u32 = 32;

/// One polyphonic note slot.
///
/// The voice owns the change lists for every per-voice control signal. The
/// allocator schedules changes into them while it handles events, then the
/// lists are rendered into signal buffers at the end of the block.
#[derive(Debug, Clone)]
pub struct Voice {
    state: VoiceState,
    instigator_id: i32,
    channel: u8,
    note: f32,
    velocity: f32,
    /// Samples active, measured to the end of the current block. Starts
    /// negative at the note's offset so notes within one block still order.
    age: i64,
    /// Log pitch of the current note without bend or drift.
    pitch: f32,
    has_played: bool,

    pub(crate) pitch_list: ChangeList,
    pub(crate) gate: ChangeList,
    pub(crate) amp: ChangeList,
    pub(crate) velocity_list: ChangeList,
    pub(crate) note_pressure: ChangeList,
    pub(crate) mod_a: ChangeList,
    pub(crate) mod_b: ChangeList,
    pub(crate) mod_c: ChangeList,
    pub(crate) drift: ChangeList,

    drift_constant: f32,
    drift_target: f32,
    drift_counter: u32,
    rng: SmallRng,
}

impl Voice {
    pub fn new(change_capacity: usize, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let drift_constant = rng.gen_range(-1.0..=1.0);
        Self {
            state: VoiceState::Free,
            instigator_id: -1,
            channel: 0,
            note: 0.0,
            velocity: 0.0,
            age: 0,
            pitch: 0.0,
            has_played: false,
            pitch_list: ChangeList::new(change_capacity),
            gate: ChangeList::new(change_capacity),
            amp: ChangeList::new(change_capacity),
            velocity_list: ChangeList::new(change_capacity),
            note_pressure: ChangeList::new(change_capacity),
            mod_a: ChangeList::new(change_capacity),
            mod_b: ChangeList::new(change_capacity),
            mod_c: ChangeList::new(change_capacity),
            drift: ChangeList::new(2),
            drift_constant,
            drift_target: 0.0,
            drift_counter: 0,
            rng,
        }
    }

    /// Start `event` on this voice at log pitch `pitch`.
    ///
    /// A voice that was already sounding glides to the new pitch (legato)
    /// and, with `retrig`, drops its gate for one sample so envelopes restart.
    pub(crate) fn start(&mut self, event: &ControlEvent, pitch: f32, retrig: bool) {
        let time = event.time;
        let sounding = self.state != VoiceState::Free;

        if self.has_played {
            self.pitch_list.add_change(pitch, time);
        } else {
            self.pitch_list.add_jump(pitch, time);
        }

        if sounding && retrig {
            self.gate.add_change(0.0, time);
            self.gate.add_change(1.0, time + 1);
        } else {
            self.gate.add_change(1.0, time);
        }
        self.amp.add_change(event.value2, time);
        self.velocity_list.add_change(event.value2, time);
        self.note_pressure.add_change(0.0, time);

        self.state = VoiceState::Active;
        self.instigator_id = event.id;
        self.channel = event.channel;
        self.note = event.value1;
        self.velocity = event.value2;
        self.pitch = pitch;
        self.age = -(time as i64);
        self.has_played = true;
    }

    /// Close the gate and free the voice.
    pub(crate) fn release(&mut self, time: usize) {
        self.gate.add_change(0.0, time);
        self.amp.add_change(0.0, time);
        self.state = VoiceState::Free;
        self.instigator_id = -1;
    }

    pub(crate) fn sustain(&mut self) {
        if self.state == VoiceState::Active {
            self.state = VoiceState::Sustaining;
        }
    }

    /// The note-on that would restart what this voice is playing.
    pub(crate) fn current_event(&self, time: usize) -> ControlEvent {
        ControlEvent::new(
            super::message::EventKind::NoteOn,
            self.channel,
            self.instigator_id,
            time,
            self.note,
            self.velocity,
        )
    }

    /// Advance the drift random walk by one block.
    pub(crate) fn update_drift(&mut self, amount: f32, block_samples: usize) {
        if self.drift_counter == 0 {
            self.drift_target = self.rng.gen_range(-1.0..=1.0);
            self.drift_counter = DRIFT_INTERVAL_BLOCKS;
        }
        self.drift_counter -= 1;

        let value = amount
            * (self.drift_constant * DRIFT_CONSTANT_OCTAVES + self.drift_target * DRIFT_RANDOM_OCTAVES);
        self.drift
            .set_glide_samples(block_samples * DRIFT_INTERVAL_BLOCKS as usize);
        if self.drift.target() != value {
            self.drift.add_change(value, 0);
        }
    }

    /// Back to the just-constructed state, keeping allocations.
    pub fn clear_state(&mut self) {
        self.state = VoiceState::Free;
        self.instigator_id = -1;
        self.note = 0.0;
        self.velocity = 0.0;
        self.age = 0;
        self.pitch = 0.0;
        self.has_played = false;
        for list in self.lists_mut() {
            list.reset(0.0);
        }
        self.drift.reset(0.0);
    }

    fn lists_mut(&mut self) -> [&mut ChangeList; 8] {
        [
            &mut self.pitch_list,
            &mut self.gate,
            &mut self.amp,
            &mut self.velocity_list,
            &mut self.note_pressure,
            &mut self.mod_a,
            &mut self.mod_b,
            &mut self.mod_c,
        ]
    }

    pub(crate) fn add_age(&mut self, samples: usize) {
        if self.state != VoiceState::Free {
            self.age += samples as i64;
        }
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    pub fn instigator_id(&self) -> i32 {
        self.instigator_id
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn note(&self) -> f32 {
        self.note
    }

    pub fn age(&self) -> i64 {
        self.age
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }
}
