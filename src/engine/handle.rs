use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use rtrb::Producer;

use crate::{
    error::EngineError,
    params::{EngineParam, ParamTable},
    synth::message::ControlEvent,
    tuning::{Scale, ScaleDefinition, TuningTable},
};

/// Control-thread requests that are not parameter writes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineCommand {
    /// Swap the tuning; the table travels by value.
    SetTuning(TuningTable),
    AllNotesOff,
    /// Silence voices and clear every delay and filter.
    Reset,
}

/// Counters written by the audio thread and read anywhere.
#[derive(Debug, Default)]
pub struct EngineStats {
    dropped_events: AtomicUsize,
    dropped_commands: AtomicUsize,
    dropped_notes: AtomicUsize,
    steals: AtomicUsize,
    blocks: AtomicUsize,
}

impl EngineStats {
    /// Events refused because the event queue was full.
    pub fn dropped_events(&self) -> usize {
        self.dropped_events.load(Ordering::Relaxed)
    }

    pub fn dropped_commands(&self) -> usize {
        self.dropped_commands.load(Ordering::Relaxed)
    }

    /// Notes the allocator could not place or keep pending.
    pub fn dropped_notes(&self) -> usize {
        self.dropped_notes.load(Ordering::Relaxed)
    }

    pub fn steals(&self) -> usize {
        self.steals.load(Ordering::Relaxed)
    }

    pub fn blocks(&self) -> usize {
        self.blocks.load(Ordering::Relaxed)
    }

    pub(crate) fn record_block(&self, dropped_notes: usize, steals: usize) {
        self.dropped_notes.store(dropped_notes, Ordering::Relaxed);
        self.steals.store(steals, Ordering::Relaxed);
        self.blocks.fetch_add(1, Ordering::Relaxed);
    }
}

/// The control thread's side of an engine.
///
/// Events and commands go through wait-free ring buffers; parameter writes
/// are validated here and land in atomic cells the engine reads once per
/// block. Nothing here blocks the audio thread.
pub struct EngineHandle {
    events: Producer<ControlEvent>,
    commands: Producer<EngineCommand>,
    params: ParamTable,
    stats: Arc<EngineStats>,
}

impl EngineHandle {
    pub(crate) fn new(
        events: Producer<ControlEvent>,
        commands: Producer<EngineCommand>,
        params: ParamTable,
        stats: Arc<EngineStats>,
    ) -> Self {
        Self {
            events,
            commands,
            params,
            stats,
        }
    }

    /// Queue an event for the next block. Returns false (and counts the
    /// drop) when the queue is full.
    pub fn send_event(&mut self, event: ControlEvent) -> bool {
        match self.events.push(event) {
            Ok(()) => true,
            Err(_) => {
                self.stats.dropped_events.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    pub fn note_on(&mut self, note: u8, velocity: f32) -> bool {
        self.send_event(ControlEvent::note_on(note, velocity, 0))
    }

    pub fn note_off(&mut self, note: u8) -> bool {
        self.send_event(ControlEvent::note_off(note, 0))
    }

    fn send_command(&mut self, command: EngineCommand) -> bool {
        match self.commands.push(command) {
            Ok(()) => true,
            Err(_) => {
                self.stats.dropped_commands.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("engine command queue full");
                false
            }
        }
    }

    pub fn all_notes_off(&mut self) -> bool {
        self.send_command(EngineCommand::AllNotesOff)
    }

    pub fn reset(&mut self) -> bool {
        self.send_command(EngineCommand::Reset)
    }

    /// Retune from a compiled scale.
    pub fn set_scale(&mut self, scale: &Scale) -> bool {
        tracing::info!(name = scale.name(), notes = scale.notes_in_octave(), "retuning");
        self.send_command(EngineCommand::SetTuning(scale.table()))
    }

    /// Compile `definition` and retune. Fails on an invalid scale; a full
    /// command queue returns `Ok(false)`.
    pub fn load_scale(&mut self, definition: &ScaleDefinition) -> Result<bool, EngineError> {
        let scale = Scale::load(definition)?;
        Ok(self.set_scale(&scale))
    }

    /// Set a parameter by name or alias. Returns the stored value.
    pub fn set_param(&mut self, name: &str, value: f32) -> Result<f32, EngineError> {
        self.params.set_by_name(name, value)
    }

    /// Set a parameter from a 0..=1 control position.
    pub fn set_param_proportion(&mut self, name: &str, proportion: f32) -> Result<f32, EngineError> {
        let param = self.params.lookup(name)?;
        self.params.set_proportion(param, proportion)
    }

    pub fn param(&self, param: EngineParam) -> f32 {
        self.params.value(param)
    }

    pub fn params(&self) -> &ParamTable {
        &self.params
    }

    /// For subscribing to parameter changes.
    pub fn params_mut(&mut self) -> &mut ParamTable {
        &mut self.params
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }
}
