//! The real-time engine and its control-thread handle.
//!
//! ```text
//! control thread                              audio thread
//! ──────────────                              ────────────
//! EngineHandle ── events (rtrb) ───────────→  Engine::process_block
//!              ── commands (rtrb) ─────────→    ├─ drain commands
//!              ── ParamTable → atomics ────→    ├─ snapshot params
//!                                               ├─ drain + sort events
//!                                               ├─ PolySynth: allocator → voice graphs
//!                                               └─ reverb → output channels
//! ```

pub mod builder;
pub mod config;
pub mod handle;

use std::sync::Arc;

use rtrb::Consumer;

pub use builder::EngineBuilder;
pub use config::{EngineConfig, MAX_VOICES};
pub use handle::{EngineCommand, EngineHandle, EngineStats};

use crate::{
    error::EngineError,
    graph::{node::GraphNode, registry::NodeRegistry, reverb::ReverbNode, RenderCtx},
    io::{AudioInput, AudioOutput},
    params::{EngineParam, SharedParams},
    synth::{
        message::{ControlEvent, EventSource},
        poly::PolySynth,
    },
};

pub struct Engine {
    config: EngineConfig,
    registry: NodeRegistry,
    synth: PolySynth<Box<dyn GraphNode>>,
    reverb: Option<ReverbNode>,
    event_rx: Consumer<ControlEvent>,
    command_rx: Consumer<EngineCommand>,
    shared: Arc<SharedParams>,
    stats: Arc<EngineStats>,
    /// This block's events, preallocated to the event capacity.
    events: Vec<ControlEvent>,
    mix: Vec<f32>,
}

impl Engine {
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sample_rate(&self) -> f32 {
        self.config.sample_rate
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    pub fn synth(&self) -> &PolySynth<Box<dyn GraphNode>> {
        &self.synth
    }

    /// Tear down to a builder holding this engine's config and registry.
    /// The only way to change sample rate or block size; the old handle's
    /// queues are not reconnected.
    pub fn into_builder(self) -> EngineBuilder {
        EngineBuilder::new(self.config).with_registry(self.registry)
    }

    /// Render one block into every output channel.
    ///
    /// The first input channel, if any, is mixed with the voices before the
    /// reverb. Output with one channel gets the mono mix; with two or more
    /// the first two get the reverb's left and right and the rest silence.
    /// Does not allocate, lock or log.
    pub fn process_block(&mut self, input: &AudioInput, output: &mut AudioOutput) -> Result<(), EngineError> {
        let frames = output.frames();
        if frames > self.config.max_block_size {
            return Err(EngineError::InvalidBlockSize {
                requested: frames,
                max: self.config.max_block_size,
            });
        }

        while let Ok(command) = self.command_rx.pop() {
            match command {
                EngineCommand::SetTuning(table) => self.synth.input_mut().set_tuning(table),
                EngineCommand::AllNotesOff => self.synth.input_mut().all_notes_off(0),
                EngineCommand::Reset => {
                    self.synth.reset();
                    if let Some(reverb) = &mut self.reverb {
                        reverb.reset();
                    }
                }
            }
        }

        let params = self.shared.snapshot();
        self.synth.apply_params(&params);
        if let Some(reverb) = &mut self.reverb {
            reverb.apply_params(&params);
        }

        // Empty blocks leave events queued; there is no sample to put them on.
        if frames == 0 {
            return Ok(());
        }

        // Events beyond the capacity stay queued for the next block.
        self.events.clear();
        while self.events.len() < self.events.capacity() {
            match EventSource::pop(&mut self.event_rx) {
                Some(event) => self.events.push(event),
                None => break,
            }
        }
        sort_by_time(&mut self.events);

        let mix = &mut self.mix[..frames];
        self.synth.render_block(&self.events, mix);
        if let Some(dry) = input.buffers.first() {
            for (m, x) in mix.iter_mut().zip(dry.iter()) {
                *m += x;
            }
        }

        let level = params.get(EngineParam::Level);
        match output.buffers.as_mut_slice() {
            [] => {}
            [mono] => {
                if let Some(reverb) = &mut self.reverb {
                    reverb.render_block(mix, &RenderCtx::new(self.config.sample_rate));
                }
                for (o, m) in mono.iter_mut().zip(mix.iter()) {
                    *o = m * level;
                }
            }
            [left, right, rest @ ..] => {
                let (left, right) = (&mut left[..frames], &mut right[..frames]);
                match &mut self.reverb {
                    Some(reverb) => reverb.render_stereo(mix, left, right),
                    None => {
                        left.copy_from_slice(mix);
                        right.copy_from_slice(mix);
                    }
                }
                for x in left.iter_mut().chain(right.iter_mut()) {
                    *x *= level;
                }
                for channel in rest {
                    channel.fill(0.0);
                }
            }
        }

        let input = self.synth.input();
        self.stats.record_block(input.dropped_notes(), input.steal_count());
        Ok(())
    }
}

/// Stable in-place insertion sort; blocks are short and usually in order.
fn sort_by_time(events: &mut [ControlEvent]) {
    for i in 1..events.len() {
        let mut j = i;
        while j > 0 && events[j - 1].time > events[j].time {
            events.swap(j - 1, j);
            j -= 1;
        }
    }
}
