use std::sync::Arc;

use rtrb::RingBuffer;

use super::{
    config::EngineConfig,
    handle::{EngineHandle, EngineStats},
    Engine,
};
use crate::{
    error::EngineError,
    graph::{node::GraphNode, registry::NodeRegistry, reverb::ReverbNode},
    params::ParamTable,
    synth::{factory::ChainFactory, input::InputToSignals, poly::PolySynth},
};

/// Setup phase of an engine. Everything that allocates happens in
/// [`build`](Self::build).
pub struct EngineBuilder {
    config: EngineConfig,
    registry: Option<NodeRegistry>,
}

impl EngineBuilder {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            registry: None,
        }
    }

    /// Node types available to the voice chain. Defaults to
    /// [`NodeRegistry::with_builtin`].
    pub fn with_registry(mut self, registry: NodeRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut EngineConfig {
        &mut self.config
    }

    pub fn build(self) -> Result<(Engine, EngineHandle), EngineError> {
        let config = self.config;
        config.validate()?;
        let registry = self.registry.unwrap_or_else(NodeRegistry::with_builtin);

        let params = ParamTable::new(config.max_voices)?;
        let shared = params.shared();

        let input = InputToSignals::new(
            config.sample_rate,
            config.max_voices,
            config.max_block_size,
            config.event_capacity,
        )?;
        let factory = ChainFactory::new(&registry, &config.voice_chain);
        let synth = PolySynth::new(&factory, input, config.sample_rate, config.max_block_size)?;

        let reverb = if config.reverb {
            let mut reverb = ReverbNode::new();
            reverb.prepare(config.sample_rate, config.max_block_size)?;
            Some(reverb)
        } else {
            None
        };

        let (event_tx, event_rx) = RingBuffer::new(config.event_capacity);
        let (command_tx, command_rx) = RingBuffer::new(config.command_capacity);
        let stats = Arc::new(EngineStats::default());

        tracing::info!(
            sample_rate = config.sample_rate,
            max_block_size = config.max_block_size,
            max_voices = config.max_voices,
            chain = ?config.voice_chain,
            reverb = config.reverb,
            "engine built"
        );

        let handle = EngineHandle::new(event_tx, command_tx, params, Arc::clone(&stats));
        let engine = Engine {
            events: Vec::with_capacity(config.event_capacity),
            mix: vec![0.0; config.max_block_size],
            config,
            registry,
            synth,
            reverb,
            event_rx,
            command_rx,
            shared,
            stats,
        };
        Ok((engine, handle))
    }
}

impl From<EngineConfig> for EngineBuilder {
    fn from(config: EngineConfig) -> Self {
        Self::new(config)
    }
}
