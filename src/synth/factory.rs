use crate::{
    error::EngineError,
    graph::{node::GraphNode, registry::NodeRegistry},
};

/// Factory for creating voices with a specific patch/sound design
///
/// This is the "instrument design" layer: describe the sound once, then
/// `PolySynth` asks the factory for one identical graph per voice.
pub trait VoiceFactory {
    type Voice: GraphNode;

    fn create_voice(&self) -> Result<Self::Voice, EngineError>;
}

impl<F, T> VoiceFactory for F
where
    F: Fn() -> T,
    T: GraphNode,
{
    type Voice = T;

    fn create_voice(&self) -> Result<Self::Voice, EngineError> {
        Ok(self())
    }
}

/// Voices built from a list of registry tags, chained in order.
pub struct ChainFactory<'a, S> {
    registry: &'a NodeRegistry,
    tags: &'a [S],
}

impl<'a, S: AsRef<str>> ChainFactory<'a, S> {
    pub fn new(registry: &'a NodeRegistry, tags: &'a [S]) -> Self {
        Self { registry, tags }
    }
}

impl<S: AsRef<str>> VoiceFactory for ChainFactory<'_, S> {
    type Voice = Box<dyn GraphNode>;

    fn create_voice(&self) -> Result<Self::Voice, EngineError> {
        self.registry.build_chain(self.tags)
    }
}
