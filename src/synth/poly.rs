use crate::{
    error::EngineError,
    graph::node::{GraphNode, RenderCtx},
    params::ParamSnapshot,
    synth::{factory::VoiceFactory, input::InputToSignals, message::ControlEvent},
};

/// The allocator plus one graph per voice.
///
/// Each block the allocator turns events into control signals, then every
/// active voice graph renders against its own signals and the results are
/// summed.
pub struct PolySynth<V> {
    input: InputToSignals,
    graphs: Vec<V>,
    voice_buffer: Vec<f32>,
    sample_rate: f32,
}

impl<V: GraphNode> PolySynth<V> {
    /// Build and prepare one graph per allocator voice. Allocates.
    pub fn new<F>(factory: &F, input: InputToSignals, sample_rate: f32, max_frames: usize) -> Result<Self, EngineError>
    where
        F: VoiceFactory<Voice = V>,
    {
        let graphs = (0..input.max_voices())
            .map(|_| {
                let mut graph = factory.create_voice()?;
                graph.prepare(sample_rate, max_frames)?;
                Ok(graph)
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        Ok(Self {
            input,
            graphs,
            voice_buffer: vec![0.0; max_frames],
            sample_rate,
        })
    }

    pub fn input(&self) -> &InputToSignals {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputToSignals {
        &mut self.input
    }

    pub fn apply_params(&mut self, params: &ParamSnapshot) {
        self.input.apply_params(params);
        for graph in &mut self.graphs {
            graph.apply_params(params);
        }
    }

    /// Run the block's events through the allocator and render the voice mix
    /// into `out`. `out` must not be longer than the prepared block size.
    pub fn render_block(&mut self, events: &[ControlEvent], out: &mut [f32]) {
        let frames = out.len().min(self.voice_buffer.len());
        self.input.process(events, frames);
        out.fill(0.0);

        let signals = self.input.signals();
        for (v, graph) in self.graphs.iter_mut().enumerate().take(self.input.current_voices()) {
            let buffer = &mut self.voice_buffer[..frames];
            buffer.fill(0.0);
            graph.render_block(buffer, &RenderCtx::for_voice(self.sample_rate, signals, v));
            for (o, x) in out.iter_mut().zip(buffer.iter()) {
                *o += x;
            }
        }
    }

    /// Silence every voice and clear graph memory.
    pub fn reset(&mut self) {
        self.input.reset();
        for graph in &mut self.graphs {
            graph.reset();
        }
    }
}
