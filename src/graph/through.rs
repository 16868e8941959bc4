use crate::{
    error::EngineError,
    graph::node::{GraphNode, RenderCtx},
    params::ParamSnapshot,
};

/*
Serial Chain (Through)
======================

Through renders its source into the block, then lets the effect process that
same block in place. A voice patch is a chain of these:

  [OscNode] ──→ [FilterNode] ──→ [GateAmpNode] ──→ voice output

  OscNode::sine()
      .through(FilterNode::lowpass())
      .through(GateAmpNode::new())

Because the buffer is shared, an effect at the head of a chain sees whatever
the caller left in `out`. The registry always starts chains with a source.

Parameters, preparation and reset fan out to both halves, source first.
*/

pub struct Through<S, F> {
    source: S,
    effect: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, effect: F) -> Self {
        Self { source, effect }
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn prepare(&mut self, sample_rate: f32, max_frames: usize) -> Result<(), EngineError> {
        self.source.prepare(sample_rate, max_frames)?;
        self.effect.prepare(sample_rate, max_frames)
    }

    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.effect.render_block(out, ctx);
    }

    fn apply_params(&mut self, params: &ParamSnapshot) {
        self.source.apply_params(params);
        self.effect.apply_params(params);
    }

    fn reset(&mut self) {
        self.source.reset();
        self.effect.reset();
    }
}
