use crate::{
    dsp::halfband::{Downsample2x, Upsample2x},
    error::EngineError,
    graph::node::{GraphNode, RenderCtx},
    params::ParamSnapshot,
};

/*
2x Oversampling Wrapper
=======================

Runs the wrapped node at twice the host rate:

  out ──→ Upsample2x ──→ buffer (2n) ──→ inner node @ 2·sr ──→ Downsample2x ──→ out

Both resamplers are the polyphase half-band pair from `dsp::halfband`, so
anything the inner node generates above the original Nyquist is filtered out
before decimation instead of folding back. Control signals stay at the host
rate; the inner node reads each value twice (see `RenderCtx::oversampled`).

The registry builds one of these for any tag with an `@2x` suffix.
*/

pub struct Oversampled<N> {
    inner: N,
    up: Upsample2x,
    down: Downsample2x,
    buffer: Vec<f32>,
}

impl<N> Oversampled<N> {
    pub fn new(inner: N) -> Self {
        Self {
            inner,
            up: Upsample2x::new(),
            down: Downsample2x::new(),
            buffer: Vec::new(),
        }
    }

    pub fn inner(&self) -> &N {
        &self.inner
    }
}

impl<N: GraphNode> GraphNode for Oversampled<N> {
    fn prepare(&mut self, sample_rate: f32, max_frames: usize) -> Result<(), EngineError> {
        self.buffer = vec![0.0; max_frames * 2];
        self.inner.prepare(sample_rate * 2.0, max_frames * 2)
    }

    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        // Blocks longer than the prepared size are rendered in pieces.
        let chunk = (self.buffer.len() / 2).max(1);
        let fast = ctx.oversampled(2);
        for block in out.chunks_mut(chunk) {
            let buffer = &mut self.buffer[..block.len() * 2];
            self.up.process(block, buffer);
            self.inner.render_block(buffer, &fast);
            self.down.process(buffer, block);
        }
    }

    fn apply_params(&mut self, params: &ParamSnapshot) {
        self.inner.apply_params(params);
    }

    fn reset(&mut self) {
        self.up.clear();
        self.down.clear();
        self.inner.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{extensions::NodeExt, oscillator::OscNode};

    struct Passthrough;

    impl GraphNode for Passthrough {
        fn render_block(&mut self, _out: &mut [f32], _ctx: &RenderCtx) {}
    }

    #[test]
    fn passthrough_keeps_dc() {
        let mut node = Passthrough.oversampled();
        node.prepare(48_000.0, 256).unwrap();
        let mut buffer = vec![0.5; 256];
        node.render_block(&mut buffer, &RenderCtx::new(48_000.0));
        assert!((buffer[255] - 0.5).abs() < 1e-3);
    }

    #[test]
    fn inner_node_runs_at_double_rate() {
        let mut node = OscNode::sine().with_frequency(1000.0).oversampled();
        node.prepare(8000.0, 800).unwrap();
        let mut buffer = vec![0.0; 800];
        node.render_block(&mut buffer, &RenderCtx::new(8000.0));

        // 1 kHz at 8 kHz: 100 cycles in 800 samples.
        let crossings = buffer.windows(2).filter(|w| w[0] < 0.0 && w[1] >= 0.0).count();
        assert!((99..=101).contains(&crossings), "{crossings}");
    }

    #[test]
    fn long_blocks_are_split() {
        let mut node = Passthrough.oversampled();
        node.prepare(48_000.0, 16).unwrap();
        let mut buffer = vec![1.0; 100];
        node.render_block(&mut buffer, &RenderCtx::new(48_000.0));
        assert!((buffer[99] - 1.0).abs() < 1e-3);
    }
}
