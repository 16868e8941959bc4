use crate::{
    dsp::delay::LinearDelay,
    error::{check_sample_rate, EngineError},
    graph::node::{GraphNode, RenderCtx},
    params::{EngineParam, ParamSnapshot},
};

/// Longest echo the node can be set to.
pub const MAX_DELAY_SECONDS: f32 = 1.0;

/// Feedback echo on a [`LinearDelay`] fixed tap: the dry signal plus
/// repeats every `time` seconds, each `feedback` times quieter.
pub struct DelayNode {
    delay: LinearDelay,
    sample_rate: f32,
    time: f32,
    feedback: f32,
}

impl Default for DelayNode {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayNode {
    pub fn new() -> Self {
        Self {
            delay: LinearDelay::new(),
            sample_rate: 0.0,
            time: EngineParam::DelayTime.spec().default,
            feedback: EngineParam::DelayFeedback.spec().default,
        }
    }

    pub fn with_echo(mut self, time: f32, feedback: f32) -> Self {
        self.time = time;
        self.feedback = feedback;
        self
    }

    fn update(&mut self) {
        let time = self.time.clamp(0.0, MAX_DELAY_SECONDS);
        // The tap is read after the write and fed back on the next sample.
        let samples = (time * self.sample_rate).round() as usize;
        self.delay.set_fixed_delay_samples(samples.saturating_sub(1));
        self.delay.set_mix_params(1.0, 0.0, -self.feedback);
    }
}

impl GraphNode for DelayNode {
    fn prepare(&mut self, sample_rate: f32, _max_frames: usize) -> Result<(), EngineError> {
        self.sample_rate = check_sample_rate(sample_rate)?;
        self.delay.set_sample_rate(sample_rate)?;
        self.delay.resize(MAX_DELAY_SECONDS)?;
        self.update();
        Ok(())
    }

    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        self.delay.render(out);
    }

    fn apply_params(&mut self, params: &ParamSnapshot) {
        let time = params.get(EngineParam::DelayTime);
        let feedback = params.get(EngineParam::DelayFeedback);
        if time != self.time || feedback != self.feedback {
            self.time = time;
            self.feedback = feedback;
            self.update();
        }
    }

    fn reset(&mut self) {
        self.delay.clear();
    }
}
