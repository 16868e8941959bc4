/// Per-voice control signals produced by the allocator each block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoiceSignal {
    /// Octaves relative to A440, including bend and drift.
    Pitch,
    Gate,
    /// Velocity while the gate is high, zero otherwise.
    Amp,
    Velocity,
    /// Index of the voice, constant.
    Voice,
    NotePressure,
    ChannelPressure,
    ModA,
    ModB,
    ModC,
}

impl VoiceSignal {
    pub const COUNT: usize = 10;

    pub const ALL: [VoiceSignal; Self::COUNT] = [
        VoiceSignal::Pitch,
        VoiceSignal::Gate,
        VoiceSignal::Amp,
        VoiceSignal::Velocity,
        VoiceSignal::Voice,
        VoiceSignal::NotePressure,
        VoiceSignal::ChannelPressure,
        VoiceSignal::ModA,
        VoiceSignal::ModB,
        VoiceSignal::ModC,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            VoiceSignal::Pitch => "pitch",
            VoiceSignal::Gate => "gate",
            VoiceSignal::Amp => "amp",
            VoiceSignal::Velocity => "vel",
            VoiceSignal::Voice => "voice",
            VoiceSignal::NotePressure => "after",
            VoiceSignal::ChannelPressure => "channel_after",
            VoiceSignal::ModA => "mod",
            VoiceSignal::ModB => "mod2",
            VoiceSignal::ModC => "mod3",
        }
    }
}

/// Signal buffers for every voice, one contiguous allocation.
///
/// Layout is `[voice][signal][sample]` with `max_frames` samples per row;
/// only the first `frames` samples of each row belong to the current block.
#[derive(Debug, Clone)]
pub struct VoiceSignals {
    data: Vec<f32>,
    voices: usize,
    max_frames: usize,
    frames: usize,
}

impl VoiceSignals {
    pub fn new(voices: usize, max_frames: usize) -> Self {
        Self {
            data: vec![0.0; voices * VoiceSignal::COUNT * max_frames],
            voices,
            max_frames,
            frames: 0,
        }
    }

    pub fn voices(&self) -> usize {
        self.voices
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub(crate) fn set_frames(&mut self, frames: usize) {
        self.frames = frames.min(self.max_frames);
    }

    #[inline]
    fn offset(&self, voice: usize, signal: VoiceSignal) -> usize {
        (voice * VoiceSignal::COUNT + signal.index()) * self.max_frames
    }

    /// The current block of one signal.
    #[inline]
    pub fn signal(&self, voice: usize, signal: VoiceSignal) -> &[f32] {
        let start = self.offset(voice, signal);
        &self.data[start..start + self.frames]
    }

    #[inline]
    pub(crate) fn signal_mut(&mut self, voice: usize, signal: VoiceSignal) -> &mut [f32] {
        let start = self.offset(voice, signal);
        let frames = self.frames;
        &mut self.data[start..start + frames]
    }

    /// Sample `i` of one signal, holding the last value past the block end.
    #[inline]
    pub fn value(&self, voice: usize, signal: VoiceSignal, i: usize) -> f32 {
        let row = self.signal(voice, signal);
        match row.len() {
            0 => 0.0,
            len => row[i.min(len - 1)],
        }
    }
}
