use rtrb::Consumer;

/// What a [`ControlEvent`] does.
///
/// | kind            | id         | value1            | value2           |
/// |-----------------|------------|-------------------|------------------|
/// | NoteOn          | instigator | note (fractional) | velocity 0..=1   |
/// | NoteOff         | instigator | note              | release velocity |
/// | Controller      | -          | controller number | value 0..=1      |
/// | PitchWheel      | -          | bend -1..=1       | -                |
/// | NotePressure    | instigator | note              | pressure 0..=1   |
/// | ChannelPressure | -          | pressure 0..=1    | -                |
/// | Sustain         | -          | 1 = down, 0 = up  | -                |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    NoteOn,
    NoteOff,
    Controller,
    PitchWheel,
    NotePressure,
    ChannelPressure,
    Sustain,
}

/// One timestamped control event.
///
/// `id` identifies whatever started the note (a MIDI key, a touch index) so
/// the matching note-off and pressure events find the same voice. `time` is a
/// sample offset inside the block the event is delivered with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlEvent {
    pub kind: EventKind,
    pub channel: u8,
    pub id: i32,
    pub time: usize,
    pub value1: f32,
    pub value2: f32,
}

impl ControlEvent {
    pub fn new(kind: EventKind, channel: u8, id: i32, time: usize, value1: f32, value2: f32) -> Self {
        Self {
            kind,
            channel,
            id,
            time,
            value1,
            value2,
        }
    }

    /// Note-on keyed by its own note number.
    pub fn note_on(note: u8, velocity: f32, time: usize) -> Self {
        Self::new(EventKind::NoteOn, 0, note as i32, time, note as f32, velocity)
    }

    pub fn note_off(note: u8, time: usize) -> Self {
        Self::new(EventKind::NoteOff, 0, note as i32, time, note as f32, 0.0)
    }

    pub fn controller(number: u8, value: f32, time: usize) -> Self {
        Self::new(EventKind::Controller, 0, 0, time, number as f32, value)
    }

    pub fn pitch_wheel(bend: f32, time: usize) -> Self {
        Self::new(EventKind::PitchWheel, 0, 0, time, bend, 0.0)
    }

    pub fn note_pressure(note: u8, pressure: f32, time: usize) -> Self {
        Self::new(EventKind::NotePressure, 0, note as i32, time, note as f32, pressure)
    }

    pub fn channel_pressure(pressure: f32, time: usize) -> Self {
        Self::new(EventKind::ChannelPressure, 0, 0, time, pressure, 0.0)
    }

    pub fn sustain(down: bool, time: usize) -> Self {
        Self::new(EventKind::Sustain, 0, 0, time, if down { 1.0 } else { 0.0 }, 0.0)
    }

    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }
}

/// Anything the audio thread can pull events from without blocking.
pub trait EventSource {
    fn pop(&mut self) -> Option<ControlEvent>;
}

impl EventSource for Consumer<ControlEvent> {
    fn pop(&mut self) -> Option<ControlEvent> {
        Consumer::pop(self).ok()
    }
}
