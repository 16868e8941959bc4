use crate::{
    io::midi::MidiEvent,
    synth::message::{ControlEvent, EventKind},
};

/// Sustain pedal controller number.
pub const CC_SUSTAIN: u8 = 64;

/// Instigator id for a key on a channel. Channel 0 ids equal the key, as
/// for [`ControlEvent::note_on`].
#[inline]
pub fn note_id(channel: u8, key: u8) -> i32 {
    (channel as i32) << 8 | key as i32
}

#[inline]
fn unit(value: u8) -> f32 {
    value as f32 / 127.0
}

/// Convert a MIDI message to a control event at sample offset `time`.
///
/// Notes are keyed by channel and key (see [`note_id`]), so the matching
/// note-off finds the voice even when the same key is held on another channel. Note-on with velocity 0 stays a note-on; the allocator treats it as
/// a release. CC 64 becomes a sustain event. Program changes have no
/// counterpart and give `None`.
pub fn midi_to_event(midi: MidiEvent, time: usize) -> Option<ControlEvent> {
    let event = match midi {
        MidiEvent::NoteOn {
            channel,
            key,
            velocity,
        } => ControlEvent::new(EventKind::NoteOn, channel, note_id(channel, key), time, key as f32, unit(velocity)),
        MidiEvent::NoteOff {
            channel,
            key,
            velocity,
        } => ControlEvent::new(EventKind::NoteOff, channel, note_id(channel, key), time, key as f32, unit(velocity)),
        MidiEvent::PolyPressure {
            channel,
            key,
            pressure,
        } => ControlEvent::new(
            EventKind::NotePressure,
            channel,
            note_id(channel, key),
            time,
            key as f32,
            unit(pressure),
        ),
        MidiEvent::ControlChange {
            channel,
            controller: CC_SUSTAIN,
            value,
        } => ControlEvent::sustain(value >= 64, time).with_channel(channel),
        MidiEvent::ControlChange {
            channel,
            controller,
            value,
        } => ControlEvent::controller(controller, unit(value), time).with_channel(channel),
        MidiEvent::ChannelPressure { channel, pressure } => {
            ControlEvent::channel_pressure(unit(pressure), time).with_channel(channel)
        }
        MidiEvent::PitchBend { channel, value } => {
            ControlEvent::pitch_wheel((value as f32 / 8192.0).clamp(-1.0, 1.0), time).with_channel(channel)
        }
        MidiEvent::ProgramChange { .. } => return None,
    };
    Some(event)
}

/// Like [`midi_to_event`], keeping only messages on `channel`.
pub fn midi_to_event_on_channel(midi: MidiEvent, channel: u8, time: usize) -> Option<ControlEvent> {
    if midi.channel() != channel {
        return None;
    }
    midi_to_event(midi, time)
}
