//! Raw MIDI bytes driving a running engine.

use voicegraph::{
    io::{converter::midi_to_event, midi::MidiEvent, AudioInput, AudioOutput},
    synth::VoiceSignal,
    EngineBuilder, EngineConfig,
};

const BLOCK: usize = 128;

fn feed(handle: &mut voicegraph::EngineHandle, bytes: &[u8]) {
    let event = MidiEvent::from_bytes(bytes).and_then(|midi| midi_to_event(midi, 0)).unwrap();
    assert!(handle.send_event(event));
}

#[test]
fn sustain_pedal_holds_a_released_key() {
    let (mut engine, mut handle) = EngineBuilder::new(EngineConfig {
        max_block_size: BLOCK,
        reverb: false,
        ..EngineConfig::default()
    })
    .build()
    .unwrap();
    let input = AudioInput::default();
    let mut output = AudioOutput::new(2, BLOCK);
    let gate = |engine: &voicegraph::Engine| {
        let signals = engine.synth().input().signals();
        (0..signals.voices())
            .map(|v| signals.value(v, VoiceSignal::Gate, BLOCK - 1))
            .sum::<f32>()
    };

    feed(&mut handle, &[0xB0, 64, 127]);
    feed(&mut handle, &[0x90, 60, 100]);
    engine.process_block(&input, &mut output).unwrap();
    assert_eq!(gate(&engine), 1.0);

    feed(&mut handle, &[0x80, 60, 0]);
    engine.process_block(&input, &mut output).unwrap();
    assert_eq!(gate(&engine), 1.0);

    feed(&mut handle, &[0xB0, 64, 0]);
    engine.process_block(&input, &mut output).unwrap();
    assert_eq!(gate(&engine), 0.0);
}

#[test]
fn pitch_bend_moves_the_voice() {
    let (mut engine, mut handle) = EngineBuilder::new(EngineConfig {
        max_block_size: BLOCK,
        reverb: false,
        ..EngineConfig::default()
    })
    .build()
    .unwrap();
    let input = AudioInput::default();
    let mut output = AudioOutput::new(1, BLOCK);

    feed(&mut handle, &[0x90, 69, 100]);
    // full upward bend: 14-bit 0x3fff
    feed(&mut handle, &[0xE0, 0x7F, 0x7F]);
    engine.process_block(&input, &mut output).unwrap();

    let pitch = engine.synth().input().signals().value(0, VoiceSignal::Pitch, BLOCK - 1);
    // default bend range is two semitones
    assert!((pitch - 2.0 / 12.0).abs() < 1e-3, "pitch {pitch}");
}

#[test]
fn same_key_on_two_channels_releases_independently() {
    let (mut engine, mut handle) = EngineBuilder::new(EngineConfig {
        max_block_size: BLOCK,
        reverb: false,
        ..EngineConfig::default()
    })
    .build()
    .unwrap();
    let input = AudioInput::default();
    let mut output = AudioOutput::new(2, BLOCK);
    let gates = |engine: &voicegraph::Engine| {
        let signals = engine.synth().input().signals();
        (0..signals.voices())
            .filter(|&v| signals.value(v, VoiceSignal::Gate, BLOCK - 1) > 0.0)
            .count()
    };

    feed(&mut handle, &[0x90, 60, 100]);
    feed(&mut handle, &[0x91, 60, 100]);
    engine.process_block(&input, &mut output).unwrap();
    assert_eq!(gates(&engine), 2);

    feed(&mut handle, &[0x81, 60, 0]);
    engine.process_block(&input, &mut output).unwrap();
    assert_eq!(gates(&engine), 1);
}
