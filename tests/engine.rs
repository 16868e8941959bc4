use voicegraph::{
    io::{AudioInput, AudioOutput},
    params::EngineParam,
    synth::VoiceSignal,
    tuning::ScaleDefinition,
    ControlEvent, Engine, EngineBuilder, EngineConfig, EngineError, EngineHandle,
};

const BLOCK: usize = 256;

fn engine(config: EngineConfig) -> (Engine, EngineHandle) {
    EngineBuilder::new(config).build().unwrap()
}

fn dry() -> EngineConfig {
    EngineConfig {
        max_block_size: BLOCK,
        reverb: false,
        ..EngineConfig::default()
    }
}

fn run(engine: &mut Engine, output: &mut AudioOutput, blocks: usize) -> f32 {
    let input = AudioInput::default();
    let mut peak = 0.0f32;
    for _ in 0..blocks {
        engine.process_block(&input, output).unwrap();
        for channel in &output.buffers {
            peak = channel.iter().fold(peak, |m, x| m.max(x.abs()));
        }
    }
    peak
}

#[test]
fn renders_silence_with_no_notes() {
    let (mut engine, _handle) = engine(EngineConfig::default());
    let mut output = AudioOutput::new(2, 512);
    assert_eq!(run(&mut engine, &mut output, 4), 0.0);
}

#[test]
fn note_sounds_and_releases() {
    let (mut engine, mut handle) = engine(dry());
    let mut output = AudioOutput::new(2, BLOCK);

    assert!(handle.note_on(69, 1.0));
    let peak = run(&mut engine, &mut output, 4);
    assert!(peak > 0.05 && peak <= 1.0, "peak {peak}");
    assert!(output.buffers[0].iter().all(|x| x.is_finite()));
    assert_eq!(output.buffers[0], output.buffers[1]);

    handle.note_off(69);
    // the 3 ms amp ramp takes a few blocks to fall below -60 dB
    run(&mut engine, &mut output, 5);
    assert!(run(&mut engine, &mut output, 8) < 1e-3);
    assert_eq!(engine.stats().blocks(), 17);
}

#[test]
fn level_scales_the_output() {
    let (mut engine, mut handle) = engine(dry());
    let mut output = AudioOutput::new(1, BLOCK);
    handle.note_on(60, 1.0);
    let loud = run(&mut engine, &mut output, 8);

    handle.set_param("volume", 0.0).unwrap();
    assert_eq!(handle.param(EngineParam::Level), 0.0);
    assert_eq!(run(&mut engine, &mut output, 1), 0.0);
    assert!(loud > 0.0);
}

#[test]
fn input_passes_through_to_every_main_channel() {
    let (mut engine, _handle) = engine(dry());
    let mut input = AudioInput::new(1, BLOCK);
    input.buffers[0].fill(0.5);
    let mut output = AudioOutput::new(3, BLOCK);
    output.buffers[2].fill(1.0);

    engine.process_block(&input, &mut output).unwrap();
    let level = EngineParam::Level.spec().default;
    assert!(output.buffers[0].iter().all(|&x| (x - 0.5 * level).abs() < 1e-6));
    assert!(output.buffers[1].iter().all(|&x| (x - 0.5 * level).abs() < 1e-6));
    assert!(output.buffers[2].iter().all(|&x| x == 0.0));
}

#[test]
fn reverb_adds_a_tail() {
    let (mut engine, mut handle) = engine(EngineConfig {
        max_block_size: BLOCK,
        ..EngineConfig::default()
    });
    handle.set_param("wet", 1.0).unwrap();
    let mut output = AudioOutput::new(2, BLOCK);
    handle.note_on(64, 1.0);
    run(&mut engine, &mut output, 8);
    handle.note_off(64);
    run(&mut engine, &mut output, 8);

    // the dry voice is gone, the network is still ringing
    assert!(run(&mut engine, &mut output, 4) > 1e-3);
    assert_ne!(output.buffers[0], output.buffers[1]);
}

#[test]
fn unknown_parameters_are_rejected() {
    let (_engine, mut handle) = engine(dry());
    assert_eq!(
        handle.set_param("wobble", 1.0),
        Err(EngineError::UnknownParam("wobble".into()))
    );
    assert!(handle.set_param_proportion("cutoff", 1.0).is_ok());
    assert!((handle.param(EngineParam::Cutoff) - 20_000.0).abs() < 1.0);
}

#[test]
fn full_event_queue_counts_drops() {
    let (_engine, mut handle) = engine(EngineConfig {
        event_capacity: 4,
        ..dry()
    });
    let accepted = (0..6).filter(|&n| handle.note_on(60 + n, 1.0)).count();
    assert_eq!(accepted, 4);
    assert_eq!(handle.stats().dropped_events(), 2);
}

#[test]
fn overflowing_voices_are_stolen() {
    let (mut engine, mut handle) = engine(EngineConfig {
        max_voices: 2,
        ..dry()
    });
    for note in [60, 64, 67] {
        handle.note_on(note, 1.0);
    }
    let mut output = AudioOutput::new(2, BLOCK);
    run(&mut engine, &mut output, 1);
    assert_eq!(handle.stats().steals(), 1);
    assert_eq!(handle.stats().dropped_notes(), 0);
}

#[test]
fn scale_changes_reach_the_voices() {
    let (mut engine, mut handle) = engine(dry());
    let mut output = AudioOutput::new(2, BLOCK);
    let pitch = |engine: &Engine| {
        let signals = engine.synth().input().signals();
        let v = (0..signals.voices())
            .find(|&v| signals.value(v, VoiceSignal::Gate, BLOCK - 1) > 0.0)
            .unwrap();
        signals.value(v, VoiceSignal::Pitch, BLOCK - 1)
    };

    handle.send_event(ControlEvent::note_on(70, 1.0, 0));
    run(&mut engine, &mut output, 1);
    assert!((pitch(&engine) - 1.0 / 12.0).abs() < 1e-5);

    assert_eq!(handle.load_scale(&ScaleDefinition::equal(24)), Ok(true));
    handle.note_off(70);
    handle.note_on(70, 1.0);
    run(&mut engine, &mut output, 1);
    assert!((pitch(&engine) - 1.0 / 24.0).abs() < 1e-5);
}

#[test]
fn all_notes_off_and_reset_silence_the_engine() {
    let (mut engine, mut handle) = engine(dry());
    let mut output = AudioOutput::new(2, BLOCK);
    handle.note_on(60, 1.0);
    handle.note_on(67, 1.0);
    assert!(run(&mut engine, &mut output, 4) > 0.0);

    assert!(handle.all_notes_off());
    run(&mut engine, &mut output, 5);
    assert!(run(&mut engine, &mut output, 8) < 1e-3);

    handle.note_on(62, 1.0);
    run(&mut engine, &mut output, 4);
    assert!(handle.reset());
    assert_eq!(run(&mut engine, &mut output, 1), 0.0);
}

#[test]
fn rebuild_changes_the_sample_rate() {
    let (engine, _handle) = engine(dry());
    let mut builder = engine.into_builder();
    builder.config_mut().sample_rate = 44_100.0;
    let (mut engine, mut handle) = builder.build().unwrap();
    assert_eq!(engine.sample_rate(), 44_100.0);

    handle.note_on(69, 1.0);
    let mut output = AudioOutput::new(2, BLOCK);
    assert!(run(&mut engine, &mut output, 2) > 0.0);
}

#[test]
fn bad_voice_chain_fails_to_build() {
    let result = EngineBuilder::new(EngineConfig {
        voice_chain: vec!["osc.saw".into()],
        ..dry()
    })
    .build();
    assert!(matches!(result, Err(EngineError::UnknownNode(_))));
}
