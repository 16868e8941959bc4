//! voicegraph - plays a short chord progression through the engine
//!
//! Run with: cargo run [--features serde -- path/to/engine.toml]
//! Set RUST_LOG=voicegraph=debug to watch voice allocation.

use std::{thread, time::Duration};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing_subscriber::EnvFilter;
use voicegraph::{
    io::{AudioInput, AudioOutput},
    EngineBuilder, EngineConfig,
};

const PROGRESSION: [[u8; 4]; 4] = [[48, 55, 60, 64], [45, 52, 57, 60], [41, 48, 57, 60], [43, 50, 55, 59]];

fn load_config() -> EyreResult<EngineConfig> {
    match std::env::args().nth(1) {
        Some(path) => config_from_file(&path),
        None => Ok(EngineConfig::default()),
    }
}

#[cfg(feature = "serde")]
fn config_from_file(path: &str) -> EyreResult<EngineConfig> {
    let text = std::fs::read_to_string(path).wrap_err_with(|| format!("failed to read {path}"))?;
    EngineConfig::from_toml_str(&text).map_err(|e| eyre!("{path}: {e}"))
}

#[cfg(not(feature = "serde"))]
fn config_from_file(path: &str) -> EyreResult<EngineConfig> {
    Err(eyre!("{path}: reading a config file needs the `serde` feature"))
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let supported = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;
    let channels = supported.channels() as usize;

    let mut config = load_config()?;
    config.sample_rate = supported.sample_rate().0 as f32;
    let block = config.max_block_size;
    let (mut engine, mut handle) = EngineBuilder::new(config)
        .build()
        .map_err(|e| eyre!("failed to build engine: {e}"))?;

    handle.set_param("cutoff", 1800.0).map_err(|e| eyre!("{e}"))?;
    handle.set_param("reverb_mix", 0.3).map_err(|e| eyre!("{e}"))?;

    let input = AudioInput::default();
    let mut output = AudioOutput::new(channels.min(2), block);

    let stream = device.build_output_stream(
        &supported.into(),
        move |data: &mut [f32], _| {
            let total = data.len() / channels;
            let mut written = 0;
            while written < total {
                let frames = (total - written).min(block);
                for buffer in &mut output.buffers {
                    buffer.resize(frames, 0.0);
                }
                if engine.process_block(&input, &mut output).is_err() {
                    data.fill(0.0);
                    return;
                }
                for i in 0..frames {
                    let frame = &mut data[(written + i) * channels..(written + i + 1) * channels];
                    for (ch, sample) in frame.iter_mut().enumerate() {
                        *sample = output.buffers[ch.min(output.buffers.len() - 1)][i];
                    }
                }
                written += frames;
            }
        },
        |err| tracing::error!("audio stream error: {err}"),
        None,
    )?;
    stream.play()?;

    for chord in PROGRESSION.iter().cycle().take(8) {
        for &note in chord {
            handle.note_on(note, 0.7);
        }
        thread::sleep(Duration::from_millis(900));
        for &note in chord {
            handle.note_off(note);
        }
        thread::sleep(Duration::from_millis(100));
    }
    thread::sleep(Duration::from_secs(2));

    let stats = handle.stats();
    tracing::info!(
        blocks = stats.blocks(),
        steals = stats.steals(),
        dropped_events = stats.dropped_events(),
        "done"
    );
    Ok(())
}
