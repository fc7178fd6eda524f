// src/main.rs
//
// Offline demo: programs a pattern, drives the engine the way an audio
// callback would, and renders a few seconds to a WAV file.

use anyhow::Context;
use drumfield::{buttons, knobs, ControlFrame, Engine, KNOB_COUNT, VOICE_COUNT};

const SAMPLE_RATE: u32 = 48_000;
const BLOCK_FRAMES: usize = 48;
const RENDER_SECONDS: usize = 8;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut engine = Engine::new(SAMPLE_RATE as f32);

    // Four-on-the-floor kick, snare backbeat, eighth hats, and a tonal
    // accent at the end of the bar
    let pattern = engine.pattern_mut();
    for step in [0, 4, 8, 12] {
        pattern.set(0, step, true);
    }
    for step in [4, 12] {
        pattern.set(1, step, true);
    }
    for step in (0..16).step_by(2) {
        pattern.set(2, step, true);
    }
    pattern.set(3, 14, true);

    // Knobs at rest: mid tempo, voice 0 selected
    let mut rest = [0.5f32; KNOB_COUNT];
    rest[knobs::TEMPO] = 0.5; // 6 Hz
    rest[knobs::MODE] = 0.0;

    let mut out = vec![0.0f32; BLOCK_FRAMES * 2];
    let mut rendered: Vec<f32> = Vec::new();

    // Prime the mapper, then hit the transport button
    engine.process_block(&ControlFrame::idle(rest), &mut out);
    rendered.extend_from_slice(&out);
    engine.process_block(&ControlFrame::idle(rest).with_button(buttons::TRANSPORT), &mut out);
    rendered.extend_from_slice(&out);

    let blocks = RENDER_SECONDS * SAMPLE_RATE as usize / BLOCK_FRAMES;
    let frame = ControlFrame::idle(rest);
    for _ in 0..blocks {
        engine.process_block(&frame, &mut out);
        rendered.extend_from_slice(&out);
    }

    let cv = engine.cv_levels();
    log::info!(
        "rendered {}s at step {} (cv: {:?})",
        RENDER_SECONDS,
        engine.step_index(),
        &cv[..VOICE_COUNT]
    );

    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let path = "drumfield-demo.wav";
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("creating {path}"))?;
    for sample in &rendered {
        writer.write_sample(*sample)?;
    }
    writer.finalize().context("finalizing WAV")?;

    println!("wrote {path} ({} frames)", rendered.len() / 2);
    Ok(())
}
