// src/engine.rs

use crate::clock::Clock;
use crate::controls::{buttons, ControlFrame, PAD_COUNT};
use crate::mapper::ParamMapper;
use crate::output::OutputStage;
use crate::pattern::Pattern;
use crate::voice::{Voice, VoiceKind, VOICE_COUNT};

/// Steps per pattern for this build.
pub const STEP_COUNT: usize = 16;

/// Pad brightness for the step currently being played.
pub const PAD_LEVEL_PLAYING: f32 = 1.0;
/// Pad brightness for an active step that is not current.
pub const PAD_LEVEL_ACTIVE: f32 = 0.7;

/// Real-time drum engine.
///
/// Owns the fixed voice set, sequencer clock, pattern grid, parameter
/// mapper, and output stage; callers pass the context around explicitly
/// rather than through process-wide state.
///
/// `process_block` runs exclusively inside the audio callback. It must
/// be deterministic and allocation-free, and it never blocks or panics:
/// out-of-range configuration is clamped, not surfaced. The control
/// phase runs to completion before the render loop, so every parameter
/// change becomes visible atomically at the start of the block's render
/// and stays fixed for the whole block.
pub struct Engine {
    voices: [Voice; VOICE_COUNT],
    clock: Clock,
    pattern: Pattern,
    mapper: ParamMapper,
    output: OutputStage,

    /// Step most recently played, for the pad display
    playhead: usize,
    pad_levels: [f32; PAD_COUNT],
}

impl Engine {
    pub fn new(sample_rate: f32) -> Self {
        let mut voices: [Voice; VOICE_COUNT] =
            std::array::from_fn(|index| Voice::new(VoiceKind::ALL[index], sample_rate));
        let mut clock = Clock::new(sample_rate as f64, STEP_COUNT);
        let mapper = ParamMapper::new();

        // Voices start configured from the default parameter set
        mapper.apply(&mut voices, &mut clock);

        Self {
            voices,
            clock,
            pattern: Pattern::new(STEP_COUNT),
            mapper,
            output: OutputStage::new(),
            playhead: 0,
            pad_levels: [0.0; PAD_COUNT],
        }
    }

    /// Process one audio callback: control phase first, then the render
    /// loop. `out` is an interleaved stereo buffer (`frames * 2` samples)
    /// and is fully populated before returning.
    pub fn process_block(&mut self, controls: &ControlFrame, out: &mut [f32]) {
        debug_assert!(out.len() % 2 == 0);

        self.process_controls(controls);
        self.render(out);
    }

    fn process_controls(&mut self, controls: &ControlFrame) {
        if controls.buttons[buttons::TRANSPORT] {
            if self.clock.is_running() {
                log::debug!("transport stopped at step {}", self.clock.step());
                self.clock.set_freq(0.0);
            } else {
                log::debug!("transport started at {} Hz", self.mapper.tempo_hz());
                self.clock.set_freq(self.mapper.tempo_hz());
            }
        }

        // One-shot fires the voice selected before any mode movement in
        // this same block takes effect
        if controls.buttons[buttons::TRIGGER] {
            self.voices[self.mapper.mode()].trigger();
        }

        self.mapper.update(&controls.knobs);

        for (pad, &hit) in controls.pads.iter().enumerate() {
            if hit && pad < self.pattern.len() {
                self.pattern.toggle(self.mapper.mode(), pad);
            }
        }

        self.mapper.apply(&mut self.voices, &mut self.clock);
        self.update_pad_levels();
    }

    fn render(&mut self, out: &mut [f32]) {
        let frames = out.len() / 2;

        for frame in 0..frames {
            if self.clock.process() {
                let step = self.clock.advance();
                self.playhead = step;
                self.trigger_step(step);
            }

            let mut samples = [0.0f32; VOICE_COUNT];
            for (index, voice) in self.voices.iter_mut().enumerate() {
                samples[index] = voice.render();
            }

            let sum = self.output.mix(&samples);
            self.output.write_frame(out, frame, sum);
        }
    }

    /// Trigger every voice active at `step`, in fixed index order.
    fn trigger_step(&mut self, step: usize) {
        for (index, voice) in self.voices.iter_mut().enumerate() {
            if self.pattern.is_active(index, step) {
                voice.trigger();
            }
        }
    }

    fn update_pad_levels(&mut self) {
        let mode = self.mapper.mode();
        for step in 0..PAD_COUNT {
            self.pad_levels[step] = if step == self.playhead {
                PAD_LEVEL_PLAYING
            } else if step < self.pattern.len() && self.pattern.is_active(mode, step) {
                PAD_LEVEL_ACTIVE
            } else {
                0.0
            };
        }
    }

    /// Per-pad brightness computed during the last control phase; the
    /// caller owns transmission to the LED hardware.
    #[inline]
    pub fn pad_levels(&self) -> &[f32; PAD_COUNT] {
        &self.pad_levels
    }

    /// Per-voice amplitude envelopes scaled to the fixed CV range,
    /// block granularity.
    pub fn cv_levels(&self) -> [u16; VOICE_COUNT] {
        std::array::from_fn(|index| self.voices[index].cv_level())
    }

    #[inline]
    pub fn step_index(&self) -> usize {
        self.clock.step()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    #[inline]
    pub fn mode(&self) -> usize {
        self.mapper.mode()
    }

    #[inline]
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    #[inline]
    pub fn pattern_mut(&mut self) -> &mut Pattern {
        &mut self.pattern
    }
}
