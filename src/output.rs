// src/output.rs

use crate::voice::VOICE_COUNT;

/// Final mix and output stage.
///
/// Sums the voices with fixed per-voice weights and a master scale, and
/// duplicates the mono sum to both channels of an interleaved stereo
/// frame. No hard clamp: voices normalize themselves through their gain
/// stages, and an overshoot is passed through as-is.
pub struct OutputStage {
    voice_levels: [f32; VOICE_COUNT],
    master: f32,
}

impl OutputStage {
    pub fn new() -> Self {
        Self {
            voice_levels: [1.0; VOICE_COUNT],
            master: 1.0,
        }
    }

    #[inline]
    pub fn mix(&self, samples: &[f32; VOICE_COUNT]) -> f32 {
        let mut sum = 0.0;
        for (sample, level) in samples.iter().zip(&self.voice_levels) {
            sum += sample * level;
        }
        sum * self.master
    }

    /// Write one mono sample to both channels of an interleaved buffer.
    #[inline]
    pub fn write_frame(&self, out: &mut [f32], frame: usize, sample: f32) {
        out[frame * 2] = sample;
        out[frame * 2 + 1] = sample;
    }
}

impl Default for OutputStage {
    fn default() -> Self {
        Self::new()
    }
}
