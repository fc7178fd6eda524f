// Phase-accumulator oscillator.

use std::f32::consts::TAU;

/// Waveform selected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
}

/// Periodic oscillator with settable instantaneous frequency and amplitude.
///
/// Frequency is typically driven sample-by-sample from a pitch envelope to
/// produce a downward sweep.
pub struct Oscillator {
    wave: Waveform,
    phase: f32,
    freq: f32,
    amp: f32,
    sample_rate: f32,
}

impl Oscillator {
    pub fn new(sample_rate: f32, wave: Waveform) -> Self {
        Self {
            wave,
            phase: 0.0,
            freq: 440.0,
            amp: 1.0,
            sample_rate,
        }
    }

    #[inline]
    pub fn set_freq(&mut self, freq: f32) {
        self.freq = freq.max(0.0);
    }

    #[inline]
    pub fn set_amp(&mut self, amp: f32) {
        self.amp = amp;
    }

    /// Advance one sample and return the next value.
    #[inline]
    pub fn process(&mut self) -> f32 {
        let sample = match self.wave {
            Waveform::Sine => (self.phase * TAU).sin(),
            Waveform::Triangle => {
                if self.phase < 0.5 {
                    4.0 * self.phase - 1.0
                } else {
                    3.0 - 4.0 * self.phase
                }
            }
        };

        self.phase = (self.phase + self.freq / self.sample_rate).fract();
        sample * self.amp
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
