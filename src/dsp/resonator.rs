// Resonant-excitation percussion model.

use std::f32::consts::TAU;

/// Damped two-pole resonator pinged by a short excitation impulse.
///
/// Unlike the oscillator and noise sources, the amplitude decays
/// intrinsically; no external envelope is applied to the audio path.
pub struct PingResonator {
    freq: f32,
    decay: f32,
    excitation: f32,
    sample_rate: f32,

    // y[n] = a1*y[n-1] + a2*y[n-2] + gain * x[n]
    a1: f32,
    a2: f32,
    gain: f32,
    y1: f32,
    y2: f32,

    // Impulse pending for the next sample after a trigger
    pending: f32,
}

impl PingResonator {
    pub fn new(sample_rate: f32) -> Self {
        let mut resonator = Self {
            freq: 200.0,
            decay: 0.3,
            excitation: 1.0,
            sample_rate,
            a1: 0.0,
            a2: 0.0,
            gain: 0.0,
            y1: 0.0,
            y2: 0.0,
            pending: 0.0,
        };
        resonator.recalc_coeffs();
        resonator
    }

    pub fn set_freq(&mut self, freq: f32) {
        let freq = freq.clamp(20.0, self.sample_rate * 0.45);
        if freq != self.freq {
            self.freq = freq;
            self.recalc_coeffs();
        }
    }

    /// Time for the ring to fall to 1/e of its initial amplitude.
    pub fn set_decay(&mut self, seconds: f32) {
        let seconds = seconds.max(0.001);
        if seconds != self.decay {
            self.decay = seconds;
            self.recalc_coeffs();
        }
    }

    /// Strength of the excitation impulse, nominally [0, 1].
    pub fn set_excitation(&mut self, level: f32) {
        self.excitation = level.max(0.0);
    }

    fn recalc_coeffs(&mut self) {
        let w = TAU * self.freq / self.sample_rate;
        let r = (-1.0 / (self.decay * self.sample_rate)).exp();
        self.a1 = 2.0 * r * w.cos();
        self.a2 = -r * r;
        // Impulse response peaks near 1/sin(w); normalize it away
        self.gain = w.sin();
    }

    /// Queue an excitation impulse for the next rendered sample.
    pub fn trigger(&mut self) {
        self.pending = self.excitation;
    }

    #[inline]
    pub fn process(&mut self) -> f32 {
        let x = self.pending * self.gain;
        self.pending = 0.0;

        let y = self.a1 * self.y1 + self.a2 * self.y2 + x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }

    pub fn reset(&mut self) {
        self.y1 = 0.0;
        self.y2 = 0.0;
        self.pending = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_until_triggered() {
        let mut res = PingResonator::new(48_000.0);
        for _ in 0..256 {
            assert_eq!(res.process(), 0.0);
        }
    }

    #[test]
    fn test_ring_is_bounded_and_decays() {
        let mut res = PingResonator::new(48_000.0);
        res.set_freq(220.0);
        res.set_decay(0.05);
        res.trigger();

        let mut early_peak = 0.0f32;
        for _ in 0..2400 {
            early_peak = early_peak.max(res.process().abs());
        }
        assert!(early_peak > 0.1 && early_peak <= 1.5);

        // Ten decay constants later the ring is essentially gone
        for _ in 0..21_600 {
            res.process();
        }
        let mut late_peak = 0.0f32;
        for _ in 0..2400 {
            late_peak = late_peak.max(res.process().abs());
        }
        assert!(late_peak < early_peak * 0.05);
    }

    #[test]
    fn test_excitation_level_scales_ring() {
        let peak = |level: f32| {
            let mut res = PingResonator::new(48_000.0);
            res.set_excitation(level);
            res.trigger();
            let mut peak = 0.0f32;
            for _ in 0..4800 {
                peak = peak.max(res.process().abs());
            }
            peak
        };
        assert_eq!(peak(0.0), 0.0);
        assert!(peak(1.0) > peak(0.25));
    }
}
