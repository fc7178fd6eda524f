// src/clock.rs

/// Sample-accurate sequencer clock.
///
/// The clock:
/// - is advanced once per sample inside the render loop, so a tick lands
///   on its exact sample rather than a block boundary
/// - counts whole samples against the tick period, keeping long-run tick
///   rates exact for integral periods
/// - freezes (frequency 0) without resetting the step index, so playback
///   resumes where it left off
pub struct Clock {
    sample_rate: f64,
    freq: f64,
    period: f64,
    counter: f64,
    step: usize,
    step_count: usize,
}

impl Clock {
    pub fn new(sample_rate: f64, step_count: usize) -> Self {
        Self {
            sample_rate,
            freq: 0.0,
            period: f64::MAX,
            counter: 0.0,
            step: 0,
            step_count: step_count.max(1),
        }
    }

    /// Set the tick frequency in Hz. Zero (or negative) transitions to
    /// Idle: no ticks, step index frozen.
    pub fn set_freq(&mut self, hz: f32) {
        if hz > 0.0 {
            let period = self.sample_rate / hz as f64;
            // Carry the elapsed phase fraction into the new period, so
            // the counter can never sit past a shortened period and
            // fire a burst of back-to-back ticks
            self.counter *= period / self.period;
            self.freq = hz as f64;
            self.period = period;
        } else {
            self.freq = 0.0;
        }
    }

    #[inline]
    pub fn freq(&self) -> f32 {
        self.freq as f32
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.freq > 0.0
    }

    /// Advance one sample. Returns true exactly on the sample where a
    /// tick boundary is crossed.
    #[inline]
    pub fn process(&mut self) -> bool {
        if self.freq <= 0.0 {
            return false;
        }

        self.counter += 1.0;
        if self.counter >= self.period {
            self.counter -= self.period;
            true
        } else {
            false
        }
    }

    /// Consume a tick: returns the step to play, then advances the step
    /// index, wrapping modulo the step count.
    #[inline]
    pub fn advance(&mut self) -> usize {
        let played = self.step;
        self.step = (self.step + 1) % self.step_count;
        played
    }

    /// Next step to be played.
    #[inline]
    pub fn step(&self) -> usize {
        self.step
    }

    #[inline]
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn reset(&mut self) {
        self.counter = 0.0;
        self.step = 0;
    }
}
