// Attack/decay envelope generator.

/// Current segment of an attack/decay envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    Idle,
    Attack,
    Decay,
}

/// One-shot attack/decay ramp generator.
///
/// The envelope:
/// - is retriggerable at any time (a trigger always restarts the attack,
///   abandoning an in-flight ramp)
/// - holds at `min` once the decay completes
/// - latches durations and endpoints on segment entry, so setters never
///   warp a ramp that is already running
pub struct AdEnvelope {
    segment: Segment,
    value: f32,

    // Samples elapsed in the current segment, and its latched length
    pos: f32,
    seg_samples: f32,

    // Latched endpoints of the current segment
    start: f32,
    end: f32,

    // Pending parameters, picked up at the next segment transition
    attack: f32,
    decay: f32,
    min: f32,
    max: f32,

    // Exponent applied to the decay progress fraction (< 1.0 drops fast
    // early, giving percussive sweeps)
    curve: f32,

    sample_rate: f32,
}

const MIN_SEGMENT_SECONDS: f32 = 0.0005;

impl AdEnvelope {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            segment: Segment::Idle,
            value: 0.0,
            pos: 0.0,
            seg_samples: 1.0,
            start: 0.0,
            end: 0.0,
            attack: 0.01,
            decay: 0.2,
            min: 0.0,
            max: 1.0,
            curve: 1.0,
            sample_rate,
        }
    }

    /// Restart at the beginning of the attack segment, unconditionally.
    pub fn trigger(&mut self) {
        self.segment = Segment::Attack;
        self.pos = 0.0;
        self.seg_samples = (self.attack * self.sample_rate).max(1.0);
        self.start = self.min;
        self.end = self.max;
        self.value = self.min;
    }

    /// Advance one sample and return the current value in [min, max].
    pub fn process(&mut self) -> f32 {
        match self.segment {
            Segment::Idle => {
                self.value = self.min;
            }

            Segment::Attack => {
                self.pos += 1.0;
                let t = (self.pos / self.seg_samples).min(1.0);
                self.value = self.start + (self.end - self.start) * t;
                if self.pos >= self.seg_samples {
                    self.enter_decay();
                }
            }

            Segment::Decay => {
                self.pos += 1.0;
                let t = (self.pos / self.seg_samples).min(1.0);
                let shaped = if self.curve == 1.0 { t } else { t.powf(self.curve) };
                self.value = self.start + (self.end - self.start) * shaped;
                if self.pos >= self.seg_samples {
                    self.segment = Segment::Idle;
                    self.value = self.end;
                }
            }
        }

        self.value
    }

    fn enter_decay(&mut self) {
        let peak = self.end;
        self.segment = Segment::Decay;
        self.pos = 0.0;
        self.seg_samples = (self.decay * self.sample_rate).max(1.0);
        self.start = peak;
        self.end = self.min;
    }

    /// Most recent output value (does not advance state).
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.segment == Segment::Idle
    }

    pub fn set_attack(&mut self, seconds: f32) {
        self.attack = seconds.max(MIN_SEGMENT_SECONDS);
    }

    pub fn set_decay(&mut self, seconds: f32) {
        self.decay = seconds.max(MIN_SEGMENT_SECONDS);
    }

    pub fn set_min(&mut self, min: f32) {
        self.min = min;
    }

    pub fn set_max(&mut self, max: f32) {
        self.max = max;
    }

    pub fn set_curve(&mut self, exponent: f32) {
        self.curve = exponent.max(0.01);
    }

    pub fn reset(&mut self) {
        self.segment = Segment::Idle;
        self.value = self.min;
        self.pos = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SR: f32 = 48_000.0;

    #[test]
    fn test_idle_holds_min() {
        let mut env = AdEnvelope::new(SR);
        env.set_min(0.25);
        for _ in 0..64 {
            assert_relative_eq!(env.process(), 0.25);
        }
    }

    #[test]
    fn test_attack_reaches_max_then_decays_to_min() {
        let mut env = AdEnvelope::new(SR);
        env.set_attack(0.001); // 48 samples
        env.set_decay(0.002); // 96 samples
        env.trigger();

        let mut peak = 0.0f32;
        for _ in 0..48 {
            peak = peak.max(env.process());
        }
        assert_relative_eq!(peak, 1.0);

        for _ in 0..96 {
            env.process();
        }
        assert!(env.is_idle());
        assert_relative_eq!(env.value(), 0.0);

        // Stays at min afterwards
        for _ in 0..32 {
            assert_relative_eq!(env.process(), 0.0);
        }
    }

    #[test]
    fn test_retrigger_mid_decay_restarts_at_attack_start() {
        let mut env = AdEnvelope::new(SR);
        env.set_attack(0.001);
        env.set_decay(0.1);
        env.trigger();

        // Run through the attack and partway into the decay
        for _ in 0..500 {
            env.process();
        }
        let mid_decay = env.value();
        assert!(mid_decay > 0.0 && mid_decay < 1.0);

        env.trigger();
        // Restarts from min, not from the intermediate decay value
        assert_relative_eq!(env.value(), 0.0);
        let first = env.process();
        assert!(first < mid_decay);
    }

    #[test]
    fn test_setters_do_not_warp_inflight_segment() {
        let mut env = AdEnvelope::new(SR);
        env.set_attack(0.001); // 48 samples
        env.set_decay(0.002); // 96 samples latched at decay entry
        env.trigger();
        for _ in 0..48 {
            env.process();
        }

        // Now in the decay; changing the decay time must not reschedule it
        env.set_decay(10.0);
        for _ in 0..96 {
            env.process();
        }
        assert!(env.is_idle());
    }

    #[test]
    fn test_decay_curve_drops_faster_than_linear() {
        let mut linear = AdEnvelope::new(SR);
        let mut curved = AdEnvelope::new(SR);
        for env in [&mut linear, &mut curved] {
            env.set_attack(0.001);
            env.set_decay(0.01);
            env.trigger();
            for _ in 0..48 {
                env.process();
            }
        }
        curved.set_curve(0.35);
        // Restart both so they descend from the same point
        linear.trigger();
        curved.trigger();
        for env in [&mut linear, &mut curved] {
            for _ in 0..48 + 120 {
                env.process();
            }
        }
        assert!(curved.value() < linear.value());
    }
}
