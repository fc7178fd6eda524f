// src/voice.rs

use crate::dsp::{
    AdEnvelope, DcBlocker, FilterTap, Oscillator, PingResonator, SvfFilter, Waveform, WhiteNoise,
};

pub const VOICE_COUNT: usize = 5;

/// Full-scale value for the auxiliary control-voltage outputs (12-bit DAC).
pub const CV_FULL_SCALE: f32 = 4095.0;

/// Percussion timbre of a voice, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceKind {
    Kick,
    Snare,
    Hat,
    Tonal,
    Auxiliary,
}

impl VoiceKind {
    pub const ALL: [VoiceKind; VOICE_COUNT] = [
        VoiceKind::Kick,
        VoiceKind::Snare,
        VoiceKind::Hat,
        VoiceKind::Tonal,
        VoiceKind::Auxiliary,
    ];
}

/// Mapping curve from a normalized control to a physical value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveKind {
    Linear,
    /// Squared input before scaling; used for frequency-like controls.
    Exponential,
}

/// Affine calibration from a raw [0, 1] control to physical units.
#[derive(Debug, Clone, Copy)]
pub struct Calibration {
    pub multiplier: f32,
    pub offset: f32,
    pub curve: CurveKind,
}

impl Calibration {
    #[inline]
    pub fn apply(&self, raw: f32) -> f32 {
        let shaped = match self.curve {
            CurveKind::Linear => raw,
            CurveKind::Exponential => raw * raw,
        };
        shaped * self.multiplier + self.offset
    }
}

/// Per-voice calibration of the pitch and decay controls. FX and
/// amplitude are consumed as raw [0, 1] values.
#[derive(Debug, Clone, Copy)]
pub struct VoiceCalibration {
    pub pitch: Calibration,
    pub decay: Calibration,
}

impl VoiceCalibration {
    fn for_kind(kind: VoiceKind) -> Self {
        let (pitch_mult, pitch_offset, decay_mult, decay_offset) = match kind {
            VoiceKind::Kick => (100.0, 100.0, 0.2, 0.01),
            VoiceKind::Snare => (2000.0, 1000.0, 0.5, 0.1),
            VoiceKind::Hat => (4000.0, 3000.0, 0.5, 0.05),
            VoiceKind::Tonal => (4000.0, 500.0, 1.0, 0.1),
            VoiceKind::Auxiliary => (200.0, 100.0, 0.5, 0.1),
        };
        Self {
            pitch: Calibration {
                multiplier: pitch_mult,
                offset: pitch_offset,
                curve: CurveKind::Exponential,
            },
            decay: Calibration {
                multiplier: decay_mult,
                offset: decay_offset,
                curve: CurveKind::Linear,
            },
        }
    }
}

/// Primary signal generator of a voice.
enum Source {
    Osc(Oscillator),
    Noise(WhiteNoise),
    Ping(PingResonator),
}

/// One complete percussion timbre: source, envelope(s), tone shaping,
/// and a gain stage.
///
/// `render()` is callable every sample regardless of trigger state and
/// returns silence when idle. Voices never read each other's state.
pub struct Voice {
    kind: VoiceKind,
    cal: VoiceCalibration,
    source: Source,
    amp_env: AdEnvelope,
    pitch_env: Option<AdEnvelope>,
    filter: Option<SvfFilter>,
    dc: Option<DcBlocker>,
    level: f32,
}

impl Voice {
    pub fn new(kind: VoiceKind, sample_rate: f32) -> Self {
        let mut amp_env = AdEnvelope::new(sample_rate);
        amp_env.set_attack(0.01);
        amp_env.set_decay(0.2);

        let (source, pitch_env, filter, dc) = match kind {
            VoiceKind::Kick => {
                // Raw noise ringing a low, high-resonance low-pass
                let mut filter = SvfFilter::new(sample_rate, FilterTap::Lowpass);
                filter.set_cutoff(120.0);
                filter.set_resonance(0.9);
                (
                    Source::Noise(WhiteNoise::new(0x0d72)),
                    None,
                    Some(filter),
                    Some(DcBlocker::new(sample_rate)),
                )
            }

            VoiceKind::Snare => {
                let mut filter = SvfFilter::new(sample_rate, FilterTap::Bandpass);
                filter.set_cutoff(1500.0);
                filter.set_resonance(0.5);
                (
                    Source::Noise(WhiteNoise::new(0x5a0e)),
                    None,
                    Some(filter),
                    Some(DcBlocker::new(sample_rate)),
                )
            }

            VoiceKind::Hat => {
                let mut filter = SvfFilter::new(sample_rate, FilterTap::Highpass);
                filter.set_cutoff(6000.0);
                filter.set_resonance(0.5);
                (
                    Source::Noise(WhiteNoise::new(0xa7c3)),
                    None,
                    Some(filter),
                    Some(DcBlocker::new(sample_rate)),
                )
            }

            VoiceKind::Tonal => {
                let mut pitch_env = AdEnvelope::new(sample_rate);
                pitch_env.set_attack(0.001);
                pitch_env.set_decay(0.15);
                pitch_env.set_min(500.0);
                pitch_env.set_max(2500.0);
                pitch_env.set_curve(0.35);
                (
                    Source::Osc(Oscillator::new(sample_rate, Waveform::Sine)),
                    Some(pitch_env),
                    None,
                    None,
                )
            }

            VoiceKind::Auxiliary => {
                (Source::Ping(PingResonator::new(sample_rate)), None, None, None)
            }
        };

        Self {
            kind,
            cal: VoiceCalibration::for_kind(kind),
            source,
            amp_env,
            pitch_env,
            filter,
            dc,
            level: 0.8,
        }
    }

    #[inline]
    pub fn kind(&self) -> VoiceKind {
        self.kind
    }

    #[inline]
    pub fn calibration(&self) -> &VoiceCalibration {
        &self.cal
    }

    /// Fire the amplitude envelope and, where present, the pitch envelope
    /// and excitation as a single gate event.
    pub fn trigger(&mut self) {
        self.amp_env.trigger();
        if let Some(env) = &mut self.pitch_env {
            env.trigger();
        }
        if let Source::Ping(res) = &mut self.source {
            res.trigger();
        }
    }

    /// Advance one sample and return the shaped, scaled output.
    pub fn render(&mut self) -> f32 {
        let Self {
            kind,
            source,
            amp_env,
            pitch_env,
            filter,
            dc,
            level,
            ..
        } = self;

        let amp = amp_env.process();

        let shaped = match source {
            Source::Osc(osc) => {
                if let Some(env) = pitch_env {
                    osc.set_freq(env.process());
                }
                osc.process() * amp * amp
            }

            Source::Noise(noise) => {
                let x = noise.process();
                // The kick rings its filter with raw noise and applies the
                // envelope after; snare and hat envelope the noise first.
                let (pre, post) = match kind {
                    VoiceKind::Kick => (x, amp * amp),
                    _ => (x * amp * amp, 1.0),
                };
                let mut s = pre;
                if let Some(f) = filter {
                    s = f.process(s);
                }
                if let Some(dc) = dc {
                    s = dc.process(s);
                }
                s * post
            }

            Source::Ping(res) => res.process(),
        };

        shaped * *level * *level
    }

    /// Push one block's committed parameters, already calibrated to
    /// physical units where applicable.
    ///
    /// - `pitch`: Hz (filter cutoff, sweep top, or resonator frequency)
    /// - `decay`: seconds (amplitude envelope decay)
    /// - `fx`: raw [0, 1] (resonance, sweep depth, or excitation)
    /// - `level`: raw [0, 1] output gain, squared at render time
    pub fn set_params(&mut self, pitch: f32, decay: f32, fx: f32, level: f32) {
        self.level = level;
        self.amp_env.set_decay(decay);

        match self.kind {
            VoiceKind::Kick | VoiceKind::Snare | VoiceKind::Hat => {
                if let Some(filter) = &mut self.filter {
                    filter.set_cutoff(pitch);
                    filter.set_resonance(fx);
                }
            }

            VoiceKind::Tonal => {
                if let Some(env) = &mut self.pitch_env {
                    env.set_max(pitch);
                    env.set_min((pitch * (1.0 - 0.9 * fx)).max(20.0));
                }
            }

            VoiceKind::Auxiliary => {
                if let Source::Ping(res) = &mut self.source {
                    res.set_freq(pitch);
                    res.set_decay(decay);
                    res.set_excitation(0.25 + 0.75 * fx);
                }
            }
        }
    }

    /// Amplitude envelope level for the control-voltage output path.
    #[inline]
    pub fn envelope_level(&self) -> f32 {
        self.amp_env.value()
    }

    /// Envelope level scaled to the fixed integer CV range.
    #[inline]
    pub fn cv_level(&self) -> u16 {
        (self.envelope_level().clamp(0.0, 1.0) * CV_FULL_SCALE) as u16
    }

    pub fn reset(&mut self) {
        self.amp_env.reset();
        if let Some(env) = &mut self.pitch_env {
            env.reset();
        }
        if let Some(filter) = &mut self.filter {
            filter.reset();
        }
        if let Some(dc) = &mut self.dc {
            dc.reset();
        }
        match &mut self.source {
            Source::Osc(osc) => osc.reset(),
            Source::Ping(res) => res.reset(),
            Source::Noise(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SR: f32 = 48_000.0;

    #[test]
    fn test_untriggered_voice_is_silent() {
        for kind in VoiceKind::ALL {
            let mut voice = Voice::new(kind, SR);
            for _ in 0..512 {
                assert_relative_eq!(voice.render(), 0.0, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_trigger_produces_sound_then_fades() {
        for kind in VoiceKind::ALL {
            let mut voice = Voice::new(kind, SR);
            let pitch = voice.calibration().pitch.apply(0.5);
            voice.set_params(pitch, 0.05, 0.5, 1.0);
            voice.trigger();

            let mut peak = 0.0f32;
            for _ in 0..4800 {
                peak = peak.max(voice.render().abs());
            }
            assert!(peak > 0.01, "{kind:?} stayed silent after trigger");

            // A second later the one-shot has died away
            let mut tail = 0.0f32;
            for _ in 0..SR as usize {
                tail = tail.max(voice.render().abs());
            }
            assert!(tail < peak * 0.1, "{kind:?} did not decay");
        }
    }

    #[test]
    fn test_zero_level_is_bit_exact_silence() {
        for kind in VoiceKind::ALL {
            let mut voice = Voice::new(kind, SR);
            voice.set_params(200.0, 0.2, 0.5, 0.0);
            voice.trigger();
            for _ in 0..2400 {
                assert_eq!(voice.render(), 0.0, "{kind:?} leaked with zero gain");
            }
        }
    }

    #[test]
    fn test_cv_tracks_amplitude_envelope() {
        let mut voice = Voice::new(VoiceKind::Auxiliary, SR);
        assert_eq!(voice.cv_level(), 0);
        voice.trigger();
        for _ in 0..2400 {
            voice.render();
        }
        assert!(voice.cv_level() > 0);
        for _ in 0..SR as usize {
            voice.render();
        }
        assert_eq!(voice.cv_level(), 0);
    }

    #[test]
    fn test_calibration_curves() {
        let cal = VoiceCalibration::for_kind(VoiceKind::Kick);
        // Exponential pitch: raw is squared before the affine map
        assert_relative_eq!(cal.pitch.apply(0.0), 100.0);
        assert_relative_eq!(cal.pitch.apply(0.5), 125.0);
        assert_relative_eq!(cal.pitch.apply(1.0), 200.0);
        // Linear decay
        assert_relative_eq!(cal.decay.apply(0.5), 0.11);
        assert_relative_eq!(cal.decay.apply(1.0), 0.21);
    }
}
