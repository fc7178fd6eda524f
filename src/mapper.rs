// src/mapper.rs

use crate::clock::Clock;
use crate::controls::{knobs, KNOB_COUNT, VOICE_KNOB_COUNT};
use crate::voice::{Voice, VOICE_COUNT};

/// Minimum knob movement treated as a genuine edit; smaller deltas are
/// analog noise and leave the committed set untouched.
pub const DEBOUNCE_THRESHOLD: f32 = 0.005;

/// Floor applied to derived decay times before they reach an envelope.
pub const MIN_DECAY_SECONDS: f32 = 0.001;

const TEMPO_MIN_HZ: f32 = 2.0;
const TEMPO_SPAN_HZ: f32 = 8.0;

/// Default committed parameters: pitch, decay, fx, amp. Audible out of
/// the box rather than the all-zero (silent) matrix.
const DEFAULT_PARAMS: [f32; VOICE_KNOB_COUNT] = [0.5, 0.5, 0.5, 0.8];

/// Control-rate translation from raw knob readings to per-voice physical
/// parameters, tempo, and the edit-target voice ("mode").
///
/// Runs once per block, never per sample. Inputs arrive pre-clamped to
/// [0, 1]; derived physical values are clamped to their legal domain
/// before being pushed into envelope/filter setters.
pub struct ParamMapper {
    /// Committed raw parameter set per voice
    committed: [[f32; VOICE_KNOB_COUNT]; VOICE_COUNT],

    /// Last committed reading per physical knob
    last: [f32; KNOB_COUNT],

    mode: usize,
    tempo_hz: f32,

    /// First update latches readings without committing, so knob rest
    /// positions at power-on do not stomp the defaults.
    primed: bool,
}

impl ParamMapper {
    pub fn new() -> Self {
        Self {
            committed: [DEFAULT_PARAMS; VOICE_COUNT],
            last: [0.0; KNOB_COUNT],
            mode: 0,
            tempo_hz: 3.0,
            primed: false,
        }
    }

    /// Step 1-2 and 4-5 of the control phase: debounce raw readings,
    /// commit genuine movements into the selected voice's parameter set,
    /// and rederive tempo and mode.
    pub fn update(&mut self, raw: &[f32; KNOB_COUNT]) {
        if !self.primed {
            self.last = *raw;
            self.primed = true;
            return;
        }

        for (knob, &value) in raw.iter().enumerate() {
            if (value - self.last[knob]).abs() > DEBOUNCE_THRESHOLD {
                if knob < VOICE_KNOB_COUNT {
                    self.committed[self.mode][knob] = value;
                }
                self.last[knob] = value;
            }
        }

        self.tempo_hz = TEMPO_MIN_HZ + self.last[knobs::TEMPO] * TEMPO_SPAN_HZ;

        let mode = Self::mode_band(self.last[knobs::MODE]);
        if mode != self.mode {
            log::debug!("mode {} -> {}", self.mode, mode);
            self.mode = mode;
        }
    }

    /// Step 3-4: recompute physical values through each voice's
    /// calibration and push them, and retarget the clock when running.
    pub fn apply(&self, voices: &mut [Voice; VOICE_COUNT], clock: &mut Clock) {
        for (index, voice) in voices.iter_mut().enumerate() {
            let raw = &self.committed[index];
            let cal = *voice.calibration();
            let pitch = cal.pitch.apply(raw[knobs::PITCH]);
            let decay = cal.decay.apply(raw[knobs::DECAY]).max(MIN_DECAY_SECONDS);
            voice.set_params(pitch, decay, raw[knobs::FX], raw[knobs::AMP]);
        }

        // Idle keeps the stored tempo for when playback resumes
        if clock.is_running() {
            clock.set_freq(self.tempo_hz);
        }
    }

    /// Mode bands follow the original panel: the knob spans the voice
    /// indices with half-band guards at both ends.
    fn mode_band(raw: f32) -> usize {
        let scaled = 0.5 + raw * (VOICE_COUNT as f32 - 1.0);
        (scaled.floor() as usize).min(VOICE_COUNT - 1)
    }

    #[inline]
    pub fn mode(&self) -> usize {
        self.mode
    }

    #[inline]
    pub fn tempo_hz(&self) -> f32 {
        self.tempo_hz
    }

    #[inline]
    pub fn committed(&self, voice: usize) -> [f32; VOICE_KNOB_COUNT] {
        self.committed[voice]
    }
}

impl Default for ParamMapper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::KNOB_COUNT;
    use approx::assert_relative_eq;

    fn primed_mapper() -> ParamMapper {
        let mut mapper = ParamMapper::new();
        mapper.update(&[0.0; KNOB_COUNT]);
        mapper
    }

    #[test]
    fn test_movement_below_threshold_is_ignored() {
        let mut mapper = primed_mapper();
        let before = mapper.committed(0);

        let mut raw = [0.0; KNOB_COUNT];
        raw[knobs::PITCH] = DEBOUNCE_THRESHOLD; // not strictly greater
        mapper.update(&raw);

        assert_eq!(mapper.committed(0), before);
    }

    #[test]
    fn test_movement_above_threshold_commits_exact_value() {
        let mut mapper = primed_mapper();

        let mut raw = [0.0; KNOB_COUNT];
        raw[knobs::DECAY] = 0.42;
        mapper.update(&raw);

        assert_relative_eq!(mapper.committed(0)[knobs::DECAY], 0.42);
    }

    #[test]
    fn test_mode_switch_preserves_committed_sets() {
        let mut mapper = primed_mapper();

        let mut raw = [0.0; KNOB_COUNT];
        raw[knobs::AMP] = 0.9;
        mapper.update(&raw);
        let voice0 = mapper.committed(0);

        // Swing the mode knob to the last band
        raw[knobs::MODE] = 1.0;
        mapper.update(&raw);
        assert_eq!(mapper.mode(), VOICE_COUNT - 1);
        assert_eq!(mapper.committed(0), voice0);

        // Writes now land on the newly selected voice only
        raw[knobs::PITCH] = 0.7;
        mapper.update(&raw);
        assert_eq!(mapper.committed(0), voice0);
        assert_relative_eq!(
            mapper.committed(VOICE_COUNT - 1)[knobs::PITCH],
            0.7
        );
    }

    #[test]
    fn test_mode_bands_cover_all_voices() {
        let modes: Vec<usize> = (0..=10)
            .map(|i| ParamMapper::mode_band(i as f32 / 10.0))
            .collect();
        assert_eq!(*modes.first().unwrap(), 0);
        assert_eq!(*modes.last().unwrap(), VOICE_COUNT - 1);
        for pair in modes.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
    }

    #[test]
    fn test_tempo_mapping_and_idle_storage() {
        let mut mapper = primed_mapper();
        let mut clock = Clock::new(48_000.0, 16);
        let mut voices: [Voice; VOICE_COUNT] = std::array::from_fn(|i| {
            Voice::new(crate::voice::VoiceKind::ALL[i], 48_000.0)
        });

        let mut raw = [0.0; KNOB_COUNT];
        raw[knobs::TEMPO] = 1.0;
        mapper.update(&raw);
        assert_relative_eq!(mapper.tempo_hz(), 10.0);

        // Idle clock is left untouched; the tempo is only stored
        mapper.apply(&mut voices, &mut clock);
        assert!(!clock.is_running());

        // Running clock is retargeted immediately
        clock.set_freq(3.0);
        mapper.apply(&mut voices, &mut clock);
        assert_relative_eq!(clock.freq(), 10.0);
    }

    #[test]
    fn test_first_update_primes_without_committing() {
        let mut mapper = ParamMapper::new();
        let defaults = mapper.committed(0);

        // Knobs resting far from the defaults at power-on
        let raw = [0.9; KNOB_COUNT];
        mapper.update(&raw);
        assert_eq!(mapper.committed(0), defaults);

        // A later genuine movement commits normally; the write targets
        // the mode that was current when the knob moved
        let target = mapper.mode();
        let mut moved = raw;
        moved[knobs::FX] = 0.2;
        mapper.update(&moved);
        assert_relative_eq!(mapper.committed(target)[knobs::FX], 0.2);
    }
}
