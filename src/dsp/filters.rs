// Filter stages using State Variable Filter (SVF) topology, plus a
// one-pole DC-blocking high-pass for the end of each voice chain.

use std::f32::consts::{PI, TAU};

/// Output tap of the SVF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterTap {
    Lowpass,
    Bandpass,
    Highpass,
}

/// State Variable Filter with live-updatable cutoff and resonance.
///
/// Coefficients are recomputed when a parameter changes; cutoff and
/// resonance are clamped to a stable range at that point.
pub struct SvfFilter {
    tap: FilterTap,
    cutoff: f32,
    resonance: f32,

    // Filter state
    ic1eq: f32,
    ic2eq: f32,

    // Cached coefficients
    g: f32,
    k: f32,
    a1: f32,
    a2: f32,
    a3: f32,

    sample_rate: f32,
}

impl SvfFilter {
    pub fn new(sample_rate: f32, tap: FilterTap) -> Self {
        let mut filter = Self {
            tap,
            cutoff: 1000.0,
            resonance: 0.5,
            ic1eq: 0.0,
            ic2eq: 0.0,
            g: 0.0,
            k: 0.0,
            a1: 0.0,
            a2: 0.0,
            a3: 0.0,
            sample_rate,
        };
        filter.recalc_coeffs();
        filter
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        if cutoff != self.cutoff {
            self.cutoff = cutoff;
            self.recalc_coeffs();
        }
    }

    pub fn set_resonance(&mut self, resonance: f32) {
        if resonance != self.resonance {
            self.resonance = resonance;
            self.recalc_coeffs();
        }
    }

    fn recalc_coeffs(&mut self) {
        let cutoff = self
            .cutoff
            .clamp(20.0, (self.sample_rate * 0.49).max(20.0));
        let resonance = self.resonance.clamp(0.0, 0.99);

        self.g = (PI * cutoff / self.sample_rate).tan();
        self.k = 2.0 - 2.0 * resonance;
        self.a1 = 1.0 / (1.0 + self.g * (self.g + self.k));
        self.a2 = self.g * self.a1;
        self.a3 = self.g * self.a2;
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let v3 = input - self.ic2eq;
        let v1 = self.a1 * self.ic1eq + self.a2 * v3;
        let v2 = self.ic2eq + self.a2 * self.ic1eq + self.a3 * v3;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        match self.tap {
            FilterTap::Lowpass => v2,
            FilterTap::Bandpass => v1,
            FilterTap::Highpass => input - self.k * v1 - v2,
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}

/// One-pole high-pass removing DC and sub-audio rumble before the gain
/// stage.
pub struct DcBlocker {
    r: f32,
    x1: f32,
    y1: f32,
}

impl DcBlocker {
    pub fn new(sample_rate: f32) -> Self {
        // Pole placed for a corner around 20 Hz
        Self {
            r: 1.0 - (TAU * 20.0 / sample_rate),
            x1: 0.0,
            y1: 0.0,
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let y = input - self.x1 + self.r * self.y1;
        self.x1 = input;
        self.y1 = y;
        y
    }

    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.y1 = 0.0;
    }
}
